//! Draws viewable objects into a terminal window.

use crate::count::LabelCount;
use crate::record::Record;
use crate::sentiment::{Polarity, Report};
use crate::setup::Summary;
use colored::Colorize;
use indoc::formatdoc;
use textwrap::Options;

/// View renderer options.
#[derive(Debug, Default)]
pub struct ViewOptions {
    oneline: bool,
    raw: bool,
}

impl ViewOptions {
    /// Incrementally builds a new set of view options.
    ///
    /// # Examples
    ///
    /// ```
    /// use snooscrape::view::ViewOptions;
    /// let opts = ViewOptions::build().oneline(true).raw(false).build();
    /// ```
    pub fn build() -> ViewOptionsBuilder {
        ViewOptionsBuilder::default()
    }

    /// True if output should be compacted to one line per item.
    pub fn is_oneline(&self) -> bool {
        self.oneline
    }

    /// True if text should be printed as-is, without wrapping.
    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

/// A builder for view options.
///
/// You probably don't want to use this directly; call [`ViewOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewOptionsBuilder {
    oneline: bool,
    raw: bool,
}

impl ViewOptionsBuilder {
    /// Sets the "oneline" option to true or false.
    pub fn oneline(mut self, oneline: bool) -> Self {
        self.oneline = oneline;
        self
    }

    /// Sets the "raw" option to true or false.
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Finalizes the [`ViewOptions`].
    pub fn build(self) -> ViewOptions {
        ViewOptions {
            oneline: self.oneline,
            raw: self.raw,
        }
    }
}

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self, opts: &ViewOptions) -> String;
}

impl Viewable for Record {
    fn view(&self, opts: &ViewOptions) -> String {
        let date = self.date.format("%Y-%m-%d %H:%M");
        // Width specifiers are ignored by custom Display impls, so the
        // kind is rendered to a string before it is aligned.
        let kind = self.kind.to_string();
        if opts.is_oneline() {
            format!("{kind:>7}  {date}  {:>5}  {}", self.score, self.as_line())
        } else {
            let text = if opts.is_raw() {
                self.text.clone()
            } else {
                textwrap::fill(&self.text, Options::with_termwidth())
            };
            formatdoc! {"
                {}
                {kind:>7} | {date} | score {}

                {text}",
                self.title.bold(),
                self.score,
            }
        }
    }
}

impl Viewable for Report {
    fn view(&self, _: &ViewOptions) -> String {
        formatdoc! {"
            Scored {} records
            {}: {}
            {}: {}
            {}: {}
            Mean compound score: {:+.3} ({})",
            self.total(),
            "positive".green(),
            self.count(Polarity::Positive),
            "neutral".yellow(),
            self.count(Polarity::Neutral),
            "negative".red(),
            self.count(Polarity::Negative),
            self.mean_compound(),
            self.overall(),
        }
    }
}

impl Viewable for Summary {
    fn view(&self, _: &ViewOptions) -> String {
        let check = "✓".green();
        formatdoc! {"
            {check} data directory at {}
            {check} gazetteer validated ({} places)
            {check} sentiment lexicon available (built in)",
            self.data_dir.display(),
            self.places,
        }
    }
}

impl Viewable for Vec<LabelCount> {
    fn view(&self, _: &ViewOptions) -> String {
        let width = self
            .iter()
            .map(|(_, count)| count.to_string().len())
            .max()
            .unwrap_or(1);
        self.iter()
            .map(|(label, count)| format!("{count:>width$}  {label}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
