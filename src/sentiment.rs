//! Rule-based sentiment scoring.
//!
//! Scores text with the VADER lexicon, the same rule-based scorer the
//! course's notebooks use. VADER needs no model weights and no network
//! access, which is exactly why it is the classroom default; the
//! transformer-based alternative mentioned in the course material is a
//! separate, heavier tool and is not implemented here.

use crate::record::Record;
use counter::Counter;
use std::fmt;
use vader_sentiment::SentimentIntensityAnalyzer;

/// The cutoff on the compound score between neutral and positive or
/// negative text. This is the threshold VADER's authors recommend.
const POLARITY_THRESHOLD: f64 = 0.05;

/// The overall polarity of a piece of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    /// Classifies a compound score.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POLARITY_THRESHOLD {
            Polarity::Positive
        } else if compound <= -POLARITY_THRESHOLD {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "positive"),
            Polarity::Neutral => write!(f, "neutral"),
            Polarity::Negative => write!(f, "negative"),
        }
    }
}

/// The VADER scores for a piece of text.
///
/// `positive`, `neutral`, and `negative` are the proportions of the text
/// falling in each band; `compound` is the normalized overall score in
/// `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Score {
    /// The polarity of the scored text.
    pub fn polarity(&self) -> Polarity {
        Polarity::from_compound(self.compound)
    }
}

/// Scores text with the VADER lexicon.
///
/// Construction parses the embedded lexicon, so build one analyzer and
/// reuse it when scoring a batch.
pub struct Analyzer {
    inner: SentimentIntensityAnalyzer<'static>,
}

impl Analyzer {
    /// Creates a new analyzer.
    pub fn new() -> Self {
        Self {
            inner: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Scores a piece of text.
    pub fn score(&self, text: &str) -> Score {
        let scores = self.inner.polarity_scores(text);
        Score {
            compound: scores.get("compound").copied().unwrap_or_default(),
            positive: scores.get("pos").copied().unwrap_or_default(),
            neutral: scores.get("neu").copied().unwrap_or_default(),
            negative: scores.get("neg").copied().unwrap_or_default(),
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scores a single piece of text with the VADER lexicon.
///
/// Convenience for one-off scoring; batch callers should build an
/// [`Analyzer`] and reuse it.
pub fn score(text: &str) -> Score {
    Analyzer::new().score(text)
}

/// A summary of the sentiment of a batch of scraped records.
#[derive(Debug)]
pub struct Report {
    counts: Counter<Polarity>,
    mean_compound: f64,
    total: usize,
}

impl Report {
    /// Scores every record and tallies the results.
    pub fn from_records(records: &[Record]) -> Self {
        let analyzer = Analyzer::new();
        let scores: Vec<Score> = records
            .iter()
            .map(|record| analyzer.score(&record.analysis_text()))
            .collect();
        let counts = scores
            .iter()
            .map(|score| score.polarity())
            .collect::<Counter<_>>();
        let mean_compound = if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|score| score.compound).sum::<f64>() / scores.len() as f64
        };
        Report {
            counts,
            mean_compound,
            total: scores.len(),
        }
    }

    /// The number of records with the given polarity.
    pub fn count(&self, polarity: Polarity) -> usize {
        self.counts.get(&polarity).copied().unwrap_or_default()
    }

    /// The mean compound score across all records.
    pub fn mean_compound(&self) -> f64 {
        self.mean_compound
    }

    /// The total number of records scored.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The overall polarity of the batch, judged by the mean compound
    /// score.
    pub fn overall(&self) -> Polarity {
        Polarity::from_compound(self.mean_compound)
    }
}
