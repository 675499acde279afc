//! General-purpose counting capabilities.

use counter::Counter;
use itertools::Itertools;
use std::vec::IntoIter;

/// A thing that carries a countable label.
pub trait HasLabel {
    /// The label to group by.
    fn label(&self) -> &str;
}

impl HasLabel for String {
    fn label(&self) -> &str {
        self
    }
}

impl HasLabel for &str {
    fn label(&self) -> &str {
        self
    }
}

/// Differentiates between the different sorting algorithms used to
/// return label counts.
#[derive(Debug, Default)]
pub enum SortAlgorithm {
    /// Sort counts by label name.
    #[default]
    Lexicographically,

    /// Sort counts by the number of items under each label.
    Numerically,
}

/// A pair of label and count.
pub type LabelCount = (String, usize);

/// Groups labeled items and provides a count of the number of items under
/// each label.
#[derive(Debug)]
pub struct LabelCounter {
    counts: Counter<String>,
}

impl LabelCounter {
    /// Groups and counts labeled items.
    ///
    /// `iter` is an iterator of anything that has a label attached to it,
    /// such as the place names pulled out of scraped records.
    pub fn from_iter<T: HasLabel>(iter: impl Iterator<Item = T>) -> Self {
        let counts = LabelCounter::count(iter);
        LabelCounter { counts }
    }

    /// Sorts the label counts by label name or the count of items under
    /// the label.
    ///
    /// Returns an iterator over the (label, count) pairs.
    pub fn sort_by(&self, algo: &SortAlgorithm) -> IntoIter<LabelCount> {
        match algo {
            SortAlgorithm::Numerically => self
                .counts
                .most_common_tiebreaker(|lhs, rhs| {
                    Ord::cmp(&lhs.to_lowercase(), &rhs.to_lowercase())
                })
                .into_iter(),
            SortAlgorithm::Lexicographically => self.sort_lexicographically(),
        }
    }

    /// True if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn count<T: HasLabel>(iter: impl Iterator<Item = T>) -> Counter<String> {
        iter.map(|item| String::from(item.label()))
            .collect::<Counter<_>>()
    }

    fn sort_lexicographically(&self) -> IntoIter<LabelCount> {
        self.counts
            .keys()
            .sorted_by(|lhs, rhs| Ord::cmp(&lhs.to_lowercase(), &rhs.to_lowercase()))
            .map(|key| {
                (
                    key.to_owned(),
                    *self
                        .counts
                        .get(key)
                        .expect("somehow the key doesn't actually exist"),
                )
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}
