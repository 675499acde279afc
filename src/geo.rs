//! Toponym extraction and geoparsing.
//!
//! The course's geoparsing lesson pulls place names ("toponyms") out of
//! scraped text and resolves them to coordinates. The full-size tooling
//! for that is a neural NER model plus the complete GeoNames database;
//! neither belongs in a classroom scraper. Instead, candidate names are
//! pulled out with a capitalization heuristic and only the candidates
//! found in a local gazetteer count as places. That trades recall for a
//! tool with no model weights and very few false positives, which is the
//! right trade for teaching.

use crate::count::HasLabel;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use thiserror::Error;

/// A geoparsing error.
#[derive(Debug, Error)]
pub enum Error {
    /// The gazetteer file could not be read or parsed.
    #[error("could not read gazetteer: {0}")]
    Csv(#[from] csv::Error),

    /// The gazetteer parsed but contains no places.
    #[error("gazetteer contains no places")]
    Empty,
}

/// A place in the gazetteer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Place {
    /// The place's name.
    pub name: String,

    /// The country the place is in.
    pub country: String,

    /// Latitude in decimal degrees.
    pub lat: f64,

    /// Longitude in decimal degrees.
    pub lng: f64,

    /// Population, used to break ties between places sharing a name.
    #[serde(default)]
    pub population: u64,
}

impl HasLabel for &Place {
    fn label(&self) -> &str {
        &self.name
    }
}

/// A local database of place names and their coordinates.
///
/// Loaded from the CSV file that `snooscrape setup` downloads
/// (`name,country,lat,lng,population`). When several places share a name
/// -- there are a few dozen Springfields -- the most populous one wins,
/// the same resolution rule the course's geoparsing library applies.
#[derive(Debug)]
pub struct Gazetteer {
    places: HashMap<String, Place>,
}

impl Gazetteer {
    /// Loads a gazetteer from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let reader = csv::Reader::from_path(path.as_ref())?;
        Self::from_csv(reader)
    }

    /// Loads a gazetteer from anything readable containing CSV.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, Error> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, Error> {
        let mut places: HashMap<String, Place> = HashMap::new();
        for result in reader.deserialize() {
            let place: Place = result?;
            let key = place.name.to_lowercase();
            match places.get(&key) {
                Some(existing) if existing.population >= place.population => {}
                _ => {
                    places.insert(key, place);
                }
            }
        }
        if places.is_empty() {
            return Err(Error::Empty);
        }
        debug!("loaded gazetteer with {} places", places.len());
        Ok(Self { places })
    }

    /// The number of distinct place names in the gazetteer.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// True if the gazetteer holds no places. Cannot actually happen for
    /// a loaded gazetteer, but clippy insists that `len` implies this.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Resolves a name to a place, case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<&Place> {
        self.places.get(&name.to_lowercase())
    }
}

// Capitalized words that start sentences far more often than they name
// places. Candidates consisting solely of these are never looked up.
const STOPWORDS: &[&str] = &[
    "A", "An", "And", "But", "For", "He", "Her", "His", "I", "If", "In", "It",
    "My", "No", "Not", "Of", "On", "Or", "Our", "She", "So", "The", "They",
    "This", "That", "We", "What", "When", "Where", "Why", "Yes", "You",
];

/// Extracts place names from free text.
#[derive(Debug)]
pub struct ToponymExtractor {
    pattern: Regex,
}

impl Default for ToponymExtractor {
    fn default() -> Self {
        // Runs of up to three capitalized words; enough for every
        // multi-word city name in the gazetteer ("New York City").
        let pattern = Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,2}\b")
            .expect("toponym pattern is valid");
        Self { pattern }
    }
}

impl ToponymExtractor {
    /// Pulls the resolvable place names out of a piece of text.
    ///
    /// Every mention counts: a text naming Paris three times yields Paris
    /// three times. Candidates that cannot be resolved against the
    /// gazetteer are dropped; a multi-word candidate that misses is
    /// retried word by word, so "From Paris" still finds Paris.
    pub fn toponyms<'a>(&self, text: &str, gazetteer: &'a Gazetteer) -> Vec<&'a Place> {
        let mut places = Vec::new();
        for candidate in self.pattern.find_iter(text) {
            let candidate = candidate.as_str();
            if let Some(place) = gazetteer.resolve(candidate) {
                places.push(place);
                continue;
            }
            for word in candidate.split_whitespace() {
                if STOPWORDS.contains(&word) {
                    continue;
                }
                if let Some(place) = gazetteer.resolve(word) {
                    places.push(place);
                }
            }
        }
        places
    }
}
