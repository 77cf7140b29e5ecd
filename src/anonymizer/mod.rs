// WHY: One fixed dispatch from span label to replacement strategy, decided
// at compile time via exhaustive match rather than a runtime callable table

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub mod casing;
pub mod location;
pub mod shuffle;

// Re-export core helpers
pub use casing::apply_casing;
pub use shuffle::shuffle_text;

use crate::engine::SpanAnonymizer;
use crate::gazetteer::Gazetteer;

/// Span labels with a dedicated replacement policy.
///
/// Detector output arrives as free-form strings; [`Label::parse`] folds
/// anything unrecognized into [`Label::Other`], which shares the default
/// masking rule, so an unknown label is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Person,
    Location,
    Date,
    Zip,
    Id,
    Financial,
    Vehicle,
    Card,
    Telephone,
    Sensitive,
    Other,
}

impl Label {
    /// Map a detector label string to its strategy. Accepts the short forms
    /// `PER` and `LOC` emitted by common NER tag sets.
    pub fn parse(label: &str) -> Label {
        match label {
            "PERSON" | "PER" => Label::Person,
            "LOCATION" | "LOC" => Label::Location,
            "DATE" => Label::Date,
            "ZIP" => Label::Zip,
            "ID" => Label::Id,
            "FINANCIAL" => Label::Financial,
            "VEHICLE" => Label::Vehicle,
            "CARD" => Label::Card,
            "TELEPHONE" => Label::Telephone,
            "SENSITIVE" => Label::Sensitive,
            _ => Label::Other,
        }
    }
}

/// Shape-preserving anonymizer: every span gets the character-class
/// shuffle, whatever its label. The cheapest mode, and the one that keeps
/// document layout byte-for-byte stable.
pub struct ShuffleAnonymizer {
    rng: SmallRng,
}

impl ShuffleAnonymizer {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seeded variant for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for ShuffleAnonymizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanAnonymizer for ShuffleAnonymizer {
    fn replace(&mut self, _label: &str, text: &str) -> Result<String> {
        Ok(shuffle_text(&mut self.rng, text))
    }
}

/// Tagging anonymizer: replaces the span text with its bracketed label,
/// e.g. `[PERSON]`. Useful when the output is meant for annotation review
/// rather than release.
#[derive(Debug, Default)]
pub struct LabelAnonymizer;

impl LabelAnonymizer {
    pub fn new() -> Self {
        Self
    }
}

impl SpanAnonymizer for LabelAnonymizer {
    fn replace(&mut self, label: &str, _text: &str) -> Result<String> {
        Ok(format!("[{label}]"))
    }
}

/// Gazetteer-backed anonymizer: persons and locations get synthetic but
/// plausible substitutes sampled from the gazetteer, SENSITIVE spans are
/// deleted, and every remaining label falls back to the format-preserving
/// character-class shuffle.
pub struct GazetteerAnonymizer {
    gazetteer: Gazetteer,
    rng: SmallRng,
}

impl GazetteerAnonymizer {
    pub fn new(gazetteer: Gazetteer) -> Self {
        Self {
            gazetteer,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seeded variant for reproducible runs.
    pub fn with_seed(gazetteer: Gazetteer, seed: u64) -> Self {
        Self {
            gazetteer,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a synthetic person for the spanned text.
    ///
    /// One whitespace token becomes a given name; two or more become a
    /// given name and a surname, each echoing the casing of the token at
    /// the same position. Known limitation: tokens beyond the second are
    /// dropped, so a three-part name collapses to two.
    fn replace_person(&mut self, text: &str) -> Result<String> {
        let mut tokens = text.split_whitespace();
        let first = tokens.next().unwrap_or("");
        let name = apply_casing(first, self.gazetteer.sample_name(&mut self.rng)?);
        match tokens.next() {
            Some(second) => {
                let surname = apply_casing(second, self.gazetteer.sample_surname(&mut self.rng)?);
                Ok(format!("{name} {surname}"))
            }
            None => Ok(name),
        }
    }
}

impl SpanAnonymizer for GazetteerAnonymizer {
    fn replace(&mut self, label: &str, text: &str) -> Result<String> {
        match Label::parse(label) {
            Label::Person => self.replace_person(text),
            Label::Location => location::generate(&mut self.rng, &self.gazetteer, text),
            Label::Sensitive => Ok(String::new()),
            Label::Date
            | Label::Zip
            | Label::Id
            | Label::Financial
            | Label::Vehicle
            | Label::Card
            | Label::Telephone
            | Label::Other => Ok(shuffle_text(&mut self.rng, text)),
        }
    }
}
