pub mod anonymizer;
pub mod engine;
pub mod gazetteer;

// Re-export main types for convenient access
pub use engine::{anonymize_spans, Span, SpanAnonymizer};

// Re-export the anonymizer implementations and label dispatch
pub use anonymizer::{GazetteerAnonymizer, Label, LabelAnonymizer, ShuffleAnonymizer};

// Re-export gazetteer store types for resource loading
pub use gazetteer::{Gazetteer, GazetteerConfig, WayRecord};
