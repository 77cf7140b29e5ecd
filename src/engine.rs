// WHY: Single rewrite pass over a document; span coordinates stay valid as
// replacements of unequal length shift everything after them

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A labeled half-open character range `[start, end)` into a document,
/// identifying one piece of sensitive text to replace.
///
/// Offsets count Unicode scalar values, not bytes, so spans produced by
/// character-offset detectors (the usual NER output) apply directly.
/// Input spans must be sorted by `start` and pairwise non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Span {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// Replacement strategy seam between the driver and the concrete anonymizers.
///
/// Implementations map the spanned text to its replacement text; the driver
/// owns all offset arithmetic. A call either produces the full replacement or
/// fails; there is no partial application, and the driver stops at the first
/// failed span rather than continue with a half-anonymized document.
pub trait SpanAnonymizer {
    fn replace(&mut self, label: &str, text: &str) -> Result<String>;
}

/// Replace every span of `document` using `anonymizer`, returning the
/// rewritten document together with the spans at their new coordinates.
///
/// Spans are visited once, in input order. A running offset carries the
/// cumulative length drift of earlier replacements forward, so each span is
/// shifted into the coordinate space of the document as rewritten so far
/// before its text is extracted and spliced. Replacements may have any
/// length; zero-length spans are legal pure insertions.
///
/// Fails fast on precondition violations: a span that overlaps the previous
/// replacement (unsorted or overlapping input), an inverted range, or a span
/// reaching past the end of the document.
///
/// Each splice rebuilds the tail of the working buffer, so a pass is
/// O(spans * document length). Fine for per-document batch processing; very
/// long documents with many spans would want an edit-list representation.
pub fn anonymize_spans<A: SpanAnonymizer + ?Sized>(
    anonymizer: &mut A,
    spans: &[Span],
    document: &str,
) -> Result<(Vec<Span>, String)> {
    let mut chars: Vec<char> = document.chars().collect();
    let mut new_spans = Vec::with_capacity(spans.len());
    let mut offset: isize = 0;
    let mut last_end: usize = 0;

    for span in spans {
        let start = span.start as isize + offset;
        let end = span.end as isize + offset;
        if start < 0 || end < start {
            bail!(
                "invalid span [{}, {}) for label {} after offset {}",
                span.start,
                span.end,
                span.label,
                offset
            );
        }
        let (start, end) = (start as usize, end as usize);
        if start < last_end {
            bail!(
                "spans must be sorted and non-overlapping: [{}, {}) starts before the previous replacement ends at {}",
                span.start,
                span.end,
                last_end as isize - offset
            );
        }
        if end > chars.len() {
            bail!(
                "span [{}, {}) reaches past the end of the document ({} chars)",
                span.start,
                span.end,
                chars.len() as isize - offset
            );
        }

        let original: String = chars[start..end].iter().collect();
        let replacement = anonymizer.replace(&span.label, &original)?;
        let replacement_chars: Vec<char> = replacement.chars().collect();
        let new_end = start + replacement_chars.len();

        chars.splice(start..end, replacement_chars);
        offset += new_end as isize - end as isize;
        last_end = new_end;
        new_spans.push(Span {
            start,
            end: new_end,
            label: span.label.clone(),
        });
    }

    debug!(
        "Anonymized {} spans, document drifted by {} chars",
        spans.len(),
        offset
    );
    Ok((new_spans, chars.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Deterministic stand-in: replaces each label with a fixed string so the
    // offset arithmetic can be checked exactly.
    struct FixedAnonymizer {
        replacements: HashMap<&'static str, &'static str>,
    }

    impl FixedAnonymizer {
        fn new(pairs: &[(&'static str, &'static str)]) -> Self {
            Self {
                replacements: pairs.iter().copied().collect(),
            }
        }
    }

    impl SpanAnonymizer for FixedAnonymizer {
        fn replace(&mut self, label: &str, _text: &str) -> Result<String> {
            match self.replacements.get(label) {
                Some(replacement) => Ok((*replacement).to_string()),
                None => bail!("no replacement for label {label}"),
            }
        }
    }

    #[test]
    fn test_offset_propagates_to_later_spans() {
        // [0,4) grows by 2, so [10,14) must land at 12
        let mut anonymizer = FixedAnonymizer::new(&[("A", "xxxxxx"), ("B", "yy")]);
        let document = "abcd......efgh..";
        let spans = vec![Span::new(0, 4, "A"), Span::new(10, 14, "B")];

        let (new_spans, new_doc) = anonymize_spans(&mut anonymizer, &spans, document).unwrap();

        assert_eq!(new_spans[0], Span::new(0, 6, "A"));
        assert_eq!(new_spans[1], Span::new(12, 14, "B"));
        assert_eq!(new_doc, "xxxxxx......yy..");
    }

    #[test]
    fn test_deletion_shifts_spans_backwards() {
        let mut anonymizer = FixedAnonymizer::new(&[("DROP", ""), ("KEEP", "kept")]);
        let document = "secret and more";
        let spans = vec![Span::new(0, 6, "DROP"), Span::new(11, 15, "KEEP")];

        let (new_spans, new_doc) = anonymize_spans(&mut anonymizer, &spans, document).unwrap();

        assert_eq!(new_spans[0], Span::new(0, 0, "DROP"));
        // 11 - 6 = 5 after the deletion
        assert_eq!(new_spans[1], Span::new(5, 9, "KEEP"));
        assert_eq!(new_doc, " and kept");
    }

    #[test]
    fn test_zero_length_span_is_pure_insertion() {
        let mut anonymizer = FixedAnonymizer::new(&[("INS", "++")]);
        let document = "abcdef";
        let spans = vec![Span::new(3, 3, "INS")];

        let (new_spans, new_doc) = anonymize_spans(&mut anonymizer, &spans, document).unwrap();

        assert_eq!(new_spans[0], Span::new(3, 5, "INS"));
        assert_eq!(new_doc, "abc++def");
    }

    #[test]
    fn test_adjacent_spans_are_legal() {
        let mut anonymizer = FixedAnonymizer::new(&[("A", "1"), ("B", "2")]);
        let document = "xxyy";
        let spans = vec![Span::new(0, 2, "A"), Span::new(2, 4, "B")];

        let (new_spans, new_doc) = anonymize_spans(&mut anonymizer, &spans, document).unwrap();

        assert_eq!(new_doc, "12");
        assert_eq!(new_spans[1], Span::new(1, 2, "B"));
    }

    #[test]
    fn test_overlapping_spans_rejected() {
        let mut anonymizer = FixedAnonymizer::new(&[("A", "aa"), ("B", "bb")]);
        let document = "0123456789";
        let spans = vec![Span::new(0, 5, "A"), Span::new(3, 8, "B")];

        let result = anonymize_spans(&mut anonymizer, &spans, document);
        assert!(result.is_err(), "overlapping spans must fail fast");
    }

    #[test]
    fn test_unsorted_spans_rejected() {
        let mut anonymizer = FixedAnonymizer::new(&[("A", "aa"), ("B", "bb")]);
        let document = "0123456789";
        let spans = vec![Span::new(6, 8, "A"), Span::new(0, 2, "B")];

        let result = anonymize_spans(&mut anonymizer, &spans, document);
        assert!(result.is_err(), "unsorted spans must fail fast");
    }

    #[test]
    fn test_out_of_bounds_span_rejected() {
        let mut anonymizer = FixedAnonymizer::new(&[("A", "aa")]);
        let document = "short";
        let spans = vec![Span::new(2, 99, "A")];

        let result = anonymize_spans(&mut anonymizer, &spans, document);
        assert!(result.is_err(), "out-of-bounds span must fail fast");
    }

    #[test]
    fn test_failed_strategy_aborts_pass() {
        let mut anonymizer = FixedAnonymizer::new(&[("KNOWN", "ok")]);
        let document = "aa bb cc";
        let spans = vec![Span::new(0, 2, "KNOWN"), Span::new(3, 5, "UNKNOWN")];

        let result = anonymize_spans(&mut anonymizer, &spans, document);
        assert!(result.is_err(), "driver must not continue past a failed span");
    }

    #[test]
    fn test_empty_span_list_returns_document_unchanged() {
        let mut anonymizer = FixedAnonymizer::new(&[]);
        let (new_spans, new_doc) = anonymize_spans(&mut anonymizer, &[], "untouched").unwrap();
        assert!(new_spans.is_empty());
        assert_eq!(new_doc, "untouched");
    }

    #[test]
    fn test_char_offsets_survive_multibyte_text() {
        let mut anonymizer = FixedAnonymizer::new(&[("LOC", "X")]);
        // "vía" is 3 chars but 4 bytes; spans count chars
        let document = "la vía gran";
        let spans = vec![Span::new(3, 6, "LOC")];

        let (new_spans, new_doc) = anonymize_spans(&mut anonymizer, &spans, document).unwrap();

        assert_eq!(new_doc, "la X gran");
        assert_eq!(new_spans[0], Span::new(3, 4, "LOC"));
    }

    #[test]
    fn test_span_serde_shape() {
        let span = Span::new(4, 9, "PERSON");
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(json, r#"{"start":4,"end":9,"label":"PERSON"}"#);

        let parsed: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, span);
    }
}
