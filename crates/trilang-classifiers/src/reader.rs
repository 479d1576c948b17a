//! Reader input for classification
//!
//! The classifier only works on materialized text; these helpers drain a
//! reader first and then hand the text over.

use crate::classifier::Classifier;
use std::io::Read;
use trilang_core::{Classification, Result};

/// Read everything from `reader` into a string
///
/// Invalid UTF-8 sequences are replaced with U+FFFD, which is not a letter
/// and so acts as a word boundary during extraction.
pub fn read_text(mut reader: impl Read) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Drain `reader` and classify its content
pub fn classify_reader<C>(classifier: &C, reader: impl Read) -> Result<Classification>
where
    C: Classifier + ?Sized,
{
    let text = read_text(reader)?;
    Ok(classifier.classify(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrigramClassifier;
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "source closed"))
        }
    }

    #[test]
    fn test_read_text_utf8() {
        let text = read_text("Grüße aus Köln".as_bytes()).unwrap();
        assert_eq!(text, "Grüße aus Köln");
    }

    #[test]
    fn test_read_text_invalid_utf8_is_lossy() {
        let bytes: &[u8] = &[b'a', b'b', 0xFF, 0xFE, b'c', b'd'];
        let text = read_text(bytes).unwrap();
        assert_eq!(text, "ab\u{FFFD}\u{FFFD}cd");
    }

    #[test]
    fn test_reader_matches_text() {
        let classifier = TrigramClassifier::builtin().unwrap();
        let text = "We hold these truths to be self-evident, that all men are created equal";

        let from_reader = classify_reader(&classifier, text.as_bytes()).unwrap();
        assert_eq!(from_reader, classifier.classify(text));
    }

    #[test]
    fn test_empty_reader() {
        let classifier = TrigramClassifier::builtin().unwrap();
        let result = classify_reader(&classifier, io::empty()).unwrap();
        assert!(result.is_undetermined());
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn test_binary_garbage_classifies() {
        let classifier = TrigramClassifier::builtin().unwrap();
        let garbage: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let result = classify_reader(&classifier, garbage.as_slice()).unwrap();
        assert!((0.0..=1.0).contains(&result.confidence()));
    }

    #[test]
    fn test_io_error_propagates() {
        let classifier = TrigramClassifier::builtin().unwrap();
        let err = classify_reader(&classifier, FailingReader).unwrap_err();
        assert!(matches!(err, trilang_core::Error::Io(_)));
    }
}
