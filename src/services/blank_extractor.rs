use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("BLANK_MARKER is a valid regex pattern"));

/// One fill-in-the-blank slot, identified by its left-to-right position in
/// the question text. `label` is the literal text between the markers, a
/// display convenience; which answer fills the slot is decided by the
/// content's `correct_answers[index]`, not by the label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blank {
    pub index: usize,
    pub label: String,
}

/// Scans question text for `[[...]]` markers (non-greedy) in document
/// order. Index 0 is the first marker encountered.
pub fn extract_blanks(text: &str) -> Vec<Blank> {
    BLANK_MARKER
        .captures_iter(text)
        .enumerate()
        .map(|(index, caps)| Blank {
            index,
            label: caps[1].to_string(),
        })
        .collect()
}

/// Number of blanks in the text; defines the required length of the
/// content's `correct_answers` and of a submitted fill-blanks answer.
pub fn blank_count(text: &str) -> usize {
    BLANK_MARKER.find_iter(text).count()
}
