//! Core data model types for QBL.
//!
//! A [`Question`] is one parsed multiple-choice entry from a bank file. The
//! [`Bank`](crate::bank::Bank) owns the full pool of them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex digits kept from the stem digest for derived ids.
const DERIVED_ID_HEX_LEN: usize = 10;

/// A single answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Option text as written in the bank (continuation lines joined by `\n`).
    pub text: String,
    /// Whether this is the correct answer.
    pub is_correct: bool,
}

impl Choice {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// One multiple-choice question parsed from a bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique across the loaded pool.
    pub id: String,
    /// The question text.
    pub stem: String,
    /// Answer options in the order they appear in the bank.
    pub choices: Vec<Choice>,
    /// Labels used by the selection engine.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Optional explanation shown after the question is answered.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Bank file this question came from.
    pub source_file: String,
    /// 1-based line of the first line of the entry.
    pub line: usize,
    /// Position in the pool at parse time (file order, then appearance order).
    pub raw_order_index: usize,
}

impl Question {
    /// Returns `true` if the question carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Returns `true` if the question carries at least one tag from `tags`.
    pub fn has_any_tag(&self, tags: &BTreeSet<String>) -> bool {
        // Iterate the smaller side; most questions have a handful of tags.
        if self.tags.len() <= tags.len() {
            self.tags.iter().any(|t| tags.contains(t))
        } else {
            tags.iter().any(|t| self.tags.contains(t))
        }
    }

    /// Index of the correct choice, if exactly one is marked.
    pub fn correct_index(&self) -> Option<usize> {
        let mut correct = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_correct)
            .map(|(i, _)| i);
        match (correct.next(), correct.next()) {
            (Some(i), None) => Some(i),
            _ => None,
        }
    }

    /// Where this question was defined, for diagnostics.
    pub fn location(&self) -> QuestionLocation {
        QuestionLocation {
            id: self.id.clone(),
            file: self.source_file.clone(),
            line: self.line,
            position: self.raw_order_index,
        }
    }
}

/// Derive a stable identifier from the stem text.
///
/// The id is `q` followed by the leading hex digits of the SHA-256 of the
/// trimmed stem, so it survives reordering, moving between files, and edits to
/// choices or tags.
pub fn derive_id(stem: &str) -> String {
    let digest = Sha256::digest(stem.trim().as_bytes());
    let mut id = String::with_capacity(DERIVED_ID_HEX_LEN + 1);
    id.push('q');
    id.push_str(&hex::encode(digest)[..DERIVED_ID_HEX_LEN]);
    id
}

/// Letter used for the choice at `index` (`a`, `b`, ...).
pub fn choice_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

/// Pointer to a question in the bank, used by error messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLocation {
    pub id: String,
    pub file: String,
    pub line: usize,
    /// Position in the pool.
    pub position: usize,
}

impl fmt::Display for QuestionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} (question #{}, id '{}')",
            self.file,
            self.line,
            self.position + 1,
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(choices: Vec<Choice>) -> Question {
        Question {
            id: "q1".into(),
            stem: "What is 2 + 2?".into(),
            choices,
            tags: ["math".to_string(), "easy".to_string()].into(),
            explanation: None,
            source_file: "bank.qbl".into(),
            line: 3,
            raw_order_index: 0,
        }
    }

    #[test]
    fn derived_id_is_stable_and_trimmed() {
        let a = derive_id("What is 2 + 2?");
        let b = derive_id("  What is 2 + 2?\n");
        assert_eq!(a, b);
        assert_eq!(a.len(), DERIVED_ID_HEX_LEN + 1);
        assert!(a.starts_with('q'));
        assert_ne!(a, derive_id("What is 2 + 3?"));
    }

    #[test]
    fn correct_index_requires_exactly_one() {
        let q = question(vec![Choice::new("3", false), Choice::new("4", true)]);
        assert_eq!(q.correct_index(), Some(1));

        let none = question(vec![Choice::new("3", false), Choice::new("4", false)]);
        assert_eq!(none.correct_index(), None);

        let two = question(vec![Choice::new("3", true), Choice::new("4", true)]);
        assert_eq!(two.correct_index(), None);
    }

    #[test]
    fn tag_queries() {
        let q = question(vec![]);
        assert!(q.has_tag("math"));
        assert!(!q.has_tag("hard"));
        let wanted: BTreeSet<String> = ["hard".to_string(), "easy".to_string()].into();
        assert!(q.has_any_tag(&wanted));
        assert!(!q.has_any_tag(&BTreeSet::new()));
    }

    #[test]
    fn choice_letters() {
        assert_eq!(choice_letter(0), 'a');
        assert_eq!(choice_letter(3), 'd');
    }

    #[test]
    fn location_display() {
        let q = question(vec![]);
        assert_eq!(
            q.location().to_string(),
            "bank.qbl:3 (question #1, id 'q1')"
        );
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = question(vec![Choice::new("3", false), Choice::new("4", true)]);
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
