//! Line-driven parser for QBL bank files.
//!
//! Entries are separated by blank lines. Within an entry:
//!
//! ```text
//! #loops-01                 explicit id (optional, first line of the entry)
//! ^loops easy               tags, whitespace or comma separated
//! Which keyword starts an   question text, one or more lines
//! infinite loop in Rust?
//! a. while                  choice
//! *b. loop                  correct choice
//! c. for
//!    (the iterator form)    indented: continues the previous text field
//! > `loop` never ends.      explanation
//! ```
//!
//! Lines starting with `%` are comments and are removed before parsing.

use std::collections::BTreeSet;

use crate::error::{ParseError, ParseErrorKind};
use crate::model::{choice_letter, derive_id, Choice, Question};

/// Prefix of comment lines.
pub const COMMENT_PREFIX: char = '%';
/// Prefix of explicit id lines.
pub const ID_PREFIX: char = '#';
/// Prefix of tag lines.
pub const TAG_PREFIX: char = '^';
/// Prefix of explanation lines.
pub const EXPLANATION_PREFIX: char = '>';
/// Marks the correct choice.
pub const CORRECT_MARKER: char = '*';

/// Which text field an indented continuation line extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Stem,
    Choice,
    Explanation,
}

/// Raw fields of the entry currently being read.
#[derive(Debug)]
struct Entry {
    line: usize,
    id: Option<String>,
    stem: Vec<String>,
    choices: Vec<Choice>,
    tags: BTreeSet<String>,
    explanation: Vec<String>,
    last_text: Option<TextField>,
}

impl Entry {
    fn new(line: usize) -> Self {
        Self {
            line,
            id: None,
            stem: Vec::new(),
            choices: Vec::new(),
            tags: BTreeSet::new(),
            explanation: Vec::new(),
            last_text: None,
        }
    }
}

/// One classified bank line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Id(&'a str),
    Tags(&'a str),
    Explanation(&'a str),
    Choice {
        correct: bool,
        letter: char,
        text: &'a str,
    },
    Continuation(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if line.starts_with(char::is_whitespace) {
        return Line::Continuation(trimmed);
    }
    if let Some(rest) = trimmed.strip_prefix(ID_PREFIX) {
        return Line::Id(rest.trim());
    }
    if let Some(rest) = trimmed.strip_prefix(TAG_PREFIX) {
        return Line::Tags(rest);
    }
    if let Some(rest) = trimmed.strip_prefix(EXPLANATION_PREFIX) {
        return Line::Explanation(rest.trim());
    }
    if let Some((correct, letter, text)) = split_choice(trimmed) {
        return Line::Choice {
            correct,
            letter,
            text,
        };
    }
    Line::Text(trimmed)
}

/// Recognize `a. text`, `b) text`, and `*c. text`.
fn split_choice(line: &str) -> Option<(bool, char, &str)> {
    let (correct, rest) = match line.strip_prefix(CORRECT_MARKER) {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };
    let mut chars = rest.chars();
    let letter = chars.next().filter(char::is_ascii_lowercase)?;
    let punct = chars.next()?;
    if punct != '.' && punct != ')' {
        return None;
    }
    let text = chars.as_str();
    if !text.is_empty() && !text.starts_with(char::is_whitespace) {
        return None;
    }
    Some((correct, letter, text.trim()))
}

/// Accumulates the lines of one bank file into questions.
///
/// Feed every non-comment line with its original line number, then call
/// [`finish`](Self::finish). The first malformed line aborts the file.
#[derive(Debug)]
pub struct BankParser {
    file: String,
    next_index: usize,
    entry: Option<Entry>,
    questions: Vec<Question>,
}

impl BankParser {
    /// Start parsing `file`; questions are numbered from `first_index`.
    pub fn new(file: impl Into<String>, first_index: usize) -> Self {
        Self {
            file: file.into(),
            next_index: first_index,
            entry: None,
            questions: Vec::new(),
        }
    }

    /// Process one line.
    pub fn feed_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let classified = classify(line);
        if classified == Line::Blank {
            self.finish_entry();
            return Ok(());
        }

        let entry = self.entry.get_or_insert_with(|| Entry::new(line_no));
        apply_line(entry, classified).map_err(|reason| ParseError {
            file: self.file.clone(),
            line: line_no,
            reason,
        })
    }

    /// Finalize any pending entry and return the parsed questions.
    pub fn finish(mut self) -> Vec<Question> {
        self.finish_entry();
        tracing::debug!(
            file = %self.file,
            questions = self.questions.len(),
            "parsed bank file"
        );
        self.questions
    }

    fn finish_entry(&mut self) {
        let Some(entry) = self.entry.take() else {
            return;
        };
        let stem = entry.stem.join("\n");
        let id = entry.id.unwrap_or_else(|| derive_id(&stem));
        let explanation = if entry.explanation.is_empty() {
            None
        } else {
            Some(entry.explanation.join("\n"))
        };
        self.questions.push(Question {
            id,
            stem,
            choices: entry.choices,
            tags: entry.tags,
            explanation,
            source_file: self.file.clone(),
            line: entry.line,
            raw_order_index: self.next_index,
        });
        self.next_index += 1;
    }
}

fn apply_line(entry: &mut Entry, line: Line<'_>) -> Result<(), ParseErrorKind> {
    match line {
        Line::Blank => {}
        Line::Id(id) => {
            if let Some(existing) = &entry.id {
                return Err(ParseErrorKind::DuplicateIdLine(existing.clone()));
            }
            if !entry.stem.is_empty() || !entry.choices.is_empty() {
                return Err(ParseErrorKind::MisplacedIdLine);
            }
            if id.is_empty() {
                return Err(ParseErrorKind::EmptyId);
            }
            if id.starts_with(COMMENT_PREFIX) {
                return Err(ParseErrorKind::InvalidId(id.to_string()));
            }
            entry.id = Some(id.to_string());
        }
        Line::Tags(raw) => {
            let mut any = false;
            for tag in raw
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                any = true;
                entry.tags.insert(tag.to_string());
            }
            if !any {
                return Err(ParseErrorKind::EmptyTagLine);
            }
        }
        Line::Explanation(text) => {
            entry.explanation.push(text.to_string());
            entry.last_text = Some(TextField::Explanation);
        }
        Line::Choice {
            correct,
            letter,
            text,
        } => {
            let expected = choice_letter(entry.choices.len());
            if letter != expected {
                return Err(ParseErrorKind::ChoiceOutOfSequence {
                    expected,
                    found: letter,
                });
            }
            if text.is_empty() {
                return Err(ParseErrorKind::EmptyChoice(letter));
            }
            entry.choices.push(Choice::new(text, correct));
            entry.last_text = Some(TextField::Choice);
        }
        Line::Continuation(text) => match entry.last_text {
            Some(TextField::Choice) => {
                if let Some(choice) = entry.choices.last_mut() {
                    choice.text.push('\n');
                    choice.text.push_str(text);
                }
            }
            Some(TextField::Explanation) => entry.explanation.push(text.to_string()),
            Some(TextField::Stem) | None => {
                if !entry.choices.is_empty() {
                    return Err(ParseErrorKind::StemAfterChoices);
                }
                entry.stem.push(text.to_string());
                entry.last_text = Some(TextField::Stem);
            }
        },
        Line::Text(text) => {
            if !entry.choices.is_empty() {
                return Err(ParseErrorKind::StemAfterChoices);
            }
            entry.stem.push(text.to_string());
            entry.last_text = Some(TextField::Stem);
        }
    }
    Ok(())
}

/// Returns `true` if `line`, written unindented, would be read as plain
/// question text rather than a marker, choice, or comment line.
pub fn reads_as_text(line: &str) -> bool {
    !line.starts_with(COMMENT_PREFIX) && matches!(classify(line), Line::Text(_))
}

/// Non-comment lines of `content`, paired with their 1-based line numbers.
pub fn strip_comments(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.starts_with(COMMENT_PREFIX))
}

/// Parse a whole bank file held in memory.
pub fn parse_bank_str(
    file: &str,
    content: &str,
    first_index: usize,
) -> Result<Vec<Question>, ParseError> {
    let mut parser = BankParser::new(file, first_index);
    for (line_no, line) in strip_comments(content) {
        parser.feed_line(line_no, line)?;
    }
    Ok(parser.finish())
}
