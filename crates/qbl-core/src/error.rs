//! Error and warning types for loading, validating, and selecting questions.
//!
//! Parse and validation errors are collected rather than returned one at a
//! time, so a user can fix every problem in a bank in one pass.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::QuestionLocation;

/// A line in a bank file that cannot be attributed to any entry field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {reason}")]
pub struct ParseError {
    /// Bank file name.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    pub reason: ParseErrorKind,
}

/// Why a bank line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("question text after answer choices have started")]
    StemAfterChoices,

    #[error("expected choice '{expected}', found '{found}'")]
    ChoiceOutOfSequence { expected: char, found: char },

    #[error("choice '{0}' has no text")]
    EmptyChoice(char),

    #[error("tag line has no tags")]
    EmptyTagLine,

    #[error("question id line has no id")]
    EmptyId,

    #[error("id '{0}' may not start with '%'")]
    InvalidId(String),

    #[error("question already has id '{0}'")]
    DuplicateIdLine(String),

    #[error("id line must come before the question text and choices")]
    MisplacedIdLine,
}

/// A structural defect in a parsed question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct ValidationError {
    pub location: QuestionLocation,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    #[error("question text is empty")]
    EmptyStem,

    #[error("needs at least two choices, found {0}")]
    TooFewChoices(usize),

    #[error("no choice is marked correct")]
    NoCorrectChoice,

    #[error("{0} choices are marked correct, expected exactly one")]
    MultipleCorrectChoices(usize),

    #[error("duplicate id, first defined at {0}")]
    DuplicateId(QuestionLocation),
}

/// Failure to load one or more bank files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", ErrorList(.0.as_slice()))]
    Parse(Vec<ParseError>),
}

/// Misuse of the bank lifecycle, or a failed validation.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("{}", ErrorList(.0.as_slice()))]
    Validation(Vec<ValidationError>),

    #[error("the bank must be validated before generating or logging")]
    NotValidated,

    #[error("questions were already generated from this bank")]
    AlreadyGenerated,

    #[error("failed to write question log {}: {source}", .path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Non-fatal shortfall reported by the selection engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    /// Fewer questions carrying `tag` could be placed than the quota asked for.
    QuotaUnmet {
        tag: String,
        requested: usize,
        available: usize,
    },
    /// The eligible questions could not fill the requested count.
    InsufficientPool { requested: usize, available: usize },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::QuotaUnmet {
                tag,
                requested,
                available,
            } => write!(
                f,
                "tag '{tag}' requested {requested} question(s) but only {available} could be included"
            ),
            SelectionWarning::InsufficientPool {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} question(s) but only {available} are eligible"
            ),
        }
    }
}

/// Formats a batch of errors one per line.
struct ErrorList<'a, E>(&'a [E]);

impl<E: fmt::Display> fmt::Display for ErrorList<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s) found", self.0.len())?;
        for e in self.0 {
            write!(f, "\n  {e}")?;
        }
        Ok(())
    }
}
