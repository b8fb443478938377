//! qbl-core — Question bank parsing, validation, and exam selection.
//!
//! This crate defines the question data model, the bank file parser, and the
//! tag-constrained selection engine that the renderers and CLI build on.

pub mod avoid;
pub mod bank;
pub mod error;
pub mod model;
pub mod order;
pub mod parser;
pub mod select;
pub mod validate;

pub use avoid::{load_avoid_file, write_id_log, AvoidSet};
pub use bank::Bank;
pub use error::{
    BankError, LoadError, ParseError, ParseErrorKind, SelectionWarning, ValidationError,
    ValidationErrorKind,
};
pub use model::{Choice, Question};
pub use order::Order;
pub use select::{Constraints, IncludeMode, Selection, TagQuota};

/// The seeded random source shared by selection and ordering.
pub type QblRng = rand_chacha::ChaCha8Rng;

/// Create the shared random source from a seed.
pub fn seeded_rng(seed: u64) -> QblRng {
    use rand::SeedableRng;
    QblRng::seed_from_u64(seed)
}
