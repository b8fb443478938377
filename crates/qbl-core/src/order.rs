//! Final ordering of the question sequence.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Question;

/// How the final question list is sequenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Keep parse order (or draw order after generation).
    #[default]
    Default,
    /// Shuffle with the shared random source.
    Random,
    /// Ascending by id.
    Id,
    /// Ascending by question text.
    #[serde(alias = "alpha")]
    Alphabetic,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Default => write!(f, "default"),
            Order::Random => write!(f, "random"),
            Order::Id => write!(f, "id"),
            Order::Alphabetic => write!(f, "alpha"),
        }
    }
}

impl FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "none" => Ok(Order::Default),
            "random" | "shuffle" => Ok(Order::Random),
            "id" => Ok(Order::Id),
            "alpha" | "alphabetic" => Ok(Order::Alphabetic),
            other => Err(format!("unknown order: {other}")),
        }
    }
}

/// Reorder `questions` in place.
///
/// Only [`Order::Random`] touches `rng`; call this after selection so the
/// shuffle consumes draws after the selection draws.
pub fn apply_order<R: Rng + ?Sized>(questions: &mut [Question], order: Order, rng: &mut R) {
    match order {
        Order::Default => {}
        Order::Random => questions.shuffle(rng),
        Order::Id => questions.sort_by(|a, b| a.id.cmp(&b.id)),
        Order::Alphabetic => questions.sort_by(|a, b| a.stem.cmp(&b.stem)),
    }
}
