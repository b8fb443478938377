//! Tag-constrained random selection of exam questions.
//!
//! Filtering happens per question, in this order:
//!
//! 1. ids in the avoid set are dropped;
//! 2. questions carrying any excluded tag are dropped;
//! 3. if required tags are given, questions carrying none of them are dropped.
//!
//! What survives is the *base set*. Tag quotas draw from the base set. The
//! remaining slots are filled from the *fill set*, which under
//! [`IncludeMode::Restrict`] is the base set narrowed to questions carrying an
//! include tag (when include tags are given).

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::avoid::AvoidSet;
use crate::error::SelectionWarning;
use crate::model::Question;

/// How include tags interact with the rest of the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeMode {
    /// Fill draws only come from questions carrying an include tag.
    #[default]
    Restrict,
    /// Every question carrying an include tag is picked before fill draws.
    Mandatory,
}

impl fmt::Display for IncludeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeMode::Restrict => write!(f, "restrict"),
            IncludeMode::Mandatory => write!(f, "mandatory"),
        }
    }
}

impl FromStr for IncludeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "restrict" | "only" => Ok(IncludeMode::Restrict),
            "mandatory" | "all" => Ok(IncludeMode::Mandatory),
            other => Err(format!("unknown include mode: {other}")),
        }
    }
}

/// Minimum number of questions carrying `tag` in the generated exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagQuota {
    pub tag: String,
    pub count: usize,
}

impl FromStr for TagQuota {
    type Err = String;

    /// Parses `tag:count`, or a bare `tag` meaning a quota of one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, count) = match s.rsplit_once(':') {
            Some((tag, count)) => {
                let count = count
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid quota count in '{s}'"))?;
                (tag.trim(), count)
            }
            None => (s.trim(), 1),
        };
        if tag.is_empty() {
            return Err(format!("quota '{s}' has no tag"));
        }
        Ok(TagQuota {
            tag: tag.to_string(),
            count,
        })
    }
}

/// Tag predicates and quotas applied by [`select`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub include: BTreeSet<String>,
    #[serde(default)]
    pub exclude: BTreeSet<String>,
    #[serde(default)]
    pub require: BTreeSet<String>,
    /// Processed in declaration order.
    #[serde(default)]
    pub quotas: Vec<TagQuota>,
    #[serde(default)]
    pub include_mode: IncludeMode,
}

impl Constraints {
    /// Add a quota; a tag that already has one gets the counts summed.
    pub fn add_quota(&mut self, quota: TagQuota) {
        match self.quotas.iter_mut().find(|q| q.tag == quota.tag) {
            Some(existing) => existing.count += quota.count,
            None => self.quotas.push(quota),
        }
    }

    fn admits(&self, question: &Question, avoid: &AvoidSet) -> bool {
        if avoid.contains(&question.id) {
            return false;
        }
        if question.has_any_tag(&self.exclude) {
            return false;
        }
        self.require.is_empty() || question.has_any_tag(&self.require)
    }

    fn restricts_fill(&self) -> bool {
        self.include_mode == IncludeMode::Restrict && !self.include.is_empty()
    }
}

/// Result of a selection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Pool indices in draw order: quota draws, then include draws, then fill.
    pub picked: Vec<usize>,
    pub warnings: Vec<SelectionWarning>,
}

/// Bookkeeping for one selection run.
struct Picker<'r, R: ?Sized> {
    rng: &'r mut R,
    count: usize,
    picked: Vec<usize>,
    taken: Vec<bool>,
}

impl<R: Rng + ?Sized> Picker<'_, R> {
    fn room(&self) -> usize {
        self.count - self.picked.len()
    }

    fn is_taken(&self, index: usize) -> bool {
        self.taken[index]
    }

    /// Draw up to `amount` distinct, not yet picked indices from `candidates`.
    fn draw(&mut self, candidates: &[usize], amount: usize) -> usize {
        let mut open: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| !self.taken[i])
            .collect();
        let amount = amount.min(open.len()).min(self.room());
        let (chosen, _) = open.partial_shuffle(&mut *self.rng, amount);
        for &index in chosen.iter() {
            self.taken[index] = true;
            self.picked.push(index);
        }
        amount
    }
}

/// Choose up to `count` questions from `pool`.
///
/// The random source is consumed in a fixed order (quotas in declaration
/// order, then include draws, then fill), so the same seed, pool, and
/// constraints always produce the same picks.
pub fn select<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    constraints: &Constraints,
    avoid: &AvoidSet,
    rng: &mut R,
) -> Selection {
    let base: Vec<usize> = (0..pool.len())
        .filter(|&i| constraints.admits(&pool[i], avoid))
        .collect();

    let carries_include = |i: &usize| pool[*i].has_any_tag(&constraints.include);
    let fill: Vec<usize> = if constraints.restricts_fill() {
        base.iter().copied().filter(carries_include).collect()
    } else {
        base.clone()
    };

    let mut by_tag: HashMap<&str, Vec<usize>> = HashMap::new();
    for &i in &base {
        for tag in &pool[i].tags {
            by_tag.entry(tag.as_str()).or_default().push(i);
        }
    }

    tracing::debug!(
        pool = pool.len(),
        base = base.len(),
        fill = fill.len(),
        count,
        "selecting questions"
    );

    let mut picker = Picker {
        rng,
        count,
        picked: Vec::with_capacity(count.min(base.len())),
        taken: vec![false; pool.len()],
    };
    let mut warnings = Vec::new();

    for quota in &constraints.quotas {
        let candidates = by_tag
            .get(quota.tag.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        // Fresh carriers first; earlier picks only cover what they cannot.
        let already = candidates.iter().filter(|&&i| picker.is_taken(i)).count();
        let drawn = picker.draw(candidates, quota.count);
        let placed = (drawn + already).min(quota.count);
        if placed < quota.count {
            warnings.push(SelectionWarning::QuotaUnmet {
                tag: quota.tag.clone(),
                requested: quota.count,
                available: placed,
            });
        }
    }

    if constraints.include_mode == IncludeMode::Mandatory && !constraints.include.is_empty() {
        let included: Vec<usize> = base.iter().copied().filter(carries_include).collect();
        picker.draw(&included, included.len());
    }

    let room = picker.room();
    picker.draw(&fill, room);

    if picker.picked.len() < count {
        warnings.push(SelectionWarning::InsufficientPool {
            requested: count,
            available: picker.picked.len(),
        });
    }

    Selection {
        picked: picker.picked,
        warnings,
    }
}
