//! The question bank: the pool of parsed questions and its lifecycle.
//!
//! ```text
//! load_* (per file) -> validate -> generate (optional) -> apply_order -> render
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use rand::Rng;

use crate::avoid::{write_id_log, AvoidSet};
use crate::error::{BankError, LoadError, ParseError};
use crate::model::Question;
use crate::order::{apply_order, Order};
use crate::parser::parse_bank_str;
use crate::select::{select, Constraints, Selection};
use crate::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Validated,
    Generated,
}

/// All questions loaded for one run.
#[derive(Debug)]
pub struct Bank {
    questions: Vec<Question>,
    index: HashMap<String, usize>,
    phase: Phase,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl Bank {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            index: HashMap::new(),
            phase: Phase::Loading,
        }
    }

    /// Questions in their current order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id. Available once the bank is validated.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.index.get(id).map(|&i| &self.questions[i])
    }

    pub fn is_validated(&self) -> bool {
        self.phase != Phase::Loading
    }

    /// Parse bank text and append its questions.
    ///
    /// On a parse error nothing from `content` is added.
    pub fn load_str(&mut self, file: &str, content: &str) -> Result<usize, ParseError> {
        debug_assert_eq!(self.phase, Phase::Loading, "bank is frozen after validation");
        let parsed = parse_bank_str(file, content, self.questions.len())?;
        let added = parsed.len();
        self.questions.extend(parsed);
        Ok(added)
    }

    /// Read and parse one bank file.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path.display().to_string();
        self.load_str(&name, &content)
            .map_err(|e| LoadError::Parse(vec![e]))
    }

    /// Load every file, collecting parse errors across all of them.
    ///
    /// An unreadable file stops loading immediately. A file with a parse error
    /// is skipped and loading continues, so all parse errors are reported
    /// together.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, LoadError> {
        let mut added = 0;
        let mut errors = Vec::new();
        for path in paths {
            match self.load_file(path.as_ref()) {
                Ok(n) => added += n,
                Err(LoadError::Parse(mut errs)) => {
                    tracing::warn!(path = %path.as_ref().display(), "skipping file with parse errors");
                    errors.append(&mut errs);
                }
                Err(e) => return Err(e),
            }
        }
        if errors.is_empty() {
            Ok(added)
        } else {
            Err(LoadError::Parse(errors))
        }
    }

    /// Check every question; on success the bank is frozen.
    pub fn validate(&mut self) -> Result<(), BankError> {
        if self.phase != Phase::Loading {
            return Ok(());
        }
        validate(&self.questions).map_err(BankError::Validation)?;
        self.rebuild_index();
        self.phase = Phase::Validated;
        Ok(())
    }

    /// Replace the pool with `count` questions chosen under `constraints`.
    ///
    /// Shortfalls come back as warnings in the returned [`Selection`], whose
    /// `picked` indices refer to the pool as it was before the call.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        constraints: &Constraints,
        avoid: &AvoidSet,
        rng: &mut R,
    ) -> Result<Selection, BankError> {
        match self.phase {
            Phase::Loading => return Err(BankError::NotValidated),
            Phase::Generated => return Err(BankError::AlreadyGenerated),
            Phase::Validated => {}
        }

        let selection = select(&self.questions, count, constraints, avoid, rng);
        for warning in &selection.warnings {
            tracing::debug!("{warning}");
        }

        let mut slots: Vec<Option<Question>> =
            std::mem::take(&mut self.questions).into_iter().map(Some).collect();
        self.questions = selection
            .picked
            .iter()
            .filter_map(|&i| slots[i].take())
            .collect();
        self.rebuild_index();
        self.phase = Phase::Generated;
        tracing::info!(chosen = self.questions.len(), requested = count, "generated exam");
        Ok(selection)
    }

    /// Permute the pool. Never adds or removes questions.
    pub fn apply_order<R: Rng + ?Sized>(&mut self, order: Order, rng: &mut R) {
        apply_order(&mut self.questions, order, rng);
        self.rebuild_index();
    }

    /// Ids of the current pool, in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.id.as_str())
    }

    /// Write the current pool's ids to `path`, one per line.
    pub fn log_questions(&self, path: &Path) -> Result<(), BankError> {
        if self.phase == Phase::Loading {
            return Err(BankError::NotValidated);
        }
        let log_err = |source| BankError::Log {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(log_err)?;
        write_id_log(self.ids(), BufWriter::new(file)).map_err(log_err)?;
        tracing::info!(path = %path.display(), count = self.len(), "logged question ids");
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), i))
            .collect();
    }
}
