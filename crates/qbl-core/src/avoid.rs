//! Question id logs and avoid files.
//!
//! A log holds one question id per line. Feeding a log back in as an avoid
//! file keeps those questions out of the next generated exam.

use std::collections::HashSet;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::error::LoadError;
use crate::parser::COMMENT_PREFIX;

/// Ids that selection must skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvoidSet(HashSet<String>);

impl AvoidSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Add every id listed in `reader`.
    ///
    /// Blank lines and `%` comment lines are skipped.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let before = self.0.len();
        for line in reader.lines() {
            let line = line?;
            let id = line.trim();
            if id.is_empty() || id.starts_with(COMMENT_PREFIX) {
                continue;
            }
            self.0.insert(id.to_string());
        }
        Ok(self.0.len() - before)
    }

    /// Add every id listed in the file at `path`.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_err)?;
        let added = self
            .extend_from_reader(BufReader::new(file))
            .map_err(io_err)?;
        tracing::debug!(path = %path.display(), added, "loaded avoid file");
        Ok(added)
    }
}

impl<S: Into<String>> FromIterator<S> for AvoidSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Read an avoid file into a fresh set.
pub fn load_avoid_file(path: &Path) -> Result<AvoidSet, LoadError> {
    let mut set = AvoidSet::new();
    set.extend_from_file(path)?;
    Ok(set)
}

/// Write `ids` one per line.
pub fn write_id_log<'a, W, I>(ids: I, mut writer: W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    for id in ids {
        writeln!(writer, "{id}")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_then_reload() {
        let mut buf = Vec::new();
        write_id_log(["q1", "loops-02", "q3"], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "q1\nloops-02\nq3\n");

        let mut set = AvoidSet::new();
        let added = set.extend_from_reader(buf.as_slice()).unwrap();
        assert_eq!(added, 3);
        assert!(set.contains("loops-02"));
    }

    #[test]
    fn skips_blanks_and_comments() {
        let content = "% exam 1\n\n  q1  \nq2\n%q3\n";
        let mut set = AvoidSet::new();
        set.extend_from_reader(content.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("q1"));
        assert!(!set.contains("q3"));
    }

    #[test]
    fn multiple_files_merge() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.log");
        let b = dir.path().join("b.log");
        std::fs::write(&a, "q1\nq2\n").unwrap();
        std::fs::write(&b, "q2\nq3\n").unwrap();

        let mut set = load_avoid_file(&a).unwrap();
        let added = set.extend_from_file(&b).unwrap();
        assert_eq!(added, 1);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_avoid_file(Path::new("/nonexistent/avoid.log")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("avoid.log"));
    }
}
