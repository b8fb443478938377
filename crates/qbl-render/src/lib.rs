//! qbl-render — Output formats for question banks.
//!
//! Every renderer takes the final question sequence read-only; selection and
//! ordering have already happened by the time anything is rendered.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use qbl_core::Question;

pub mod d2l;
pub mod debug;
pub mod gradescope;
pub mod latex;
pub mod qbl;
pub mod web;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Normalized QBL bank text.
    #[default]
    Qbl,
    /// D2L / Brightspace CSV quiz import.
    D2l,
    /// LaTeX `exam` class with GradeScope-style checkboxes.
    GradeScope,
    /// Plain LaTeX article with an answer key.
    Latex,
    /// Self-checking HTML page with separate JS and CSS files.
    Web,
    /// JSON dump of the run settings and questions.
    Debug,
}

impl Format {
    /// Guess the format from an output file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "qbl" => Some(Format::Qbl),
            "csv" | "d2l" => Some(Format::D2l),
            "gscope" => Some(Format::GradeScope),
            "tex" => Some(Format::Latex),
            "html" | "htm" => Some(Format::Web),
            "json" => Some(Format::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Qbl => write!(f, "qbl"),
            Format::D2l => write!(f, "d2l"),
            Format::GradeScope => write!(f, "gradescope"),
            Format::Latex => write!(f, "latex"),
            Format::Web => write!(f, "web"),
            Format::Debug => write!(f, "debug"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qbl" => Ok(Format::Qbl),
            "d2l" | "csv" | "brightspace" => Ok(Format::D2l),
            "gradescope" | "gscope" => Ok(Format::GradeScope),
            "latex" | "tex" => Ok(Format::Latex),
            "web" | "html" => Ok(Format::Web),
            "debug" | "json" => Ok(Format::Debug),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

/// Settings shared by the renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Title used in document headers.
    pub title: String,
    /// Tighter GradeScope layout (choices on one paragraph).
    pub compressed: bool,
    /// Extra context included in debug output.
    pub debug_context: serde_json::Value,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Multiple Choice Quiz".to_string(),
            compressed: false,
            debug_context: serde_json::Value::Null,
        }
    }
}

/// Render `questions` in a single-stream format.
///
/// The web format spans three files and must go through
/// [`web::write_web_quiz`] instead.
pub fn render<W: Write>(
    format: Format,
    questions: &[Question],
    options: &RenderOptions,
    out: &mut W,
) -> Result<()> {
    match format {
        Format::Qbl => qbl::write_qbl(questions, out)?,
        Format::D2l => d2l::write_d2l(questions, out)?,
        Format::GradeScope => gradescope::write_gradescope(questions, options, out)?,
        Format::Latex => latex::write_latex(questions, options, out)?,
        Format::Debug => debug::write_debug(questions, options, out)?,
        Format::Web => anyhow::bail!("web output must be written to a file (use --output)"),
    }
    out.flush()?;
    Ok(())
}
