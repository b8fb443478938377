//! Normalized QBL output.
//!
//! Writes every question with an explicit id, sorted tags, and canonical
//! choice markers, so the output parses back to the same questions.

use std::io::Write;

use anyhow::Result;

use qbl_core::model::choice_letter;
use qbl_core::parser::{reads_as_text, CORRECT_MARKER, EXPLANATION_PREFIX, ID_PREFIX, TAG_PREFIX};
use qbl_core::Question;

/// Indent for continuation lines.
const CONTINUATION: &str = "   ";

/// Render one question as a QBL entry (no trailing blank line).
pub fn format_question(q: &Question) -> String {
    let mut s = String::new();
    s.push_str(&format!("{ID_PREFIX}{}\n", q.id));

    if !q.tags.is_empty() {
        let tags: Vec<&str> = q.tags.iter().map(String::as_str).collect();
        s.push_str(&format!("{TAG_PREFIX}{}\n", tags.join(" ")));
    }

    for line in q.stem.lines() {
        if !reads_as_text(line) {
            s.push_str(CONTINUATION);
        }
        s.push_str(line);
        s.push('\n');
    }

    for (i, choice) in q.choices.iter().enumerate() {
        let mut lines = choice.text.lines();
        if choice.is_correct {
            s.push(CORRECT_MARKER);
        }
        s.push_str(&format!("{}. {}\n", choice_letter(i), lines.next().unwrap_or("")));
        for rest in lines {
            s.push_str(CONTINUATION);
            s.push_str(rest);
            s.push('\n');
        }
    }

    if let Some(explanation) = &q.explanation {
        for line in explanation.lines() {
            if line.is_empty() {
                s.push_str(&format!("{EXPLANATION_PREFIX}\n"));
            } else {
                s.push_str(&format!("{EXPLANATION_PREFIX} {line}\n"));
            }
        }
    }

    s
}

/// Write all questions, separated by blank lines.
pub fn write_qbl<W: Write>(questions: &[Question], out: &mut W) -> Result<()> {
    for (i, q) in questions.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        out.write_all(format_question(q).as_bytes())?;
    }
    Ok(())
}
