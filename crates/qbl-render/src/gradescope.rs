//! GradeScope-ready LaTeX using the `exam` document class.
//!
//! Correct answers are marked with `\CorrectChoice`, so the same source
//! produces both the student copy and the answer key (`\printanswers`).

use std::io::Write;

use anyhow::Result;

use qbl_core::Question;

use crate::latex::latex_escape;
use crate::RenderOptions;

pub fn generate_gradescope(questions: &[Question], options: &RenderOptions) -> String {
    let env = if options.compressed {
        "oneparcheckboxes"
    } else {
        "checkboxes"
    };

    let mut tex = String::new();
    tex.push_str("\\documentclass[11pt]{exam}\n");
    tex.push_str("\\usepackage[utf8]{inputenc}\n");
    tex.push_str("% Uncomment to produce the answer key.\n");
    tex.push_str("% \\printanswers\n");
    tex.push_str("\\checkboxchar{$\\bigcirc$}\n");
    tex.push_str("\\checkedchar{$\\bullet$}\n\n");
    tex.push_str("\\begin{document}\n");
    tex.push_str(&format!(
        "\\begin{{center}}\n{{\\Large\\bfseries {}}}\n\\end{{center}}\n\n",
        latex_escape(&options.title)
    ));
    tex.push_str("\\begin{questions}\n");

    for q in questions {
        tex.push_str(&format!("\n\\question {}\n", latex_escape(&q.stem)));
        tex.push_str(&format!("\\begin{{{env}}}\n"));
        for choice in &q.choices {
            let command = if choice.is_correct {
                "\\CorrectChoice"
            } else {
                "\\choice"
            };
            tex.push_str(&format!("  {command} {}\n", latex_escape(&choice.text)));
        }
        tex.push_str(&format!("\\end{{{env}}}\n"));
        if !options.compressed {
            tex.push_str("\\vspace{0.5em}\n");
        }
    }

    tex.push_str("\n\\end{questions}\n");
    tex.push_str("\\end{document}\n");
    tex
}

pub fn write_gradescope<W: Write>(
    questions: &[Question],
    options: &RenderOptions,
    out: &mut W,
) -> Result<()> {
    out.write_all(generate_gradescope(questions, options).as_bytes())?;
    Ok(())
}
