//! Plain LaTeX output: a numbered question list and an answer key.

use std::io::Write;

use anyhow::Result;

use qbl_core::model::choice_letter;
use qbl_core::Question;

use crate::RenderOptions;

/// Escape LaTeX special characters.
pub(crate) fn latex_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\n' => out.push_str("\\\\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Generate a complete LaTeX document.
pub fn generate_latex(questions: &[Question], options: &RenderOptions) -> String {
    let mut tex = String::new();

    tex.push_str("\\documentclass[11pt]{article}\n");
    tex.push_str("\\usepackage[utf8]{inputenc}\n");
    tex.push_str("\\usepackage{enumitem}\n");
    tex.push_str(&format!("\\title{{{}}}\n", latex_escape(&options.title)));
    tex.push_str("\\date{}\n\n");
    tex.push_str("\\begin{document}\n\\maketitle\n\n");

    tex.push_str("\\begin{enumerate}\n");
    for q in questions {
        tex.push_str(&format!("\\item {}\n", latex_escape(&q.stem)));
        tex.push_str("  \\begin{enumerate}[label=(\\alph*)]\n");
        for choice in &q.choices {
            tex.push_str(&format!("    \\item {}\n", latex_escape(&choice.text)));
        }
        tex.push_str("  \\end{enumerate}\n\n");
    }
    tex.push_str("\\end{enumerate}\n\n");

    // Answer key
    tex.push_str("\\newpage\n\\section*{Answer Key}\n");
    tex.push_str("\\begin{enumerate}\n");
    for q in questions {
        let answer = q
            .correct_index()
            .map(|i| format!("({})", choice_letter(i)))
            .unwrap_or_else(|| "--".to_string());
        tex.push_str(&format!("\\item {answer}\n"));
    }
    tex.push_str("\\end{enumerate}\n\n");

    tex.push_str("\\end{document}\n");
    tex
}

pub fn write_latex<W: Write>(
    questions: &[Question],
    options: &RenderOptions,
    out: &mut W,
) -> Result<()> {
    out.write_all(generate_latex(questions, options).as_bytes())?;
    Ok(())
}
