//! Self-checking web quiz.
//!
//! Produces three files sharing a base name: the page, its stylesheet, and a
//! script holding the answer key that grades the page in the browser.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use qbl_core::Question;

use crate::RenderOptions;

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn html_text(s: &str) -> String {
    html_escape(s).replace('\n', "<br>\n")
}

/// The three documents making up a web quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebQuiz {
    pub html: String,
    pub js: String,
    pub css: String,
}

/// Answer key entry embedded in the script.
#[derive(Serialize)]
struct KeyEntry<'a> {
    id: &'a str,
    correct: Option<usize>,
    explanation: Option<&'a str>,
}

/// Build the page, script and stylesheet. `base_name` is the file stem the
/// page uses to link its script and stylesheet.
pub fn generate_web(
    questions: &[Question],
    options: &RenderOptions,
    base_name: &str,
) -> Result<WebQuiz> {
    let title = html_escape(&options.title);
    let base = html_escape(base_name);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&format!("<link rel=\"stylesheet\" href=\"{base}.css\">\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str("<form id=\"quiz\">\n");

    for (n, q) in questions.iter().enumerate() {
        html.push_str(&format!(
            "<fieldset class=\"question\" id=\"q{n}\" data-id=\"{}\">\n",
            html_escape(&q.id)
        ));
        html.push_str(&format!(
            "<legend>{}.</legend>\n<p class=\"stem\">{}</p>\n",
            n + 1,
            html_text(&q.stem)
        ));
        for (i, choice) in q.choices.iter().enumerate() {
            html.push_str(&format!(
                "<label class=\"choice\"><input type=\"radio\" name=\"q{n}\" value=\"{i}\"> {}</label>\n",
                html_text(&choice.text)
            ));
        }
        html.push_str("<p class=\"feedback\"></p>\n");
        html.push_str("</fieldset>\n");
    }

    html.push_str("<div class=\"controls\">\n");
    html.push_str("<button type=\"button\" id=\"check\">Check answers</button>\n");
    html.push_str("<button type=\"button\" id=\"reveal\">Show answers</button>\n");
    html.push_str("<span id=\"score\"></span>\n");
    html.push_str("</div>\n");
    html.push_str("</form>\n");
    html.push_str(&format!("<script src=\"{base}.js\"></script>\n"));
    html.push_str("</body>\n</html>\n");

    let key: Vec<KeyEntry<'_>> = questions
        .iter()
        .map(|q| KeyEntry {
            id: &q.id,
            correct: q.correct_index(),
            explanation: q.explanation.as_deref(),
        })
        .collect();
    let key_json = serde_json::to_string_pretty(&key).context("failed to encode answer key")?;

    let mut js = String::new();
    js.push_str("const ANSWER_KEY = ");
    js.push_str(&key_json);
    js.push_str(";\n");
    js.push_str(JS);

    Ok(WebQuiz {
        html,
        js,
        css: CSS.to_string(),
    })
}

/// Write `<base>.html`, `<base>.js` and `<base>.css` into `dir`, returning
/// the written paths.
pub fn write_web_quiz(quiz: &WebQuiz, dir: &Path, base_name: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(3);
    for (ext, body) in [("html", &quiz.html), ("js", &quiz.js), ("css", &quiz.css)] {
        let path = dir.join(format!("{base_name}.{ext}"));
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

const CSS: &str = r#"body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
  max-width: 48rem;
  margin: 2rem auto;
  padding: 0 1rem;
  color: #222;
}
.question { border: 1px solid #ccc; border-radius: 6px; margin: 1rem 0; padding: 0.5rem 1rem; }
.question legend { font-weight: bold; }
.choice { display: block; margin: 0.25rem 0; cursor: pointer; }
.question.correct { border-color: #2a7; background: #f0fff4; }
.question.wrong { border-color: #c33; background: #fff0f0; }
.choice.answer { font-weight: bold; text-decoration: underline; }
.feedback { font-style: italic; color: #555; }
.controls { margin: 1.5rem 0; }
#score { margin-left: 1rem; font-weight: bold; }
"#;

const JS: &str = r#"
function questionBlocks() {
  return Array.from(document.querySelectorAll('fieldset.question'));
}

function chosen(block) {
  const input = block.querySelector('input:checked');
  return input ? Number(input.value) : null;
}

function checkAnswers() {
  let right = 0;
  questionBlocks().forEach((block, n) => {
    const entry = ANSWER_KEY[n];
    const ok = chosen(block) === entry.correct;
    block.classList.toggle('correct', ok);
    block.classList.toggle('wrong', !ok);
    block.querySelector('.feedback').textContent = ok ? '' : (entry.explanation || '');
    if (ok) right += 1;
  });
  document.getElementById('score').textContent = right + ' / ' + ANSWER_KEY.length;
}

function revealAnswers() {
  questionBlocks().forEach((block, n) => {
    const entry = ANSWER_KEY[n];
    block.querySelectorAll('label.choice').forEach((label, i) => {
      label.classList.toggle('answer', i === entry.correct);
    });
    block.querySelector('.feedback').textContent = entry.explanation || '';
  });
}

document.getElementById('check').addEventListener('click', checkAnswers);
document.getElementById('reveal').addEventListener('click', revealAnswers);
"#;
