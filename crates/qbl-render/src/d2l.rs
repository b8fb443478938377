//! D2L / Brightspace quiz import CSV.
//!
//! Each question is a block of five-column rows starting with
//! `NewQuestion,MC`, followed by an empty row.

use std::io::Write;

use anyhow::Result;

use qbl_core::Question;

use crate::web::html_escape;

const COLUMNS: usize = 5;

/// Points awarded for a correct answer.
const POINTS: &str = "1";

/// Convert bank text to the HTML fragment D2L expects.
fn to_html(text: &str) -> String {
    html_escape(text).replace('\n', "<br>")
}

/// Write questions as D2L CSV rows.
pub fn write_d2l<W: Write>(questions: &[Question], out: &mut W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    let mut row = |fields: &[&str]| -> csv::Result<()> {
        let mut record: Vec<&str> = fields.to_vec();
        record.resize(COLUMNS, "");
        writer.write_record(&record)
    };

    for q in questions {
        let stem = to_html(&q.stem);
        row(&["NewQuestion", "MC"])?;
        row(&["ID", q.id.as_str()])?;
        row(&["Title", q.id.as_str()])?;
        row(&["QuestionText", stem.as_str(), "HTML"])?;
        row(&["Points", POINTS])?;
        row(&["Difficulty", "1"])?;
        for choice in &q.choices {
            let weight = if choice.is_correct { "100" } else { "0" };
            let text = to_html(&choice.text);
            row(&["Option", weight, text.as_str(), "HTML"])?;
        }
        if let Some(explanation) = &q.explanation {
            let feedback = to_html(explanation);
            row(&["Feedback", feedback.as_str(), "HTML"])?;
        }
        row(&[])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbl_core::parser::parse_bank_str;

    #[test]
    fn writes_question_blocks() {
        let qs = parse_bank_str(
            "b.qbl",
            "#vec-1\nIs `Vec<T>` growable, yes or no?\n*a. Yes, it reallocates\nb. No\n> Capacity doubles.\n",
            0,
        )
        .unwrap();
        let mut out = Vec::new();
        write_d2l(&qs, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "NewQuestion,MC,,,");
        assert_eq!(lines[1], "ID,vec-1,,,");
        assert_eq!(
            lines[3],
            "QuestionText,\"Is `Vec&lt;T&gt;` growable, yes or no?\",HTML,,"
        );
        assert_eq!(lines[6], "Option,100,\"Yes, it reallocates\",HTML,");
        assert_eq!(lines[7], "Option,0,No,HTML,");
        assert_eq!(lines[8], "Feedback,Capacity doubles.,HTML,,");
        assert_eq!(lines[9], ",,,,");
    }

    #[test]
    fn multi_line_text_uses_breaks() {
        assert_eq!(to_html("one\ntwo & three"), "one<br>two &amp; three");
    }
}
