//! JSON dump of the run settings and the final question sequence.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use qbl_core::Question;

use crate::RenderOptions;

#[derive(Serialize)]
struct DebugDump<'a> {
    title: &'a str,
    settings: &'a serde_json::Value,
    count: usize,
    questions: &'a [Question],
}

pub fn write_debug<W: Write>(
    questions: &[Question],
    options: &RenderOptions,
    out: &mut W,
) -> Result<()> {
    let dump = DebugDump {
        title: &options.title,
        settings: &options.debug_context,
        count: questions.len(),
        questions,
    };
    serde_json::to_writer_pretty(&mut *out, &dump)?;
    writeln!(out)?;
    Ok(())
}
