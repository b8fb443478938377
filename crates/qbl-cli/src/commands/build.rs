//! The `qbl build` command.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::Rng;

use qbl_core::{seeded_rng, AvoidSet, Bank, Constraints, IncludeMode, Order, Question, TagQuota};
use qbl_render::web::{generate_web, write_web_quiz};
use qbl_render::{render, Format, RenderOptions};

use crate::config::{load_config_from, QblConfig};

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Bank files to read, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output file (stdout when omitted); its extension picks the format
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generate an exam with this many questions
    #[arg(short = 'g', long, value_name = "COUNT")]
    pub generate: Option<usize>,

    /// Random seed (a fresh one is chosen and printed when omitted)
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Document title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output format: qbl, d2l, gradescope, latex, web, debug
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Question order: default, random, id, alpha
    #[arg(short = 'O', long)]
    pub order: Option<Order>,

    /// Compact GradeScope layout
    #[arg(short, long)]
    pub compressed: bool,

    /// Only draw from questions with these tags (comma or space separated)
    #[arg(short = 'i', long, value_name = "TAGS")]
    pub include: Vec<String>,

    /// Never pick questions with these tags
    #[arg(short = 'x', long, value_name = "TAGS")]
    pub exclude: Vec<String>,

    /// Only pick questions carrying at least one of these tags
    #[arg(short = 'r', long, value_name = "TAGS")]
    pub require: Vec<String>,

    /// Pick at least N questions tagged TAG (repeatable)
    #[arg(short = 's', long = "sample", value_name = "TAG:N")]
    pub sample: Vec<TagQuota>,

    /// Write the chosen question ids to this file
    #[arg(short = 'L', long = "log", value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Skip questions whose ids are listed in this file (repeatable)
    #[arg(short = 'a', long = "avoid", value_name = "FILE")]
    pub avoid: Vec<PathBuf>,

    /// How include tags apply: restrict or mandatory
    #[arg(long)]
    pub include_mode: Option<IncludeMode>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: BuildArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let mut bank = Bank::new();
    bank.load_files(&args.files)
        .context("failed to load question banks")?;
    bank.validate().context("question banks failed validation")?;
    tracing::info!(
        files = args.files.len(),
        questions = bank.len(),
        "loaded question banks"
    );

    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    eprintln!("Seed: {seed}");
    let mut rng = seeded_rng(seed);

    let order = resolve_order(args.order.or(config.order), args.generate.is_some());
    let constraints = build_constraints(&args, &config);

    if let Some(count) = args.generate {
        let mut avoid = AvoidSet::new();
        for path in &args.avoid {
            let n = avoid
                .extend_from_file(path)
                .context("failed to load avoid list")?;
            tracing::info!(path = %path.display(), ids = n, "loaded avoid list");
        }

        let selection = bank.generate(count, &constraints, &avoid, &mut rng)?;
        for warning in &selection.warnings {
            eprintln!("Warning: {warning}");
        }
    } else if !args.avoid.is_empty() || !args.sample.is_empty() {
        tracing::warn!("--avoid and --sample only apply with --generate; ignoring them");
    }

    bank.apply_order(order, &mut rng);

    if let Some(log) = &args.log {
        bank.log_questions(log)?;
    }

    let format = resolve_format(args.format, args.output.as_deref(), config.format);

    let options = RenderOptions {
        title: args.title.clone().unwrap_or(config.title),
        compressed: args.compressed || config.compressed,
        debug_context: serde_json::json!({
            "files": args.files,
            "seed": seed,
            "order": order.to_string(),
            "generate": args.generate,
            "constraints": constraints,
        }),
    };

    write_output(format, bank.questions(), &options, args.output.as_deref())?;
    print_tag_summary(bank.questions());
    Ok(())
}

/// Merge config tag filters with the command line.
fn build_constraints(args: &BuildArgs, config: &QblConfig) -> Constraints {
    let mut constraints = Constraints {
        include: split_tags(config.tags.include.iter().chain(&args.include)),
        exclude: split_tags(config.tags.exclude.iter().chain(&args.exclude)),
        require: split_tags(config.tags.require.iter().chain(&args.require)),
        quotas: Vec::new(),
        include_mode: args.include_mode.unwrap_or(config.include_mode),
    };
    for quota in &args.sample {
        constraints.add_quota(quota.clone());
    }
    constraints
}

/// Split tag arguments on commas and whitespace.
fn split_tags<'a, I, C>(values: I) -> C
where
    I: IntoIterator<Item = &'a String>,
    C: FromIterator<String>,
{
    values
        .into_iter()
        .flat_map(|v| v.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// An explicitly requested order wins; generated exams shuffle otherwise.
fn resolve_order(requested: Option<Order>, generating: bool) -> Order {
    match requested {
        Some(order) => order,
        None if generating => Order::Random,
        None => Order::Default,
    }
}

/// `-f` wins, then the output file's extension, then the config.
fn resolve_format(flag: Option<Format>, output: Option<&Path>, config: Option<Format>) -> Format {
    flag.or_else(|| output.and_then(format_from_path))
        .or(config)
        .unwrap_or_default()
}

fn format_from_path(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(Format::from_extension)
}

fn write_output(
    format: Format,
    questions: &[Question],
    options: &RenderOptions,
    output: Option<&Path>,
) -> Result<()> {
    match (format, output) {
        (Format::Web, Some(path)) => {
            let base = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("web output needs a file name")?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let quiz = generate_web(questions, options, base)?;
            for written in write_web_quiz(&quiz, dir, base)? {
                eprintln!("Wrote {}", written.display());
            }
        }
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            render(format, questions, options, &mut BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} ({format})", path.display());
        }
        (_, None) => {
            let stdout = io::stdout();
            render(format, questions, options, &mut stdout.lock())?;
        }
    }
    Ok(())
}

/// Per-tag counts of the final question list, on stderr.
fn print_tag_summary(questions: &[Question]) {
    use comfy_table::{Cell, Table};

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut untagged = 0;
    for q in questions {
        if q.tags.is_empty() {
            untagged += 1;
        }
        for tag in &q.tags {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }

    let mut table = Table::new();
    table.set_header(vec!["Tag", "Questions"]);
    for (tag, count) in &counts {
        table.add_row(vec![Cell::new(tag), Cell::new(count)]);
    }
    if untagged > 0 {
        table.add_row(vec![Cell::new("(untagged)"), Cell::new(untagged)]);
    }
    table.add_row(vec![Cell::new("Total"), Cell::new(questions.len())]);

    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn tags_split_on_commas_and_spaces() {
        let values = vec!["easy,hard".to_string(), " loops  traits ".to_string()];
        let tags: BTreeSet<String> = split_tags(&values);
        let expected: BTreeSet<String> = ["easy", "hard", "loops", "traits"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn output_extension_picks_format() {
        assert_eq!(format_from_path(Path::new("exam.tex")), Some(Format::Latex));
        assert_eq!(format_from_path(Path::new("out/quiz.html")), Some(Format::Web));
        assert_eq!(format_from_path(Path::new("import.csv")), Some(Format::D2l));
        assert_eq!(format_from_path(Path::new("README")), None);
    }

    #[test]
    fn extension_beats_config_format() {
        let csv = Some(Path::new("quiz.csv"));
        assert_eq!(resolve_format(None, csv, Some(Format::Latex)), Format::D2l);
        assert_eq!(
            resolve_format(Some(Format::Debug), csv, Some(Format::Latex)),
            Format::Debug
        );
        assert_eq!(
            resolve_format(None, Some(Path::new("notes.txt")), Some(Format::Latex)),
            Format::Latex
        );
        assert_eq!(resolve_format(None, None, None), Format::Qbl);
    }

    #[test]
    fn explicit_default_order_survives_generation() {
        assert_eq!(resolve_order(Some(Order::Default), true), Order::Default);
        assert_eq!(resolve_order(None, true), Order::Random);
        assert_eq!(resolve_order(None, false), Order::Default);
        assert_eq!(resolve_order(Some(Order::Id), true), Order::Id);
    }
}
