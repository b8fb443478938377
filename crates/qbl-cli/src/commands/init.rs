//! The `qbl init` command.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::CONFIG_FILE;

const EXAMPLE_BANK: &str = "banks/example.qbl";

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(CONFIG_FILE), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("banks").context("failed to create banks/")?;
    write_if_missing(Path::new(EXAMPLE_BANK), EXAMPLE_BANK_TEXT)?;

    println!("\nNext steps:");
    println!("  1. Edit {EXAMPLE_BANK} or add your own banks");
    println!("  2. Run: qbl validate {EXAMPLE_BANK}");
    println!("  3. Run: qbl build {EXAMPLE_BANK} -g 3 -o quiz.html");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# qbl configuration

title = "Multiple Choice Quiz"
# format = "latex"
# order = "random"
# seed = 42
compressed = false
include_mode = "restrict"

[tags]
include = []
exclude = ["draft"]
require = []
"#;

const EXAMPLE_BANK_TEXT: &str = r#"% Example question bank.
% Entries are separated by blank lines. Mark the correct choice with '*'.

#own-move
^ownership easy
What happens to `a` after `let b = a;` when `a` is a `String`?
a. It is copied
*b. It is moved and can no longer be used
c. It becomes a reference
> `String` does not implement `Copy`.

^borrowing easy
How many mutable references to a value may exist at once?
*a. One
b. Two
c. Unlimited

^traits hard
What does `impl Trait` in argument position desugar to?
a. A trait object
*b. A generic parameter with a trait bound
c. A macro invocation

^lifetimes hard
Which lifetime outlives every other lifetime?
a. `'a`
*b. `'static`
c. `'_`

^draft
Which keyword declares an immutable binding?
*a. let
b. mut
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use qbl_core::parser::parse_bank_str;
    use qbl_core::validate::validate;

    #[test]
    fn example_bank_is_valid() {
        let questions = parse_bank_str(EXAMPLE_BANK, EXAMPLE_BANK_TEXT, 0).unwrap();
        assert_eq!(questions.len(), 5);
        validate(&questions).unwrap();
        assert_eq!(questions[0].id, "own-move");
    }

    #[test]
    fn sample_config_parses() {
        let config: crate::config::QblConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.tags.exclude, vec!["draft"]);
    }
}
