//! The `qbl validate` command.

use std::path::PathBuf;

use anyhow::Result;

use qbl_core::{Bank, BankError, LoadError};

pub fn execute(files: Vec<PathBuf>) -> Result<()> {
    let mut bank = Bank::new();
    let mut problems = 0;

    for path in &files {
        match bank.load_file(path) {
            Ok(n) => println!("{}: {n} question(s)", path.display()),
            Err(LoadError::Parse(errors)) => {
                for e in &errors {
                    println!("  ERROR: {e}");
                }
                problems += errors.len();
            }
            Err(e) => return Err(e.into()),
        }
    }

    match bank.validate() {
        Ok(()) => {}
        Err(BankError::Validation(errors)) => {
            for e in &errors {
                println!("  ERROR: {e}");
            }
            problems += errors.len();
        }
        Err(e) => return Err(e.into()),
    }

    if problems == 0 {
        println!("All banks valid ({} questions).", bank.len());
        Ok(())
    } else {
        anyhow::bail!("{problems} problem(s) found")
    }
}
