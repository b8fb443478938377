//! Structural checks on a parsed question pool.

use std::collections::HashMap;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::model::Question;

/// Minimum number of choices a question must offer.
pub const MIN_CHOICES: usize = 2;

/// Check every question and collect all problems.
///
/// Returns `Ok(())` only when the pool has no violations at all.
pub fn validate(pool: &[Question]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen_ids: HashMap<&str, &Question> = HashMap::new();

    for question in pool {
        let mut report = |kind| {
            errors.push(ValidationError {
                location: question.location(),
                kind,
            })
        };

        if question.stem.trim().is_empty() {
            report(ValidationErrorKind::EmptyStem);
        }

        if question.choices.len() < MIN_CHOICES {
            report(ValidationErrorKind::TooFewChoices(question.choices.len()));
        }

        match question.choices.iter().filter(|c| c.is_correct).count() {
            1 => {}
            0 => report(ValidationErrorKind::NoCorrectChoice),
            n => report(ValidationErrorKind::MultipleCorrectChoices(n)),
        }

        if let Some(first) = seen_ids.get(question.id.as_str()) {
            report(ValidationErrorKind::DuplicateId(first.location()));
        } else {
            seen_ids.insert(&question.id, question);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_bank_str;

    #[test]
    fn valid_pool_passes() {
        let pool = parse_bank_str("b.qbl", "Q1?\n*a. y\nb. n\n\nQ2?\na. y\n*b. n\n", 0).unwrap();
        assert!(validate(&pool).is_ok());
    }

    #[test]
    fn missing_correct_choice_is_located() {
        let pool = parse_bank_str(
            "b.qbl",
            "Q1?\n*a. y\nb. n\n\n% second\nQ2?\na. y\nb. n\n",
            0,
        )
        .unwrap();
        let errors = validate(&pool).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::NoCorrectChoice);
        assert_eq!(errors[0].location.position, 1);
        assert_eq!(errors[0].location.line, 6);
        assert_eq!(errors[0].location.file, "b.qbl");
    }

    #[test]
    fn collects_every_violation() {
        let pool = parse_bank_str(
            "b.qbl",
            "^tag-only\n\nQ?\n*a. y\n\nR?\n*a. y\n*b. n\n",
            0,
        )
        .unwrap();
        let errors = validate(&pool).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| &e.kind).collect();
        assert!(kinds.contains(&&ValidationErrorKind::EmptyStem));
        assert!(kinds.contains(&&ValidationErrorKind::TooFewChoices(0)));
        assert!(kinds.contains(&&ValidationErrorKind::TooFewChoices(1)));
        assert!(kinds.contains(&&ValidationErrorKind::MultipleCorrectChoices(2)));
        // tag-only entry: empty stem, no choices, no correct choice
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn duplicate_ids_across_files() {
        let mut pool = parse_bank_str("a.qbl", "#same\nQ1?\n*a. y\nb. n\n", 0).unwrap();
        pool.extend(parse_bank_str("b.qbl", "#same\nQ2?\n*a. y\nb. n\n", 1).unwrap());
        let errors = validate(&pool).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location.file, "b.qbl");
        match &errors[0].kind {
            ValidationErrorKind::DuplicateId(first) => assert_eq!(first.file, "a.qbl"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn identical_stems_derive_identical_ids() {
        let pool = parse_bank_str("a.qbl", "Q?\n*a. y\nb. n\n\nQ?\na. y\n*b. n\n", 0).unwrap();
        let errors = validate(&pool).unwrap_err();
        assert!(matches!(errors[0].kind, ValidationErrorKind::DuplicateId(_)));
    }
}
