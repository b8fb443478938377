//! Property tests for the selection engine.
//!
//! Random pools, constraints, and avoid sets are generated; every run must keep
//! avoided and excluded questions out, honor satisfiable quotas, and never
//! exceed the requested count.

use std::collections::BTreeSet;

use proptest::prelude::*;
use qbl_core::select::select;
use qbl_core::{seeded_rng, AvoidSet, Choice, Constraints, Question, SelectionWarning, TagQuota};

const TAGS: &[&str] = &["easy", "hard", "loops", "traits", "draft"];

fn question(i: usize, tag_mask: u8) -> Question {
    Question {
        id: format!("q{i}"),
        stem: format!("Question {i}?"),
        choices: vec![Choice::new("yes", true), Choice::new("no", false)],
        tags: TAGS
            .iter()
            .enumerate()
            .filter(|(bit, _)| tag_mask & (1 << bit) != 0)
            .map(|(_, t)| t.to_string())
            .collect(),
        explanation: None,
        source_file: "bank.qbl".into(),
        line: i + 1,
        raw_order_index: i,
    }
}

fn tag_set(mask: u8) -> BTreeSet<String> {
    TAGS.iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, t)| t.to_string())
        .collect()
}

prop_compose! {
    fn pool_strategy()(masks in prop::collection::vec(0u8..32, 0..40)) -> Vec<Question> {
        masks.into_iter().enumerate().map(|(i, m)| question(i, m)).collect()
    }
}

prop_compose! {
    fn constraints_strategy()(
        include in 0u8..32,
        exclude in 0u8..32,
        require in 0u8..32,
        quotas in prop::collection::vec((0usize..TAGS.len(), 0usize..5), 0..3),
        mandatory in any::<bool>(),
    ) -> Constraints {
        let mut c = Constraints {
            include: tag_set(include),
            exclude: tag_set(exclude),
            require: tag_set(require),
            include_mode: if mandatory {
                qbl_core::IncludeMode::Mandatory
            } else {
                qbl_core::IncludeMode::Restrict
            },
            ..Default::default()
        };
        for (tag, count) in quotas {
            c.add_quota(TagQuota { tag: TAGS[tag].to_string(), count });
        }
        c
    }
}

proptest! {
    #[test]
    fn same_seed_same_output(
        pool in pool_strategy(),
        constraints in constraints_strategy(),
        count in 0usize..30,
        seed in any::<u64>(),
    ) {
        let avoid = AvoidSet::new();
        let a = select(&pool, count, &constraints, &avoid, &mut seeded_rng(seed));
        let b = select(&pool, count, &constraints, &avoid, &mut seeded_rng(seed));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn avoided_and_excluded_never_appear(
        pool in pool_strategy(),
        constraints in constraints_strategy(),
        avoid_every in 1usize..5,
        count in 0usize..30,
        seed in any::<u64>(),
    ) {
        let avoid: AvoidSet = pool
            .iter()
            .step_by(avoid_every)
            .map(|q| q.id.clone())
            .collect();
        let s = select(&pool, count, &constraints, &avoid, &mut seeded_rng(seed));
        for &i in &s.picked {
            prop_assert!(!avoid.contains(&pool[i].id));
            prop_assert!(!pool[i].has_any_tag(&constraints.exclude));
        }
    }

    #[test]
    fn size_bound_and_distinct(
        pool in pool_strategy(),
        constraints in constraints_strategy(),
        count in 0usize..30,
        seed in any::<u64>(),
    ) {
        let s = select(&pool, count, &constraints, &AvoidSet::new(), &mut seeded_rng(seed));
        prop_assert!(s.picked.len() <= count);
        let distinct: BTreeSet<usize> = s.picked.iter().copied().collect();
        prop_assert_eq!(distinct.len(), s.picked.len());
        if s.picked.len() < count {
            let short = s.warnings.iter().any(|w| matches!(
                w,
                SelectionWarning::InsufficientPool { .. } | SelectionWarning::QuotaUnmet { .. }
            ));
            prop_assert!(short);
        }
    }

    #[test]
    fn satisfiable_quotas_are_met(
        pool in pool_strategy(),
        constraints in constraints_strategy(),
        seed in any::<u64>(),
    ) {
        // Room for every quota, so only pool shortage can leave one unmet.
        let count = constraints.quotas.iter().map(|q| q.count).sum::<usize>() + 5;
        let s = select(&pool, count, &constraints, &AvoidSet::new(), &mut seeded_rng(seed));
        for quota in &constraints.quotas {
            let eligible = pool
                .iter()
                .filter(|q| q.has_tag(&quota.tag))
                .filter(|q| !q.has_any_tag(&constraints.exclude))
                .filter(|q| constraints.require.is_empty() || q.has_any_tag(&constraints.require))
                .count();
            let placed = s.picked.iter().filter(|&&i| pool[i].has_tag(&quota.tag)).count();
            if eligible >= quota.count {
                prop_assert!(placed >= quota.count, "quota {} placed {}", quota.tag, placed);
            } else {
                prop_assert_eq!(placed, eligible);
            }
        }
    }
}
