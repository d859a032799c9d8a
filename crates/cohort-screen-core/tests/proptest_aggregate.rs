// crates/cohort-screen-core/tests/proptest_aggregate.rs
// ============================================================================
// Module: Aggregation Property-Based Tests
// Description: Property tests for FAIL dominance and score bounds.
// Purpose: Verify decision-policy invariants over arbitrary evidence vectors.
// ============================================================================

//! Property-based tests for confidence aggregation invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only assertions and exact float checks are permitted."
)]

use cohort_screen_core::ConfidenceScore;
use cohort_screen_core::CriterionResult;
use cohort_screen_core::DecisionPolicy;
use cohort_screen_core::EvidenceEntry;
use cohort_screen_core::Outcome;
use cohort_screen_core::Verdict;
use cohort_screen_core::decide;
use cohort_screen_core::runtime::MAYBE_WEIGHT;
use cohort_screen_core::runtime::PASS_WEIGHT;
use proptest::prelude::*;

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Pass), Just(Outcome::Fail), Just(Outcome::Maybe)]
}

fn evidence_from(outcomes: &[Outcome]) -> Vec<EvidenceEntry> {
    outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let result = match outcome {
                Outcome::Pass => CriterionResult::pass("ok"),
                Outcome::Fail => CriterionResult::fail("violated"),
                Outcome::Maybe => CriterionResult::maybe("no data"),
            };
            EvidenceEntry::new(format!("criterion {index}"), result)
        })
        .collect()
}

proptest! {
    /// Any FAIL forces not-eligible with an NA score, regardless of the rest.
    #[test]
    fn aggregate_fail_dominance(outcomes in prop::collection::vec(outcome_strategy(), 1 .. 32)) {
        prop_assume!(outcomes.contains(&Outcome::Fail));
        let evidence = evidence_from(&outcomes);
        let (score, verdict) = decide(&evidence, &DecisionPolicy::default());
        prop_assert_eq!(score, ConfidenceScore::NotApplicable);
        prop_assert_eq!(verdict, Verdict::NotEligible);
    }

    /// With no FAIL, the score is the mean of weights and lies in [0.5, 1].
    #[test]
    fn aggregate_no_fail_score_bounds(
        outcomes in prop::collection::vec(
            prop_oneof![Just(Outcome::Pass), Just(Outcome::Maybe)],
            1 .. 32,
        ),
    ) {
        let evidence = evidence_from(&outcomes);
        let (score, verdict) = decide(&evidence, &DecisionPolicy::default());

        let expected: f64 = outcomes
            .iter()
            .map(|outcome| if outcome.is_pass() { PASS_WEIGHT } else { MAYBE_WEIGHT })
            .sum::<f64>()
            / outcomes.len() as f64;
        prop_assert_eq!(score, ConfidenceScore::Score(expected));
        prop_assert!((0.5 ..= 1.0).contains(&expected));

        let policy = DecisionPolicy::default();
        let expected_verdict =
            if expected > policy.cutoff { Verdict::Eligible } else { Verdict::Uncertain };
        prop_assert_eq!(verdict, expected_verdict);
    }

    /// The decision is a pure function of the evidence and policy.
    #[test]
    fn aggregate_purity(
        outcomes in prop::collection::vec(outcome_strategy(), 0 .. 32),
        cutoff in 0.0f64 .. 1.0,
        inclusive in any::<bool>(),
    ) {
        let evidence = evidence_from(&outcomes);
        let policy = DecisionPolicy {
            cutoff,
            inclusive,
        };
        prop_assert_eq!(decide(&evidence, &policy), decide(&evidence, &policy));
    }

    /// Inclusivity only changes the verdict when the score sits exactly at
    /// the cutoff.
    #[test]
    fn aggregate_inclusivity_boundary(
        outcomes in prop::collection::vec(
            prop_oneof![Just(Outcome::Pass), Just(Outcome::Maybe)],
            1 .. 32,
        ),
        cutoff in 0.0f64 .. 1.0,
    ) {
        let evidence = evidence_from(&outcomes);
        let exclusive = DecisionPolicy {
            cutoff,
            inclusive: false,
        };
        let inclusive = DecisionPolicy {
            cutoff,
            inclusive: true,
        };
        let (score, exclusive_verdict) = decide(&evidence, &exclusive);
        let (_, inclusive_verdict) = decide(&evidence, &inclusive);

        let Some(value) = score.value() else {
            return Err(TestCaseError::fail("score must be applicable without FAIL"));
        };
        if value == cutoff {
            prop_assert_eq!(exclusive_verdict, Verdict::Uncertain);
            prop_assert_eq!(inclusive_verdict, Verdict::Eligible);
        } else {
            prop_assert_eq!(exclusive_verdict, inclusive_verdict);
        }
    }
}
