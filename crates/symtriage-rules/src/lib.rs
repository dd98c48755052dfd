//! # symtriage-rules
//!
//! The symptom catalog, the condition rule table, and the matcher that
//! evaluates symptom sets against them.
//!
//! ## Overview
//!
//! This crate provides [`RuleTableMatcher`], which implements the
//! [`Matcher`](symtriage_core::traits::Matcher) trait. Both the catalog and
//! the rule table are plain TOML documents; built-in copies are embedded in
//! the crate and custom ones can be loaded from disk.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use symtriage_core::traits::Matcher;
//! use symtriage_rules::RuleTableMatcher;
//!
//! let matcher = RuleTableMatcher::builtin();
//! let result = matcher.evaluate(&["fever", "cough"].into_iter().collect());
//! println!("{} ({}%)", result.matched_rule.name, result.adjusted_confidence);
//! ```
//!
//! ## Matching
//!
//! Exact trigger-set matches return the condition's base confidence.
//! Partial matches need at least two shared symptoms and are ranked by
//! `(m / |trigger|) * (m / |input|)`; earlier conditions win ties. With no
//! candidate, a red-flag symptom escalates, otherwise a general default is
//! returned.

pub mod catalog;
pub mod matcher;
pub mod table;

pub use catalog::SymptomCatalog;
pub use matcher::{Overlap, RuleTableMatcher};
pub use table::{RedFlag, RuleTable};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use symtriage_contracts::{
        analysis::MatchKind,
        condition::{Severity, Urgency},
        error::TriageError,
        symptom::{SymptomId, SymptomSet},
    };
    use symtriage_core::traits::Matcher;

    use crate::{Overlap, RuleTable, RuleTableMatcher, SymptomCatalog};
    use crate::matcher::{CONFIDENCE_CEILING, CONFIDENCE_FLOOR};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn set(ids: &[&str]) -> SymptomSet {
        ids.iter().copied().collect()
    }

    /// Symptoms named by the built-in rule table plus one that no rule uses.
    const EXERCISED: [&str; 12] = [
        "fever",
        "headache",
        "cough",
        "sore_throat",
        "shortness_breath",
        "chest_pain",
        "nausea",
        "vomiting",
        "diarrhea",
        "rash",
        "joint_pain",
        "dizziness",
    ];

    /// Every subset of `EXERCISED` (4096 sets).
    fn power_set() -> Vec<SymptomSet> {
        (0u32..1 << EXERCISED.len())
            .map(|mask| {
                EXERCISED
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, id)| *id)
                    .collect()
            })
            .collect()
    }

    /// Wrap condition blocks in a complete table document.
    fn table_toml(conditions: &str) -> String {
        format!(
            r#"
            {conditions}

            [red_flag]
            symptoms = ["chest_pain"]

            [red_flag.condition]
            id = "red"
            name = "Red Flag"
            base_confidence = 70
            severity = "high"
            urgency = "immediate"
            description = "escalate"

            [fallback]
            id = "general"
            name = "General"
            base_confidence = 68
            severity = "low"
            urgency = "routine"
            description = "default"
            "#
        )
    }

    fn condition_block(id: &str, triggers: &[&str], confidence: u32) -> String {
        let list = triggers
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"
            [[conditions]]
            id = "{id}"
            name = "{id}"
            trigger_symptoms = [{list}]
            base_confidence = {confidence}
            severity = "medium"
            urgency = "soon"
            description = "test"
            "#
        )
    }

    fn custom_matcher(conditions: &str) -> RuleTableMatcher {
        let catalog = SymptomCatalog::builtin();
        let table = RuleTable::from_toml_str(&table_toml(conditions), &catalog).unwrap();
        RuleTableMatcher::new(catalog, table)
    }

    // ── 1. built-in data ──────────────────────────────────────────────────────

    #[test]
    fn builtin_table_loads_in_declared_order() {
        let table = RuleTable::builtin();
        let ids: Vec<&str> = table.conditions.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "common-cold-flu",
                "respiratory-infection",
                "possible-cardiac-issue",
                "gastroenteritis",
                "autoimmune-allergic"
            ]
        );
        assert_eq!(table.fallback.base_confidence, 68);
        assert_eq!(table.red_flag.symptoms, set(&["chest_pain", "shortness_breath"]));
    }

    // ── 2. concrete scenarios ─────────────────────────────────────────────────

    #[test]
    fn scenario_a_exact_cold_flu() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["fever", "headache", "cough", "sore_throat"]));

        assert_eq!(result.matched_rule.name, "Common Cold/Flu");
        assert_eq!(result.adjusted_confidence, 88);
        assert_eq!(result.matched_rule.severity, Severity::Low);
        assert_eq!(result.matched_rule.urgency, Urgency::Routine);
        assert_eq!(result.match_kind, MatchKind::Exact);
    }

    #[test]
    fn scenario_b_exact_cardiac() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["shortness_breath", "chest_pain"]));

        assert_eq!(result.matched_rule.name, "Possible Cardiac Issue");
        assert_eq!(result.matched_rule.severity, Severity::High);
        assert_eq!(result.matched_rule.urgency, Urgency::Immediate);
        assert_eq!(result.adjusted_confidence, 75);
    }

    #[test]
    fn scenario_c_partial_overlap_hits_floor() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["fever", "cough"]));

        assert_eq!(result.matched_rule.name, "Common Cold/Flu");
        assert_eq!(
            result.match_kind,
            MatchKind::Partial {
                matched: 2,
                rule_size: 4,
                input_size: 2
            }
        );
        assert_eq!(result.match_kind.score(), Some(0.5));
        // max(60, round(88 * 0.5)) = max(60, 44)
        assert_eq!(result.adjusted_confidence, 60);
    }

    #[test]
    fn scenario_d_unknown_symptom_falls_back() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["unknown_symptom_1"]));

        assert_eq!(result.matched_rule.name, "General Health Concern");
        assert_eq!(result.adjusted_confidence, 68);
        assert_eq!(result.matched_rule.severity, Severity::Low);
        assert_eq!(result.matched_rule.urgency, Urgency::Routine);
        assert_eq!(result.match_kind, MatchKind::Fallback);
    }

    // ── 3. partial scoring ────────────────────────────────────────────────────

    /// {cough, shortness_breath, chest_pain, fever}:
    ///   cold        (2/4)*(2/4) = 0.25
    ///   respiratory (3/3)*(3/4) = 0.75  ← best
    ///   cardiac     (2/2)*(2/4) = 0.5
    /// 82 * 0.75 = 61.5 rounds half up to 62.
    #[test]
    fn best_score_wins_and_rounds_half_up() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["cough", "shortness_breath", "chest_pain", "fever"]));

        assert_eq!(result.matched_rule.id, "respiratory-infection");
        assert_eq!(result.adjusted_confidence, 62);
    }

    #[test]
    fn unknown_ids_do_not_dilute_recall() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["nausea", "vomiting", "diarrhea", "not_a_symptom"]));

        // After dropping the unknown id this is an exact match.
        assert_eq!(result.matched_rule.id, "gastroenteritis");
        assert_eq!(result.match_kind, MatchKind::Exact);
        assert_eq!(result.adjusted_confidence, 85);
    }

    #[test]
    fn single_shared_symptom_is_not_a_candidate() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["fever", "rash"]));
        assert_eq!(result.match_kind, MatchKind::Fallback);
    }

    // ── 4. tie-break ──────────────────────────────────────────────────────────

    #[test]
    fn equal_scores_go_to_first_declared_rule() {
        let first = condition_block("alpha", &["fever", "cough", "rash"], 90);
        let second = condition_block("beta", &["fever", "cough", "nausea"], 90);

        let matcher = custom_matcher(&format!("{first}{second}"));
        let result = matcher.evaluate(&set(&["fever", "cough"]));
        assert_eq!(result.matched_rule.id, "alpha");

        let reversed = custom_matcher(&format!("{second}{first}"));
        let result = reversed.evaluate(&set(&["fever", "cough"]));
        assert_eq!(result.matched_rule.id, "beta");
    }

    #[test]
    fn cmp_score_is_exact() {
        // (2/3)*(2/4) and (2/4)*(2/3) are the same rational.
        let a = Overlap {
            matched: 2,
            rule_size: 3,
            input_size: 4,
        };
        let b = Overlap {
            matched: 2,
            rule_size: 4,
            input_size: 3,
        };
        assert_eq!(a.cmp_score(&b), Ordering::Equal);

        let c = Overlap {
            matched: 3,
            rule_size: 3,
            input_size: 4,
        };
        assert_eq!(c.cmp_score(&a), Ordering::Greater);
    }

    #[test]
    fn adjusted_confidence_is_capped_and_floored() {
        let full = Overlap {
            matched: 2,
            rule_size: 2,
            input_size: 2,
        };
        assert_eq!(full.adjusted_confidence(100), 100);
        assert_eq!(full.adjusted_confidence(40), 60);

        let empty = Overlap {
            matched: 0,
            rule_size: 0,
            input_size: 0,
        };
        assert_eq!(empty.score(), 0.0);
        assert_eq!(empty.adjusted_confidence(90), 60);
    }

    // ── 5. red-flag override ──────────────────────────────────────────────────

    #[test]
    fn lone_chest_pain_is_immediate() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["chest_pain"]));

        assert_eq!(result.match_kind, MatchKind::RedFlag);
        assert_eq!(result.matched_rule.name, "Cardiovascular Concern");
        assert_eq!(result.matched_rule.urgency, Urgency::Immediate);
        assert_eq!(result.matched_rule.severity, Severity::High);
        assert_eq!(result.adjusted_confidence, 70);
    }

    #[test]
    fn red_flag_applies_regardless_of_co_occurring_symptoms() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["shortness_breath", "rash", "back_pain"]));
        assert_eq!(result.match_kind, MatchKind::RedFlag);
        assert_eq!(result.matched_rule.urgency, Urgency::Immediate);
    }

    #[test]
    fn multi_symptom_match_takes_precedence_over_red_flag() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&set(&["chest_pain", "nausea", "vomiting"]));
        assert_eq!(result.matched_rule.id, "gastroenteritis");
    }

    // ── 6. properties over the power set ─────────────────────────────────────

    #[test]
    fn evaluation_is_total_and_deterministic() {
        let matcher = RuleTableMatcher::builtin();
        for input in power_set() {
            let first = matcher.evaluate(&input);
            let second = matcher.evaluate(&input);
            assert_eq!(first, second, "non-deterministic for {:?}", input);
        }
    }

    #[test]
    fn exact_match_reports_base_confidence() {
        let matcher = RuleTableMatcher::builtin();
        for rule in &matcher.table().conditions {
            let result = matcher.evaluate(&rule.trigger_symptoms);
            assert_eq!(result.matched_rule.id, rule.id);
            assert_eq!(result.adjusted_confidence, rule.base_confidence);
        }
    }

    #[test]
    fn adjusted_confidence_is_clamped_between_floor_and_ceiling() {
        let full = Overlap {
            matched: 2,
            rule_size: 2,
            input_size: 2,
        };
        assert_eq!(full.adjusted_confidence(100), CONFIDENCE_CEILING);

        // score 0.25: 88 * 0.25 = 22, lifted to the floor.
        let weak = Overlap {
            matched: 2,
            rule_size: 4,
            input_size: 4,
        };
        assert_eq!(weak.adjusted_confidence(88), CONFIDENCE_FLOOR);
    }

    #[test]
    fn matched_results_respect_confidence_bounds() {
        let matcher = RuleTableMatcher::builtin();
        for input in power_set() {
            let any_candidate = matcher
                .table()
                .conditions
                .iter()
                .any(|rule| Overlap::measure(rule, &input).is_candidate());
            let result = matcher.evaluate(&input);

            if any_candidate {
                assert!(
                    matches!(result.match_kind, MatchKind::Exact | MatchKind::Partial { .. }),
                    "candidate existed but got {:?} for {:?}",
                    result.match_kind,
                    input
                );
                assert!(
                    (60..=100).contains(&result.adjusted_confidence),
                    "confidence {} out of bounds for {:?}",
                    result.adjusted_confidence,
                    input
                );
                assert!(result.matched_rule.trigger_symptoms.overlap(&input) >= 2);
            } else {
                assert!(matches!(
                    result.match_kind,
                    MatchKind::RedFlag | MatchKind::Fallback
                ));
            }
        }
    }

    #[test]
    fn partial_winner_has_the_best_score() {
        let matcher = RuleTableMatcher::builtin();
        for input in power_set() {
            let result = matcher.evaluate(&input);
            if !matches!(result.match_kind, MatchKind::Partial { .. }) {
                continue;
            }
            let winner = Overlap::measure(&result.matched_rule, &input);
            let winner_pos = matcher
                .table()
                .conditions
                .iter()
                .position(|r| r.id == result.matched_rule.id)
                .unwrap();

            for (pos, rule) in matcher.table().conditions.iter().enumerate() {
                let other = Overlap::measure(rule, &input);
                if !other.is_candidate() {
                    continue;
                }
                match other.cmp_score(&winner) {
                    Ordering::Greater => panic!("{} beats winner for {:?}", rule.id, input),
                    Ordering::Equal => assert!(pos >= winner_pos),
                    Ordering::Less => {}
                }
            }
        }
    }

    #[test]
    fn extra_symptom_never_raises_a_rule_score() {
        let matcher = RuleTableMatcher::builtin();
        for input in power_set() {
            for rule in &matcher.table().conditions {
                let before = Overlap::measure(rule, &input);
                for extra in EXERCISED {
                    let id = SymptomId::new(extra);
                    if input.contains(&id) || rule.trigger_symptoms.contains(&id) {
                        continue;
                    }
                    let mut grown = input.clone();
                    grown.insert(id);
                    let after = Overlap::measure(rule, &grown);
                    assert_ne!(after.cmp_score(&before), Ordering::Greater);
                }
            }
        }
    }

    #[test]
    fn empty_input_returns_fallback() {
        let matcher = RuleTableMatcher::builtin();
        let result = matcher.evaluate(&SymptomSet::new());
        assert_eq!(result.match_kind, MatchKind::Fallback);
        assert_eq!(result.adjusted_confidence, 68);
    }

    // ── 7. table validation ───────────────────────────────────────────────────

    fn expect_invalid(conditions: &str, needle: &str) {
        let catalog = SymptomCatalog::builtin();
        match RuleTable::from_toml_str(&table_toml(conditions), &catalog) {
            Err(TriageError::InvalidRuleTable { reason }) => {
                assert!(reason.contains(needle), "expected '{needle}' in: {reason}");
            }
            other => panic!("expected InvalidRuleTable, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_condition_ids_are_rejected() {
        let a = condition_block("dup", &["fever", "cough"], 80);
        let b = condition_block("dup", &["nausea", "vomiting"], 80);
        expect_invalid(&format!("{a}{b}"), "duplicate condition id 'dup'");
    }

    #[test]
    fn unknown_trigger_symptoms_are_rejected() {
        let a = condition_block("odd", &["fever", "purple_spots"], 80);
        expect_invalid(&a, "unknown symptom 'purple_spots'");
    }

    #[test]
    fn identical_trigger_sets_are_rejected() {
        let a = condition_block("one", &["fever", "cough"], 80);
        let b = condition_block("two", &["cough", "fever"], 70);
        expect_invalid(&format!("{a}{b}"), "identical trigger symptoms");
    }

    #[test]
    fn confidence_above_100_is_rejected() {
        let a = condition_block("hot", &["fever", "cough"], 101);
        expect_invalid(&a, "base_confidence 101");
    }

    #[test]
    fn empty_trigger_set_is_rejected() {
        let a = condition_block("empty", &[], 80);
        expect_invalid(&a, "no trigger symptoms");
    }

    #[test]
    fn unknown_red_flag_symptom_is_rejected() {
        let catalog = SymptomCatalog::builtin();
        let toml = table_toml("conditions = []").replace(
            "symptoms = [\"chest_pain\"]",
            "symptoms = [\"chest_pain\", \"glowing\"]",
        );
        match RuleTable::from_toml_str(&toml, &catalog) {
            Err(TriageError::InvalidRuleTable { reason }) => {
                assert!(reason.contains("'glowing'"), "got: {reason}");
            }
            other => panic!("expected InvalidRuleTable, got {:?}", other),
        }
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let catalog = SymptomCatalog::builtin();
        match RuleTable::from_toml_str("this is not valid toml ][[[", &catalog) {
            Err(TriageError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse rule table TOML"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn table_without_conditions_always_falls_through() {
        let matcher = custom_matcher("conditions = []");
        assert_eq!(
            matcher.evaluate(&set(&["fever", "cough"])).match_kind,
            MatchKind::Fallback
        );
        assert_eq!(
            matcher.evaluate(&set(&["chest_pain"])).match_kind,
            MatchKind::RedFlag
        );
    }
}
