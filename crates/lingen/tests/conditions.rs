//! Tests for the condition logic compiler: grouping, negation, display
//! round-trips and syntax errors.

mod common;

use insta::assert_snapshot;
use lingen::dsl::{Condition, EvalContext};

// =============================================================================
// Parsing and evaluation
// =============================================================================

#[test]
fn the_bare_star_is_the_always_true_condition() {
    assert!(Condition::compile("*").unwrap().is_none());
    assert!(Condition::compile("  *  ").unwrap().is_none());
}

#[test]
fn single_pattern_conditions_evaluate_against_the_node() {
    let vocab = common::vocabulary();
    let tree = common::tree(&vocab);
    let rules = common::no_rules(&vocab);
    let ctx = EvalContext::new(&tree, &vocab, &rules);

    let root = tree.root().unwrap();
    let eat = tree.child_by_label(root, "action", "en", &vocab).unwrap();
    let dog = tree.child_by_label(eat, "actor", "en", &vocab).unwrap();

    let on_dog = Condition::compile("=[dog]").unwrap().unwrap();
    assert!(on_dog.evaluate(&ctx, dog));
    assert!(!on_dog.evaluate(&ctx, eat));

    let has_count = Condition::compile(".count").unwrap().unwrap();
    assert!(has_count.evaluate(&ctx, eat));
    assert!(!has_count.evaluate(&ctx, root));
}

#[test]
fn operators_bind_equally_and_associate_left_to_right() {
    let vocab = common::vocabulary();
    let tree = common::tree(&vocab);
    let rules = common::no_rules(&vocab);
    let ctx = EvalContext::new(&tree, &vocab, &rules);

    let root = tree.root().unwrap();
    let eat = tree.child_by_label(root, "action", "en", &vocab).unwrap();
    let dog = tree.child_by_label(eat, "actor", "en", &vocab).unwrap();

    // on the dog node: a = =[cat] is false, b = c = =[dog] are true.
    // left-to-right grouping gives ((a & b) | c) = true; explicit
    // right-grouping gives (a & (b | c)) = false.
    let implicit = Condition::compile("=[cat] & =[dog] | =[dog]").unwrap().unwrap();
    let explicit = Condition::compile("(=[cat] & =[dog]) | =[dog]").unwrap().unwrap();
    let regrouped = Condition::compile("=[cat] & (=[dog] | =[dog])").unwrap().unwrap();

    assert!(implicit.evaluate(&ctx, dog));
    assert!(explicit.evaluate(&ctx, dog));
    assert!(!regrouped.evaluate(&ctx, dog));
}

#[test]
fn negation_binds_the_following_term() {
    let vocab = common::vocabulary();
    let tree = common::tree(&vocab);
    let rules = common::no_rules(&vocab);
    let ctx = EvalContext::new(&tree, &vocab, &rules);

    let root = tree.root().unwrap();
    let eat = tree.child_by_label(root, "action", "en", &vocab).unwrap();
    let dog = tree.child_by_label(eat, "actor", "en", &vocab).unwrap();

    let negated = Condition::compile("!=[cat] & =[dog]").unwrap().unwrap();
    assert!(negated.evaluate(&ctx, dog));

    let negated_group = Condition::compile("!(=[cat] | =[dog])").unwrap().unwrap();
    assert!(!negated_group.evaluate(&ctx, dog));
    assert!(negated_group.evaluate(&ctx, eat));
}

// =============================================================================
// Display round-trip
// =============================================================================

#[test]
fn display_renders_a_fully_parenthesized_form() {
    let condition = Condition::compile("=[cat] & =[dog] | !=[fish]").unwrap().unwrap();
    assert_snapshot!(condition.to_string(), @"((=[cat] & =[dog]) | !(=[fish]))");
}

#[test]
fn display_output_parses_back_to_an_equivalent_condition() {
    for source in [
        "=[cat] & =[dog] | =[fish]",
        "!(.count & .actor[dog]) | =[eat]",
        "!.count",
        ".actor.called[Rex] & !(^ | =[x])",
    ] {
        let condition = Condition::compile(source).unwrap().unwrap();
        let displayed = condition.to_string();
        let reparsed = Condition::compile(&displayed).unwrap().unwrap();
        assert_eq!(reparsed, condition, "round-trip of '{source}'");
        assert_eq!(reparsed.to_string(), displayed);
    }
}

// =============================================================================
// Syntax errors
// =============================================================================

#[test]
fn empty_conditions_are_rejected() {
    assert!(Condition::compile("").is_err());
    assert!(Condition::compile("   ").is_err());
}

#[test]
fn an_operator_where_a_term_is_expected_is_rejected() {
    assert!(Condition::compile("& =[a]").is_err());
    assert!(Condition::compile("=[a] &").is_err());
    assert!(Condition::compile("=[a] & & =[b]").is_err());
    assert!(Condition::compile("!").is_err());
}

#[test]
fn a_term_where_an_operator_is_expected_is_rejected() {
    let err = Condition::compile("=[a] =[b]").unwrap_err();
    assert!(err.message.contains("'&' or '|'"), "got: {}", err.message);
}

#[test]
fn an_unmatched_closing_parenthesis_is_rejected() {
    let err = Condition::compile("=[a])").unwrap_err();
    assert_snapshot!(err.to_string(), @"column 5: found ')' without a matching '('");
}

#[test]
fn pattern_errors_name_the_offending_terminal() {
    let err = Condition::compile("=[a] & cat").unwrap_err();
    assert!(err.message.contains("in pattern 'cat'"), "got: {}", err.message);
}
