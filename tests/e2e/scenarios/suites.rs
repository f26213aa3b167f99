use crate::harness::Scenario;
use behave_core::{all, be_gt, equal, no, pending, Outcome, Suite};

#[test]
fn test_spec_styles_produce_qualified_names() {
    Scenario::new("styles")
        .test("plain", |_| Ok(()))
        .describe_it("a queue", "keeps insertion order", |_| Ok(()))
        .feature_scenario("checkout", "empty cart", |_| Ok(()))
        .when_should("the cart is empty", "show zero", |_| Ok(()))
        .assert_run_order(&[
            "plain",
            "a queue keeps insertion order",
            "Feature: checkout Scenario: empty cart",
            "when the cart is empty should show zero",
        ])
        .run()
        .unwrap();
}

#[test]
fn test_pending_and_ignored_are_not_failures() {
    Scenario::new("pending_and_ignored")
        .test("written", |_| all(&[1]).check(be_gt(0)))
        .test("not yet written", |_| pending())
        .ignored("switched off")
        .assert_outcome("not yet written", Outcome::Pending)
        .assert_outcome("switched off", Outcome::Ignored)
        .assert_summary(1, 0, 1, 1)
        .assert_custom(|report| {
            anyhow::ensure!(report.is_success(), "pending tests must not fail the run");
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_tag_selection_from_config() {
    Scenario::new("tag_selection")
        .with_config("[runner]\ninclude_tags = [\"smoke\"]\nexclude_tags = [\"flaky\"]\n")
        .test("login", |_| Ok(()))
        .tagged("smoke")
        .test("search", |_| Ok(()))
        .tagged("smoke")
        .tagged("flaky")
        .test("reports", |_| Ok(()))
        .assert_run_order(&["login"])
        .assert_not_reported("search")
        .assert_not_reported("reports")
        .run()
        .unwrap();
}

#[test]
fn test_name_filters_from_config() {
    Scenario::new("name_filters")
        .with_config("[runner]\ninclude_filters = [\"cart\"]\nexclude_filters = [\"slow\"]\n")
        .describe_it("cart", "adds items", |_| Ok(()))
        .describe_it("cart", "slow totals", |_| Ok(()))
        .test("profile", |_| Ok(()))
        .assert_run_order(&["cart adds items"])
        .run()
        .unwrap();
}

#[test]
fn test_fail_fast_stops_the_run() {
    Scenario::new("fail_fast")
        .with_config("[runner]\nfail_fast = true\n")
        .test("first", |_| Ok(()))
        .test("second", |_| all(&[0]).check(be_gt(0)))
        .test("third", |_| Ok(()))
        .assert_run_order(&["first", "second"])
        .assert_summary(1, 1, 0, 0)
        .run()
        .unwrap();
}

#[test]
fn test_bodies_may_panic_or_return_errors() {
    Scenario::new("body_failures")
        .test("panics", |_| panic!("unexpected state"))
        .test("io error", |_| {
            std::fs::read("/definitely/not/here")?;
            Ok(())
        })
        .assert_message_contains("panics", "unexpected state")
        .assert_message_contains("io error", "I/O error")
        .assert_summary(0, 2, 0, 0)
        .run()
        .unwrap();
}

#[test]
fn test_duplicate_names_are_rejected_at_registration() {
    let mut suite = Suite::new("dupes");
    suite.describe("cart", |s| s.it("adds", |_| Ok(())).map(|_| ())).unwrap();
    let err = suite
        .describe("cart", |s| s.it("adds", |_| Ok(())).map(|_| ()))
        .unwrap_err();
    assert!(err.to_string().contains("duplicate test name: cart adds"));

    let names = suite.names();
    no(&names).should(equal("adds"));
}

#[test]
fn test_scenarios_can_run_before_asserting() {
    Scenario::new("explicit_run")
        .test("only", |_| Ok(()))
        .run_suite()
        .assert_passed("only")
        .run()
        .unwrap();
}
