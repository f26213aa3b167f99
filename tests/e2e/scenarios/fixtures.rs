use crate::harness::{Scenario, WorkspaceRoot};
use behave_core::{all, be_lt, every, have_property, TempDirFixture};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[test]
fn test_fixtures_wrap_each_test_in_registration_order() {
    Scenario::new("fixture_order")
        .with_recording_fixture("outer")
        .with_recording_fixture("inner")
        .test("first", |_| Ok(()))
        .test("second", |_| Ok(()))
        .assert_log(&[
            "outer setup first",
            "inner setup first",
            "inner teardown first",
            "outer teardown first",
            "outer setup second",
            "inner setup second",
            "inner teardown second",
            "outer teardown second",
        ])
        .run()
        .unwrap();
}

#[test]
fn test_teardown_runs_when_the_body_fails() {
    Scenario::new("teardown_after_failure")
        .with_recording_fixture("guard")
        .test("broken", |_| all(&[5]).check(be_lt(1)))
        .test("exploding", |_| panic!("boom"))
        .assert_failed("broken")
        .assert_failed("exploding")
        .assert_log(&[
            "guard setup broken",
            "guard teardown broken",
            "guard setup exploding",
            "guard teardown exploding",
        ])
        .run()
        .unwrap();
}

#[test]
fn test_ignored_tests_skip_fixtures() {
    Scenario::new("ignored_skips_fixtures")
        .with_recording_fixture("guard")
        .ignored("skipped")
        .test("ran", |_| Ok(()))
        .assert_log(&["guard setup ran", "guard teardown ran"])
        .run()
        .unwrap();
}

#[test]
fn test_temp_dir_is_private_and_removed() {
    let seen: Rc<RefCell<Vec<PathBuf>>> = Rc::default();
    let recorded = Rc::clone(&seen);
    let checked = Rc::clone(&seen);

    Scenario::new("temp_dir")
        .with_temp_dir()
        .test("writes scratch files", move |ctx| {
            let dir = TempDirFixture::path(ctx)?.to_path_buf();
            for name in ["a.txt", "b.txt", "c.txt"] {
                fs::write(dir.join(name), name)?;
            }
            let files: Vec<PathBuf> = ["a.txt", "b.txt", "c.txt"]
                .iter()
                .map(|name| dir.join(name))
                .collect();
            every(&files).check(have_property("file"))?;
            recorded.borrow_mut().push(dir);
            Ok(())
        })
        .test("starts empty", |ctx| {
            let dir = TempDirFixture::path(ctx)?;
            assert_eq!(fs::read_dir(dir)?.count(), 0);
            Ok(())
        })
        .assert_summary(2, 0, 0, 0)
        .assert_custom(move |_| {
            let seen = checked.borrow();
            anyhow::ensure!(seen.len() == 1, "body did not record its temp dir");
            anyhow::ensure!(!seen[0].exists(), "temp dir survived teardown");
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_workspace_resources_reach_test_bodies() {
    Scenario::new("workspace_resources")
        .from_fixture("default")
        .test("reads fixture data", |ctx| {
            let root = &ctx.resource::<WorkspaceRoot>()?.0;
            let raw = fs::read_to_string(root.join("data/latencies.txt"))?;
            let latencies: Vec<u32> = raw.lines().filter_map(|l| l.parse().ok()).collect();
            assert_eq!(latencies.len(), 4);
            all(&latencies).check(be_lt(1000))
        })
        .test("missing resource", |ctx| {
            ctx.resource::<String>()?;
            Ok(())
        })
        .assert_passed("reads fixture data")
        .assert_failed("missing resource")
        .assert_message_contains("missing resource", "String")
        .run()
        .unwrap();
}
