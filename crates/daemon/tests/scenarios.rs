// SPDX-License-Identifier: MIT

//! Black-box acceptance tests for spec.md §8's six concrete scenarios.
//! Each spawns the real pipeline via `pmjq_daemon::run` against a
//! `tempdir` and asserts on final filesystem state, grounded in the
//! teacher's `tests/specs/*.rs` black-box test module shape (spec.md's
//! daemon has no subcommands to drive with `assert_cmd`, so these call
//! the `run()` entry point in-process instead).

use pmjq_core::{DirPattern, DirTemplate, TransitionConfig};
use pmjq_daemon::{run, Config, DaemonError};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn config_with(
    input_patterns: Vec<DirPattern>,
    output_templates: Vec<DirTemplate>,
    error_templates: Vec<DirTemplate>,
    invariant_template: Option<String>,
    cmd: &str,
    quit_when_empty: bool,
) -> TransitionConfig {
    TransitionConfig {
        input_patterns: Arc::new(input_patterns),
        output_templates: Arc::new(output_templates),
        error_templates: Arc::new(error_templates),
        log_template: None,
        invariant_template: invariant_template.map(Arc::new),
        cmd_template: Arc::new(cmd.to_string()),
        quit_when_empty,
    }
}

/// Fast-poll ambient config so tests don't wait out the real 3s default.
fn fast_config(nb_slots: usize) -> Config {
    Config {
        poll_interval: Duration::from_millis(10),
        ..Config::from_env(nb_slots, None, None)
    }
}

#[tokio::test]
async fn scenario_1_single_input_output_happy_path() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("in");
    let out_dir = dir.path().join("out");
    tokio::fs::create_dir(&in_dir).await.unwrap();
    tokio::fs::create_dir(&out_dir).await.unwrap();
    tokio::fs::write(in_dir.join("foo"), b"hello\n").await.unwrap();

    let config = config_with(
        vec![DirPattern::parse(&format!("{}/.*", in_dir.display())).unwrap()],
        vec![DirTemplate::parse(&format!("{}/", out_dir.display()), "{{.Input 0}}").unwrap()],
        vec![],
        None,
        "cat",
        true,
    );

    let result = tokio::time::timeout(Duration::from_secs(5), run(config, fast_config(2)))
        .await
        .unwrap();
    assert!(result.is_ok());

    assert_eq!(
        tokio::fs::read(out_dir.join("foo")).await.unwrap(),
        b"hello\n"
    );
    assert!(tokio::fs::metadata(in_dir.join("foo")).await.is_err());
    assert!(tokio::fs::metadata(in_dir.join("foo.lock")).await.is_err());
    assert!(tokio::fs::metadata(out_dir.join("foo.lock")).await.is_err());
}

#[tokio::test]
async fn scenario_2_transient_contention_only_one_daemon_wins() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("in");
    let out_dir = dir.path().join("out");
    tokio::fs::create_dir(&in_dir).await.unwrap();
    tokio::fs::create_dir(&out_dir).await.unwrap();
    tokio::fs::write(in_dir.join("a"), b"shared\n").await.unwrap();

    let build = || {
        config_with(
            vec![DirPattern::parse(&format!("{}/.*", in_dir.display())).unwrap()],
            vec![DirTemplate::parse(&format!("{}/", out_dir.display()), "{{.Input 0}}").unwrap()],
            vec![],
            None,
            "cat",
            // `--quit-when-empty` on both: neither daemon is told in
            // advance which of them will win the race for `in/a`, so both
            // must independently observe the queue drain and exit 0 —
            // including whichever one loses the lock race, or whose input
            // vanishes out from under it after the other daemon wins
            // (spec.md §4.2 steps 5/6, §7). A Locker that busy-retries a
            // contended/vanished-input transition instead of dropping it
            // and returning to DirLister would leave the loser hanging
            // here forever instead of reaching an empty queue.
            true,
        )
    };

    let daemon_a = tokio::spawn(run(build(), fast_config(1)));
    let daemon_b = tokio::spawn(run(build(), fast_config(1)));

    let (result_a, result_b) = tokio::join!(
        tokio::time::timeout(Duration::from_secs(5), daemon_a),
        tokio::time::timeout(Duration::from_secs(5), daemon_b),
    );
    assert!(
        result_a
            .expect("daemon A must return to discovery and quit, not hang")
            .unwrap()
            .is_ok(),
        "daemon A should exit 0 once the queue drains"
    );
    assert!(
        result_b
            .expect("daemon B must return to discovery and quit, not hang")
            .unwrap()
            .is_ok(),
        "daemon B should exit 0 once the queue drains"
    );

    assert_eq!(
        tokio::fs::read(out_dir.join("a")).await.unwrap(),
        b"shared\n"
    );
    assert!(tokio::fs::metadata(in_dir.join("a")).await.is_err());
    assert!(tokio::fs::metadata(in_dir.join("a.lock")).await.is_err());
    assert!(tokio::fs::metadata(out_dir.join("a.lock")).await.is_err());
}

#[tokio::test]
async fn scenario_3_invariant_grouping_filters_mismatched_tuples() {
    let dir = tempdir().unwrap();
    let left_dir = dir.path().join("left");
    let right_dir = dir.path().join("right");
    let out_dir = dir.path().join("out");
    tokio::fs::create_dir(&left_dir).await.unwrap();
    tokio::fs::create_dir(&right_dir).await.unwrap();
    tokio::fs::create_dir(&out_dir).await.unwrap();

    tokio::fs::write(left_dir.join("a.l"), b"left-a\n").await.unwrap();
    tokio::fs::write(left_dir.join("b.l"), b"left-b\n").await.unwrap();
    tokio::fs::write(right_dir.join("a.r"), b"right-a\n").await.unwrap();
    tokio::fs::write(right_dir.join("c.r"), b"right-c\n").await.unwrap();

    let config = config_with(
        vec![
            DirPattern::parse(&format!(r"{}/(?P<k>[a-z]+)\.l", left_dir.display())).unwrap(),
            DirPattern::parse(&format!(r"{}/(?P<k>[a-z]+)\.r", right_dir.display())).unwrap(),
        ],
        vec![DirTemplate::parse(
            &format!("{}/{{{{.NamedMatches.k}}}}", out_dir.display()),
            "{{.Input 0}}",
        )
        .unwrap()],
        vec![],
        Some("{{.NamedMatches.k}}".to_string()),
        "true",
        true,
    );

    let result = tokio::time::timeout(Duration::from_secs(5), run(config, fast_config(2)))
        .await
        .unwrap();
    assert!(result.is_ok());

    // Only the (a.l, a.r) tuple shares an invariant and gets processed.
    assert!(tokio::fs::metadata(out_dir.join("a")).await.is_ok());
    assert!(tokio::fs::metadata(left_dir.join("a.l")).await.is_err());
    assert!(tokio::fs::metadata(right_dir.join("a.r")).await.is_err());

    // b.l and c.r never agree on an invariant, so they're never consumed.
    assert!(tokio::fs::metadata(left_dir.join("b.l")).await.is_ok());
    assert!(tokio::fs::metadata(right_dir.join("c.r")).await.is_ok());
}

#[tokio::test]
async fn scenario_4_failure_with_quarantine() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("in");
    let out_dir = dir.path().join("out");
    let err_dir = dir.path().join("err");
    tokio::fs::create_dir(&in_dir).await.unwrap();
    tokio::fs::create_dir(&out_dir).await.unwrap();
    tokio::fs::create_dir(&err_dir).await.unwrap();
    tokio::fs::write(in_dir.join("bad"), b"oops\n").await.unwrap();

    let config = config_with(
        vec![DirPattern::parse(&format!("{}/.*", in_dir.display())).unwrap()],
        vec![DirTemplate::parse(&format!("{}/", out_dir.display()), "{{.Input 0}}").unwrap()],
        vec![DirTemplate::parse(&format!("{}/", err_dir.display()), "{{.Input 0}}").unwrap()],
        None,
        "false",
        true,
    );

    let result = tokio::time::timeout(Duration::from_secs(5), run(config, fast_config(2)))
        .await
        .unwrap();
    assert!(result.is_ok());

    assert!(tokio::fs::metadata(in_dir.join("bad")).await.is_err());
    assert!(tokio::fs::metadata(err_dir.join("bad")).await.is_ok());
    assert!(tokio::fs::metadata(out_dir.join("bad")).await.is_err());
    assert!(tokio::fs::metadata(in_dir.join("bad.lock")).await.is_err());
}

#[tokio::test]
async fn scenario_5_stale_lock_is_recovered_and_the_input_is_processed() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("in");
    let out_dir = dir.path().join("out");
    tokio::fs::create_dir(&in_dir).await.unwrap();
    tokio::fs::create_dir(&out_dir).await.unwrap();
    tokio::fs::write(in_dir.join("x"), b"hi\n").await.unwrap();
    // A frozen lock, as if its holder died without ever refreshing it.
    tokio::fs::write(in_dir.join("x.lock"), b"dead-holder 17")
        .await
        .unwrap();

    let config = config_with(
        vec![DirPattern::parse(&format!("{}/.*", in_dir.display())).unwrap()],
        vec![DirTemplate::parse(&format!("{}/", out_dir.display()), "{{.Input 0}}").unwrap()],
        vec![],
        None,
        "cat",
        true,
    );

    // Shrink the quiescence window so the test doesn't wait out the real
    // 120 s default — the mechanism under test (compare-then-delete after
    // a fixed window) is identical at any window size.
    let mut ambient = fast_config(2);
    ambient.lock_timing.stale_after = Duration::from_millis(80);
    ambient.lock_timing.refresh = Duration::from_secs(30);

    let result = tokio::time::timeout(Duration::from_secs(5), run(config, ambient))
        .await
        .unwrap();
    assert!(result.is_ok());

    assert_eq!(tokio::fs::read(out_dir.join("x")).await.unwrap(), b"hi\n");
    assert!(tokio::fs::metadata(in_dir.join("x")).await.is_err());
    assert!(tokio::fs::metadata(in_dir.join("x.lock")).await.is_err());
}

#[tokio::test]
async fn scenario_6_quit_when_empty_exits_zero_on_an_empty_queue() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("in");
    let out_dir = dir.path().join("out");
    tokio::fs::create_dir(&in_dir).await.unwrap();
    tokio::fs::create_dir(&out_dir).await.unwrap();

    let config = config_with(
        vec![DirPattern::parse(&format!("{}/.*", in_dir.display())).unwrap()],
        vec![DirTemplate::parse(&format!("{}/", out_dir.display()), "{{.Input 0}}").unwrap()],
        vec![],
        None,
        "cat",
        true,
    );

    let result = tokio::time::timeout(Duration::from_secs(1), run(config, fast_config(1)))
        .await
        .unwrap();
    assert!(matches!(result, Ok(())));
}

#[tokio::test]
async fn worker_failure_with_no_error_templates_aborts_the_daemon() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("in");
    let out_dir = dir.path().join("out");
    tokio::fs::create_dir(&in_dir).await.unwrap();
    tokio::fs::create_dir(&out_dir).await.unwrap();
    tokio::fs::write(in_dir.join("bad"), b"hello\n").await.unwrap();

    let config = config_with(
        vec![DirPattern::parse(&format!("{}/.*", in_dir.display())).unwrap()],
        vec![DirTemplate::parse(&format!("{}/", out_dir.display()), "{{.Input 0}}").unwrap()],
        vec![],
        None,
        "false",
        false,
    );

    let result = tokio::time::timeout(Duration::from_secs(5), run(config, fast_config(2)))
        .await
        .unwrap();
    assert!(matches!(result, Err(DaemonError::WorkerFatal(_))));
    assert!(tokio::fs::metadata(in_dir.join("bad")).await.is_ok());
}
