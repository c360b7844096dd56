//! Integration tests for the `unlock-schedule` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the generate and
//! verify subcommands through the actual binary, including stdin/stdout
//! piping, file output, environment configuration, and error exits.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER: &str = "Interval,Start,End,Sun,Mon,Tue,Wed,Thu,Fri,Sat,Holidays";

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("unlock-schedule-test-{}", name));
    let _ = std::fs::remove_file(&path);
    path
}

/// The binary with a fixed week and no configuration leaking in from the
/// environment.
fn unlock() -> Command {
    let mut cmd = Command::cargo_bin("unlock-schedule").unwrap();
    for var in [
        "HMS_UNLOCK_TZ",
        "HMS_UNLOCK_PAD_BEFORE_MIN",
        "HMS_UNLOCK_PAD_AFTER_MIN",
        "HMS_UNLOCK_OPTIMIZE",
        "HMS_UNLOCK_MAX_INTERVALS",
        "HMS_UNLOCK_OUTPUT_CSV",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn generate_week(cmd: &mut Command) -> &mut Command {
    cmd.args(["generate", "--start-date", "2026-01-04"])
}

// ─────────────────────────────────────────────────────────────────────────────
// Generate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn generate_naive_csv_from_file() {
    let expected = format!(
        "{}\n\
         1,0800,1200,0,1,0,0,0,0,0,0\n\
         2,0800,1400,0,0,0,1,0,0,0,0\n\
         3,1000,1400,0,0,1,0,0,0,0,0\n\
         4,0000,0000,0,0,0,0,0,0,0,0\n\
         5,0000,0000,0,0,0,0,0,0,0,0\n\
         6,0000,0000,0,0,0,0,0,0,0,0\n\
         7,0000,0000,0,0,0,0,0,0,0,0\n\
         8,0000,0000,0,0,0,0,0,0,0,0\n",
        HEADER
    );

    generate_week(&mut unlock())
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success()
        .stdout(expected)
        .stderr(predicate::str::contains("3 of 8 rows used (naive builder)"))
        .stderr(predicate::str::contains("0800-1400  ---Wed---"));
}

#[test]
fn generate_reads_stdin() {
    let events = std::fs::read_to_string(fixture("staggered.json")).unwrap();

    generate_week(&mut unlock())
        .write_stdin(events)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(HEADER))
        .stdout(predicate::str::contains("1,0800,1200,0,1,0,0,0,0,0,0"));
}

#[test]
fn optimize_flag_shares_rules_across_days() {
    generate_week(&mut unlock().arg("--optimize"))
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,0800,1200,0,1,0,1,0,0,0,0"))
        .stdout(predicate::str::contains("2,1000,1400,0,0,1,1,0,0,0,0"))
        .stderr(predicate::str::contains("2 of 8 rows used (optimized builder)"));
}

#[test]
fn optimize_can_come_from_environment() {
    generate_week(unlock().env("HMS_UNLOCK_OPTIMIZE", "1"))
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success()
        .stderr(predicate::str::contains("optimized builder"));
}

#[test]
fn padding_widens_every_window() {
    generate_week(unlock().args(["--pad-before", "30"]))
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,0730,1200,0,1,0,0,0,0,0,0"))
        .stdout(predicate::str::contains("2,0730,1400,0,0,0,1,0,0,0,0"))
        .stdout(predicate::str::contains("3,0930,1400,0,0,1,0,0,0,0,0"));
}

#[test]
fn max_intervals_sets_table_size() {
    let output = generate_week(unlock().env("HMS_UNLOCK_MAX_INTERVALS", "4"))
        .args(["-i", &fixture("staggered.json")])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1 + 4);
}

#[test]
fn calendar_page_skips_all_day_and_out_of_window_events() {
    generate_week(&mut unlock())
        .args(["-i", &fixture("calendar_page.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,1000,1200,1,0,0,0,0,0,0,0"))
        .stdout(predicate::str::contains("2,1800,1930,0,0,0,0,1,0,0,0"))
        .stdout(predicate::str::contains("3,0000,0000,0,0,0,0,0,0,0,0"))
        .stderr(predicate::str::contains("2 of 8 rows used"));
}

#[test]
fn json_format_emits_row_objects() {
    let output = generate_week(&mut unlock())
        .args(["-i", &fixture("staggered.json"), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["Interval"], 1);
    assert_eq!(rows[0]["Start"], "0800");
    assert_eq!(rows[0]["End"], "1200");
    assert_eq!(rows[0]["Mon"], 1);
    assert_eq!(rows[0]["Tue"], 0);
    assert_eq!(rows[7]["Holidays"], 0);
}

#[test]
fn custom_day_names_rename_columns() {
    generate_week(unlock().args(["--day-names", "Su,Mo,Tu,We,Th,Fr,Sa"]))
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Interval,Start,End,Su,Mo,Tu,We,Th,Fr,Sa,Holidays\n",
        ))
        .stderr(predicate::str::contains("0800-1200  -Mo-----"));
}

#[test]
fn output_path_from_environment() {
    let path = temp_path("env-output.csv");

    generate_week(unlock().env("HMS_UNLOCK_OUTPUT_CSV", &path))
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&path).expect("output file must exist");
    assert!(content.starts_with(HEADER));
    assert_eq!(content.lines().count(), 9);
    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Verify subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn verify_accepts_generated_table() {
    let path = temp_path("verify-ok.csv");
    generate_week(&mut unlock())
        .args(["-i", &fixture("staggered.json"), "-o"])
        .arg(&path)
        .assert()
        .success();

    unlock()
        .args(["verify", "--start-date", "2026-01-04", "--rows"])
        .arg(&path)
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 3 rows reproduce 840 unlocked minutes"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn verify_rejects_table_that_opens_too_long() {
    let path = temp_path("verify-bad.csv");
    let mut table = format!(
        "{}\n1,0800,1201,0,1,0,0,0,0,0,0\n2,0800,1400,0,0,0,1,0,0,0,0\n3,1000,1400,0,0,1,0,0,0,0,0\n",
        HEADER
    );
    for index in 4..=8 {
        table.push_str(&format!("{},0000,0000,0,0,0,0,0,0,0,0\n", index));
    }
    std::fs::write(&path, table).unwrap();

    unlock()
        .args(["verify", "--start-date", "2026-01-04", "--rows"])
        .arg(&path)
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template does not match the events"))
        .stderr(predicate::str::contains("Mon 12:00 required=0 simulated=1"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn verify_rejects_table_larger_than_controller() {
    let path = temp_path("verify-oversized.csv");
    generate_week(unlock().args(["--max-intervals", "12"]))
        .args(["-i", &fixture("staggered.json"), "-o"])
        .arg(&path)
        .assert()
        .success();

    unlock()
        .args(["verify", "--start-date", "2026-01-04", "--rows"])
        .arg(&path)
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("has 12 rows, but the controller holds exactly 8"));

    unlock()
        .args(["--max-intervals", "12", "verify", "--start-date", "2026-01-04", "--rows"])
        .arg(&path)
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .success();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn verify_rejects_malformed_csv() {
    let path = temp_path("verify-malformed.csv");
    std::fs::write(&path, "Start,End\n0800,1200\n").unwrap();

    unlock()
        .args(["verify", "--rows"])
        .arg(&path)
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected CSV header"));
    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn week_over_budget_fails_with_window_list() {
    generate_week(&mut unlock())
        .args(["-i", &fixture("nine_disjoint.json")])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to build unlock template"))
        .stderr(predicate::str::contains("requires at least 9 time windows"));
}

#[test]
fn unknown_timezone_fails() {
    generate_week(unlock().args(["--tz", "Mars/Olympus_Mons"]))
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mars/Olympus_Mons"));
}

#[test]
fn invalid_day_names_fail() {
    generate_week(unlock().args(["--day-names", "A,B,C"]))
        .args(["-i", &fixture("staggered.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --day-names"));
}

#[test]
fn day_names_cannot_shadow_fixed_columns() {
    generate_week(unlock().args(["--day-names", "Sun,Mon,Tue,Wed,Thu,Fri,Holidays"]))
        .args(["-i", &fixture("staggered.json"), "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid --day-names"));
}

#[test]
fn malformed_events_fail() {
    generate_week(&mut unlock())
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse events JSON"));
}

#[test]
fn missing_input_file_fails() {
    generate_week(&mut unlock())
        .args(["-i", "/nonexistent/events.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn conflicting_week_flags_are_rejected() {
    unlock()
        .args(["generate", "--start-date", "2026-01-04", "--next-sunday"])
        .assert()
        .failure();
}

#[test]
fn next_sunday_window_runs() {
    unlock()
        .args(["generate", "--next-sunday"])
        .write_stdin("[]")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(HEADER))
        .stderr(predicate::str::contains("0 of 8 rows used"));
}
