use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use std::fs;

mod common;
use common::{TestDb, init_with_roster};

fn json_stdout(t: &TestDb, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = t.cmd(&full).output().expect("run rollcall");
    assert!(output.status.success(), "{args:?} failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

#[test]
fn test_init_creates_all_databases() {
    let t = TestDb::new();

    t.cmd(&["--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(t.dir.path().join("rollcall.sqlite").exists());
    assert!(t.dir.path().join("rollcall-records.sqlite").exists());
    assert!(t.dir.path().join("rollcall-live.sqlite").exists());
}

#[test]
fn test_checkin_live_and_checkout() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["checkin", "1", "10"])
        .assert()
        .success()
        .stdout(contains("Person 10 checked in to event 1"));
    t.cmd(&["checkin", "1", "30"]).assert().success();
    assert!(
        t.dir
            .path()
            .join("rollcall-live.locks")
            .join("event-1.lock")
            .exists()
    );

    t.cmd(&["live", "1"])
        .assert()
        .success()
        .stdout(contains("Ada Lovelace").and(contains("Grace Hopper")));

    t.cmd(&["checkout", "1", "30"]).assert().success();

    let live = json_stdout(&t, &["live", "1"]);
    assert_eq!(live["count"], 1);
    assert_eq!(live["checkedIn"], serde_json::json!([10]));
}

#[test]
fn test_checkout_of_absent_person_fails_with_exit_code_3() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["checkout", "1", "20"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("not checked in"));
}

#[test]
fn test_unknown_event_fails_with_exit_code_2() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["checkin", "42", "10"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Event 42 not found"));

    t.cmd(&["checkin", "1", "99"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Person 99 not found"));
}

#[test]
fn test_finalize_scenario_through_cli() {
    let t = TestDb::new();
    init_with_roster(&t);

    for p in ["10", "20", "30"] {
        t.cmd(&["checkin", "1", p]).assert().success();
    }
    t.cmd(&["checkout", "1", "20"]).assert().success();

    let status = json_stdout(&t, &["attendance", "1"]);
    assert_eq!(status["status"], "in_progress");

    let first = json_stdout(&t, &["finalize", "1"]);
    assert_eq!(first["registeredSaved"], serde_json::json!([10, 20]));
    assert_eq!(first["walkInsLogged"], serde_json::json!([30]));
    assert_eq!(first["totalAttendees"], 3);

    let second = json_stdout(&t, &["finalize", "1"]);
    assert_eq!(second, first);

    let view = json_stdout(&t, &["finalized", "1"]);
    assert_eq!(view["status"], "finalized");
    assert_eq!(view["totalRegistered"], 2);
    assert_eq!(view["totalWalkIns"], 1);
    assert_eq!(view["walkIns"][0]["firstName"], "Grace");

    t.cmd(&["attendance", "1"])
        .assert()
        .success()
        .stdout(contains("[finalized]").and(contains("walk-in")));
}

#[test]
fn test_attendance_not_started() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["attendance", "1"])
        .assert()
        .success()
        .stdout(contains("[not_started]"));
}

#[test]
fn test_event_custom_fields() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["event", "1", "--field", "capacity=120", "--field", "catering=pizza"])
        .assert()
        .success()
        .stdout(contains("capacity = 120"));

    let event = json_stdout(&t, &["event", "1", "--unset", "catering"]);
    assert_eq!(event["eventID"], 1);
    assert_eq!(event["name"], "Kickoff");
    assert_eq!(event["customFields"]["capacity"], 120);
    assert!(event["customFields"].get("catering").is_none());

    t.cmd(&["event", "1", "--clear-fields"])
        .assert()
        .success()
        .stdout(contains("No custom fields"));
}

#[test]
fn test_export_csv_and_json() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["checkin", "1", "10"]).assert().success();
    t.cmd(&["checkin", "1", "30"]).assert().success();
    t.cmd(&["finalize", "1"]).assert().success();

    let csv_path = t.out_file("attendance.csv");
    t.cmd(&["export", "1", "--format", "csv", "--file", &csv_path])
        .assert()
        .success();
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("event_id,person_id,first_name,last_name,kind,check_in_time"));
    assert!(csv.contains("1,10,Ada,Lovelace,registered,"));
    assert!(csv.contains("1,30,Grace,Hopper,walk_in,"));

    let json_path = t.out_file("attendance.json");
    t.cmd(&["export", "1", "--format", "json", "--file", &json_path])
        .assert()
        .success();
    let exported: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported["totalAttendees"], 2);

    // existing file, declined overwrite
    t.cmd(&["export", "1", "--format", "json", "--file", &json_path])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("kept the existing attendance export"));

    t.cmd(&["export", "1", "--format", "json", "--file", &json_path, "--force"])
        .assert()
        .success();
}

#[test]
fn test_log_print_and_grep() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["checkin", "1", "10"]).assert().success();

    t.cmd(&["log", "--print"])
        .assert()
        .success()
        .stdout(contains("init").and(contains("roster_register")));

    let entries = json_stdout(&t, &["log", "--print", "--grep", "^checkin$"]);
    let entries = entries.as_array().expect("array of log rows");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["target"], "event 1");
}

#[test]
fn test_roster_validation_errors() {
    let t = TestDb::new();
    init_with_roster(&t);

    t.cmd(&["roster", "event", "Annex", "2025-13-01", "10:00"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Invalid date"));

    t.cmd(&["roster", "event", "Annex", "2025-10-01", "25:99"])
        .assert()
        .failure()
        .stderr(contains("Invalid time"));

    t.cmd(&["roster", "register", "1", "99"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_config_print_shows_effective_paths() {
    let t = TestDb::new();

    t.cmd(&["config", "--print"])
        .assert()
        .success()
        .stdout(contains(t.db.as_str()).and(contains("live_backend: sqlite")));
}
