use super::common::*;
use crate::cases::domain::CaseId;
use crate::cases::repository::{
    CaseRepository, InMemoryCaseHistory, JsonFileCaseHistory, RepositoryError,
};

fn ids(records: &[crate::cases::CaseRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
}

#[test]
fn saves_most_recent_first() {
    let history = InMemoryCaseHistory::new(5);
    history.save(record("CASE-A", "p1")).expect("save a");
    history.save(record("CASE-B", "p2")).expect("save b");
    history.save(record("CASE-C", "p3")).expect("save c");

    let recent = history.recent(10).expect("recent");
    assert_eq!(ids(&recent), vec!["CASE-C", "CASE-B", "CASE-A"]);
    assert_eq!(ids(&history.recent(2).expect("recent")), vec!["CASE-C", "CASE-B"]);
}

#[test]
fn saving_existing_id_replaces_in_place() {
    let history = InMemoryCaseHistory::new(5);
    history.save(record("CASE-A", "p1")).expect("save a");
    history.save(record("CASE-B", "p2")).expect("save b");
    history.save(record("CASE-A", "renamed")).expect("resave a");

    let recent = history.recent(10).expect("recent");
    assert_eq!(ids(&recent), vec!["CASE-B", "CASE-A"]);
    assert_eq!(recent[1].patient_id, "renamed");
}

#[test]
fn drops_oldest_beyond_limit() {
    let history = InMemoryCaseHistory::new(2);
    for id in ["CASE-A", "CASE-B", "CASE-C"] {
        history.save(record(id, "p")).expect("save");
    }

    assert_eq!(ids(&history.recent(10).expect("recent")), vec!["CASE-C", "CASE-B"]);
    assert!(history
        .fetch(&CaseId::from("CASE-A"))
        .expect("fetch")
        .is_none());
}

#[test]
fn zero_limit_is_raised_to_one() {
    let history = InMemoryCaseHistory::new(0);
    assert_eq!(history.limit(), 1);
}

#[test]
fn json_history_starts_empty_when_file_missing() {
    let path = scratch_path("history.json");
    let history = JsonFileCaseHistory::open(&path, 3).expect("open missing file");
    assert!(history.recent(10).expect("recent").is_empty());
    assert!(!path.exists());
}

#[test]
fn json_history_survives_reopen() {
    let path = scratch_path("history.json");
    {
        let history = JsonFileCaseHistory::open(&path, 2).expect("open");
        history.save(record("CASE-A", "p1")).expect("save a");
        history.save(record("CASE-B", "p2")).expect("save b");
        history.save(record("CASE-C", "p3")).expect("save c");
    }

    let reopened = JsonFileCaseHistory::open(&path, 2).expect("reopen");
    assert_eq!(ids(&reopened.recent(10).expect("recent")), vec!["CASE-C", "CASE-B"]);
    let fetched = reopened
        .fetch(&CaseId::from("CASE-B"))
        .expect("fetch")
        .expect("present");
    assert_eq!(fetched.patient_id, "p2");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_history_rejects_malformed_file() {
    let path = scratch_path("broken.json");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    std::fs::write(&path, b"{ not json").expect("write");

    let err = JsonFileCaseHistory::open(&path, 3).expect_err("malformed rejected");
    assert!(matches!(err, RepositoryError::Serialization(_)));

    let _ = std::fs::remove_file(&path);
}
