use chrono::NaiveDate;
use ritual_core::ledger::section::DEFAULT_TABLE_HEADER;
use ritual_core::{
    DuplicateReason, EnrollOutcome, EnrollmentService, ErrorKind, FileLedgerRepository, Handle,
    SectionMarkers,
};
use std::fs;
use std::path::Path;

const PREAMBLE: &str = "# BuffTeks\n\nWelcome, contributors!\n\n## Hall\n";
const TRAILER: &str = "\n---\n\n## License\nMIT\n";

fn markers() -> SectionMarkers {
    SectionMarkers {
        heading: "## Hall".to_string(),
        ..SectionMarkers::default()
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date")
}

fn handle(raw: &str) -> Handle {
    Handle::parse(raw).expect("valid handle")
}

fn service(path: &Path) -> EnrollmentService<FileLedgerRepository> {
    EnrollmentService::new(
        FileLedgerRepository::new(path),
        markers(),
        "https://github.com",
    )
}

fn write_ledger(dir: &Path, table_rows: &str) -> std::path::PathBuf {
    let path = dir.join("README.md");
    fs::write(
        &path,
        format!("{PREAMBLE}{DEFAULT_TABLE_HEADER}{table_rows}{TRAILER}"),
    )
    .unwrap();
    path
}

#[test]
fn enrolls_first_contributor_into_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(dir.path(), "");

    let outcome = service(&path)
        .enroll(&handle("octocat"), "The Octocat", date(1))
        .unwrap();

    let expected_row = "| The Octocat | [@octocat](https://github.com/octocat) | 2024-01-01 |\n";
    match outcome {
        EnrollOutcome::Enrolled { entry, row } => {
            assert_eq!(row, expected_row);
            assert_eq!(entry.handle.as_str(), "octocat");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        format!("{PREAMBLE}{DEFAULT_TABLE_HEADER}{expected_row}{TRAILER}")
    );

    let roster = service(&path).roster().unwrap();
    assert_eq!(roster.rows.len(), 1);
}

#[test]
fn second_enrollment_of_same_handle_is_a_byte_identical_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(dir.path(), "");
    let service = service(&path);

    service
        .enroll(&handle("octocat"), "The Octocat", date(1))
        .unwrap();
    let after_first = fs::read(&path).unwrap();

    let outcome = service
        .enroll(&handle("OctoCat"), "Another Name", date(2))
        .unwrap();

    assert_eq!(outcome.kind(), Some(ErrorKind::DuplicateEntry));
    assert!(matches!(
        outcome,
        EnrollOutcome::AlreadyEnrolled {
            reason: DuplicateReason::HandleMentioned,
            ..
        }
    ));
    assert_eq!(fs::read(&path).unwrap(), after_first);
}

#[test]
fn rows_keep_insertion_order_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(
        dir.path(),
        "| Legacy Member | [@legacy](https://github.com/legacy) | 2020-05-01 |\n",
    );
    let handles = ["zed-one", "amy-two", "mid-three"];

    for (offset, raw) in handles.iter().enumerate() {
        service(&path)
            .enroll(&handle(raw), "Some Person", date(offset as u32 + 1))
            .unwrap();
    }

    let roster = service(&path).roster().unwrap();
    let listed: Vec<String> = roster
        .entries()
        .into_iter()
        .map(|entry| entry.handle.to_string())
        .collect();
    assert_eq!(listed, vec!["legacy", "zed-one", "amy-two", "mid-three"]);
}

#[test]
fn content_outside_section_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(
        dir.path(),
        "| Ann Li | [@annli](https://github.com/annli) | 2023-02-03 |\n\n",
    );
    let before = fs::read_to_string(&path).unwrap();
    let table_start = before.find(DEFAULT_TABLE_HEADER).unwrap();
    let section_end = before.find(TRAILER).unwrap();

    service(&path)
        .enroll(&handle("bobray"), "Bob Ray", date(4))
        .unwrap();
    let after = fs::read_to_string(&path).unwrap();

    assert_eq!(&after[..table_start], &before[..table_start]);
    assert!(after.ends_with(&before[section_end..]));
    assert!(after.contains(
        "| Ann Li | [@annli](https://github.com/annli) | 2023-02-03 |\n| Bob Ray | [@bobray](https://github.com/bobray) | 2024-01-04 |\n"
    ));
}

#[test]
fn pipe_in_name_is_escaped_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(dir.path(), "");

    service(&path)
        .enroll(&handle("janedoe"), "Jane | Doe", date(1))
        .unwrap();

    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("| Jane \\| Doe | [@janedoe]"));
    let entries = service(&path).roster().unwrap().entries();
    assert_eq!(entries[0].display_name, "Jane | Doe");
}

#[test]
fn missing_section_fails_without_touching_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("README.md");
    let original = "# Project\n\nNo hall here.\n";
    fs::write(&path, original).unwrap();

    let err = service(&path)
        .enroll(&handle("octocat"), "The Octocat", date(1))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SectionNotFound);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn missing_table_header_is_reported_separately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("README.md");
    fs::write(&path, "## Hall\n| Name | GitHub |\n| --- | --- |\n---\n").unwrap();

    let err = service(&path)
        .enroll(&handle("octocat"), "The Octocat", date(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TableNotFound);
}

#[test]
fn missing_document_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("README.md");

    let err = service(&path)
        .enroll(&handle("octocat"), "The Octocat", date(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DocumentNotFound);
    assert!(!path.exists());
}
