//! Scripted sessions driven end to end through the session runner.

use chrono::{TimeZone, Utc};
use eyecare::cli::{RunSummary, SessionRunner};
use eyecare::{Config, Session};

fn run_script(session: Session, script: &str) -> (RunSummary, String) {
    let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
    let mut runner = SessionRunner::new(session).with_fixed_now(now);
    let mut output = Vec::new();
    let summary = runner.run(script.as_bytes(), &mut output, None).unwrap();
    (summary, String::from_utf8(output).unwrap())
}

#[test]
fn lasik_day_seven_plan() {
    let script = "\
surgery LASIK 2024-01-01
plan
";
    let (summary, output) = run_script(Session::default(), script);

    assert!(summary.is_clean());
    assert!(output.contains("LASIK Surgery - Day 7"));
    assert!(output.contains("Today's Instructions (Day 7)"));
    assert!(output.contains("  Day 7: First follow-up appointment today"));
    assert!(output.contains("   14  Day 14: You may resume light exercise"));
    assert!(output.contains("   30  Day 30: Final check-up today"));
    assert!(!output.contains("    3  Day 3"));
}

#[test]
fn plan_without_surgery_reports_and_continues() {
    let script = "\
show /recovery-plan
plan
surgery Cataract 2024-01-01
show recovery-plan
";
    let (summary, output) = run_script(Session::default(), script);

    assert_eq!(summary.commands, 4);
    assert_eq!(summary.failures, 1);
    assert!(output.contains("Please enter your surgery details first."));
    assert!(output.contains("error: no surgery recorded yet"));
    assert!(output.contains("Cataract Surgery - Day 7"));
    assert!(output.contains("[Plan] | Reminders | Checklist | Progress"));
}

#[test]
fn second_intake_is_rejected() {
    let script = "\
surgery PRK 2024-01-05
surgery LASIK 2024-01-01
status
";
    let (summary, output) = run_script(Session::default(), script);

    assert_eq!(summary.failures, 1);
    assert!(output.contains("error: surgery already recorded for this session"));
    assert!(output.contains("Surgery:      PRK on 2024-01-05 (day 3)"));
    assert!(output.contains("Day 3: Continue following your recovery plan"));
}

#[test]
fn surgery_in_the_future_has_not_started() {
    let (summary, output) = run_script(Session::default(), "surgery ICL 2024-01-10\nplan\n");

    assert!(summary.is_clean());
    assert!(output.contains("ICL Surgery - Day -2"));
    assert!(output.contains("Your recovery plan starts in 3 days."));
    assert!(output.contains("No upcoming milestones"));
}

#[test]
fn tracking_a_day_of_recovery() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("post-op report.pdf");
    std::fs::write(&report, vec![b'x'; 3 * 1024]).unwrap();

    let script = format!(
        "\
# morning
surgery lasik 2024-01-01
take 1
toggle 1
symptom dryness --severity 2 --notes 'worse in the evening'
appointment 2024-01-15 09:00 'Two week check'
upload '{}'

# review
meds
checklist
symptoms
appointments
documents
quit
",
        report.display()
    );
    let (summary, output) = run_script(Session::default(), &script);

    assert!(summary.is_clean(), "{output}");
    assert!(output.contains("Last taken: Jan 8, 12:00 AM"));
    assert!(output.contains("[1] [x] DO   Wear sunglasses outdoors"));
    assert!(output.contains("[1] dryness    2/5  2024-01-08"));
    assert!(output.contains("      worse in the evening"));
    assert!(output.contains("[1] Two week check  2024-01-15 09:00"));
    assert!(output.contains("[1] post-op report.pdf"));
    assert!(output.contains("application/pdf  3.0 KB  blake3:"));
}

#[test]
fn oversized_upload_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let small = dir.path().join("small.txt");
    let large = dir.path().join("large.bin");
    std::fs::write(&small, b"ok").unwrap();
    std::fs::write(&large, vec![0u8; 64]).unwrap();

    let mut config = Config::default();
    config.documents.max_size_bytes = 16;
    let session = Session::from_config(&config).unwrap();

    let script = format!(
        "upload '{}' '{}'\ndocuments\n",
        small.display(),
        large.display()
    );
    let (summary, output) = run_script(session, &script);

    assert_eq!(summary.failures, 1);
    assert!(output.contains("over the 16 byte limit"));
    assert!(output.contains("No documents uploaded yet"));
}

#[test]
fn unseeded_session_starts_empty() {
    let mut config = Config::default();
    config.session.seed_defaults = false;
    let session = Session::from_config(&config).unwrap();

    let (summary, output) = run_script(session, "meds\nvideos\ntake 1\n");

    assert_eq!(summary.failures, 1);
    assert!(output.contains("No medications added yet"));
    assert!(output.contains("error: medication 1 not found"));
}

#[test]
fn configured_plan_entries_are_used() {
    let mut config = Config::default();
    config
        .plans
        .entry("prk".to_string())
        .or_default()
        .insert("7".to_string(), "Day 7: Bandage lens check".to_string());
    let session = Session::from_config(&config).unwrap();

    let (summary, output) = run_script(session, "surgery PRK 2024-01-01\n");

    assert!(summary.is_clean());
    assert!(output.contains("  Day 7: Bandage lens check"));
}
