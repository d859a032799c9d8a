// crates/cohort-screen-cli/tests/loader.rs
// ============================================================================
// Module: Patient Loader Tests
// Description: CSV ingest and derived-field tests with filesystem fixtures.
// Purpose: Ensure profiles carry derived fields and never default missing data.
// Dependencies: cohort-screen-cli, cohort-screen-config, cohort-screen-core, tempfile
// ============================================================================
//! ## Overview
//! Validates demographics ingest, derived-field synthesis (age, BMI,
//! pack-years), latest-lab selection, note attachment, and missing-cell
//! handling.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use cohort_screen_cli::load_profiles;
use cohort_screen_config::parse_iso_date;
use cohort_screen_core::FieldValue;
use cohort_screen_core::PatientProfile;
use serde_json::Number;
use tempfile::TempDir;

const PATIENTS_CSV: &str = concat!(
    "patient_id,date_of_birth,gender,is_smoker,height_cm,weight_kg,cigs_per_day,years_smoked\n",
    "patient_C001,2000-01-01,F,false,175,80,,\n",
    "patient_C004,1965-03-20,M,true,170,101.7,20,10\n",
    "patient_C007,,,,,,,\n",
);

const LABS_CSV: &str = concat!(
    "patient_id,lab_test_name,value,unit,observation_date\n",
    "patient_C001,HbA1c,7.2,%,2024-01-10\n",
    "patient_C001,HbA1c,7.9,%,2024-03-15\n",
    "patient_C004,HbA1c,9.1,%,2024-02-02\n",
    "patient_C999,HbA1c,5.0,%,2024-02-02\n",
);

fn fixture() -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let patients_csv = dir.path().join("patients.csv");
    let labs_csv = dir.path().join("lab_results.csv");
    let notes_dir = dir.path().join("clinical_notes");
    fs::write(&patients_csv, PATIENTS_CSV).unwrap();
    fs::write(&labs_csv, LABS_CSV).unwrap();
    fs::create_dir(&notes_dir).unwrap();
    fs::write(
        notes_dir.join("patient_C001.txt"),
        "Non-smoker for over ten years.\nNo signs of CHF.\n",
    )
    .unwrap();
    (dir, patients_csv, labs_csv, notes_dir)
}

fn load(patients_csv: &Path, labs_csv: &Path, notes_dir: &Path) -> Vec<PatientProfile> {
    let evaluation_date = parse_iso_date("2024-05-01").unwrap();
    load_profiles(patients_csv, labs_csv, notes_dir, evaluation_date).unwrap()
}

// ============================================================================
// SECTION: Derived Fields
// ============================================================================

/// Verifies derived fields and latest-lab selection for a full row.
#[test]
fn loader_builds_enriched_profiles() {
    let (_dir, patients_csv, labs_csv, notes_dir) = fixture();
    let profiles = load(&patients_csv, &labs_csv, &notes_dir);

    assert_eq!(profiles.len(), 3);
    let first = &profiles[0];
    assert_eq!(first.patient_id.as_str(), "patient_C001");
    assert_eq!(first.field("age"), Some(&FieldValue::from(24_i64)));
    assert_eq!(first.field("gender"), Some(&FieldValue::from("F")));
    assert_eq!(first.field("is_smoker"), Some(&FieldValue::Bool(false)));
    assert_eq!(
        first.field("BMI"),
        Some(&FieldValue::Number(Number::from_f64(26.1).unwrap()))
    );
    assert_eq!(
        first.field("HbA1c"),
        Some(&FieldValue::Number(Number::from_f64(7.9).unwrap()))
    );
    assert_eq!(first.field("pack_years"), None);
}

/// Verifies pack-years derivation when smoking data is present.
#[test]
fn loader_derives_pack_years() {
    let (_dir, patients_csv, labs_csv, notes_dir) = fixture();
    let profiles = load(&patients_csv, &labs_csv, &notes_dir);

    let smoker = &profiles[1];
    assert_eq!(smoker.patient_id.as_str(), "patient_C004");
    assert_eq!(
        smoker.field("pack_years"),
        Some(&FieldValue::Number(Number::from_f64(10.0).unwrap()))
    );
    assert_eq!(
        smoker.field("BMI"),
        Some(&FieldValue::Number(Number::from_f64(35.2).unwrap()))
    );
}

/// Verifies missing cells stay absent instead of defaulting.
#[test]
fn loader_keeps_missing_cells_absent() {
    let (_dir, patients_csv, labs_csv, notes_dir) = fixture();
    let profiles = load(&patients_csv, &labs_csv, &notes_dir);

    let sparse = &profiles[2];
    assert_eq!(sparse.patient_id.as_str(), "patient_C007");
    assert!(sparse.fields.is_empty());
    assert!(!sparse.has_note());
}

// ============================================================================
// SECTION: Notes and Labs
// ============================================================================

/// Verifies note files attach by patient identifier.
#[test]
fn loader_attaches_notes() {
    let (_dir, patients_csv, labs_csv, notes_dir) = fixture();
    let profiles = load(&patients_csv, &labs_csv, &notes_dir);

    let noted = &profiles[0];
    assert!(noted.has_note());
    assert!(noted.note_text.contains("Non-smoker for over ten years."));

    let unnoted = &profiles[1];
    assert!(!unnoted.has_note());
}

/// Verifies lab rows for unknown patients are skipped.
#[test]
fn loader_skips_unknown_lab_patients() {
    let (_dir, patients_csv, labs_csv, notes_dir) = fixture();
    let profiles = load(&patients_csv, &labs_csv, &notes_dir);
    assert!(profiles.iter().all(|profile| profile.patient_id.as_str() != "patient_C999"));
}
