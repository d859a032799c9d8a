// crates/cohort-screen-cli/src/loader.rs
// ============================================================================
// Module: Patient Data Loader
// Description: CSV ingest and derived-field synthesis for patient profiles.
// Purpose: Build unified, immutable profiles for the evaluation engine.
// Dependencies: cohort-screen-core, cohort-screen-config, csv, serde, time
// ============================================================================

//! ## Overview
//! The loader synthesizes patient profiles from three sources: a
//! demographics CSV, a time-series lab results CSV, and a directory of
//! per-patient note files. Derived fields (age at the configured evaluation
//! date, BMI, pack-years) are precomputed, and the most recent lab value per
//! test becomes a structured field named after the test. Missing cells stay
//! absent from the profile; they are never defaulted, so the comparator's
//! missing-data policy applies downstream. The evaluation date is explicit
//! configuration: the loader never reads the wall clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use cohort_screen_config::parse_iso_date;
use cohort_screen_core::FieldValue;
use cohort_screen_core::PatientProfile;
use serde::Deserialize;
use serde_json::Number;
use thiserror::Error;
use time::Date;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Patient and lab ingest errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum IngestError {
    /// I/O failure while reading an input file.
    #[error("ingest io error: {0}")]
    Io(String),
    /// CSV row failed to parse.
    #[error("csv parse error in {path}: {message}")]
    Csv {
        /// Offending file path.
        path: String,
        /// Parser error message.
        message: String,
    },
}

// ============================================================================
// SECTION: CSV Rows
// ============================================================================

/// One row of the patient demographics CSV.
#[derive(Debug, Deserialize)]
struct PatientRow {
    /// Patient identifier.
    patient_id: String,
    /// Date of birth (`YYYY-MM-DD`).
    #[serde(default)]
    date_of_birth: Option<String>,
    /// Gender code.
    #[serde(default)]
    gender: Option<String>,
    /// Current smoker flag.
    #[serde(default)]
    is_smoker: Option<bool>,
    /// Height in centimeters.
    #[serde(default)]
    height_cm: Option<f64>,
    /// Weight in kilograms.
    #[serde(default)]
    weight_kg: Option<f64>,
    /// Cigarettes smoked per day.
    #[serde(default)]
    cigs_per_day: Option<f64>,
    /// Years of smoking history.
    #[serde(default)]
    years_smoked: Option<f64>,
}

/// One row of the lab results CSV.
#[derive(Debug, Deserialize)]
struct LabRow {
    /// Patient identifier.
    patient_id: String,
    /// Lab test name; becomes the structured field name.
    lab_test_name: String,
    /// Observed value.
    value: f64,
    /// Observation date (`YYYY-MM-DD`).
    #[serde(default)]
    observation_date: Option<String>,
}

// ============================================================================
// SECTION: Profile Loading
// ============================================================================

/// Loads unified patient profiles sorted by patient identifier.
///
/// # Errors
///
/// Returns [`IngestError`] when a CSV file cannot be read or a row fails to
/// parse.
pub fn load_profiles(
    patients_csv: &Path,
    labs_csv: &Path,
    notes_dir: &Path,
    evaluation_date: Date,
) -> Result<Vec<PatientProfile>, IngestError> {
    let mut profiles = load_patients(patients_csv, evaluation_date)?;
    attach_labs(&mut profiles, labs_csv)?;
    attach_notes(&mut profiles, notes_dir);
    Ok(profiles.into_values().collect())
}

/// Loads demographics and precomputes derived fields.
fn load_patients(
    patients_csv: &Path,
    evaluation_date: Date,
) -> Result<BTreeMap<String, PatientProfile>, IngestError> {
    let mut reader =
        csv::Reader::from_path(patients_csv).map_err(|err| IngestError::Io(err.to_string()))?;

    let mut profiles = BTreeMap::new();
    for row in reader.deserialize() {
        let row: PatientRow = row.map_err(|err| IngestError::Csv {
            path: patients_csv.to_string_lossy().into_owned(),
            message: err.to_string(),
        })?;
        let profile = profile_from_row(&row, evaluation_date);
        profiles.insert(row.patient_id, profile);
    }
    Ok(profiles)
}

/// Builds one profile from a demographics row.
fn profile_from_row(row: &PatientRow, evaluation_date: Date) -> PatientProfile {
    let mut profile = PatientProfile::new(row.patient_id.as_str());

    if let Some(gender) = &row.gender
        && !gender.trim().is_empty()
    {
        profile = profile.with_field("gender", gender.trim());
    }
    if let Some(is_smoker) = row.is_smoker {
        profile = profile.with_field("is_smoker", is_smoker);
    }
    if let Some(age) = row.date_of_birth.as_deref().and_then(|dob| age_at(dob, evaluation_date)) {
        profile = profile.with_field("age", age);
    }
    if let Some(height_cm) = row.height_cm.and_then(number) {
        profile = profile.with_field("height_cm", FieldValue::Number(height_cm));
    }
    if let Some(weight_kg) = row.weight_kg.and_then(number) {
        profile = profile.with_field("weight_kg", FieldValue::Number(weight_kg));
    }
    if let Some(bmi) = bmi(row.weight_kg, row.height_cm) {
        profile = profile.with_field("BMI", FieldValue::Number(bmi));
    }
    if let Some(pack_years) = pack_years(row.cigs_per_day, row.years_smoked) {
        profile = profile.with_field("pack_years", FieldValue::Number(pack_years));
    }

    profile
}

/// Attaches the most recent lab value per test as a structured field.
fn attach_labs(
    profiles: &mut BTreeMap<String, PatientProfile>,
    labs_csv: &Path,
) -> Result<(), IngestError> {
    let mut reader =
        csv::Reader::from_path(labs_csv).map_err(|err| IngestError::Io(err.to_string()))?;

    let mut latest: BTreeMap<(String, String), (Option<Date>, f64)> = BTreeMap::new();
    for row in reader.deserialize() {
        let row: LabRow = row.map_err(|err| IngestError::Csv {
            path: labs_csv.to_string_lossy().into_owned(),
            message: err.to_string(),
        })?;
        if !profiles.contains_key(&row.patient_id) {
            continue;
        }

        let observed = row.observation_date.as_deref().and_then(parse_iso_date);
        let key = (row.patient_id, row.lab_test_name);
        let replace = match latest.get(&key) {
            None => true,
            Some((Some(current), _)) => observed.is_some_and(|date| date > *current),
            Some((None, _)) => false,
        };
        if replace {
            latest.insert(key, (observed, row.value));
        }
    }

    for ((patient_id, test_name), (_, value)) in latest {
        if let Some(profile) = profiles.get_mut(&patient_id)
            && let Some(value) = number(value)
        {
            profile.fields.insert(test_name, FieldValue::Number(value));
        }
    }
    Ok(())
}

/// Attaches note text from `<notes_dir>/<patient_id>.txt` when present.
fn attach_notes(profiles: &mut BTreeMap<String, PatientProfile>, notes_dir: &Path) {
    for (patient_id, profile) in profiles.iter_mut() {
        let note_path = notes_dir.join(format!("{patient_id}.txt"));
        if let Ok(text) = fs::read_to_string(note_path) {
            profile.note_text = text.trim().to_string();
        }
    }
}

// ============================================================================
// SECTION: Derivation Helpers
// ============================================================================

/// Computes age in whole years at the evaluation date.
fn age_at(date_of_birth: &str, evaluation_date: Date) -> Option<i64> {
    let born = parse_iso_date(date_of_birth)?;
    let days = (evaluation_date - born).whole_days();
    if days < 0 {
        return None;
    }
    Some(days / 365)
}

/// Computes BMI rounded to one decimal when height and weight are valid.
fn bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<Number> {
    let weight_kg = weight_kg?;
    let height_cm = height_cm?;
    if height_cm <= 0.0 {
        return None;
    }
    let meters = height_cm / 100.0;
    number(round1(weight_kg / (meters * meters)))
}

/// Computes pack-years rounded to one decimal when smoking data is present.
fn pack_years(cigs_per_day: Option<f64>, years_smoked: Option<f64>) -> Option<Number> {
    let cigs_per_day = cigs_per_day?;
    let years_smoked = years_smoked?;
    number(round1((cigs_per_day / 20.0) * years_smoked))
}

/// Rounds to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Converts a finite float into a JSON number.
fn number(value: f64) -> Option<Number> {
    Number::from_f64(value)
}
