//! Constants used throughout the admin client core crate.
//!
//! Resource paths, configuration keys and form defaults live here so that the screens, the
//! HTTP client and the binaries agree on them.

/// Base URL of the records API when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Environment variable that overrides the records API base URL.
pub const API_BASE_URL_ENV: &str = "BOLNICA_API_URL";

/// Collection path for hospitals.
pub const HOSPITALS_PATH: &str = "bolnice";

/// Collection path for diagnoses.
pub const DIAGNOSES_PATH: &str = "dijagnoze";

/// Collection path for departments.
pub const DEPARTMENTS_PATH: &str = "odeljenja";

/// Collection path for patients.
pub const PATIENTS_PATH: &str = "pacijenti";

/// Earliest accepted patient birth year.
pub const MIN_BIRTH_YEAR: i32 = 1900;

/// Birth year a fresh patient form starts with.
pub const DEFAULT_BIRTH_YEAR: i32 = 2000;
