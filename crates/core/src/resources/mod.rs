//! The four record collections the admin client manages.

pub mod department;
pub mod diagnosis;
pub mod hospital;
pub mod patient;

pub use department::{Department, DepartmentDto, DepartmentForm, Departments};
pub use diagnosis::{Diagnoses, Diagnosis, DiagnosisDto, DiagnosisForm};
pub use hospital::{Hospital, HospitalDto, HospitalForm, Hospitals};
pub use patient::{Patient, PatientDto, PatientForm, Patients};
