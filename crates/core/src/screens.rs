//! The four screens and a type-erased handle front-ends can hold.

use crate::controller::{FormMode, ListController, Removal, Submitted};
use crate::reference::ReferenceList;
use crate::resource::Resource;
use crate::resources::{Departments, Diagnoses, Hospitals, Patients};
use crate::{AdminError, AdminResult};
use async_trait::async_trait;
use bolnica_types::RecordId;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Hospitals,
    Diagnoses,
    Departments,
    Patients,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 4] = [
        ScreenKind::Hospitals,
        ScreenKind::Diagnoses,
        ScreenKind::Departments,
        ScreenKind::Patients,
    ];

    /// Collection path, which doubles as the screen's route name.
    pub fn path(self) -> &'static str {
        match self {
            ScreenKind::Hospitals => Hospitals::PATH,
            ScreenKind::Diagnoses => Diagnoses::PATH,
            ScreenKind::Departments => Departments::PATH,
            ScreenKind::Patients => Patients::PATH,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScreenKind::Hospitals => "Hospitals",
            ScreenKind::Diagnoses => "Diagnoses",
            ScreenKind::Departments => "Departments",
            ScreenKind::Patients => "Patients",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ScreenKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bolnice" | "hospitals" | "hospital" => Ok(ScreenKind::Hospitals),
            "dijagnoze" | "diagnoses" | "diagnosis" => Ok(ScreenKind::Diagnoses),
            "odeljenja" | "departments" | "department" => Ok(ScreenKind::Departments),
            "pacijenti" | "patients" | "patient" => Ok(ScreenKind::Patients),
            other => Err(AdminError::UnknownScreen(other.to_string())),
        }
    }
}

/// Selection options for one reference field of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceOptions {
    /// Form field the chosen id goes into.
    pub field: &'static str,
    pub options: Vec<(RecordId, String)>,
}

/// A screen: one list controller plus whatever reference data its form needs.
pub trait Screen: Send + Sync {
    type Resource: Resource;
    const KIND: ScreenKind;

    fn controller(&self) -> &ListController<Self::Resource>;
    fn controller_mut(&mut self) -> &mut ListController<Self::Resource>;

    fn reference_options(&self) -> Vec<ReferenceOptions> {
        Vec::new()
    }
}

pub type HospitalScreen = ListController<Hospitals>;
pub type DiagnosisScreen = ListController<Diagnoses>;

impl Screen for HospitalScreen {
    type Resource = Hospitals;
    const KIND: ScreenKind = ScreenKind::Hospitals;

    fn controller(&self) -> &ListController<Hospitals> {
        self
    }

    fn controller_mut(&mut self) -> &mut ListController<Hospitals> {
        self
    }
}

impl Screen for DiagnosisScreen {
    type Resource = Diagnoses;
    const KIND: ScreenKind = ScreenKind::Diagnoses;

    fn controller(&self) -> &ListController<Diagnoses> {
        self
    }

    fn controller_mut(&mut self) -> &mut ListController<Diagnoses> {
        self
    }
}

pub struct DepartmentScreen {
    pub departments: ListController<Departments>,
    pub hospitals: ReferenceList<Hospitals>,
}

impl Screen for DepartmentScreen {
    type Resource = Departments;
    const KIND: ScreenKind = ScreenKind::Departments;

    fn controller(&self) -> &ListController<Departments> {
        &self.departments
    }

    fn controller_mut(&mut self) -> &mut ListController<Departments> {
        &mut self.departments
    }

    fn reference_options(&self) -> Vec<ReferenceOptions> {
        vec![ReferenceOptions {
            field: "hospital_id",
            options: self.hospitals.options(),
        }]
    }
}

pub struct PatientScreen {
    pub patients: ListController<Patients>,
    pub departments: ReferenceList<Departments>,
    pub diagnoses: ReferenceList<Diagnoses>,
}

impl Screen for PatientScreen {
    type Resource = Patients;
    const KIND: ScreenKind = ScreenKind::Patients;

    fn controller(&self) -> &ListController<Patients> {
        &self.patients
    }

    fn controller_mut(&mut self) -> &mut ListController<Patients> {
        &mut self.patients
    }

    fn reference_options(&self) -> Vec<ReferenceOptions> {
        vec![
            ReferenceOptions {
                field: "department_id",
                options: self.departments.options(),
            },
            ReferenceOptions {
                field: "diagnosis_id",
                options: self.diagnoses.options(),
            },
        ]
    }
}

/// Object-safe operations on any open screen.
#[async_trait]
pub trait ScreenOps: Send + Sync {
    fn kind(&self) -> ScreenKind;
    fn fields(&self) -> &'static [&'static str];
    fn set_filter(&self, text: &str);
    fn filter_text(&self) -> String;
    fn reload(&self);
    async fn settled(&self) -> AdminResult<()>;
    /// Filtered list, one line per entity.
    fn rows(&self) -> Vec<String>;
    fn mode(&self) -> FormMode;
    /// Form values, mode and, once touched, validation messages.
    fn form_summary(&self) -> String;
    fn assign(&mut self, field: &str, value: &str) -> AdminResult<()>;
    fn begin_edit(&mut self, id: RecordId) -> AdminResult<()>;
    fn cancel_edit(&mut self);
    async fn submit(&mut self) -> AdminResult<Submitted>;
    async fn remove(&mut self, id: RecordId) -> AdminResult<Removal>;
    fn options(&self) -> Vec<ReferenceOptions>;
}

fn not_in_list<R: Resource>(id: RecordId) -> AdminError {
    AdminError::NotInList {
        resource: R::NOUN,
        id: id.get(),
    }
}

#[async_trait]
impl<S: Screen> ScreenOps for S {
    fn kind(&self) -> ScreenKind {
        S::KIND
    }

    fn fields(&self) -> &'static [&'static str] {
        <S::Resource as Resource>::FIELDS
    }

    fn set_filter(&self, text: &str) {
        self.controller().set_filter(text);
    }

    fn filter_text(&self) -> String {
        self.controller().filter_text()
    }

    fn reload(&self) {
        self.controller().reload();
    }

    async fn settled(&self) -> AdminResult<()> {
        self.controller().settled().await
    }

    fn rows(&self) -> Vec<String> {
        self.controller()
            .view()
            .iter()
            .map(|entity| entity.to_string())
            .collect()
    }

    fn mode(&self) -> FormMode {
        self.controller().mode()
    }

    fn form_summary(&self) -> String {
        let controller = self.controller();
        let noun = <S::Resource as Resource>::NOUN;
        let mut out = match controller.mode() {
            FormMode::Creating => format!("new {noun}\n"),
            FormMode::Editing(id) => format!("editing {noun} #{id}\n"),
        };
        out.push_str(&controller.form().values().to_string());
        if let Some(errors) = controller.visible_errors() {
            for error in errors.iter() {
                out.push_str(&format!("\n  ! {error}"));
            }
        }
        out
    }

    fn assign(&mut self, field: &str, value: &str) -> AdminResult<()> {
        self.controller_mut().assign(field, value)
    }

    fn begin_edit(&mut self, id: RecordId) -> AdminResult<()> {
        let entity = self
            .controller()
            .find(id)
            .ok_or_else(|| not_in_list::<S::Resource>(id))?;
        self.controller_mut().begin_edit(&entity);
        Ok(())
    }

    fn cancel_edit(&mut self) {
        self.controller_mut().cancel_edit();
    }

    async fn submit(&mut self) -> AdminResult<Submitted> {
        self.controller_mut().submit().await
    }

    async fn remove(&mut self, id: RecordId) -> AdminResult<Removal> {
        let entity = self
            .controller()
            .find(id)
            .ok_or_else(|| not_in_list::<S::Resource>(id))?;
        self.controller().remove(&entity).await
    }

    fn options(&self) -> Vec<ReferenceOptions> {
        self.reference_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_kind_parses_routes_and_aliases() {
        assert_eq!("bolnice".parse::<ScreenKind>().unwrap(), ScreenKind::Hospitals);
        assert_eq!("Patients".parse::<ScreenKind>().unwrap(), ScreenKind::Patients);
        assert_eq!(
            " odeljenja ".parse::<ScreenKind>().unwrap(),
            ScreenKind::Departments
        );
        assert!(matches!(
            "lekari".parse::<ScreenKind>(),
            Err(AdminError::UnknownScreen(_))
        ));
    }

    #[test]
    fn every_kind_round_trips_through_its_path() {
        for kind in ScreenKind::ALL {
            assert_eq!(kind.path().parse::<ScreenKind>().unwrap(), kind);
        }
    }
}
