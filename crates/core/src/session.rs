//! Opening screens against one records API.

use crate::api::{HttpApi, RecordsApi};
use crate::config::ClientConfig;
use crate::controller::ListController;
use crate::prompt::Prompter;
use crate::reference::ReferenceList;
use crate::screens::{
    DepartmentScreen, DiagnosisScreen, HospitalScreen, PatientScreen, ScreenKind, ScreenOps,
};
use crate::AdminResult;
use std::sync::Arc;

/// Shared collaborators every screen is built from.
#[derive(Clone)]
pub struct Session {
    api: Arc<dyn RecordsApi>,
    prompter: Arc<dyn Prompter>,
}

impl Session {
    pub fn new(api: Arc<dyn RecordsApi>, prompter: Arc<dyn Prompter>) -> Self {
        Self { api, prompter }
    }

    /// Session over HTTP using the startup configuration.
    pub fn connect(cfg: Arc<ClientConfig>, prompter: Arc<dyn Prompter>) -> AdminResult<Self> {
        tracing::info!(base_url = %cfg.base_url(), "using records API");
        let api = HttpApi::new(cfg)?;
        Ok(Self::new(Arc::new(api), prompter))
    }

    pub fn hospitals(&self) -> HospitalScreen {
        ListController::new(self.api.clone(), self.prompter.clone())
    }

    pub fn diagnoses(&self) -> DiagnosisScreen {
        ListController::new(self.api.clone(), self.prompter.clone())
    }

    pub async fn departments(&self) -> DepartmentScreen {
        let departments = ListController::new(self.api.clone(), self.prompter.clone());
        let hospitals = ReferenceList::load(self.api.as_ref(), self.prompter.as_ref()).await;
        DepartmentScreen {
            departments,
            hospitals,
        }
    }

    pub async fn patients(&self) -> PatientScreen {
        let patients = ListController::new(self.api.clone(), self.prompter.clone());
        let (departments, diagnoses) = tokio::join!(
            ReferenceList::load(self.api.as_ref(), self.prompter.as_ref()),
            ReferenceList::load(self.api.as_ref(), self.prompter.as_ref()),
        );
        PatientScreen {
            patients,
            departments,
            diagnoses,
        }
    }

    pub async fn open(&self, kind: ScreenKind) -> Box<dyn ScreenOps> {
        match kind {
            ScreenKind::Hospitals => Box::new(self.hospitals()),
            ScreenKind::Diagnoses => Box::new(self.diagnoses()),
            ScreenKind::Departments => Box::new(self.departments().await),
            ScreenKind::Patients => Box::new(self.patients().await),
        }
    }
}
