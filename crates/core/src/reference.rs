//! One-shot reference data for selection controls.

use crate::api::{fetch_all, RecordsApi};
use crate::prompt::Prompter;
use crate::resource::Resource;
use bolnica_types::RecordId;

/// A related collection fetched once when a screen opens.
///
/// It is never refreshed by the screen's own reloads and never filtered.
pub struct ReferenceList<R: Resource> {
    items: Vec<R::Entity>,
}

impl<R: Resource> ReferenceList<R> {
    /// Fetch the collection. A failure is logged, shown to the operator, and leaves the list
    /// empty so the screen stays usable.
    pub async fn load(api: &dyn RecordsApi, prompter: &dyn Prompter) -> Self {
        match fetch_all::<R::Entity>(api, R::PATH).await {
            Ok(items) => Self { items },
            Err(err) => {
                tracing::warn!(resource = R::PATH, error = %err, "reference data unavailable");
                prompter
                    .alert(&format!("Could not load the {} list.", R::NOUN))
                    .await;
                Self { items: Vec::new() }
            }
        }
    }

    pub fn items(&self) -> &[R::Entity] {
        &self.items
    }

    /// `(id, label)` pairs in fetch order.
    pub fn options(&self) -> Vec<(RecordId, String)> {
        self.items
            .iter()
            .map(|entity| (R::id(entity), R::label(entity)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Departments, Hospitals};
    use crate::test_support::{FakeApi, RecordingPrompter};
    use serde_json::json;

    #[tokio::test]
    async fn options_follow_fetch_order() {
        let api = FakeApi::new();
        api.seed(
            "odeljenja",
            vec![
                json!({"id": 5, "naziv": "Kardiologija", "lokacija": "Sprat 2",
                       "bolnica": {"id": 1, "naziv": "Opšta", "adresa": "Ulica 1", "budzet": 1}}),
                json!({"id": 2, "naziv": "Hitna", "lokacija": "Prizemlje", "bolnica": null}),
            ],
        );
        let prompter = RecordingPrompter::answering(true);

        let departments = ReferenceList::<Departments>::load(api.as_ref(), prompter.as_ref()).await;
        assert_eq!(
            departments.options(),
            vec![
                (RecordId::new(5), "Kardiologija (Opšta)".to_string()),
                (RecordId::new(2), "Hitna".to_string()),
            ]
        );
        assert_eq!(departments.items()[1].name, "Hitna");
    }

    #[tokio::test]
    async fn failed_load_alerts_and_is_empty() {
        let api = FakeApi::new();
        api.fail_next(500);
        let prompter = RecordingPrompter::answering(true);

        let hospitals = ReferenceList::<Hospitals>::load(api.as_ref(), prompter.as_ref()).await;
        assert!(hospitals.items().is_empty());
        assert_eq!(prompter.alerts(), vec!["Could not load the hospital list."]);
    }
}
