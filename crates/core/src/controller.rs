//! Generic list/filter/form controller.
//!
//! One `ListController<R>` backs one screen. It owns:
//! - a reload trigger (a generation counter on a `watch` channel),
//! - a loader task that fetches the collection for the latest generation and drops any fetch
//!   that a newer reload has superseded,
//! - the filter text, and
//! - the create/edit form with its mode.
//!
//! The filtered view is always derived from the latest completed fetch and the latest filter
//! text; nothing is cached beyond that one snapshot.

use crate::api::{fetch_all, RecordsApi};
use crate::filter::apply_filter;
use crate::prompt::Prompter;
use crate::resource::Resource;
use crate::validation::ValidationErrors;
use crate::{AdminError, AdminResult};
use bolnica_types::RecordId;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Whether the form creates a new record or edits an existing one.
///
/// `Creating` is also the idle state: an untouched screen shows the empty create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(RecordId),
}

/// Form values plus whether validation messages should be shown.
#[derive(Debug, Clone, Default)]
pub struct FormState<F> {
    values: F,
    touched: bool,
}

impl<F> FormState<F> {
    fn new(values: F) -> Self {
        Self {
            values,
            touched: false,
        }
    }

    pub fn values(&self) -> &F {
        &self.values
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Created,
    Updated(RecordId),
}

/// Result of a remove request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The operator said no; nothing was sent.
    Declined,
    Deleted(RecordId),
}

/// Latest completed list fetch.
#[derive(Debug)]
pub struct Snapshot<E> {
    /// Reload generation this snapshot answers. `0` before the first fetch completes.
    pub generation: u64,
    pub items: Arc<Vec<E>>,
    /// Set when the fetch for `generation` failed; `items` then still hold the previous list.
    pub error: Option<String>,
}

impl<E> Snapshot<E> {
    fn empty() -> Self {
        Self {
            generation: 0,
            items: Arc::new(Vec::new()),
            error: None,
        }
    }
}

pub struct ListController<R: Resource> {
    api: Arc<dyn RecordsApi>,
    prompter: Arc<dyn Prompter>,
    reload_tx: watch::Sender<u64>,
    list_rx: watch::Receiver<Snapshot<R::Entity>>,
    filter_tx: watch::Sender<String>,
    form: FormState<R::Form>,
    mode: FormMode,
    loader: JoinHandle<()>,
}

impl<R: Resource> ListController<R> {
    /// Create the controller and start loading the collection.
    ///
    /// Must be called from within a Tokio runtime; the loader runs as a spawned task until the
    /// controller is dropped.
    pub fn new(api: Arc<dyn RecordsApi>, prompter: Arc<dyn Prompter>) -> Self {
        let (reload_tx, reload_rx) = watch::channel(1u64);
        let (list_tx, list_rx) = watch::channel(Snapshot::empty());
        let (filter_tx, _) = watch::channel(String::new());

        let loader = tokio::spawn(run_loader::<R>(api.clone(), reload_rx, list_tx));

        Self {
            api,
            prompter,
            reload_tx,
            list_rx,
            filter_tx,
            form: FormState::default(),
            mode: FormMode::Creating,
            loader,
        }
    }

    /// Fire the reload signal. The current fetch, if any, is superseded.
    pub fn reload(&self) {
        self.reload_tx.send_modify(|generation| *generation += 1);
    }

    /// Wait until the latest reload has been answered.
    ///
    /// Returns the fetch error when that answer was a failure.
    pub async fn settled(&self) -> AdminResult<()> {
        let target = *self.reload_tx.borrow();
        let mut rx = self.list_rx.clone();

        let error = {
            let snapshot = rx
                .wait_for(|s| s.generation >= target)
                .await
                .map_err(|_| AdminError::LoaderStopped(R::PATH))?;
            snapshot.error.clone()
        };

        match error {
            Some(message) => Err(AdminError::ListFetch {
                resource: R::PATH,
                message,
            }),
            None => Ok(()),
        }
    }

    pub fn set_filter(&self, text: impl Into<String>) {
        self.filter_tx.send_replace(text.into());
    }

    pub fn filter_text(&self) -> String {
        self.filter_tx.borrow().clone()
    }

    /// Unfiltered list from the latest completed fetch.
    pub fn items(&self) -> Arc<Vec<R::Entity>> {
        Arc::clone(&self.list_rx.borrow().items)
    }

    /// The list as the screen shows it: latest snapshot with the current filter applied.
    pub fn view(&self) -> Vec<R::Entity> {
        let items = self.items();
        apply_filter::<R>(&items, &self.filter_tx.borrow())
    }

    /// Live view that yields a freshly filtered list whenever the snapshot or filter changes.
    pub fn watch_view(&self) -> FilteredView<R> {
        FilteredView {
            list_rx: self.list_rx.clone(),
            filter_rx: self.filter_tx.subscribe(),
        }
    }

    /// Entity with `id` in the latest snapshot.
    pub fn find(&self, id: RecordId) -> Option<R::Entity> {
        self.list_rx
            .borrow()
            .items
            .iter()
            .find(|entity| R::id(entity) == id)
            .cloned()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn form(&self) -> &FormState<R::Form> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
        &mut self.form.values
    }

    /// Set one form field from text input.
    pub fn assign(&mut self, field: &str, value: &str) -> AdminResult<()> {
        R::assign(&mut self.form.values, field, value)
    }

    /// Validation messages to show; only once the form has been touched by a submit.
    pub fn visible_errors(&self) -> Option<ValidationErrors> {
        if !self.form.touched {
            return None;
        }
        R::validate(&self.form.values).err()
    }

    pub fn begin_edit(&mut self, entity: &R::Entity) {
        self.mode = FormMode::Editing(R::id(entity));
        self.form = FormState::new(R::form_from(entity));
    }

    /// Leave edit mode and discard the form without asking.
    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    /// Validate and send the form.
    ///
    /// Invalid forms are marked touched and nothing is sent. On success the form is reset and
    /// the list reloaded; on a request failure the form is kept and the operator alerted.
    pub async fn submit(&mut self) -> AdminResult<Submitted> {
        let dto = match R::validate(&self.form.values) {
            Ok(dto) => dto,
            Err(errors) => {
                self.form.touched = true;
                return Err(AdminError::Validation(errors));
            }
        };
        let body = serde_json::to_value(&dto).map_err(AdminError::Encode)?;

        let result = match self.mode {
            FormMode::Editing(id) => self
                .api
                .update(R::PATH, id, body)
                .await
                .map(|_| Submitted::Updated(id)),
            FormMode::Creating => self
                .api
                .create(R::PATH, body)
                .await
                .map(|_| Submitted::Created),
        };

        match result {
            Ok(submitted) => {
                tracing::info!(resource = R::PATH, ?submitted, "saved");
                self.reset_form();
                self.reload();
                Ok(submitted)
            }
            Err(err) => {
                tracing::error!(resource = R::PATH, error = %err, "save failed");
                self.prompter.alert(&R::save_failed_message()).await;
                Err(err)
            }
        }
    }

    /// Delete `entity` after the operator confirms.
    pub async fn remove(&self, entity: &R::Entity) -> AdminResult<Removal> {
        if !self.prompter.confirm(&R::delete_prompt(entity)).await {
            return Ok(Removal::Declined);
        }

        let id = R::id(entity);
        match self.api.delete(R::PATH, id).await {
            Ok(()) => {
                tracing::info!(resource = R::PATH, %id, "deleted");
                self.reload();
                Ok(Removal::Deleted(id))
            }
            Err(err) => {
                tracing::warn!(resource = R::PATH, %id, error = %err, "delete failed");
                self.prompter.alert(&R::delete_failed_message(entity)).await;
                Err(err)
            }
        }
    }

    fn reset_form(&mut self) {
        self.form = FormState::default();
        self.mode = FormMode::Creating;
    }
}

impl<R: Resource> Drop for ListController<R> {
    fn drop(&mut self) {
        self.loader.abort();
    }
}

/// Filtered list that can be awaited for changes.
pub struct FilteredView<R: Resource> {
    list_rx: watch::Receiver<Snapshot<R::Entity>>,
    filter_rx: watch::Receiver<String>,
}

impl<R: Resource> FilteredView<R> {
    pub fn current(&self) -> Vec<R::Entity> {
        let items = Arc::clone(&self.list_rx.borrow().items);
        let text = self.filter_rx.borrow().clone();
        apply_filter::<R>(&items, &text)
    }

    /// Wait for the next change of either input and return the recomputed view.
    pub async fn changed(&mut self) -> AdminResult<Vec<R::Entity>> {
        tokio::select! {
            res = self.list_rx.changed() => res.map_err(|_| AdminError::LoaderStopped(R::PATH))?,
            res = self.filter_rx.changed() => res.map_err(|_| AdminError::LoaderStopped(R::PATH))?,
        }
        self.list_rx.borrow_and_update();
        self.filter_rx.borrow_and_update();
        Ok(self.current())
    }
}

/// Fetch the collection for every reload generation, latest wins.
async fn run_loader<R: Resource>(
    api: Arc<dyn RecordsApi>,
    mut reload_rx: watch::Receiver<u64>,
    list_tx: watch::Sender<Snapshot<R::Entity>>,
) {
    loop {
        let generation = *reload_rx.borrow_and_update();

        let fetched = tokio::select! {
            result = fetch_all::<R::Entity>(api.as_ref(), R::PATH) => Some(result),
            changed = reload_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                None
            }
        };

        match fetched {
            None => {
                tracing::debug!(resource = R::PATH, generation, "fetch superseded by reload");
                continue;
            }
            Some(Ok(items)) => {
                tracing::debug!(resource = R::PATH, generation, count = items.len(), "list loaded");
                list_tx.send_replace(Snapshot {
                    generation,
                    items: Arc::new(items),
                    error: None,
                });
            }
            Some(Err(err)) => {
                tracing::warn!(resource = R::PATH, generation, error = %err, "list fetch failed");
                list_tx.send_modify(|snapshot| {
                    snapshot.generation = generation;
                    snapshot.error = Some(err.to_string());
                });
            }
        }

        if reload_rx.changed().await.is_err() {
            return;
        }
    }
}
