//! Record editor orchestrating one view of one record
//!
//! A save runs entirely through this type:
//!
//! 1. look up the field spec for the active path
//! 2. coerce the buffer to the spec's value type
//! 3. build the patch against the current record
//! 4. move the session to `Saving` and send the patch
//! 5. on success fold the sent value into the record, on failure return to
//!    `Editing` with the buffer kept
//!
//! Steps 1-3 are local; their errors leave the session in `Editing` and no
//! request is made. Errors are reported through [`SaveOutcome`] and the
//! session, never as `Err`.

use std::sync::Arc;

use error_stack::Report;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::PatchTransport;
use crate::coercion::{EditInput, coerce, edit_buffer, format_value};
use crate::error::{Error, FieldError, Result};
use crate::mapping::{FieldMapping, ValueType};
use crate::patch::{Endpoint, build_patch};
use crate::path::{FieldPath, resolve, resolve_str};
use crate::reconcile::{apply_confirmed, echo_mismatch};
use crate::session::{EditEvent, EditSession, FieldPhase, Transition};

/// Result of a save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend accepted the write and the record was updated
    Saved {
        /// Canonical path that was written
        path:  FieldPath,
        /// Value now held at `path`
        value: Value,
    },
    /// The save failed locally or remotely; the field stays in `Editing`
    Rejected(FieldError),
    /// No field was in `Editing`, nothing happened
    Ignored,
}

/// Editable view of a single record
#[derive(Debug)]
pub struct RecordEditor<T: PatchTransport> {
    transport: T,
    mapping:   Arc<FieldMapping>,
    record:    Value,
    session:   EditSession,
}

impl<T: PatchTransport> RecordEditor<T> {
    /// Wrap a record that is already in memory
    pub fn new(transport: T, mapping: Arc<FieldMapping>, record: Value) -> Self {
        Self {
            transport,
            mapping,
            record,
            session: EditSession::new(),
        }
    }

    /// Fetch `/<collection>/<id>` and wrap the returned record
    pub async fn load(transport: T, mapping: Arc<FieldMapping>, id: &str) -> Result<Self> {
        let routes = mapping.routes();
        let endpoint = Endpoint::entity(routes.collection.clone(), routes.clean_id(id));
        let response = transport.fetch(&endpoint).await?;
        let record = response
            .data
            .filter(Value::is_object)
            .ok_or_else(|| {
                Report::new(Error::invalid("record", "response carried no record object"))
                    .attach(format!("Endpoint: {endpoint}"))
            })?;
        debug!("loaded record from {endpoint}");
        Ok(Self::new(transport, mapping, record))
    }

    /// The record as currently displayed
    pub const fn record(&self) -> &Value {
        &self.record
    }

    /// Edit session state
    pub const fn session(&self) -> &EditSession {
        &self.session
    }

    /// Mapping table in use
    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Transport in use
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Phase of the field at `path`
    pub fn phase_of(&self, path: &str) -> FieldPhase {
        self.session.phase_of(path)
    }

    /// Raw value shown for `path`, resolved through its candidate paths
    pub fn value(&self, path: &str) -> Option<&Value> {
        match self.mapping.spec(path) {
            Some(spec) => resolve(&self.record, spec.ui_paths()),
            None => resolve_str(&self.record, &[path]),
        }
    }

    /// Formatted display text for `path`
    pub fn display(&self, path: &str) -> String {
        format_value(self.value(path), self.value_type(path))
    }

    /// Open the editor for `path` with the current value as buffer
    pub fn begin_edit(&mut self, path: &str) -> Transition {
        let field_path = match FieldPath::parse(path) {
            Ok(field_path) => field_path,
            Err(report) => {
                warn!("cannot edit '{path}': {report:?}");
                return Transition::Ignored;
            }
        };
        let buffer = edit_buffer(self.value(path), self.value_type(path));
        self.session.handle(EditEvent::Begin {
            path: field_path,
            buffer,
        })
    }

    /// Replace the edit buffer
    pub fn set_buffer(&mut self, text: impl Into<String>) -> Transition {
        self.session.update_buffer(text)
    }

    /// Abandon the current edit
    pub fn cancel(&mut self) -> Transition {
        self.session.handle(EditEvent::Cancel)
    }

    /// Save the edit buffer of the active field
    pub async fn save(&mut self) -> SaveOutcome {
        let Some(buffer) = self.editing_buffer() else {
            return SaveOutcome::Ignored;
        };
        self.commit(EditInput::Text(buffer)).await
    }

    /// Save a widget value (switch, date picker) for the active field
    pub async fn save_input(&mut self, input: EditInput) -> SaveOutcome {
        if self.editing_buffer().is_none() {
            return SaveOutcome::Ignored;
        }
        self.commit(input).await
    }

    /// One-click boolean flip: begin, toggle and save
    pub async fn toggle(&mut self, path: &str) -> SaveOutcome {
        if self.begin_edit(path).is_ignored() {
            return SaveOutcome::Ignored;
        }
        self.commit(EditInput::Toggle).await
    }

    fn editing_buffer(&self) -> Option<String> {
        if self.session.phase() != FieldPhase::Editing {
            debug!("save ignored while {}", self.session.phase());
            return None;
        }
        self.session.buffer().map(ToString::to_string)
    }

    fn value_type(&self, path: &str) -> ValueType {
        self.mapping
            .spec(path)
            .map_or(ValueType::Text, |spec| spec.value_type())
    }

    async fn commit(&mut self, input: EditInput) -> SaveOutcome {
        let Some(path) = self.session.active_path().cloned() else {
            return SaveOutcome::Ignored;
        };
        let mapping = Arc::clone(&self.mapping);

        let spec = match mapping.lookup(&path) {
            Ok(mapped) => mapped.spec,
            Err(report) => return self.reject(&report),
        };

        let current = resolve(&self.record, spec.ui_paths());
        let value = match coerce(&input, spec.value_type(), current) {
            Ok(value) => value,
            Err(report) => {
                let relabeled = match report.current_context() {
                    Error::Validation(reason) => {
                        Some(Error::validation_failed(spec.label(), reason))
                    }
                    _ => None,
                };
                return self.reject(&relabeled.map_or(report, Report::new));
            }
        };

        let patch = match build_patch(&spec, value.clone(), &self.record, mapping.routes()) {
            Ok(patch) => patch,
            Err(report) => return self.reject(&report),
        };

        self.session.handle(EditEvent::Confirm);
        match self.transport.send(&patch).await {
            Ok(response) => {
                echo_mismatch(&spec, &value, response.data.as_ref());
                self.record = apply_confirmed(&self.record, spec.canonical_path(), value.clone());
                self.session.handle(EditEvent::Succeeded);
                SaveOutcome::Saved {
                    path: spec.canonical_path().clone(),
                    value,
                }
            }
            Err(report) => {
                warn!("saving '{path}' to {} failed: {report:?}", patch.endpoint);
                let error = FieldError::from(&report);
                self.session.handle(EditEvent::Failed(error.clone()));
                SaveOutcome::Rejected(error)
            }
        }
    }

    fn reject(&mut self, report: &Report<Error>) -> SaveOutcome {
        debug!("edit rejected before sending: {report:?}");
        let error = FieldError::from(report);
        self.session.reject(error.clone());
        SaveOutcome::Rejected(error)
    }
}

#[cfg(test)]
mod tests;
