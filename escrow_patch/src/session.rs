//! Per-record edit session
//!
//! A record view has at most one active field. That field moves through
//! `Viewing -> Editing -> Saving` and back; every other field of the record
//! is `Viewing`. Events that do not match a legal transition are logged and
//! ignored, so a double click or a late network callback cannot corrupt the
//! session.

use serde::Serialize;
use strum::{AsRefStr, Display};
use tracing::{debug, warn};

use crate::error::FieldError;
use crate::path::FieldPath;

/// UI phase of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPhase {
    /// Formatted value shown, no edit in progress
    Viewing,
    /// Edit box open with a buffer
    Editing,
    /// Request in flight; further edits are ignored
    Saving,
}

/// Input to the session state machine
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
pub enum EditEvent {
    /// Open the editor for `path`, seeding it with `buffer`
    Begin {
        /// Canonical path of the field
        path:   FieldPath,
        /// Initial edit box content
        buffer: String,
    },
    /// User confirmed the edit; the request is about to be sent
    Confirm,
    /// User abandoned the edit
    Cancel,
    /// Backend accepted the write
    Succeeded,
    /// Backend or network rejected the write
    Failed(FieldError),
}

/// What an event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The active field moved between phases
    Moved {
        /// Phase before the event
        from: FieldPhase,
        /// Phase after the event
        to:   FieldPhase,
    },
    /// The event was not legal in the current phase and changed nothing
    Ignored,
}

impl Transition {
    /// Whether the event changed the session
    pub const fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Clone)]
struct ActiveField {
    path:   FieldPath,
    phase:  FieldPhase,
    buffer: String,
    error:  Option<FieldError>,
}

/// Single active-field pointer for one record view
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    active: Option<ActiveField>,
}

impl EditSession {
    /// Session with every field viewing
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase of the active field, `Viewing` when none is active
    pub fn phase(&self) -> FieldPhase {
        self.active
            .as_ref()
            .map_or(FieldPhase::Viewing, |active| active.phase)
    }

    /// Phase of a specific field
    pub fn phase_of(&self, path: &str) -> FieldPhase {
        self.active
            .as_ref()
            .filter(|active| active.path.as_str() == path)
            .map_or(FieldPhase::Viewing, |active| active.phase)
    }

    /// Path of the field being edited or saved
    pub fn active_path(&self) -> Option<&FieldPath> {
        self.active.as_ref().map(|active| &active.path)
    }

    /// Current edit buffer
    pub fn buffer(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.buffer.as_str())
    }

    /// Error attached to the active field
    pub fn error(&self) -> Option<&FieldError> {
        self.active.as_ref().and_then(|active| active.error.as_ref())
    }

    /// Apply an event
    pub fn handle(&mut self, event: EditEvent) -> Transition {
        let from = self.phase();
        let event_name = event.as_ref().to_string();
        let transition = match (from, event) {
            (FieldPhase::Viewing, EditEvent::Begin { path, buffer }) => {
                self.active = Some(ActiveField {
                    path,
                    phase: FieldPhase::Editing,
                    buffer,
                    error: None,
                });
                Transition::Moved {
                    from,
                    to: FieldPhase::Editing,
                }
            }
            (FieldPhase::Editing, EditEvent::Confirm) => self.move_active(FieldPhase::Saving),
            (FieldPhase::Editing, EditEvent::Cancel)
            | (FieldPhase::Saving, EditEvent::Succeeded) => {
                self.active = None;
                Transition::Moved {
                    from,
                    to: FieldPhase::Viewing,
                }
            }
            (FieldPhase::Saving, EditEvent::Failed(error)) => {
                if let Some(active) = self.active.as_mut() {
                    active.error = Some(error);
                }
                self.move_active(FieldPhase::Editing)
            }
            _ => Transition::Ignored,
        };

        match transition {
            Transition::Moved { from, to } => debug!(
                "{}: {event_name} moved {from} -> {to}",
                self.describe_path()
            ),
            Transition::Ignored => warn!(
                "{}: ignored {event_name} while {from}",
                self.describe_path()
            ),
        }
        transition
    }

    /// Replace the edit buffer; only applies while `Editing`
    pub fn update_buffer(&mut self, text: impl Into<String>) -> Transition {
        match self.active.as_mut() {
            Some(active) if active.phase == FieldPhase::Editing => {
                active.buffer = text.into();
                Transition::Moved {
                    from: FieldPhase::Editing,
                    to:   FieldPhase::Editing,
                }
            }
            _ => {
                debug!("buffer update ignored while {}", self.phase());
                Transition::Ignored
            }
        }
    }

    /// Attach a local error and stay in `Editing`
    ///
    /// Used for validation and mapping failures raised before any request.
    pub fn reject(&mut self, error: FieldError) -> Transition {
        match self.active.as_mut() {
            Some(active) if active.phase == FieldPhase::Editing => {
                debug!("'{}' rejected locally: {error}", active.path);
                active.error = Some(error);
                Transition::Moved {
                    from: FieldPhase::Editing,
                    to:   FieldPhase::Editing,
                }
            }
            _ => {
                warn!("rejection ignored while {}: {error}", self.phase());
                Transition::Ignored
            }
        }
    }

    fn move_active(&mut self, to: FieldPhase) -> Transition {
        match self.active.as_mut() {
            Some(active) => {
                let from = active.phase;
                active.phase = to;
                Transition::Moved { from, to }
            }
            None => Transition::Ignored,
        }
    }

    fn describe_path(&self) -> String {
        self.active_path()
            .map_or_else(|| "<no active field>".to_string(), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;

    fn begin(path: &str, buffer: &str) -> EditEvent {
        EditEvent::Begin {
            path:   FieldPath::parse(path).unwrap(),
            buffer: buffer.to_string(),
        }
    }

    fn transport_error() -> FieldError {
        FieldError {
            kind:    FieldErrorKind::Transport,
            message: "Network error".to_string(),
            code:    None,
        }
    }

    #[test]
    fn test_happy_path() {
        let mut session = EditSession::new();
        assert_eq!(session.phase(), FieldPhase::Viewing);

        assert!(!session.handle(begin("purchasePrice", "400000")).is_ignored());
        assert_eq!(session.phase_of("purchasePrice"), FieldPhase::Editing);
        assert_eq!(session.buffer(), Some("400000"));

        session.update_buffer("500000");
        assert_eq!(
            session.handle(EditEvent::Confirm),
            Transition::Moved {
                from: FieldPhase::Editing,
                to:   FieldPhase::Saving,
            }
        );
        assert_eq!(session.handle(EditEvent::Succeeded), Transition::Moved {
            from: FieldPhase::Saving,
            to:   FieldPhase::Viewing,
        });
        assert_eq!(session.phase(), FieldPhase::Viewing);
        assert!(session.buffer().is_none());
    }

    #[test]
    fn test_failure_retains_buffer_and_attaches_error() {
        let mut session = EditSession::new();
        session.handle(begin("purchasePrice", "400000"));
        session.update_buffer("500000");
        session.handle(EditEvent::Confirm);
        session.handle(EditEvent::Failed(transport_error()));

        assert_eq!(session.phase(), FieldPhase::Editing);
        assert_eq!(session.buffer(), Some("500000"));
        assert_eq!(session.error(), Some(&transport_error()));

        session.handle(EditEvent::Cancel);
        session.handle(begin("purchasePrice", "400000"));
        assert!(session.error().is_none());
    }

    #[test]
    fn test_only_one_active_field() {
        let mut session = EditSession::new();
        session.handle(begin("purchasePrice", "400000"));
        assert!(session.handle(begin("escrowNumber", "E-1")).is_ignored());
        assert_eq!(session.active_path().map(FieldPath::as_str), Some("purchasePrice"));
        assert_eq!(session.phase_of("escrowNumber"), FieldPhase::Viewing);
    }

    #[test]
    fn test_illegal_events_are_ignored() {
        let mut session = EditSession::new();
        assert!(session.handle(EditEvent::Confirm).is_ignored());
        assert!(session.handle(EditEvent::Succeeded).is_ignored());
        assert!(session.handle(EditEvent::Failed(transport_error())).is_ignored());
        assert!(session.handle(EditEvent::Cancel).is_ignored());

        session.handle(begin("purchasePrice", "1"));
        assert!(session.handle(EditEvent::Succeeded).is_ignored());
        session.handle(EditEvent::Confirm);
        assert!(session.handle(EditEvent::Confirm).is_ignored());
        assert!(session.handle(EditEvent::Cancel).is_ignored());
        assert!(session.update_buffer("2").is_ignored());
        assert_eq!(session.phase(), FieldPhase::Saving);
        assert_eq!(session.buffer(), Some("1"));
    }

    #[test]
    fn test_reject_stays_editing() {
        let mut session = EditSession::new();
        assert!(session.reject(transport_error()).is_ignored());

        session.handle(begin("commissionDetails.brokerageSplit", "abc"));
        let validation = FieldError {
            kind:    FieldErrorKind::Validation,
            message: "'abc' is not a valid percentage".to_string(),
            code:    None,
        };
        assert!(!session.reject(validation.clone()).is_ignored());
        assert_eq!(session.phase(), FieldPhase::Editing);
        assert_eq!(session.error(), Some(&validation));
        assert_eq!(session.buffer(), Some("abc"));
    }
}
