//! # Escrow Patch
//!
//! Field-at-a-time editing of deeply nested escrow records backed by a REST
//! API that stores them as flat snake_case columns and JSON blobs.
//!
//! A view addresses every editable leaf by a dotted UI path
//! (`propertyDetails.bedrooms`, `checklists.house.emd`). This crate resolves
//! those paths against records with legacy shapes, coerces typed input,
//! builds the smallest correct patch for the backend, tracks the
//! `Viewing -> Editing -> Saving` cycle of the active field and folds the
//! confirmed value back into the in-memory record.
//!
//! ```no_run
//! # async fn run() -> escrow_patch::Result<()> {
//! use std::sync::Arc;
//!
//! use escrow_patch::{ApiClient, ApiConfig, RecordEditor, escrow_mapping};
//!
//! let client = ApiClient::new(ApiConfig::from_env()?)?;
//! let mapping = Arc::new(escrow_mapping()?);
//! let mut editor = RecordEditor::load(client, mapping, "escrow-42").await?;
//!
//! editor.begin_edit("purchasePrice");
//! editor.set_buffer("500000");
//! let outcome = editor.save().await;
//! println!("{outcome:?}: {}", editor.display("purchasePrice"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod coercion;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod json_object;
pub mod mapping;
pub mod patch;
pub mod path;
pub mod reconcile;
pub mod session;
pub mod support;

pub use client::{ApiClient, ApiResponse, PatchTransport};
pub use coercion::{EditInput, coerce, edit_buffer, format_value};
pub use config::ApiConfig;
pub use editor::{RecordEditor, SaveOutcome};
pub use error::{Error, FieldError, FieldErrorKind, Result};
pub use mapping::{
    BackendTarget, EntityRoutes, FieldMapping, FieldSpec, MappingConfidence, ValueType,
    escrow_mapping,
};
pub use patch::{Endpoint, Patch, build_patch};
pub use path::{FieldPath, resolve};
pub use reconcile::apply_confirmed;
pub use session::{EditEvent, EditSession, FieldPhase, Transition};
