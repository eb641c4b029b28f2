//! Translation of one field edit into a minimal backend request
//!
//! Flat fields produce a single-key body. Blob fields carry the complete blob
//! with one leaf replaced, because the backend stores the blob as a single
//! column and overwrites it on every write.

use std::fmt::Display;

use error_stack::Report;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::RECORD_ID;
use crate::error::{Error, Result};
use crate::json_object::JsonObjectAccess;
use crate::mapping::{BackendTarget, EntityRoutes, FieldSpec};
use crate::path::assign;

/// Resource a patch is sent to, rendered as `/<collection>/<id>[/<sub_resource>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Plural collection segment
    pub collection:   String,
    /// Backend record id with any UI prefix removed
    pub id:           String,
    /// Optional sub-resource segment, e.g. `checklists`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_resource: Option<String>,
}

impl Endpoint {
    /// Endpoint of the record itself
    pub fn entity(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection:   collection.into(),
            id:           id.into(),
            sub_resource: None,
        }
    }

    /// Endpoint of a sub-resource of the record
    #[must_use]
    pub fn with_sub_resource(mut self, sub_resource: impl Into<String>) -> Self {
        self.sub_resource = Some(sub_resource.into());
        self
    }

    /// Endpoint of `record` under `routes`, using its `id` field
    pub fn for_record(record: &Value, routes: &EntityRoutes) -> Result<Self> {
        Ok(Self::entity(
            routes.collection.clone(),
            record_id(record, routes)?,
        ))
    }

    /// URL path relative to the API base
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.collection, self.id)?;
        if let Some(sub_resource) = &self.sub_resource {
            write!(f, "/{sub_resource}")?;
        }
        Ok(())
    }
}

/// A ready-to-send partial update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    /// Where the body is sent
    pub endpoint: Endpoint,
    /// JSON object body; one key for flat fields, the whole blob for blob fields
    pub body:     Value,
}

/// Backend id of a record, with the routing prefix stripped
///
/// Accepts string and numeric ids.
pub fn record_id(record: &Value, routes: &EntityRoutes) -> Result<String> {
    match record.get_present(RECORD_ID) {
        Some(Value::String(id)) if !id.trim().is_empty() => {
            Ok(routes.clean_id(id.trim()).to_string())
        }
        Some(Value::Number(id)) => Ok(id.to_string()),
        Some(other) => Err(Report::new(Error::invalid(
            "record id",
            format!("expected a string or number, got {other}"),
        ))),
        None => Err(Report::new(Error::missing("record id"))
            .attach(format!("Collection: {}", routes.collection))),
    }
}

/// Build the patch for setting `spec` to `value` on `record`
///
/// `record` is only read; blob fields are deep-copied before the leaf is
/// replaced.
pub fn build_patch(
    spec: &FieldSpec,
    value: Value,
    record: &Value,
    routes: &EntityRoutes,
) -> Result<Patch> {
    let mut endpoint = Endpoint::for_record(record, routes)?;
    if let Some(sub_resource) = routes.sub_resource_for(spec.backend()) {
        endpoint = endpoint.with_sub_resource(sub_resource);
    }

    let mut body = Map::new();
    match spec.backend() {
        BackendTarget::Flat { field } => {
            body.insert(field.clone(), value);
        }
        BackendTarget::Blob { blob_key, sub_path } => {
            let mut blob = current_blob(record, blob_key)?;
            assign(&mut blob, sub_path, value);
            body.insert(blob_key.clone(), blob);
        }
    }

    debug!(
        "built patch for '{}' -> {endpoint} ({} top-level key)",
        spec.canonical_path(),
        body.len()
    );
    Ok(Patch {
        endpoint,
        body: Value::Object(body),
    })
}

/// Deep copy of the blob stored under `blob_key`, `{}` when absent
fn current_blob(record: &Value, blob_key: &str) -> Result<Value> {
    match record.get_present(blob_key) {
        None => Ok(Value::Object(Map::new())),
        Some(blob @ Value::Object(_)) => Ok(blob.clone()),
        Some(other) => Err(Report::new(Error::invalid(
            "blob",
            format!("'{blob_key}' holds {other} instead of an object"),
        ))),
    }
}
