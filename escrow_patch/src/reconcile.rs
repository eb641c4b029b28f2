//! Folding a confirmed save back into the in-memory record
//!
//! Reconciliation only runs after the backend acknowledged the write, so the
//! view never shows a value the backend rejected. A blob write that reaches
//! the backend while another client edited a different leaf of the same blob
//! silently drops that other edit; this is not detected here and callers that
//! need certainty refetch the record.

use serde_json::Value;
use tracing::debug;

use crate::mapping::{BackendTarget, FieldSpec};
use crate::path::{FieldPath, assign, lookup};

/// Copy of `record` with the leaf at `path` set to `value`
///
/// Intermediate objects are created as needed and siblings are preserved.
/// The input record is not modified.
pub fn apply_confirmed(record: &Value, path: &FieldPath, value: Value) -> Value {
    let mut updated = record.clone();
    assign(&mut updated, path, value);
    debug!("reconciled '{path}' into the local record");
    updated
}

/// Backend echo of the saved field when it differs from what was sent
///
/// The sent value stays authoritative after a 2xx; the backend may echo
/// numeric columns as strings (`"500000.00"`), so a differing echo is only
/// logged at `debug!` and never folded into the record.
pub fn echo_mismatch<'a>(
    spec: &FieldSpec,
    sent: &Value,
    response_data: Option<&'a Value>,
) -> Option<&'a Value> {
    let data = response_data.filter(|data| data.is_object())?;
    let echoed = match spec.backend() {
        BackendTarget::Flat { field } => data.get(field.as_str()),
        BackendTarget::Blob { blob_key, sub_path } => data
            .get(blob_key.as_str())
            .and_then(|blob| lookup(blob, sub_path)),
    }?;
    (echoed != sent).then(|| {
        debug!(
            "backend echoed {echoed} for '{}' after saving {sent}; keeping the sent value",
            spec.canonical_path()
        );
        echoed
    })
}
