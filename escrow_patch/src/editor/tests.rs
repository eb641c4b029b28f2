use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::client::ApiResponse;
use crate::error::FieldErrorKind;
use crate::mapping::{EntityRoutes, escrow_mapping};
use crate::patch::Patch;

/// In-memory transport recording every request
#[derive(Debug, Default)]
struct RecordingTransport {
    sent:      Mutex<Vec<Patch>>,
    fetched:   Mutex<Vec<Endpoint>>,
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
}

impl RecordingTransport {
    fn replying(response: Result<ApiResponse>) -> Self {
        let transport = Self::default();
        transport.responses.lock().unwrap().push_back(response);
        transport
    }

    fn sent(&self) -> Vec<Patch> {
        self.sent.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<ApiResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::ok(None)))
    }
}

#[async_trait]
impl PatchTransport for RecordingTransport {
    async fn send(&self, patch: &Patch) -> Result<ApiResponse> {
        self.sent.lock().unwrap().push(patch.clone());
        self.next_response()
    }

    async fn fetch(&self, endpoint: &Endpoint) -> Result<ApiResponse> {
        self.fetched.lock().unwrap().push(endpoint.clone());
        self.next_response()
    }
}

fn escrow_record() -> Value {
    json!({
        "id": "escrow-42",
        "purchase_price": 400000,
        "propertyDetails": { "bedrooms": 3, "city": "Irvine" },
        "commissionDetails": { "brokerageSplit": 20 },
        "checklists": {
            "loan": { "le": true },
            "house": { "emd": false, "homeInspectionOrdered": true },
            "admin": {}
        }
    })
}

fn editor(transport: RecordingTransport) -> RecordEditor<RecordingTransport> {
    RecordEditor::new(
        transport,
        Arc::new(escrow_mapping().unwrap()),
        escrow_record(),
    )
}

fn transport_failure() -> Result<ApiResponse> {
    Err(Report::new(Error::transport(
        "Escrow is locked",
        Some("LOCKED".to_string()),
    )))
}

#[test]
fn test_display_resolves_legacy_alias() {
    let editor = editor(RecordingTransport::default());
    assert_eq!(editor.display("purchasePrice"), "$400,000");
    assert_eq!(editor.display("propertyDetails.city"), "Irvine");
    assert_eq!(editor.display("checklists.house.emd"), "No");
    assert_eq!(editor.display("transactionDetails.closingDate"), "Not set");
}

#[tokio::test]
async fn test_flat_save_sends_single_key_and_reconciles() {
    let mut editor = editor(RecordingTransport::default());

    assert!(!editor.begin_edit("purchasePrice").is_ignored());
    assert_eq!(editor.session().buffer(), Some("400000"));
    editor.set_buffer("500000");

    let outcome = editor.save().await;
    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            path:  FieldPath::parse("purchasePrice").unwrap(),
            value: json!(500000),
        }
    );

    let sent = editor.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].endpoint.path(), "/escrows/42");
    assert_eq!(sent[0].body, json!({ "purchase_price": 500000 }));

    assert_eq!(editor.phase_of("purchasePrice"), FieldPhase::Viewing);
    assert_eq!(editor.display("purchasePrice"), "$500,000");
    assert_eq!(editor.record()["propertyDetails"]["bedrooms"], json!(3));
}

#[tokio::test]
async fn test_blob_toggle_preserves_sibling_leaves() {
    let mut editor = editor(RecordingTransport::default());

    let outcome = editor.toggle("checklists.house.emd").await;
    assert!(matches!(outcome, SaveOutcome::Saved { ref value, .. } if *value == json!(true)));

    let sent = editor.transport().sent();
    assert_eq!(sent[0].endpoint.path(), "/escrows/42/checklists");
    assert_eq!(
        sent[0].body,
        json!({
            "checklists": {
                "loan": { "le": true },
                "house": { "emd": true, "homeInspectionOrdered": true },
                "admin": {}
            }
        })
    );
    assert_eq!(editor.display("checklists.house.emd"), "Yes");
    assert_eq!(
        editor.record()["checklists"]["house"]["homeInspectionOrdered"],
        json!(true)
    );
}

#[tokio::test]
async fn test_timeline_blob_created_and_routed_to_root() {
    let mut editor = editor(RecordingTransport::default());

    editor.begin_edit("timeline.closingDate");
    editor.set_buffer("01/31/2025");
    let outcome = editor.save().await;
    assert!(matches!(outcome, SaveOutcome::Saved { .. }));

    let sent = editor.transport().sent();
    assert_eq!(sent[0].endpoint.path(), "/escrows/42");
    assert_eq!(
        sent[0].body,
        json!({ "timeline": { "closingDate": "2025-01-31" } })
    );
    assert_eq!(editor.display("timeline.closingDate"), "01/31/2025");
}

#[tokio::test]
async fn test_validation_error_never_reaches_transport() {
    let mut editor = editor(RecordingTransport::default());

    editor.begin_edit("commissionDetails.brokerageSplit");
    editor.set_buffer("lots");
    let outcome = editor.save().await;

    let SaveOutcome::Rejected(error) = outcome else {
        panic!("expected a rejection");
    };
    assert_eq!(error.kind, FieldErrorKind::Validation);
    assert_eq!(error.message, "Brokerage Split must be a number, got 'lots'");
    assert!(editor.transport().sent().is_empty());
    assert_eq!(editor.session().phase(), FieldPhase::Editing);
    assert_eq!(editor.session().buffer(), Some("lots"));
    assert_eq!(editor.session().error(), Some(&error));
}

#[tokio::test]
async fn test_transport_failure_keeps_buffer_and_record() {
    let mut editor = editor(RecordingTransport::replying(transport_failure()));

    editor.begin_edit("purchasePrice");
    editor.set_buffer("500000");
    let outcome = editor.save().await;

    let SaveOutcome::Rejected(error) = outcome else {
        panic!("expected a rejection");
    };
    assert_eq!(error.kind, FieldErrorKind::Transport);
    assert_eq!(error.message, "Escrow is locked");
    assert_eq!(error.code.as_deref(), Some("LOCKED"));

    assert_eq!(editor.transport().sent().len(), 1);
    assert_eq!(editor.session().phase(), FieldPhase::Editing);
    assert_eq!(editor.session().buffer(), Some("500000"));
    assert_eq!(editor.record(), &escrow_record());

    // Retry succeeds with the retained buffer
    let retry = editor.save().await;
    assert!(matches!(retry, SaveOutcome::Saved { .. }));
    assert_eq!(editor.display("purchasePrice"), "$500,000");
}

#[tokio::test]
async fn test_mapping_gap_rejected_locally() {
    let mapping = FieldMapping::builder(EntityRoutes::new("escrows"))
        .identity_fallback(false)
        .build();
    let mut editor = RecordEditor::new(
        RecordingTransport::default(),
        Arc::new(mapping),
        escrow_record(),
    );

    editor.begin_edit("customField");
    editor.set_buffer("x");
    let outcome = editor.save().await;

    assert!(matches!(
        outcome,
        SaveOutcome::Rejected(FieldError {
            kind: FieldErrorKind::Mapping,
            ..
        })
    ));
    assert!(editor.transport().sent().is_empty());
    assert_eq!(editor.session().phase(), FieldPhase::Editing);
}

#[tokio::test]
async fn test_identity_fallback_sends_path_verbatim() {
    let mut editor = editor(RecordingTransport::default());

    editor.begin_edit("customField");
    editor.set_buffer("  hello ");
    editor.save().await;

    assert_eq!(
        editor.transport().sent()[0].body,
        json!({ "customField": "hello" })
    );
    assert_eq!(editor.record()["customField"], json!("hello"));
}

#[tokio::test]
async fn test_sent_value_wins_over_backend_echo() {
    let echo = Ok(ApiResponse::ok(Some(json!({ "purchase_price": "499999.50" }))));
    let mut editor = editor(RecordingTransport::replying(echo));

    editor.begin_edit("purchasePrice");
    editor.set_buffer("$499,999.50");
    let outcome = editor.save().await;

    assert!(matches!(outcome, SaveOutcome::Saved { ref value, .. } if *value == json!(499999.5)));
    assert_eq!(editor.record()["purchasePrice"], json!(499999.5));
    assert_eq!(editor.display("purchasePrice"), "$499,999.50");
}

#[tokio::test]
async fn test_currency_save_on_record_without_the_field() {
    let echo = Ok(ApiResponse::ok(Some(json!({
        "id": 42,
        "purchase_price": "500000.00"
    }))));
    let mut editor = RecordEditor::new(
        RecordingTransport::replying(echo),
        Arc::new(escrow_mapping().unwrap()),
        json!({ "id": 42 }),
    );

    editor.begin_edit("purchasePrice");
    assert_eq!(editor.session().buffer(), Some(""));
    editor.set_buffer("500000");
    let outcome = editor.save().await;

    assert!(matches!(outcome, SaveOutcome::Saved { .. }));
    assert_eq!(
        editor.transport().sent()[0].body,
        json!({ "purchase_price": 500000 })
    );
    assert_eq!(editor.record()["purchasePrice"], json!(500000));
    assert_eq!(editor.phase_of("purchasePrice"), FieldPhase::Viewing);
}

#[tokio::test]
async fn test_edit_through_legacy_alias() {
    let mut editor = RecordEditor::new(
        RecordingTransport::default(),
        Arc::new(escrow_mapping().unwrap()),
        json!({ "id": "escrow-42", "purchase_price": 400000 }),
    );

    assert_eq!(editor.display("purchase_price"), "$400,000");
    editor.begin_edit("purchase_price");
    assert_eq!(editor.session().buffer(), Some("400000"));
    editor.set_buffer("500000");
    let outcome = editor.save().await;

    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            path:  FieldPath::parse("purchasePrice").unwrap(),
            value: json!(500000),
        }
    );
    assert_eq!(
        editor.transport().sent()[0].body,
        json!({ "purchase_price": 500000 })
    );
    assert_eq!(editor.display("purchasePrice"), "$500,000");
    assert_eq!(editor.phase_of("purchase_price"), FieldPhase::Viewing);
}

#[tokio::test]
async fn test_blob_alias_writes_whole_blob_to_sub_resource() {
    let mut editor = editor(RecordingTransport::default());

    let outcome = editor.toggle("checklist-house.emd").await;
    assert!(matches!(
        outcome,
        SaveOutcome::Saved { ref path, .. } if path.as_str() == "checklists.house.emd"
    ));

    let sent = editor.transport().sent();
    assert_eq!(sent[0].endpoint.path(), "/escrows/42/checklists");
    assert_eq!(
        sent[0].body["checklists"]["house"],
        json!({ "emd": true, "homeInspectionOrdered": true })
    );
}

#[tokio::test]
async fn test_ambiguous_alias_rejected_locally() {
    let mut editor = editor(RecordingTransport::default());

    editor.begin_edit("closing_date");
    editor.set_buffer("01/31/2025");
    let outcome = editor.save().await;

    assert!(matches!(
        outcome,
        SaveOutcome::Rejected(FieldError {
            kind: FieldErrorKind::Mapping,
            ..
        })
    ));
    assert!(editor.transport().sent().is_empty());
    assert_eq!(editor.session().phase(), FieldPhase::Editing);
}

#[tokio::test]
async fn test_save_without_active_edit_is_ignored() {
    let mut editor = editor(RecordingTransport::default());
    assert_eq!(editor.save().await, SaveOutcome::Ignored);
    assert_eq!(
        editor.save_input(EditInput::Bool(true)).await,
        SaveOutcome::Ignored
    );

    editor.begin_edit("purchasePrice");
    assert!(editor.begin_edit("propertyDetails.city").is_ignored());
    assert!(!editor.cancel().is_ignored());
    assert!(editor.transport().sent().is_empty());
}

#[tokio::test]
async fn test_save_input_from_widget() {
    let mut editor = editor(RecordingTransport::default());

    editor.begin_edit("propertyDetails.pool");
    let outcome = editor.save_input(EditInput::Bool(true)).await;
    assert!(matches!(outcome, SaveOutcome::Saved { .. }));
    assert_eq!(
        editor.transport().sent()[0].body,
        json!({ "pool": true })
    );
}

#[tokio::test]
async fn test_missing_record_id_is_rejected_before_sending() {
    let mut editor = RecordEditor::new(
        RecordingTransport::default(),
        Arc::new(escrow_mapping().unwrap()),
        json!({ "purchase_price": 1 }),
    );
    editor.begin_edit("purchasePrice");
    let outcome = editor.save().await;
    assert!(matches!(
        outcome,
        SaveOutcome::Rejected(FieldError {
            kind: FieldErrorKind::Internal,
            ..
        })
    ));
    assert!(editor.transport().sent().is_empty());
}

#[tokio::test]
async fn test_load_fetches_record_by_clean_id() {
    let transport = RecordingTransport::replying(Ok(ApiResponse::ok(Some(escrow_record()))));
    let editor = RecordEditor::load(transport, Arc::new(escrow_mapping().unwrap()), "escrow-42")
        .await
        .unwrap();

    assert_eq!(
        editor.transport().fetched.lock().unwrap()[0].path(),
        "/escrows/42"
    );
    assert_eq!(editor.display("propertyDetails.bedrooms"), "3");
}

#[tokio::test]
async fn test_load_without_record_data_fails() {
    let transport = RecordingTransport::replying(Ok(ApiResponse::ok(None)));
    let result = RecordEditor::load(transport, Arc::new(escrow_mapping().unwrap()), "42").await;
    assert!(matches!(
        result.unwrap_err().current_context(),
        Error::InvalidArgument(_)
    ));
}

#[tokio::test]
async fn test_checklist_toggle_keeps_other_categories_exact() {
    let mut record = escrow_record();
    record["checklists"]["admin"] = json!({ "mlsStatusUpdate": false, "tcEmail": true });
    let before = record["checklists"].clone();
    let mut editor = RecordEditor::new(
        RecordingTransport::default(),
        Arc::new(escrow_mapping().unwrap()),
        record,
    );

    editor.toggle("checklists.admin.mlsStatusUpdate").await;

    let body = &editor.transport().sent()[0].body;
    assert_eq!(body["checklists"]["loan"], before["loan"]);
    assert_eq!(body["checklists"]["house"], before["house"]);
    assert_eq!(
        body["checklists"]["admin"],
        json!({ "mlsStatusUpdate": true, "tcEmail": true })
    );
}
