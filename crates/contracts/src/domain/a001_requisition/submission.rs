//! Batch submission of requisition drafts.
//!
//! All drafts of a batch are posted concurrently. Request `n` is started
//! `n * STAGGER_MS` after the batch begins to soften a backend race on
//! concurrent inserts; requests never wait for each other's responses.
//! The settled replies are classified one by one and reduced to a single
//! [`BatchResult`].

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::draft::{DraftField, RequisitionBatch, RequisitionDraft};
use super::record::RequisitionPatch;
use super::validation::{first_incomplete_index, incomplete_message};
use crate::shared::http::HttpReply;
use crate::system::session::Session;

/// Delay between the start of consecutive create requests
pub const STAGGER_MS: u32 = 200;

/// Body fragments of a 403 that the backend returns even though the
/// requisition was stored.
///
/// TODO: drop once the backend stops answering 403 on successful inserts.
pub const KNOWN_DEFECT_MARKERS: &[&str] = &["Access Denied"];

/// Requisition API operations used by the client
#[async_trait(?Send)]
pub trait RequisitionGateway {
    /// `POST /solicitudes`. `Err` carries a transport failure.
    async fn create(&self, token: &str, payload: &RequisitionPayload)
        -> Result<HttpReply, String>;

    /// `PATCH /solicitudes/{id}`. `Err` carries a transport failure.
    async fn update(
        &self,
        token: &str,
        id: i64,
        patch: &RequisitionPatch,
    ) -> Result<HttpReply, String>;
}

/// Timer used for the stagger
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep_ms(&self, ms: u32);
}

/// Body of `POST /solicitudes`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequisitionPayload {
    #[serde(rename = "prioridad")]
    pub priority: String,
    #[serde(rename = "area")]
    pub cost_center: String,
    #[serde(rename = "sp")]
    pub item_type: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "maquina")]
    pub machine: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: String,
    #[serde(rename = "precio")]
    pub price: String,
    #[serde(rename = "umedida")]
    pub unit: String,
    #[serde(rename = "moneda")]
    pub currency: String,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "familia")]
    pub family: String,
    #[serde(rename = "subFamilia")]
    pub subfamily: String,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
}

impl RequisitionPayload {
    pub fn from_draft(draft: &RequisitionDraft, user_id: i64) -> Self {
        let value = |field: DraftField| draft.fields.value(field).trim().to_string();
        let machine = value(DraftField::Machine);
        Self {
            priority: value(DraftField::Priority),
            cost_center: value(DraftField::CostCenter),
            item_type: value(DraftField::ItemType),
            description: value(DraftField::Description),
            machine: if machine.is_empty() { None } else { Some(machine) },
            quantity: value(DraftField::Quantity),
            price: value(DraftField::Price),
            unit: value(DraftField::Unit),
            currency: value(DraftField::Currency),
            reason: value(DraftField::Reason),
            family: value(DraftField::Family),
            subfamily: value(DraftField::Subfamily),
            user_id,
            image_data: draft.attachment.clone(),
        }
    }
}

/// How one create request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    RejectedAuthExpired,
    /// 403 known to be returned for stored requisitions; counts as accepted
    RejectedKnownServerDefect,
    RejectedOther { status: u16, message: String },
    NetworkError(String),
}

impl SubmissionOutcome {
    /// Classify a settled create request
    pub fn classify(result: Result<HttpReply, String>) -> Self {
        let reply = match result {
            Ok(reply) => reply,
            Err(reason) => return SubmissionOutcome::NetworkError(reason),
        };
        if reply.is_success() {
            return SubmissionOutcome::Accepted;
        }
        match reply.status {
            401 => SubmissionOutcome::RejectedAuthExpired,
            403 if is_known_defect(reply.body.as_deref()) => {
                SubmissionOutcome::RejectedKnownServerDefect
            }
            status => SubmissionOutcome::RejectedOther {
                status,
                message: reply.message(),
            },
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::Accepted | SubmissionOutcome::RejectedKnownServerDefect
        )
    }

    /// User-facing error text; `None` for accepted outcomes
    pub fn error_message(&self) -> Option<String> {
        match self {
            SubmissionOutcome::Accepted | SubmissionOutcome::RejectedKnownServerDefect => None,
            SubmissionOutcome::RejectedAuthExpired => {
                Some("La sesión ha expirado. Inicie sesión nuevamente.".to_string())
            }
            SubmissionOutcome::RejectedOther { message, .. } => Some(message.clone()),
            SubmissionOutcome::NetworkError(reason) => {
                Some(format!("Error de conexión: {}", reason))
            }
        }
    }
}

/// Unreadable and empty bodies count as the defect too
fn is_known_defect(body: Option<&str>) -> bool {
    match body.map(str::trim) {
        None => true,
        Some("") => true,
        Some(text) => KNOWN_DEFECT_MARKERS.iter().any(|m| text.contains(m)),
    }
}

/// Aggregate verdict over all outcomes of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResult {
    AllSucceeded,
    PartialSuccess { succeeded: usize, errors: Vec<String> },
    AllFailed { errors: Vec<String> },
}

impl BatchResult {
    pub fn from_outcomes(outcomes: &[SubmissionOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_accepted()).count();
        let errors: Vec<String> = outcomes
            .iter()
            .filter_map(SubmissionOutcome::error_message)
            .collect();
        if errors.is_empty() {
            BatchResult::AllSucceeded
        } else if succeeded > 0 {
            BatchResult::PartialSuccess { succeeded, errors }
        } else {
            BatchResult::AllFailed { errors }
        }
    }
}

/// Outcomes in draft order plus their reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<SubmissionOutcome>,
    pub result: BatchResult,
}

impl BatchReport {
    /// Apply the automatic part of the result to the batch: a fully accepted
    /// batch is replaced by a fresh one. Partial results wait for the user.
    pub fn settle(&self, batch: &mut RequisitionBatch) {
        if self.result == BatchResult::AllSucceeded {
            batch.reset();
        }
    }
}

/// Reasons a batch is refused before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{message}")]
    Incomplete { index: usize, message: String },
    #[error("No hay una sesión activa. Inicie sesión nuevamente.")]
    AuthMissing,
}

/// Start offset of the create request for draft `index`
pub fn stagger_delay(index: usize) -> u32 {
    STAGGER_MS.saturating_mul(index as u32)
}

/// Check that `batch` may be sent with `session`, without touching the network
pub fn check_ready(batch: &RequisitionBatch, session: &Session) -> Result<(), SubmitError> {
    if let Some(index) = first_incomplete_index(batch) {
        let message = batch
            .draft(index)
            .map(|draft| incomplete_message(index, draft))
            .unwrap_or_default();
        return Err(SubmitError::Incomplete { index, message });
    }
    if session.token().is_none() {
        return Err(SubmitError::AuthMissing);
    }
    Ok(())
}

/// Gate run by the form before sending: a refused batch jumps to the first
/// incomplete draft so the user lands on what needs fixing.
pub fn prepare_submission(
    batch: &mut RequisitionBatch,
    session: &Session,
) -> Result<(), SubmitError> {
    let checked = check_ready(batch, session);
    if let Err(SubmitError::Incomplete { index, .. }) = &checked {
        batch.select_tab(*index);
    }
    checked
}

/// Submit every draft of `batch` and report the aggregated result.
///
/// The batch itself is left untouched; callers apply [`BatchReport::settle`].
pub async fn submit_batch<G, D>(
    gateway: &G,
    delay: &D,
    session: &Session,
    batch: &RequisitionBatch,
) -> Result<BatchReport, SubmitError>
where
    G: RequisitionGateway + ?Sized,
    D: Delay + ?Sized,
{
    check_ready(batch, session)?;
    let token = session.token().ok_or(SubmitError::AuthMissing)?;

    let payloads: Vec<RequisitionPayload> = batch
        .drafts()
        .iter()
        .map(|draft| RequisitionPayload::from_draft(draft, session.user_id))
        .collect();
    log::info!("submitting {} requisition(s)", payloads.len());

    let requests = payloads.iter().enumerate().map(|(index, payload)| async move {
        let wait = stagger_delay(index);
        if wait > 0 {
            delay.sleep_ms(wait).await;
        }
        let outcome = SubmissionOutcome::classify(gateway.create(token, payload).await);
        if !outcome.is_accepted() {
            log::warn!("requisition #{} not accepted: {:?}", index + 1, outcome);
        } else if outcome == SubmissionOutcome::RejectedKnownServerDefect {
            log::debug!("requisition #{} answered 403, counted as stored", index + 1);
        }
        outcome
    });
    let outcomes = join_all(requests).await;

    let result = BatchResult::from_outcomes(&outcomes);
    log::info!("batch settled: {:?}", result);
    Ok(BatchReport { outcomes, result })
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Gateway answering from a script and recording every call
    #[derive(Default)]
    pub struct ScriptedGateway {
        pub replies: RefCell<VecDeque<Result<HttpReply, String>>>,
        pub created: RefCell<Vec<RequisitionPayload>>,
        pub patches: RefCell<Vec<(i64, RequisitionPatch)>>,
        pub tokens: RefCell<Vec<String>>,
    }

    impl ScriptedGateway {
        pub fn with_replies(replies: Vec<Result<HttpReply, String>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                ..Self::default()
            }
        }

        fn next_reply(&self) -> Result<HttpReply, String> {
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpReply::new(200, "{}")))
        }
    }

    #[async_trait(?Send)]
    impl RequisitionGateway for ScriptedGateway {
        async fn create(
            &self,
            token: &str,
            payload: &RequisitionPayload,
        ) -> Result<HttpReply, String> {
            self.tokens.borrow_mut().push(token.to_string());
            self.created.borrow_mut().push(payload.clone());
            self.next_reply()
        }

        async fn update(
            &self,
            token: &str,
            id: i64,
            patch: &RequisitionPatch,
        ) -> Result<HttpReply, String> {
            self.tokens.borrow_mut().push(token.to_string());
            self.patches.borrow_mut().push((id, patch.clone()));
            self.next_reply()
        }
    }

    /// Delay that returns immediately and remembers what was asked
    #[derive(Default)]
    pub struct RecordingDelay {
        pub waits: RefCell<Vec<u32>>,
    }

    #[async_trait(?Send)]
    impl Delay for RecordingDelay {
        async fn sleep_ms(&self, ms: u32) {
            self.waits.borrow_mut().push(ms);
        }
    }

    pub fn session() -> Session {
        Session {
            token: "token-1".to_string(),
            email: "ana@example.com".to_string(),
            user_id: 9,
            role: None,
            first_name: "Ana".to_string(),
            last_name: "Soto".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{session, RecordingDelay, ScriptedGateway};
    use super::*;
    use crate::domain::a001_requisition::draft::DraftField;
    use crate::domain::a001_requisition::validation::fixtures::complete_batch;
    use futures::executor::block_on;

    fn ok() -> Result<HttpReply, String> {
        Ok(HttpReply::new(201, r#"{"id":1}"#))
    }

    #[test]
    fn test_classify_statuses() {
        assert_eq!(SubmissionOutcome::classify(ok()), SubmissionOutcome::Accepted);
        assert_eq!(
            SubmissionOutcome::classify(Ok(HttpReply::new(401, "Unauthorized"))),
            SubmissionOutcome::RejectedAuthExpired
        );
        assert_eq!(
            SubmissionOutcome::classify(Ok(HttpReply::new(500, "db error"))),
            SubmissionOutcome::RejectedOther {
                status: 500,
                message: "db error".to_string()
            }
        );
        assert_eq!(
            SubmissionOutcome::classify(Err("connection refused".to_string())),
            SubmissionOutcome::NetworkError("connection refused".to_string())
        );
    }

    #[test]
    fn test_empty_403_counts_as_accepted() {
        let outcome = SubmissionOutcome::classify(Ok(HttpReply::new(403, "")));
        assert_eq!(outcome, SubmissionOutcome::RejectedKnownServerDefect);
        assert!(outcome.is_accepted());

        let unreadable = SubmissionOutcome::classify(Ok(HttpReply::unreadable(403)));
        assert!(unreadable.is_accepted());

        let marker = SubmissionOutcome::classify(Ok(HttpReply::new(
            403,
            r#"{"error":"Access Denied"}"#,
        )));
        assert!(marker.is_accepted());
    }

    #[test]
    fn test_403_with_other_body_is_rejected() {
        let outcome = SubmissionOutcome::classify(Ok(HttpReply::new(403, "cuenta bloqueada")));
        assert_eq!(
            outcome,
            SubmissionOutcome::RejectedOther {
                status: 403,
                message: "cuenta bloqueada".to_string()
            }
        );
    }

    #[test]
    fn test_reduce_outcomes() {
        use SubmissionOutcome::*;
        assert_eq!(
            BatchResult::from_outcomes(&[Accepted, RejectedKnownServerDefect]),
            BatchResult::AllSucceeded
        );
        let partial = BatchResult::from_outcomes(&[Accepted, RejectedAuthExpired]);
        match partial {
            BatchResult::PartialSuccess { succeeded, errors } => {
                assert_eq!(succeeded, 1);
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            BatchResult::from_outcomes(&[NetworkError("down".to_string())]),
            BatchResult::AllFailed {
                errors: vec!["Error de conexión: down".to_string()]
            }
        );
    }

    #[test]
    fn test_all_accepted_resets_batch() {
        let gateway = ScriptedGateway::with_replies(vec![ok(), ok()]);
        let delay = RecordingDelay::default();
        let mut batch = complete_batch(2);

        let report = block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap();
        assert_eq!(report.result, BatchResult::AllSucceeded);
        assert_eq!(gateway.created.borrow().len(), 2);

        report.settle(&mut batch);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.active(), 0);
        assert!(batch.active_draft().fields.description.is_empty());
    }

    #[test]
    fn test_one_request_per_draft_with_stagger() {
        let gateway = ScriptedGateway::default();
        let delay = RecordingDelay::default();
        let batch = complete_batch(4);

        block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap();
        assert_eq!(gateway.created.borrow().len(), 4);
        assert_eq!(*delay.waits.borrow(), vec![200, 400, 600]);
        assert!(gateway.tokens.borrow().iter().all(|t| t == "token-1"));
    }

    #[test]
    fn test_payload_carries_user_and_attachment() {
        let gateway = ScriptedGateway::default();
        let delay = RecordingDelay::default();
        let mut batch = complete_batch(1);
        batch.set_attachment(0, Some("aW1n".to_string()));
        batch.set_field(0, DraftField::Machine, "  ");

        block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap();
        let created = gateway.created.borrow();
        assert_eq!(created[0].user_id, 9);
        assert_eq!(created[0].image_data.as_deref(), Some("aW1n"));
        assert_eq!(created[0].machine, None);
        assert_eq!(created[0].subfamily, "Mecánicos");

        let body = serde_json::to_value(&created[0]).unwrap();
        assert_eq!(body["usuarioId"], 9);
        assert_eq!(body["prioridad"], "Urgencia");
    }

    #[test]
    fn test_partial_success_keeps_batch() {
        let gateway = ScriptedGateway::with_replies(vec![ok(), Ok(HttpReply::new(500, "db error"))]);
        let delay = RecordingDelay::default();
        let mut batch = complete_batch(2);
        let before = batch.clone();

        let report = block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap();
        assert_eq!(
            report.result,
            BatchResult::PartialSuccess {
                succeeded: 1,
                errors: vec!["db error".to_string()]
            }
        );
        report.settle(&mut batch);
        assert_eq!(batch, before);
    }

    #[test]
    fn test_auth_expired_is_not_counted() {
        let gateway =
            ScriptedGateway::with_replies(vec![Ok(HttpReply::new(401, "")), ok(), ok()]);
        let delay = RecordingDelay::default();
        let batch = complete_batch(3);

        let report = block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap();
        assert_eq!(report.outcomes[0], SubmissionOutcome::RejectedAuthExpired);
        match report.result {
            BatchResult::PartialSuccess { succeeded, .. } => assert_eq!(succeeded, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_all_failed_keeps_batch_and_collects_errors() {
        let gateway = ScriptedGateway::with_replies(vec![
            Ok(HttpReply::new(400, "precio inválido")),
            Err("offline".to_string()),
        ]);
        let delay = RecordingDelay::default();
        let mut batch = complete_batch(2);
        let before = batch.clone();

        let report = block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap();
        assert_eq!(
            report.result,
            BatchResult::AllFailed {
                errors: vec![
                    "precio inválido".to_string(),
                    "Error de conexión: offline".to_string()
                ]
            }
        );
        report.settle(&mut batch);
        assert_eq!(batch, before);
    }

    #[test]
    fn test_incomplete_draft_refuses_without_requests() {
        let gateway = ScriptedGateway::default();
        let delay = RecordingDelay::default();
        let mut batch = complete_batch(3);
        batch.set_field(1, DraftField::Description, "");

        let err = block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap_err();
        match err {
            SubmitError::Incomplete { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("Descripción"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(gateway.created.borrow().is_empty());
    }

    #[test]
    fn test_refused_batch_selects_incomplete_draft() {
        let gateway = ScriptedGateway::default();
        let delay = RecordingDelay::default();
        let mut batch = complete_batch(3);
        batch.set_field(1, DraftField::Quantity, " ");
        assert_eq!(batch.active(), 2);

        let prepared = prepare_submission(&mut batch, &session());
        assert!(matches!(prepared, Err(SubmitError::Incomplete { index: 1, .. })));
        assert_eq!(batch.active(), 1);

        if prepared.is_ok() {
            block_on(submit_batch(&gateway, &delay, &session(), &batch)).unwrap();
        }
        assert!(gateway.created.borrow().is_empty());
        assert!(delay.waits.borrow().is_empty());
    }

    #[test]
    fn test_missing_token_keeps_active_tab() {
        let mut batch = complete_batch(2);
        batch.select_tab(0);
        let session = Session {
            token: String::new(),
            ..session()
        };
        assert_eq!(prepare_submission(&mut batch, &session), Err(SubmitError::AuthMissing));
        assert_eq!(batch.active(), 0);
    }

    #[test]
    fn test_missing_token_refuses_without_requests() {
        let gateway = ScriptedGateway::default();
        let delay = RecordingDelay::default();
        let batch = complete_batch(2);
        let session = Session {
            token: String::new(),
            ..session()
        };

        let err = block_on(submit_batch(&gateway, &delay, &session, &batch)).unwrap_err();
        assert_eq!(err, SubmitError::AuthMissing);
        assert!(gateway.created.borrow().is_empty());
        assert!(delay.waits.borrow().is_empty());
    }
}
