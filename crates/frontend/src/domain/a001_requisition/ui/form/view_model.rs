use contracts::domain::a001_requisition::draft::{data_url_payload, DraftField, RequisitionBatch};
use contracts::domain::a001_requisition::submission::{
    prepare_submission, submit_batch, BatchResult,
};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{File, FileReader};

use crate::domain::a001_requisition::api::{self, BrowserDelay, HttpRequisitionApi};
use crate::system::auth::context::AuthState;

/// ViewModel for the requisition batch form
#[derive(Clone, Copy)]
pub struct RequisitionFormViewModel {
    pub batch: RwSignal<RequisitionBatch>,
    pub areas: RwSignal<Vec<String>>,
    pub submitting: RwSignal<bool>,
    auth: ReadSignal<AuthState>,
}

impl RequisitionFormViewModel {
    pub fn new(auth: ReadSignal<AuthState>) -> Self {
        let fixed_cost_center = auth
            .get_untracked()
            .session
            .and_then(|s| s.role)
            .and_then(|r| r.fixed_cost_center())
            .map(str::to_string);
        Self {
            batch: RwSignal::new(RequisitionBatch::new(fixed_cost_center)),
            areas: RwSignal::new(Vec::new()),
            submitting: RwSignal::new(false),
            auth,
        }
    }

    /// Load cost centers for the select; the field falls back to free text
    pub fn load_areas(&self) {
        let Some(token) = self.token() else {
            return;
        };
        let areas = self.areas;
        spawn_local(async move {
            match api::fetch_areas(&token).await {
                Ok(list) => areas.set(list),
                Err(e) => log::warn!("cost centers unavailable: {}", e),
            }
        });
    }

    fn token(&self) -> Option<String> {
        self.auth
            .get_untracked()
            .session
            .and_then(|s| s.token().map(str::to_string))
    }

    pub fn add_draft(&self) {
        self.batch.update(|b| b.add_draft());
    }

    /// Drafts stay in place while their requests are in flight
    pub fn can_remove(&self) -> bool {
        !self.submitting.get() && self.batch.with(|b| b.can_remove())
    }

    pub fn remove_draft(&self, index: usize) {
        if self.submitting.get_untracked() {
            return;
        }
        self.batch.update(|b| b.remove_draft(index));
    }

    pub fn select_tab(&self, index: usize) {
        self.batch.update(|b| b.select_tab(index));
    }

    /// Edit a field of the draft with local id `draft_id`
    pub fn set_field(&self, draft_id: u32, field: DraftField, value: String) {
        self.batch.update(|b| {
            if let Some(index) = position_of(b, draft_id) {
                b.set_field(index, field, &value);
            }
        });
    }

    /// Form-control value of `field` on draft `draft_id`
    pub fn field_value(&self, draft_id: u32, field: DraftField) -> String {
        self.batch.with(|b| {
            position_of(b, draft_id)
                .and_then(|index| b.draft(index))
                .map(|d| d.fields.value(field))
                .unwrap_or_default()
        })
    }

    pub fn attachment(&self, draft_id: u32) -> Option<String> {
        self.batch.with(|b| {
            position_of(b, draft_id)
                .and_then(|index| b.draft(index))
                .and_then(|d| d.attachment.clone())
        })
    }

    pub fn clear_attachment(&self, draft_id: u32) {
        self.batch.update(|b| {
            if let Some(index) = position_of(b, draft_id) {
                b.set_attachment(index, None);
            }
        });
    }

    /// Read `file` as base64 and attach it to the draft with local id `draft_id`
    pub fn attach_file(&self, draft_id: u32, file: File) {
        let reader = match FileReader::new() {
            Ok(reader) => reader,
            Err(e) => {
                log::error!("FileReader unavailable: {:?}", e);
                return;
            }
        };

        let batch = self.batch;
        let source = reader.clone();
        let onload = Closure::once(move || {
            let payload = source
                .result()
                .ok()
                .and_then(|v| v.as_string())
                .and_then(|url| data_url_payload(&url));
            // the draft may have moved or been removed while the file was read
            batch.update(|b| {
                if let Some(index) = position_of(b, draft_id) {
                    b.set_attachment(index, payload);
                }
            });
        });
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        if let Err(e) = reader.read_as_data_url(&file) {
            log::error!("could not read attachment: {:?}", e);
        }
    }

    /// Validate, submit every draft and report the settled batch
    pub fn submit_command(&self) {
        if self.submitting.get_untracked() {
            return;
        }
        let session = self.auth.get_untracked().session.unwrap_or_default();
        let mut prepared = Ok(());
        self.batch.update(|b| prepared = prepare_submission(b, &session));
        if let Err(err) = prepared {
            alert(&err.to_string());
            return;
        }
        let snapshot = self.batch.get_untracked();

        let batch = self.batch;
        let submitting = self.submitting;
        submitting.set(true);
        spawn_local(async move {
            let result = submit_batch(&HttpRequisitionApi, &BrowserDelay, &session, &snapshot).await;
            submitting.set(false);

            let report = match result {
                Ok(report) => report,
                Err(err) => {
                    alert(&err.to_string());
                    return;
                }
            };

            let total = report.outcomes.len();
            batch.update(|b| report.settle(b));
            match &report.result {
                BatchResult::AllSucceeded => {
                    alert(&format!("Se enviaron {} solicitud(es) correctamente.", total));
                }
                BatchResult::PartialSuccess { succeeded, errors } => {
                    let question = format!(
                        "Se enviaron {} de {} solicitudes.\n\nErrores:\n{}\n\n¿Desea limpiar el formulario?",
                        succeeded,
                        total,
                        errors.join("\n")
                    );
                    if confirm(&question) {
                        batch.update(|b| b.reset());
                    }
                }
                BatchResult::AllFailed { errors } => {
                    alert(&format!(
                        "No se pudo enviar ninguna solicitud.\n\n{}",
                        errors.join("\n")
                    ));
                }
            }
        });
    }
}

fn position_of(batch: &RequisitionBatch, draft_id: u32) -> Option<usize> {
    batch.drafts().iter().position(|d| d.id == draft_id)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_draft_form() -> RequisitionFormViewModel {
        let (auth, _) = signal(AuthState::default());
        let vm = RequisitionFormViewModel::new(auth);
        vm.add_draft();
        vm
    }

    #[test]
    fn test_remove_draft_blocked_while_submitting() {
        let owner = Owner::new();
        owner.with(|| {
            let vm = two_draft_form();
            vm.submitting.set(true);
            assert!(!vm.can_remove());
            vm.remove_draft(0);
            assert_eq!(vm.batch.with_untracked(|b| b.len()), 2);

            vm.submitting.set(false);
            assert!(vm.can_remove());
            vm.remove_draft(0);
            assert_eq!(vm.batch.with_untracked(|b| b.len()), 1);
        });
    }
}
