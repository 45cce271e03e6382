//! Review table state: inline edits gated by a confirmation step.
//!
//! An edit is first proposed (nothing is sent), then either cancelled, which
//! rolls the control back to the stored value, or confirmed, which sends one
//! PATCH and on success updates only the affected record in place.

use super::catalog::{Family, Subfamily};
use super::export::UNASSIGNED_PURCHASE_ORDER;
use super::record::{Requisition, RequisitionPatch, RequisitionStatus};
use super::submission::RequisitionGateway;
use crate::shared::http::RequestError;
use crate::shared::page::Page;

/// Rows per page in the review tables
pub const REVIEW_PAGE_SIZE: usize = 14;

/// Change requested on one record
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    Status(RequisitionStatus),
    PurchaseOrder(String),
    Category { family: Family, subfamily: Subfamily },
}

/// Edit waiting for the reviewer's confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub requisition_id: i64,
    /// Stored value before the edit, for the confirmation dialog
    pub current: String,
    pub edit: RowEdit,
}

impl PendingEdit {
    /// Propose a status change; `None` when the status is unchanged
    pub fn status(record: &Requisition, status: RequisitionStatus) -> Option<Self> {
        if record.status == status || status == RequisitionStatus::Unknown {
            return None;
        }
        Some(Self {
            requisition_id: record.id,
            current: record.status.code().to_string(),
            edit: RowEdit::Status(status),
        })
    }

    /// Propose a purchase order; only approved records take one, and only a
    /// non-blank value different from the stored one is proposed
    pub fn purchase_order(record: &Requisition, typed: &str) -> Option<Self> {
        let typed = typed.trim();
        if record.status != RequisitionStatus::Approved || typed.is_empty() {
            return None;
        }
        if record.assigned_purchase_order() == Some(typed) {
            return None;
        }
        Some(Self {
            requisition_id: record.id,
            current: record
                .assigned_purchase_order()
                .unwrap_or(UNASSIGNED_PURCHASE_ORDER)
                .to_string(),
            edit: RowEdit::PurchaseOrder(typed.to_string()),
        })
    }

    /// Propose a new classification; the subfamily must belong to the family
    pub fn category(record: &Requisition, family: Family, subfamily: Subfamily) -> Option<Self> {
        if subfamily.family() != family {
            return None;
        }
        if record.family_kind() == Some(family) && record.subfamily_kind() == Some(subfamily) {
            return None;
        }
        Some(Self {
            requisition_id: record.id,
            current: format!("{} / {}", record.family, record.subfamily),
            edit: RowEdit::Category { family, subfamily },
        })
    }

    /// New value as shown in the confirmation dialog
    pub fn proposed(&self) -> String {
        match &self.edit {
            RowEdit::Status(status) => status.code().to_string(),
            RowEdit::PurchaseOrder(po) => po.clone(),
            RowEdit::Category { family, subfamily } => {
                format!("{} / {}", family.code(), subfamily.code())
            }
        }
    }

    pub fn patch(&self) -> RequisitionPatch {
        match &self.edit {
            RowEdit::Status(status) => RequisitionPatch::status(*status),
            RowEdit::PurchaseOrder(po) => RequisitionPatch::purchase_order(po.clone()),
            RowEdit::Category { family, subfamily } => {
                RequisitionPatch::category(*family, *subfamily)
            }
        }
    }

    fn apply_to(&self, record: &mut Requisition) {
        match &self.edit {
            RowEdit::Status(status) => record.status = *status,
            RowEdit::PurchaseOrder(po) => record.purchase_order = Some(po.clone()),
            RowEdit::Category { family, subfamily } => {
                record.family = family.code().to_string();
                record.subfamily = subfamily.code().to_string();
            }
        }
    }
}

/// Send the PATCH for a confirmed edit
pub async fn send_edit<G>(
    gateway: &G,
    token: Option<&str>,
    edit: &PendingEdit,
) -> Result<(), RequestError>
where
    G: RequisitionGateway + ?Sized,
{
    let token = token.ok_or(RequestError::AuthMissing)?;
    log::info!(
        "PATCH requisition {} -> {}",
        edit.requisition_id,
        edit.proposed()
    );
    RequestError::check(
        gateway
            .update(token, edit.requisition_id, &edit.patch())
            .await,
    )
}

/// Loaded page of records plus the edit awaiting confirmation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewBoard {
    pub records: Vec<Requisition>,
    pub page: usize,
    pub total_pages: usize,
    pub total_elements: usize,
    pending: Option<PendingEdit>,
    /// Bumped on every rollback so controls re-read their stored value
    revision: u64,
}

impl ReviewBoard {
    pub fn load(&mut self, page: usize, loaded: Page<Requisition>) {
        self.records = loaded.content;
        self.page = page;
        self.total_pages = loaded.total_pages.max(1);
        self.total_elements = loaded.total_elements;
        self.pending = None;
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.total_pages = 1;
        self.total_elements = 0;
        self.pending = None;
    }

    pub fn record(&self, id: i64) -> Option<&Requisition> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Hold an edit for confirmation; a missing proposal is ignored
    pub fn propose(&mut self, edit: Option<PendingEdit>) {
        if let Some(edit) = edit {
            self.pending = Some(edit);
        }
    }

    /// Take the pending edit out for sending
    pub fn take_pending(&mut self) -> Option<PendingEdit> {
        self.pending.take()
    }

    /// Drop the pending edit and roll controls back to stored values
    pub fn cancel(&mut self) {
        self.pending = None;
        self.revision += 1;
    }

    /// Apply a confirmed, accepted edit to its record only
    pub fn commit(&mut self, edit: &PendingEdit) {
        if let Some(record) = self
            .records
            .iter_mut()
            .find(|r| r.id == edit.requisition_id)
        {
            edit.apply_to(record);
        }
        self.pending = None;
    }

    /// An accepted edit failed to apply server-side
    pub fn rollback(&mut self) {
        self.cancel();
    }
}

/// Client-side filters over the loaded page; empty values match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub priority: String,
    pub item_type: String,
    pub status: String,
    pub requester: String,
    pub id: String,
}

impl ReviewFilter {
    pub fn matches(&self, record: &Requisition, requester_name: &str) -> bool {
        (self.priority.is_empty() || record.priority == self.priority)
            && (self.item_type.is_empty() || record.item_type == self.item_type)
            && (self.status.is_empty() || record.status.code() == self.status)
            && (self.requester.trim().is_empty()
                || requester_name
                    .to_lowercase()
                    .contains(&self.requester.trim().to_lowercase()))
            && (self.id.trim().is_empty() || record.id.to_string().contains(self.id.trim()))
    }

    pub fn active_count(&self) -> usize {
        [
            &self.priority,
            &self.item_type,
            &self.status,
            &self.requester,
            &self.id,
        ]
        .iter()
        .filter(|v| !v.trim().is_empty())
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_requisition::submission::fakes::ScriptedGateway;
    use crate::shared::http::HttpReply;
    use futures::executor::block_on;

    fn record(id: i64, status: RequisitionStatus) -> Requisition {
        Requisition {
            id,
            priority: "Urgencia".to_string(),
            item_type: "Producto".to_string(),
            description: "Filtro de aire".to_string(),
            status,
            user_id: 3,
            family: "Repuestos".to_string(),
            subfamily: "Mecánicos".to_string(),
            ..Requisition::default()
        }
    }

    fn board() -> ReviewBoard {
        let mut board = ReviewBoard::default();
        board.load(
            0,
            Page {
                content: vec![
                    record(1, RequisitionStatus::Pending),
                    record(2, RequisitionStatus::Approved),
                ],
                total_pages: 1,
                total_elements: 2,
            },
        );
        board
    }

    #[test]
    fn test_same_status_is_not_proposed() {
        let r = record(1, RequisitionStatus::Pending);
        assert!(PendingEdit::status(&r, RequisitionStatus::Pending).is_none());
        assert!(PendingEdit::status(&r, RequisitionStatus::Rejected).is_some());
    }

    #[test]
    fn test_any_status_reachable_from_any_other() {
        for from in RequisitionStatus::all() {
            for to in RequisitionStatus::all() {
                let edit = PendingEdit::status(&record(1, from), to);
                assert_eq!(edit.is_some(), from != to);
            }
        }
    }

    #[test]
    fn test_confirmed_status_change_sends_one_patch_and_updates_row() {
        let gateway = ScriptedGateway::with_replies(vec![Ok(HttpReply::new(200, "{}"))]);
        let mut board = board();
        let before_other = board.record(2).cloned();

        board.propose(PendingEdit::status(
            board.record(1).unwrap(),
            RequisitionStatus::Approved,
        ));
        let edit = board.take_pending().unwrap();
        block_on(send_edit(&gateway, Some("tok"), &edit)).unwrap();
        board.commit(&edit);

        let patches = gateway.patches.borrow();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, 1);
        assert_eq!(
            serde_json::to_value(&patches[0].1).unwrap(),
            serde_json::json!({"estado": "Aprobado"})
        );
        assert_eq!(board.record(1).unwrap().status, RequisitionStatus::Approved);
        assert_eq!(board.record(2).cloned(), before_other);
    }

    #[test]
    fn test_cancel_rolls_back_without_patch() {
        let gateway = ScriptedGateway::default();
        let mut board = board();
        let revision = board.revision();

        board.propose(PendingEdit::status(
            board.record(1).unwrap(),
            RequisitionStatus::Approved,
        ));
        assert!(board.pending().is_some());
        board.cancel();

        assert!(board.pending().is_none());
        assert!(board.revision() > revision);
        assert_eq!(board.record(1).unwrap().status, RequisitionStatus::Pending);
        assert!(gateway.patches.borrow().is_empty());
    }

    #[test]
    fn test_failed_patch_leaves_record_unchanged() {
        let gateway = ScriptedGateway::with_replies(vec![Ok(HttpReply::new(500, "boom"))]);
        let mut board = board();
        board.propose(PendingEdit::status(
            board.record(1).unwrap(),
            RequisitionStatus::Rejected,
        ));
        let edit = board.take_pending().unwrap();

        let err = block_on(send_edit(&gateway, Some("tok"), &edit)).unwrap_err();
        assert_eq!(
            err,
            RequestError::ServerRejected {
                status: 500,
                message: "boom".to_string()
            }
        );
        board.rollback();
        assert_eq!(board.record(1).unwrap().status, RequisitionStatus::Pending);
    }

    #[test]
    fn test_send_without_token_is_refused() {
        let gateway = ScriptedGateway::default();
        let edit = PendingEdit::status(&record(1, RequisitionStatus::Pending), RequisitionStatus::Approved)
            .unwrap();
        let err = block_on(send_edit(&gateway, None, &edit)).unwrap_err();
        assert_eq!(err, RequestError::AuthMissing);
        assert!(gateway.patches.borrow().is_empty());
    }

    #[test]
    fn test_purchase_order_rules() {
        let pending = record(1, RequisitionStatus::Pending);
        assert!(PendingEdit::purchase_order(&pending, "OC-100").is_none());

        let mut approved = record(2, RequisitionStatus::Approved);
        assert!(PendingEdit::purchase_order(&approved, "   ").is_none());

        let edit = PendingEdit::purchase_order(&approved, " OC-100 ").unwrap();
        assert_eq!(edit.proposed(), "OC-100");
        assert_eq!(edit.current, "Sin asignar");

        approved.purchase_order = Some("OC-100".to_string());
        assert!(PendingEdit::purchase_order(&approved, "OC-100").is_none());
        assert!(PendingEdit::purchase_order(&approved, "OC-101").is_some());
    }

    #[test]
    fn test_category_requires_consistent_pair() {
        let r = record(1, RequisitionStatus::Pending);
        assert!(PendingEdit::category(&r, Family::Office, Subfamily::Mechanical).is_none());
        assert!(PendingEdit::category(&r, Family::SpareParts, Subfamily::Mechanical).is_none());

        let edit = PendingEdit::category(&r, Family::Tools, Subfamily::Measuring).unwrap();
        let mut board = board();
        board.commit(&edit);
        let updated = board.record(1).unwrap();
        assert_eq!(updated.family, "Herramientas");
        assert_eq!(updated.subfamily, "Medición");
    }

    #[test]
    fn test_filters_combine() {
        let r = record(15, RequisitionStatus::Approved);
        assert!(ReviewFilter::default().matches(&r, "Ana Soto"));

        let filter = ReviewFilter {
            status: "Aprobado".to_string(),
            requester: "soto".to_string(),
            id: "5".to_string(),
            ..ReviewFilter::default()
        };
        assert!(filter.matches(&r, "Ana Soto"));
        assert!(!filter.matches(&r, "Luis Paz"));
        assert_eq!(filter.active_count(), 3);

        let by_type = ReviewFilter {
            item_type: "Servicio".to_string(),
            ..ReviewFilter::default()
        };
        assert!(!by_type.matches(&r, "Ana Soto"));
    }
}
