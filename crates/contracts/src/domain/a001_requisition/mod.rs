pub mod catalog;
pub mod draft;
pub mod export;
pub mod record;
pub mod review;
pub mod submission;
pub mod validation;

pub use catalog::{Currency, Family, ItemType, Priority, Subfamily, Unit};
pub use draft::{DraftField, RequisitionBatch, RequisitionDraft, MAX_DRAFTS};
pub use record::{ListScope, Requisition, RequisitionPatch, RequisitionStatus};
pub use review::{PendingEdit, ReviewBoard, ReviewFilter, RowEdit};
pub use submission::{BatchReport, BatchResult, SubmissionOutcome, SubmitError};
