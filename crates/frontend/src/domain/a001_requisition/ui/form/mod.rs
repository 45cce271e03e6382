//! Requisition batch form
//!
//! MVVM split:
//! - view_model.rs: batch state and commands (edit, attach, submit)
//! - view.rs: Leptos components (pure UI)

mod view;
mod view_model;

pub use view::RequisitionForm;
pub use view_model::RequisitionFormViewModel;
