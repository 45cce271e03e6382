pub mod confirm_dialog;
pub mod filter_panel;
pub mod pagination_controls;
