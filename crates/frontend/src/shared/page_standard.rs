//! Page category constants.
//!
//! Every page declares an HTML `id` shaped `{entity}--{category}` and a
//! `data-page-category` with one of the values below, so a DOM id copied from
//! the inspector leads straight to its module.

/// Table of records with filters and pagination
pub const PAGE_CAT_LIST: &str = "list";

/// Data-entry form
pub const PAGE_CAT_FORM: &str = "form";

/// Login and other system pages
pub const PAGE_CAT_SYSTEM: &str = "system";
