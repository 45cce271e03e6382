//! Types and rules shared by the requisitions frontend.
//!
//! Everything here is UI-free so it can be tested natively.

pub mod domain;
pub mod shared;
pub mod system;
