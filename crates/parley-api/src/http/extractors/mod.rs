//! Request extractors.
//!
//! - `caller`: resolves the caller's owner scope from `Authorization`
//! - `json`: JSON body extraction with field validation

pub mod caller;
pub mod json;
