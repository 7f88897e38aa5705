//! Core types and pure merge logic for allowed-types directives.
//!
//! A content-model property may carry a code-declared directive (registered
//! against the content type and property name) and an attribute-declared one
//! (on the property itself). This crate validates both and folds them into the
//! single effective directive the host's enforcement pipeline consumes.

pub mod merge;
pub mod model;
