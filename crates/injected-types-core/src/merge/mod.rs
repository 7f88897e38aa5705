//! Directive merge engine: normalization, union, and legacy precedence.
//!
//! Pure logic over [`model`](crate::model) types: no registry, no property
//! scanning. The resolver and the per-property assigner in the main
//! `injected-types` crate feed declarations in and take outcomes out.

pub mod join;
pub mod normalize;
pub mod types;


pub use join::{merge_directives, merge_with_legacy};
pub use normalize::normalize;
pub use types::{DirectiveError, MergeOrigin, MergeOutcome, TypeConflict};
