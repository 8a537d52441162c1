//! Stylesheet ingestion and style attachment.
//!
//! A deliberate divergence from real CSS: the cascade here is a fixed
//! bucket order (universal, tag, class, id), not specificity comparison.
//! `cssom::Cssom` models that directly instead of a generic sorted rule
//! list.

pub mod cascade;
pub mod computed;
pub mod cssom;
pub mod values;

pub use cascade::attach_styles;
pub use computed::ComputedStyle;
pub use cssom::Cssom;
