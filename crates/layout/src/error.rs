//! Diagnostics for render-tree construction and layout.

use std::fmt;

/// Render-tree construction invariants the builder relies on. These
/// indicate a malformed input tree (e.g. the document root is not a block)
/// rather than a recoverable condition, so callers are expected to treat
/// them as fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderTreeError {
    /// The document root's resolved `display` was not `block` — the style
    /// attacher's `html` override should make this unreachable.
    RootNotBlock,
    /// A positioned descendant needed a positioned ancestor to hoist into
    /// but none existed above it in the render tree.
    NoPositionedAncestor,
}

impl fmt::Display for RenderTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderTreeError::RootNotBlock => {
                write!(f, "document root did not resolve to `display: block`")
            }
            RenderTreeError::NoPositionedAncestor => {
                write!(f, "absolutely positioned element has no positioned ancestor")
            }
        }
    }
}

impl std::error::Error for RenderTreeError {}

pub type Result<T> = std::result::Result<T, RenderTreeError>;

/// Layout-solver invariants. `MalformedLength` should be unreachable in
/// practice: the style attacher's grammar defaulting guarantees every
/// length-bearing property is either `Npx`, `N%`, or (where allowed) `auto`
/// before it ever reaches `compute_length`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// `compute_length` was asked to resolve `auto` where `auto` isn't a
    /// legal value for that call site.
    MalformedLength,
    /// The render tree's root wasn't `display: block; position: relative`
    /// — the style attacher's root override should make this unreachable.
    RootNotRelativeBlock,
    /// A positioned render block reached phase C with no parent, despite
    /// the render tree's hoisting pass guaranteeing every positioned block
    /// has one.
    PositionedNodeMissingParent,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::MalformedLength => {
                write!(f, "length value matched neither px, %, nor a permitted auto")
            }
            LayoutError::RootNotRelativeBlock => {
                write!(f, "layout root is not `display: block; position: relative`")
            }
            LayoutError::PositionedNodeMissingParent => {
                write!(f, "positioned render block has no parent at layout time")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
