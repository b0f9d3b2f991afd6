//! URL handling for mirrorpress
//!
//! This module owns the canonical URL form that everything else keys on:
//! decomposition into filesystem path parts, normalization of raw
//! references, relative-reference resolution, and the allowed/blocked scope
//! filter.

mod canonical;
mod parts;
mod scope;

pub use canonical::{canonicalize, clean, resolve_absolute};
pub use parts::{decompose, decompose_reference, UrlParts};
pub use scope::is_in_scope;
