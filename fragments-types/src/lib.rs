//! Core type vocabulary for the fragments engine.
//!
//! Defines the closed set of MIME types a fragment may carry and the
//! identifier type shared by the storage and model layers:
//! - [`FragmentId`] — random UUID fragment identifier
//! - [`FragmentType`] — supported MIME types and their allowed output formats
//! - [`TargetFormat`] — the extension vocabulary used by conversion requests
//!
//! The conversion table is a fixed constant with no lifecycle beyond
//! process start; adding a type means adding an enum variant here and a
//! transform in `fragments-convert`.

mod ids;
mod mime;

pub use ids::FragmentId;
pub use mime::{FragmentType, TargetFormat};
