//! Fragment entity and owner-scoped directory operations.
//!
//! A [`Fragment`] is a validated metadata record plus a handle to the
//! storage collaborator:
//! - construction validates owner, type and size and generates missing ids
//! - `save` / `set_data` / `data` keep the stored metadata and payload
//!   halves consistent
//! - `by_id` / `by_user` / `delete` are the owner-scoped directory lookups
//! - `formats` / `convert_data` drive content negotiation
//!
//! The entity is the only writer of both stores; everything above it
//! (routing, auth, response envelopes) consumes the record shape exposed
//! by [`Fragment::record`].

mod error;
mod fragment;

pub use error::{FragmentError, FragmentResult};
pub use fragment::{Fragment, FragmentDraft};
