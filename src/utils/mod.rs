//! Shared helpers: MIME detection and HTML escaping.

pub mod html;
pub mod mime;
