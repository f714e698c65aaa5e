//! HTTP middleware components.

pub(crate) mod security;
pub(crate) mod timing;
