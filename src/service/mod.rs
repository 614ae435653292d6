pub(crate) mod draft;
pub(crate) mod error;
pub(crate) mod filter;
mod seed;
pub(crate) mod snippet_service;
