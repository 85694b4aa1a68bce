//! Core services: id generation, expiration policy, upload orchestration,
//! and link resolution. Nothing here knows about HTTP; the handlers in
//! `crate::handlers` are the only callers.

pub mod expiry;
pub mod ids;
pub mod resolve_service;
pub mod upload_service;
