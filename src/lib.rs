//! dakia - DAKIA Academy course catalog and training API
//!
//! An embedded document store (append-only record file, in-memory indexes)
//! behind an axum JSON API for courses, users and lesson content.

pub mod auth;
pub mod cli;
pub mod http_server;
pub mod index;
pub mod models;
pub mod observability;
pub mod storage;
pub mod store;
