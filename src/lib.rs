//! TestGenie client library.
//!
//! Typed access to the TestGenie backend with a local persistence fallback,
//! plus the validated forms and list/create/edit/delete flows built on them.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod telemetry;
