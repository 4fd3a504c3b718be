//! API E2E test suite.
//!
//! Exercises the client and the fallback flows against an in-process mock
//! backend and against an unreachable address.
//!
//! Run with: cargo test --test api_e2e

mod mock_backend;
mod test_helpers;

mod test_ai;
mod test_client;
mod test_projects;
