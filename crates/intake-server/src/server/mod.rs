//! Server-side components of the application intake service.
//!
//! This module contains the building blocks necessary to run the HTTP
//! server, including the intake pipeline, admission control, storage
//! adapters, notification dispatch, and telemetry setup.
//!
//! ## Submodules
//!
//! - [`config`] - CLI/environment configuration and its validation.
//! - [`limit`] - Per-client fixed-window admission control.
//! - [`mail`] - Notification dispatcher, templates, and the SendGrid
//!   transport.
//! - [`pipeline`] - The intake orchestrator sequencing validation, the
//!   duplicate guard, storage, and detached notification.
//! - [`routes`] - The axum router and request handlers.
//! - [`store`] - The document-store abstraction and its adapters.
//! - [`telemetry`] - Tracing-based structured logging initialization.
//!
//! These components are wired together in the server's `main.rs`.

pub mod config;
pub mod limit;
pub mod mail;
pub mod pipeline;
pub mod routes;
pub mod store;
pub mod telemetry;
