//! # Football score server
//! This crate hosts the REST server for the football score engine. It is responsible for:
//! * Accepting match lifecycle requests over HTTP and handing them to the [`score_engine::MatchLifecycleApi`].
//! * Translating engine errors into HTTP responses.
//! * Forwarding lifecycle events to the log and, optionally, to a webhook.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/matches`: Create and list matches. See [`routes`] for the full set.
pub mod cache_worker;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod event_hooks;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
