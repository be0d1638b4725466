//! HTTP API Handlers and Routes
//!
//! This module provides the HTTP surface of the relay, built on the Axum web
//! framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # Endpoints
//!
//! - `POST /callback` - Messaging platform webhook (path configurable via
//!   `server.callback_path`). Requires a valid `X-Line-Signature` header;
//!   answers `200 OK` with the literal body `OK`, `403` on a bad signature,
//!   `400` on a malformed payload and `500` when the completion or reply
//!   call fails.
//! - `GET /health` - Health check endpoint

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
