//! Webhook Authentication
//!
//! The only authentication the relay performs is checking that callbacks
//! really come from the messaging platform.
//!
//! # Module Structure
//!
//! - [`auth::signature`](crate::auth::signature) - HMAC-SHA256 signing and verification
//! - [`auth::middleware`](crate::auth::middleware) - Axum middleware guarding the callback route
//!
//! # Usage
//!
//! ```ignore
//! use iris::auth::{middleware::signature_middleware, signature::SignatureVerifier};
//!
//! let verifier = Arc::new(SignatureVerifier::new(channel_secret));
//! let app = Router::new()
//!     .route("/callback", post(handler))
//!     .layer(middleware::from_fn(move |req, next| {
//!         signature_middleware(verifier.clone(), req, next)
//!     }));
//! ```
//!
//! A missing or mismatching `X-Line-Signature` header yields HTTP 403 with
//! the body `{"error": "Invalid request"}`; the handler never runs.

/// Signature verification middleware for the callback route.
pub mod middleware;
/// HMAC-SHA256 webhook signatures.
pub mod signature;
