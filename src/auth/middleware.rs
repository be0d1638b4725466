use crate::auth::signature::{SignatureVerifier, SIGNATURE_HEADER};
use crate::types::AppError;
use axum::{
    body::{self, Body},
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Rejects requests whose body does not match the signature header.
///
/// The body is buffered once, verified, and handed on unchanged so the
/// handler can still extract it. Body size is bounded by the router's
/// `RequestBodyLimitLayer`.
pub async fn signature_middleware(
    verifier: Arc<SignatureVerifier>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();

    let Some(signature) = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
    else {
        warn!("Webhook rejected: missing signature header");
        return Err(AppError::InvalidSignature);
    };

    let bytes = body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read request body: {}", e)))?;

    if !verifier.verify(&bytes, &signature) {
        warn!(body_len = bytes.len(), "Webhook rejected: invalid signature");
        return Err(AppError::InvalidSignature);
    }

    debug!(body_len = bytes.len(), "Webhook signature verified");
    let req = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(req).await)
}
