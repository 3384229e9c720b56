//! # Body Extraction
//!
//! Maps Axum's body rejections into [`AppError`] so that an oversized or
//! unreadable body is answered with the relay envelope like every other
//! failure.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;

use crate::error::AppError;

/// Extract the raw request body, mapping rejections to [`AppError::UnreadableBody`].
///
/// The rejection's own status is kept (413 for a body over the limit, 400
/// otherwise).
pub fn extract_bytes(result: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    result.map_err(|err| AppError::UnreadableBody {
        status: err.status(),
        message: err.body_text(),
    })
}
