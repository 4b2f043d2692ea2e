//! Shared response bodies for mutation endpoints.
//!
//! Reads return rows (or arrays of rows) directly. Updates and deletes
//! answer with a `{ "message": ... }` body.

use axum::Json;
use serde::Serialize;

/// `{ "message": "..." }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn json(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}
