//! Drag-and-drop payloads exchanged between the token library, placed tokens
//! and the map surface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data-transfer key for library templates (JSON body).
pub const NEW_TOKEN_KEY: &str = "application/json";
/// Data-transfer key for repositioning a placed token (token id).
pub const MOVE_TOKEN_KEY: &str = "application/x-battlemap-token";

const NEW_TOKEN_TAG: &str = "new-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    NewToken(NewTokenPayload),
    MoveToken { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTokenPayload {
    #[serde(rename = "tokenType")]
    pub token_type: String,
    pub icon: String,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
struct NewTokenWire {
    #[serde(rename = "type")]
    tag: String,
    #[serde(flatten)]
    body: NewTokenPayload,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("drag carried no recognised data")]
    Empty,
    #[error("new-token payload is not valid JSON: {0}")]
    Malformed(String),
    #[error("unexpected payload type {0:?}")]
    UnknownType(String),
    #[error("new-token payload has an empty name")]
    MissingName,
}

impl DragPayload {
    /// Decode whatever the drop carried. A move id wins over a JSON body.
    pub fn decode(
        new_token_json: Option<&str>,
        move_id: Option<&str>,
    ) -> Result<Self, PayloadError> {
        if let Some(id) = move_id.map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(DragPayload::MoveToken { id: id.to_string() });
        }
        let raw = new_token_json
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(PayloadError::Empty)?;
        let wire: NewTokenWire =
            serde_json::from_str(raw).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        if wire.tag != NEW_TOKEN_TAG {
            return Err(PayloadError::UnknownType(wire.tag));
        }
        if wire.body.name.trim().is_empty() {
            return Err(PayloadError::MissingName);
        }
        Ok(DragPayload::NewToken(wire.body))
    }
}

impl NewTokenPayload {
    /// JSON body written by drag sources under [`NEW_TOKEN_KEY`].
    pub fn encode(&self) -> String {
        let wire = NewTokenWire {
            tag: NEW_TOKEN_TAG.to_string(),
            body: self.clone(),
        };
        serde_json::to_string(&wire).unwrap_or_default()
    }
}
