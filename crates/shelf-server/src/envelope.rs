use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

/// The uniform response body.
///
/// On success `data` (and optionally `message` / `meta`) is set; on failure
/// only `error` is. Unset fields are omitted from the JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T, M = ()> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            meta: None,
            error: Some(error.into()),
        }
    }

    /// Attach side-channel data such as collection stats.
    pub fn with_meta<M>(self, meta: M) -> Envelope<T, M> {
        Envelope {
            success: self.success,
            data: self.data,
            message: self.message,
            meta: Some(meta),
            error: self.error,
        }
    }
}

impl Envelope<()> {
    /// A success without payload, e.g. the answer to a delete.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            meta: None,
            error: None,
        }
    }
}

impl<T, M> Envelope<T, M> {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize, M: Serialize> IntoResponse for Envelope<T, M> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
