//! Response rendering.
//!
//! # Responsibilities
//! - Render extracted text as `{ "text": … }` with 200
//! - Render failures as `{ "error": …, "details"?: … }` with the configured status
//! - Render 405 as the plain-text body `Method Not Allowed`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::config::ResponseConfig;
use crate::error::ProxyError;

pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    PlainText(&'static str),
    Json(Value),
}

/// Outcome of one invocation, independent of the hosting server.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ProxyResponse {
    pub fn success(text: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Json(json!({ "text": text })),
        }
    }

    pub fn from_error(err: &ProxyError, config: &ResponseConfig) -> Self {
        let status = err.status_code(config.error_status);

        if let ProxyError::MethodNotAllowed(_) = err {
            return Self {
                status,
                body: ResponseBody::PlainText(METHOD_NOT_ALLOWED_BODY),
            };
        }

        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(err.to_string()));
        if config.expose_upstream_details {
            if let Some(details) = err.details() {
                body.insert("details".to_string(), details.clone());
            }
        }

        Self {
            status,
            body: ResponseBody::Json(Value::Object(body)),
        }
    }

    /// JSON body, if this is not a plain-text response.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::PlainText(_) => None,
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        match self.body {
            ResponseBody::PlainText(text) => (self.status, text).into_response(),
            ResponseBody::Json(value) => (self.status, Json(value)).into_response(),
        }
    }
}
