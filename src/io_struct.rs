use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const VALIDATION_ERROR_MESSAGE: &str = "Missing 'model' or 'prompt' in request data";
pub const PROTOCOL_ERROR_MESSAGE: &str = "Invalid JSON received from Ollama API";
pub const STATUS_ERROR_MESSAGE: &str = "Failed to communicate with Ollama API";
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to Ollama API";
pub const STATUS_MESSAGE: &str = "Flask app is running";

/// Inbound body of `POST /api/generate`, forwarded verbatim to the inference engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
}

/// Loose view of the inbound body used for validation, before committing to
/// [`GenerateRequest`]. Unknown fields are ignored.
///
/// An explicit `null` counts as absent and is rejected, whereas a key-presence check would
/// forward the `null` to the engine unchanged.
#[derive(Debug, Deserialize)]
pub struct GenerateReqInput {
    pub model: Option<String>,
    pub prompt: Option<String>,
}

impl GenerateReqInput {
    /// Validate a decoded body. Anything but a JSON object with string `model` and `prompt`
    /// yields `None`.
    pub fn parse(body: Value) -> Option<GenerateRequest> {
        // Derived struct deserialization would also accept a positional array.
        if !body.is_object() {
            return None;
        }
        serde_json::from_value::<GenerateReqInput>(body)
            .ok()?
            .into_request()
    }

    pub fn into_request(self) -> Option<GenerateRequest> {
        match (self.model, self.prompt) {
            (Some(model), Some(prompt)) => Some(GenerateRequest { model, prompt }),
            _ => None,
        }
    }
}

/// One decoded line of the upstream NDJSON stream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Chunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AggregatedResult {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorEnvelope {
            error: error.into(),
            details: None,
            status_code: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusPayload {
    pub status: String,
}

impl Default for StatusPayload {
    fn default() -> Self {
        StatusPayload {
            status: STATUS_MESSAGE.to_string(),
        }
    }
}
