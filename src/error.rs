//! Error types for the relay.
//!
//! Every variant renders as a JSON [`ErrorEnvelope`] through [`actix_web::ResponseError`],
//! so handlers can propagate failures with `?`.

use crate::io_struct::{
    CONNECTION_ERROR_MESSAGE, ErrorEnvelope, PROTOCOL_ERROR_MESSAGE, STATUS_ERROR_MESSAGE,
    VALIDATION_ERROR_MESSAGE,
};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// `model` or `prompt` missing, or the body is not a JSON object
    #[error("Missing 'model' or 'prompt' in request data")]
    Validation,

    /// A streamed line could not be decoded as a chunk
    #[error("Invalid JSON received from Ollama API: {details}")]
    UpstreamProtocol { details: String },

    /// The inference engine answered with something other than 200
    #[error("Failed to communicate with Ollama API: upstream returned {status_code}")]
    UpstreamStatus { status_code: u16 },

    /// Transport failure talking to the inference engine
    #[error("Error connecting to Ollama API: {details}")]
    UpstreamConnection { details: String },
}

pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    pub fn protocol(details: impl ToString) -> Self {
        RelayError::UpstreamProtocol {
            details: details.to_string(),
        }
    }

    pub fn connection(details: impl ToString) -> Self {
        RelayError::UpstreamConnection {
            details: details.to_string(),
        }
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation => "validation",
            RelayError::UpstreamProtocol { .. } => "upstream_protocol",
            RelayError::UpstreamStatus { .. } => "upstream_status",
            RelayError::UpstreamConnection { .. } => "upstream_connection",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            RelayError::Validation => ErrorEnvelope::new(VALIDATION_ERROR_MESSAGE),
            RelayError::UpstreamProtocol { details } => {
                ErrorEnvelope::new(PROTOCOL_ERROR_MESSAGE).with_details(details.clone())
            }
            RelayError::UpstreamStatus { status_code } => {
                ErrorEnvelope::new(STATUS_ERROR_MESSAGE).with_status_code(*status_code)
            }
            RelayError::UpstreamConnection { details } => {
                ErrorEnvelope::new(CONNECTION_ERROR_MESSAGE).with_details(details.clone())
            }
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest hides the io cause behind `source()`
        let mut details = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            details.push_str(": ");
            details.push_str(&cause.to_string());
            source = cause.source();
        }
        RelayError::UpstreamConnection { details }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation => StatusCode::BAD_REQUEST,
            // Upstream status is mirrored; codes actix cannot represent fall back to 502.
            RelayError::UpstreamStatus { status_code } => {
                StatusCode::from_u16(*status_code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::UpstreamProtocol { .. } | RelayError::UpstreamConnection { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.envelope())
    }
}
