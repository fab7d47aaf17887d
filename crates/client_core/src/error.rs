use shared::domain::OperationKind;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorSource {
    /// The service answered and reported the failure itself.
    Remote,
    /// The call did not produce a usable answer (connect, I/O, undecodable body).
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("analysis service answered with status {status}")]
    Remote {
        status: u16,
        message: Option<String>,
    },
    #[error("analysis service unreachable: {message}")]
    Transport { message: String },
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn remote(status: u16, message: Option<String>) -> Self {
        Self::Remote { status, message }
    }

    pub fn source_kind(&self) -> GatewayErrorSource {
        match self {
            GatewayError::Remote { .. } => GatewayErrorSource::Remote,
            GatewayError::Transport { .. } => GatewayErrorSource::Transport,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Remote { status, .. } => Some(*status),
            GatewayError::Transport { .. } => None,
        }
    }

    /// Error text reported by the service in its response body.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            GatewayError::Remote { message, .. } => message.as_deref(),
            GatewayError::Transport { .. } => None,
        }
    }

    /// Error text produced on this side of the wire.
    pub fn transport_message(&self) -> Option<String> {
        match self {
            GatewayError::Remote { status, .. } => {
                Some(format!("Request failed with status code {status}"))
            }
            GatewayError::Transport { message } if message.trim().is_empty() => None,
            GatewayError::Transport { message } => Some(message.clone()),
        }
    }

    /// The single human-readable string stored in a failed result slot.
    pub fn user_message(&self, kind: OperationKind) -> String {
        if let Some(message) = self.remote_message() {
            format!("API Error: {message}")
        } else if let Some(message) = self.transport_message() {
            format!("Network Error: {message}")
        } else {
            generic_failure_message(kind).to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown commit policy: {0}")]
pub struct UnknownCommitPolicy(pub String);

pub fn generic_failure_message(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Summary => "Error occurred while summarizing text.",
        OperationKind::Classification => "Error occurred while classifying text.",
        OperationKind::Sentiment => "Error occurred while analyzing sentiment.",
        OperationKind::Keywords => "Error occurred while extracting keywords.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_remote_message_over_transport_message() {
        let err = GatewayError::remote(400, Some("Text is required".into()));
        assert_eq!(
            err.user_message(OperationKind::Summary),
            "API Error: Text is required"
        );
        assert_eq!(err.source_kind(), GatewayErrorSource::Remote);
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn remote_failure_without_body_message_reads_as_network_error() {
        let err = GatewayError::remote(502, None);
        assert_eq!(
            err.user_message(OperationKind::Keywords),
            "Network Error: Request failed with status code 502"
        );
    }

    #[test]
    fn transport_failure_wraps_underlying_text() {
        let err = GatewayError::transport("connection refused");
        assert_eq!(
            err.user_message(OperationKind::Sentiment),
            "Network Error: connection refused"
        );
        assert_eq!(
            err.to_string(),
            "analysis service unreachable: connection refused"
        );
    }

    #[test]
    fn blank_transport_text_falls_back_to_generic_message() {
        let err = GatewayError::transport("  ");
        assert_eq!(
            err.user_message(OperationKind::Classification),
            "Error occurred while classifying text."
        );
    }
}
