use sokoni_core::gateway::GatewayError;

/// Errors from the marketplace HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never got a response (connect, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx answer whose body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => GatewayError::Rejected {
                status: Some(status),
                message,
            },
            ClientError::Request(e) if e.is_decode() => GatewayError::Unexpected(e.to_string()),
            ClientError::Request(e) => GatewayError::Network(e.to_string()),
            ClientError::Decode(msg) => GatewayError::Unexpected(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn api_errors_become_rejections_with_status() {
        let err = ClientError::Api {
            status: 400,
            message: "title is required".into(),
        };
        assert_matches!(
            GatewayError::from(err),
            GatewayError::Rejected { status: Some(400), ref message } if message == "title is required"
        );
    }

    #[test]
    fn decode_errors_are_unexpected() {
        let err = ClientError::Decode("missing data".into());
        assert_matches!(GatewayError::from(err), GatewayError::Unexpected(_));
    }
}
