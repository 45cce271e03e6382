use thiserror::Error;

/// Status and body of a request that reached the server.
///
/// `body` is `None` when the response body could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Option<String>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    pub fn unreadable(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Trimmed body text, or `HTTP <status>` when the body is empty or unreadable
    pub fn message(&self) -> String {
        match self.body.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("HTTP {}", self.status),
        }
    }
}

/// Failure of a single authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("No hay una sesión activa. Inicie sesión nuevamente.")]
    AuthMissing,
    #[error("La sesión ha expirado. Inicie sesión nuevamente.")]
    AuthExpired,
    #[error("{message}")]
    ServerRejected { status: u16, message: String },
    #[error("Error de conexión: {0}")]
    Network(String),
}

impl RequestError {
    /// Map a settled exchange to `Ok(())` or the matching error
    pub fn check(result: Result<HttpReply, String>) -> Result<(), RequestError> {
        let reply = result.map_err(RequestError::Network)?;
        if reply.is_success() {
            Ok(())
        } else if reply.status == 401 {
            Err(RequestError::AuthExpired)
        } else {
            Err(RequestError::ServerRejected {
                status: reply.status,
                message: reply.message(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_falls_back_to_status() {
        assert_eq!(HttpReply::new(500, "  db error \n").message(), "db error");
        assert_eq!(HttpReply::new(500, "").message(), "HTTP 500");
        assert_eq!(HttpReply::unreadable(502).message(), "HTTP 502");
    }

    #[test]
    fn test_check_classifies_reply() {
        assert_eq!(RequestError::check(Ok(HttpReply::new(204, ""))), Ok(()));
        assert_eq!(
            RequestError::check(Ok(HttpReply::new(401, "expired"))),
            Err(RequestError::AuthExpired)
        );
        assert_eq!(
            RequestError::check(Ok(HttpReply::new(409, "conflicto"))),
            Err(RequestError::ServerRejected {
                status: 409,
                message: "conflicto".to_string()
            })
        );
        assert_eq!(
            RequestError::check(Err("timeout".to_string())),
            Err(RequestError::Network("timeout".to_string()))
        );
    }
}
