use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Interpret the payload of `/auth/verify-token`.
///
/// Accepts a bare boolean or an object carrying `valid`; any other payload
/// from a successful response counts as valid.
pub fn token_is_valid(payload: &serde_json::Value) -> bool {
    match payload {
        serde_json::Value::Bool(valid) => *valid,
        serde_json::Value::Object(map) => map
            .get("valid")
            .and_then(|v| v.as_bool())
            .unwrap_or(true),
        _ => true,
    }
}
