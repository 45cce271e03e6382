use contracts::system::auth::{token_is_valid, LoginRequest, LoginResponse, VerifyTokenRequest};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<LoginResponse, String> {
    let request = LoginRequest { username, password };

    let response = Request::post(&api_url("/auth/login"))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Login failed: {}", response.status()));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Ask the backend whether `token` is still accepted.
///
/// `Err` means the check itself could not be made.
pub async fn verify_token(token: &str) -> Result<bool, String> {
    let request = VerifyTokenRequest {
        token: token.to_string(),
    };

    let response = Request::post(&api_url("/auth/verify-token"))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Ok(false);
    }

    // an unparseable 2xx body still means the token was accepted
    match response.json::<serde_json::Value>().await {
        Ok(payload) => Ok(token_is_valid(&payload)),
        Err(_) => Ok(true),
    }
}
