//! Helpers for talking to the requisitions backend.

/// Port the backend listens on when the base is derived from the page URL
const BACKEND_PORT: u16 = 8080;

/// Base URL for API requests.
///
/// A build-time `REQUISITIONS_API_BASE` wins; otherwise the base is the
/// current page's host on the backend port, e.g. `http://localhost:8080`.
pub fn api_base() -> String {
    if let Some(base) = option_env!("REQUISITIONS_API_BASE") {
        return base.trim_end_matches('/').to_string();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
