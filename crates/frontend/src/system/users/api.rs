use contracts::system::users::{unresolved_ids, NameCache, UserName, UNKNOWN_USER};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, bearer};

/// Fetch the public name of user `id`
pub async fn fetch_user_name(token: &str, id: i64) -> Result<UserName, String> {
    let response = Request::get(&api_url(&format!("/user/{}", id)))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to fetch user {}: {}", id, response.status()));
    }

    response
        .json::<UserName>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Resolve every id missing from `cache`; failures are cached as unknown
/// so they are not requested again.
pub async fn resolve_names(
    token: &str,
    ids: impl IntoIterator<Item = i64>,
    cache: &NameCache,
) -> NameCache {
    let mut resolved = NameCache::new();
    for id in unresolved_ids(ids, cache) {
        let name = match fetch_user_name(token, id).await {
            Ok(user) => user.display(),
            Err(e) => {
                log::warn!("{}", e);
                UNKNOWN_USER.to_string()
            }
        };
        resolved.insert(id, name);
    }
    resolved
}
