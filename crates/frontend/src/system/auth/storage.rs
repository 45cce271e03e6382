//! Session store backed by the browser's `sessionStorage`.
//!
//! Entries are written on login and removed together on logout.

use contracts::system::session::{Role, Session};
use web_sys::window;

const TOKEN_KEY: &str = "token";
const EMAIL_KEY: &str = "email";
const ROLE_KEY: &str = "role";
const USER_ID_KEY: &str = "userId";
const FIRST_NAME_KEY: &str = "firstname";
const LAST_NAME_KEY: &str = "lastname";

const ALL_KEYS: [&str; 6] = [
    TOKEN_KEY,
    EMAIL_KEY,
    ROLE_KEY,
    USER_ID_KEY,
    FIRST_NAME_KEY,
    LAST_NAME_KEY,
];

fn get_session_storage() -> Option<web_sys::Storage> {
    window()?.session_storage().ok()?
}

fn get(storage: &web_sys::Storage, key: &str) -> Option<String> {
    storage.get_item(key).ok().flatten()
}

pub fn save_session(session: &Session) {
    let Some(storage) = get_session_storage() else {
        log::warn!("sessionStorage unavailable, session not persisted");
        return;
    };
    let role = session.role.map(|r| r.code()).unwrap_or_default();
    let user_id = session.user_id.to_string();
    for (key, value) in [
        (TOKEN_KEY, session.token.as_str()),
        (EMAIL_KEY, session.email.as_str()),
        (ROLE_KEY, role),
        (USER_ID_KEY, user_id.as_str()),
        (FIRST_NAME_KEY, session.first_name.as_str()),
        (LAST_NAME_KEY, session.last_name.as_str()),
    ] {
        let _ = storage.set_item(key, value);
    }
}

/// Session previously saved in this tab; `None` without a token
pub fn load_session() -> Option<Session> {
    let storage = get_session_storage()?;
    let token = get(&storage, TOKEN_KEY).filter(|t| !t.trim().is_empty())?;
    Some(Session {
        token,
        email: get(&storage, EMAIL_KEY).unwrap_or_default(),
        user_id: get(&storage, USER_ID_KEY)
            .and_then(|id| id.parse().ok())
            .unwrap_or_default(),
        role: get(&storage, ROLE_KEY).as_deref().and_then(Role::from_code),
        first_name: get(&storage, FIRST_NAME_KEY).unwrap_or_default(),
        last_name: get(&storage, LAST_NAME_KEY).unwrap_or_default(),
    })
}

pub fn clear_session() {
    if let Some(storage) = get_session_storage() {
        for key in ALL_KEYS {
            let _ = storage.remove_item(key);
        }
    }
}
