use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder shown when a requester cannot be resolved
pub const UNKNOWN_USER: &str = "Desconocido";

/// Public name of a user as returned by `/user/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserName {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

impl UserName {
    pub fn display(&self) -> String {
        let full = format!("{} {}", self.firstname.trim(), self.lastname.trim());
        let full = full.trim();
        if full.is_empty() {
            UNKNOWN_USER.to_string()
        } else {
            full.to_string()
        }
    }
}

/// Requester names already resolved, failures included
pub type NameCache = HashMap<i64, String>;

/// Distinct ids not yet in `cache`, in first-seen order
pub fn unresolved_ids(ids: impl IntoIterator<Item = i64>, cache: &NameCache) -> Vec<i64> {
    let mut pending = Vec::new();
    for id in ids {
        if !cache.contains_key(&id) && !pending.contains(&id) {
            pending.push(id);
        }
    }
    pending
}

pub fn cached_name(cache: &NameCache, id: i64) -> &str {
    cache.get(&id).map(String::as_str).unwrap_or(UNKNOWN_USER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let name = UserName {
            firstname: " Ana ".to_string(),
            lastname: "Soto".to_string(),
        };
        assert_eq!(name.display(), "Ana Soto");
        assert_eq!(UserName::default().display(), UNKNOWN_USER);
    }

    #[test]
    fn test_unresolved_ids_skips_cached_and_duplicates() {
        let mut cache = NameCache::new();
        cache.insert(2, "Luis Paz".to_string());
        assert_eq!(unresolved_ids([3, 2, 3, 5], &cache), vec![3, 5]);
        assert_eq!(cached_name(&cache, 2), "Luis Paz");
        assert_eq!(cached_name(&cache, 9), "Desconocido");
    }
}
