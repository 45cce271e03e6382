use serde::{Deserialize, Serialize};

use super::auth::LoginResponse;

/// Cost center assigned to every requisition raised from the remote site
pub const REMOTE_SITE_COST_CENTER: &str = "Sede Remota";

/// Role of the logged-in user; decides which views are composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Empleado")]
    Employee,
    #[serde(rename = "Compras")]
    Purchasing,
    #[serde(rename = "JefeArea")]
    AreaManager,
    #[serde(rename = "SedeRemota")]
    RemoteSite,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Employee => "Empleado",
            Role::Purchasing => "Compras",
            Role::AreaManager => "JefeArea",
            Role::RemoteSite => "SedeRemota",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Empleado" => Some(Role::Employee),
            "Compras" => Some(Role::Purchasing),
            "JefeArea" => Some(Role::AreaManager),
            "SedeRemota" => Some(Role::RemoteSite),
            _ => None,
        }
    }

    pub fn panel_title(&self) -> &'static str {
        match self {
            Role::Employee => "Panel de Empleado",
            Role::Purchasing => "Panel de Compras",
            Role::AreaManager => "Panel de Jefe de Área",
            Role::RemoteSite => "Panel de Sede Remota",
        }
    }

    /// Cost center forced on this role's drafts, if any
    pub fn fixed_cost_center(&self) -> Option<&'static str> {
        match self {
            Role::RemoteSite => Some(REMOTE_SITE_COST_CENTER),
            _ => None,
        }
    }
}

/// Typed view of the session store, passed explicitly to whoever needs it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub user_id: i64,
    /// `None` when the stored role is not one this client knows
    pub role: Option<Role>,
    pub first_name: String,
    pub last_name: String,
}

impl Session {
    pub fn from_login(email: &str, response: LoginResponse) -> Self {
        Self {
            token: response.token,
            email: email.to_string(),
            user_id: response.id,
            role: response.role.as_deref().and_then(Role::from_code),
            first_name: response.firstname.unwrap_or_default(),
            last_name: response.lastname.unwrap_or_default(),
        }
    }

    /// Token usable for a bearer header, if one is present
    pub fn token(&self) -> Option<&str> {
        let token = self.token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes_round_trip() {
        for role in [
            Role::Employee,
            Role::Purchasing,
            Role::AreaManager,
            Role::RemoteSite,
        ] {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("Admin"), None);
    }

    #[test]
    fn test_only_remote_site_has_fixed_cost_center() {
        assert_eq!(
            Role::RemoteSite.fixed_cost_center(),
            Some(REMOTE_SITE_COST_CENTER)
        );
        assert_eq!(Role::Employee.fixed_cost_center(), None);
    }

    #[test]
    fn test_session_from_login() {
        let response = LoginResponse {
            token: "abc".to_string(),
            id: 42,
            role: Some("JefeArea".to_string()),
            firstname: Some("Rosa".to_string()),
            lastname: None,
        };
        let session = Session::from_login("rosa@example.com", response);
        assert_eq!(session.role, Some(Role::AreaManager));
        assert_eq!(session.full_name(), "Rosa");
        assert_eq!(session.token(), Some("abc"));
    }

    #[test]
    fn test_blank_token_is_absent() {
        let session = Session {
            token: "  ".to_string(),
            ..Session::default()
        };
        assert_eq!(session.token(), None);
    }
}
