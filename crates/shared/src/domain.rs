use serde::{Deserialize, Serialize};

/// Session Store key under which the authenticated identity is persisted.
pub const SESSION_USER_KEY: &str = "user";

/// Role picked on the login page. Scopes which landing page follows a
/// successful authentication and which form a new bill is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Employee,
    Admin,
}

impl UserRole {
    pub fn landing_route(self) -> RoutePath {
        match self {
            UserRole::Employee => RoutePath::Bills,
            UserRole::Admin => RoutePath::Dashboard,
        }
    }
}

/// Route identifiers handed to the navigation collaborator. The core never
/// interprets these beyond picking one; rendering belongs to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutePath {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl RoutePath {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutePath::Login => "/",
            RoutePath::Bills => "#employee/bills",
            RoutePath::NewBill => "#employee/bill/new",
            RoutePath::Dashboard => "#admin/dashboard",
        }
    }
}

/// Identity written to the Session Store on successful authentication.
/// Overwritten on each login; the token is absent when the account was
/// created through the signup fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    #[serde(rename = "type")]
    pub role: UserRole,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
