use serde::Serialize;

/// Lifecycle of one attendance block.
///
/// `Pending` is the initial state; `Authorized`, `Rejected` and `Recovered`
/// are set by a director. Only `Pending` can move to `Recovered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuthorizationState {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "autorizado")]
    Authorized,
    #[serde(rename = "rechazado")]
    Rejected,
    #[serde(rename = "recuperado")]
    Recovered,
}

impl AuthorizationState {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AuthorizationState::Pending => "pendiente",
            AuthorizationState::Authorized => "autorizado",
            AuthorizationState::Rejected => "rechazado",
            AuthorizationState::Recovered => "recuperado",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pendiente" => Some(AuthorizationState::Pending),
            "autorizado" => Some(AuthorizationState::Authorized),
            "rechazado" => Some(AuthorizationState::Rejected),
            "recuperado" => Some(AuthorizationState::Recovered),
            _ => None,
        }
    }

    /// Accepts the boundary codes as well as english names.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "pending" => Some(AuthorizationState::Pending),
            "authorized" => Some(AuthorizationState::Authorized),
            "rejected" => Some(AuthorizationState::Rejected),
            "recovered" => Some(AuthorizationState::Recovered),
            other => AuthorizationState::from_db_str(other),
        }
    }

    /// States in which a present monitor is credited with hours.
    pub fn is_creditable(&self) -> bool {
        matches!(
            self,
            AuthorizationState::Authorized | AuthorizationState::Recovered
        )
    }

    pub fn all() -> [AuthorizationState; 4] {
        [
            AuthorizationState::Pending,
            AuthorizationState::Authorized,
            AuthorizationState::Rejected,
            AuthorizationState::Recovered,
        ]
    }
}
