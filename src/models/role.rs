use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Monitor,
    Director,
}

impl Role {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Monitor => "MONITOR",
            Role::Director => "DIRECTOR",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MONITOR" => Some(Role::Monitor),
            "DIRECTOR" => Some(Role::Director),
            _ => None,
        }
    }

    /// Helper: accept CLI input in any case
    pub fn from_code(code: &str) -> Option<Self> {
        Role::from_db_str(&code.to_uppercase())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Monitor => "Monitor",
            Role::Director => "Director",
        }
    }
}
