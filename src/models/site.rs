use serde::Serialize;

/// Physical location where a shift is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Site {
    #[serde(rename = "SA")]
    SanAntonio,
    #[serde(rename = "BA")]
    Barcelona,
}

impl Site {
    pub fn code(&self) -> &'static str {
        match self {
            Site::SanAntonio => "SA",
            Site::Barcelona => "BA",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "SA" => Some(Site::SanAntonio),
            "BA" => Some(Site::Barcelona),
            _ => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Site::from_db_str(&code.to_uppercase())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Site::SanAntonio => "San Antonio",
            Site::Barcelona => "Barcelona",
        }
    }

    pub fn all() -> [Site; 2] {
        [Site::SanAntonio, Site::Barcelona]
    }
}
