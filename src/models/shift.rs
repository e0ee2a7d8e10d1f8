use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Shift {
    #[serde(rename = "M")]
    Morning,
    #[serde(rename = "T")]
    Afternoon,
}

impl Shift {
    pub fn code(&self) -> &'static str {
        match self {
            Shift::Morning => "M",
            Shift::Afternoon => "T",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Shift::Morning),
            "T" => Some(Shift::Afternoon),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI (lowercase or uppercase)
    pub fn from_code(code: &str) -> Option<Self> {
        Shift::from_db_str(&code.to_uppercase())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
        }
    }

    pub fn all() -> [Shift; 2] {
        [Shift::Morning, Shift::Afternoon]
    }
}
