use std::fmt;

use serde::{Deserialize, Serialize};

/// US time zone code attached to displayed and recorded stop times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ZoneCode {
    #[default]
    #[serde(rename = "EST")]
    Est,
    #[serde(rename = "CST")]
    Cst,
    #[serde(rename = "MST")]
    Mst,
    #[serde(rename = "PST")]
    Pst,
}

impl ZoneCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneCode::Est => "EST",
            ZoneCode::Cst => "CST",
            ZoneCode::Mst => "MST",
            ZoneCode::Pst => "PST",
        }
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
