use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{trip::StopId, zone::ZoneCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    In,
    Out,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::In => "in",
            CheckKind::Out => "out",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown check kind `{0}`, expected `in` or `out`")]
pub struct UnknownCheckKind(pub String);

impl FromStr for CheckKind {
    type Err = UnknownCheckKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "check-in" => Ok(CheckKind::In),
            "out" | "check-out" => Ok(CheckKind::Out),
            _ => Err(UnknownCheckKind(s.to_string())),
        }
    }
}

/// A recorded stop event: the wall-clock text the driver confirmed plus its zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStamp {
    pub time: String,
    pub zone: ZoneCode,
}

impl CheckStamp {
    pub fn new(time: impl Into<String>, zone: ZoneCode) -> Self {
        Self {
            time: time.into(),
            zone,
        }
    }
}

impl fmt::Display for CheckStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.time, self.zone)
    }
}

/// Edit buffer for a pending check-in/out. Nothing is stored until it is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDraft {
    pub trip_id: String,
    pub stop_id: StopId,
    pub kind: CheckKind,
    pub time: String,
    pub zone: ZoneCode,
}

impl CheckDraft {
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_zone(mut self, zone: ZoneCode) -> Self {
        self.zone = zone;
        self
    }

    pub fn stamp(&self) -> CheckStamp {
        CheckStamp::new(self.time.trim(), self.zone)
    }
}
