use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    Bol,
    Receipts,
    Pod,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Bol => "BOL",
            DocumentType::Receipts => "RECEIPTS",
            DocumentType::Pod => "POD",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOL" => Ok(DocumentType::Bol),
            "RECEIPTS" | "RECEIPT" => Ok(DocumentType::Receipts),
            "POD" => Ok(DocumentType::Pod),
            other => Err(format!("unknown document type `{other}`")),
        }
    }
}

/// Metadata of a captured document. The payload itself lives with the capture collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_on: Option<String>,
}

/// What the capture collaborator hands over when the driver scans or picks a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCapture {
    #[serde(rename = "type")]
    pub kind: DocumentType,
    #[serde(default)]
    pub source: Option<String>,
}

impl DocumentCapture {
    pub fn new(kind: DocumentType) -> Self {
        Self { kind, source: None }
    }
}
