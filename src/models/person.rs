use crate::ScoutResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, interests: &[&str], location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interests: interests.iter().map(|i| i.to_string()).collect(),
            location: location.into(),
            age: None,
            company: None,
        }
    }

    /// Loads a profile such as `{"name": "Anna", "location": "SF", "interests": ["ai"]}`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ScoutResult<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
