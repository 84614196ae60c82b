use crate::error::{Error, Result};
use crate::utils::normalize_query;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Built-in small-talk replies
const DEFAULT_RESPONSES: &[(&str, &str)] = &[
    ("hi", "Hello! How can I help you today?"),
    ("hello", "Hey there! Looking for a delicious recipe?"),
    ("how are you", "I'm just a food AI, but I'm always ready to help!"),
    (
        "what's up",
        "Not much! Just cooking up some great food ideas for you!",
    ),
];

/// On-disk shape of a chat table file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTableFile {
    pub version: u32,
    #[serde(default)]
    pub responses: BTreeMap<String, String>,
}

/// Canned replies keyed by normalized phrase
#[derive(Debug, Clone)]
pub struct ChatTable {
    responses: HashMap<String, String>,
}

impl Default for ChatTable {
    fn default() -> Self {
        Self {
            responses: DEFAULT_RESPONSES
                .iter()
                .map(|(phrase, reply)| (phrase.to_string(), reply.to_string()))
                .collect(),
        }
    }
}

impl ChatTable {
    /// Load a chat table from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read chat table from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            Error::Config(format!(
                "Invalid chat table {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ChatTableFile =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;

        if file.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported chat table version: {}. Expected version 1",
                file.version
            )));
        }

        let mut responses = HashMap::with_capacity(file.responses.len());
        for (phrase, reply) in file.responses {
            let key = normalize_query(&phrase);
            if key.is_empty() {
                return Err(Error::Config("Chat phrase cannot be blank".to_string()));
            }
            if reply.trim().is_empty() {
                return Err(Error::Config(format!("Empty reply for phrase '{key}'")));
            }
            if responses.insert(key.clone(), reply).is_some() {
                return Err(Error::Config(format!("Duplicate chat phrase: {key}")));
            }
        }

        Ok(Self { responses })
    }

    /// Exact lookup of an already-normalized query
    pub fn reply(&self, normalized: &str) -> Option<&str> {
        self.responses.get(normalized).map(String::as_str)
    }

    pub fn phrases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.responses.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
