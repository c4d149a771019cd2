//! Reading per-domain YAML documents from disk or memory

use crate::config::validate_domain_string;
use crate::ConfigError;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Subdomain key meaning "no concrete subdomain"
pub const WILDCARD_KEY: &str = "*";

/// One registered apex domain and its subdomain entries
#[derive(Debug, Clone, PartialEq)]
pub struct DomainConfig {
    /// Apex domain, taken from the document name
    pub apex: String,

    /// Subdomain key to metadata. `""` is the apex itself, `"*"` is skipped.
    pub subdomains: BTreeMap<String, Value>,
}

impl DomainConfig {
    /// Seed URLs described by this document
    pub fn seed_urls(&self) -> Vec<String> {
        self.subdomains
            .keys()
            .filter(|key| key.as_str() != WILDCARD_KEY)
            .map(|key| {
                if key.is_empty() {
                    format!("https://{}", self.apex)
                } else {
                    format!("https://{}.{}", key, self.apex)
                }
            })
            .collect()
    }
}

/// Strips the `.yaml` / `.yml` extension from a document name
///
/// Returns None for names that are not domain documents.
pub fn apex_from_document_name(name: &str) -> Option<String> {
    let stem = name
        .strip_suffix(".yaml")
        .or_else(|| name.strip_suffix(".yml"))?;
    let apex = stem.trim().to_lowercase();
    if apex.is_empty() {
        None
    } else {
        Some(apex)
    }
}

/// Parses one domain document
///
/// An empty document (or a `null` one) has no subdomains. Anything other than
/// a mapping at the top level is an error.
pub fn parse_domain_document(apex: &str, name: &str, content: &str) -> Result<DomainConfig, ConfigError> {
    let mapping: Option<Mapping> = if content.trim().is_empty() {
        None
    } else {
        serde_yaml::from_str(content).map_err(|source| ConfigError::DomainDocument {
            path: name.to_string(),
            source,
        })?
    };

    let mut subdomains = BTreeMap::new();
    for (key, value) in mapping.unwrap_or_default() {
        match key_to_string(&key) {
            Some(key) => {
                subdomains.insert(key, value);
            }
            None => {
                tracing::warn!("Skipping non-scalar subdomain key {:?} in {}", key, name);
            }
        }
    }

    Ok(DomainConfig {
        apex: apex.to_string(),
        subdomains,
    })
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.trim().to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Outcome of loading one document
#[derive(Debug)]
pub enum DocumentLoad {
    /// Parsed successfully
    Loaded(DomainConfig),

    /// The name is a valid apex but the body could not be used
    Malformed { apex: String, error: ConfigError },

    /// The name is not a usable apex domain
    Rejected { name: String, error: ConfigError },
}

/// Loads a document from its name and content
pub fn load_document(name: &str, content: &str) -> Option<DocumentLoad> {
    let apex = apex_from_document_name(name)?;

    if let Err(error) = validate_domain_string(&apex) {
        return Some(DocumentLoad::Rejected {
            name: name.to_string(),
            error,
        });
    }

    Some(match parse_domain_document(&apex, name, content) {
        Ok(config) => DocumentLoad::Loaded(config),
        Err(error) => DocumentLoad::Malformed { apex, error },
    })
}

/// Lists domain documents in a directory, sorted by path
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_document = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(apex_from_document_name)
            .is_some();
        if is_document {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
