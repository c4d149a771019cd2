//! Domain registry: the crawl's allow-list and seed URLs
//!
//! Each registered apex domain is described by one YAML document named after
//! it (`example.com.yaml`). The document maps subdomain keys to metadata the
//! crawler ignores:
//!
//! ```yaml
//! "": null        # https://example.com
//! blog: null      # https://blog.example.com
//! "*": null       # wildcard, never a seed
//! ```
//!
//! The registry unions every apex domain with the shortlink domain to build
//! the [`AllowedDomains`] list, and every concrete key into the seed list.
//! A malformed document is logged and skipped without aborting the build.

mod loader;

pub use loader::{
    apex_from_document_name, list_documents, load_document, parse_domain_document, DocumentLoad,
    DomainConfig, WILDCARD_KEY,
};

use crate::url::AllowedDomains;
use crate::{ConfigError, CrawlerError};
use std::collections::BTreeSet;
use std::path::Path;

/// Allow-list and seeds built once at startup
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    configs: Vec<DomainConfig>,
    allowed: AllowedDomains,
    seeds: Vec<String>,
    registered_domains: usize,
    skipped_documents: Vec<String>,
}

impl DomainRegistry {
    /// Loads every `*.yaml` / `*.yml` document in `dir`
    ///
    /// # Errors
    ///
    /// Only a missing or unreadable directory is an error. Individual
    /// documents that fail to read or parse are logged and skipped.
    pub fn load(dir: &Path, shortlink_domain: &str) -> Result<Self, ConfigError> {
        let mut documents = Vec::new();
        let mut unreadable = Vec::new();

        for path in list_documents(dir)? {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            match std::fs::read_to_string(&path) {
                Ok(content) => documents.push((name, content)),
                Err(e) => {
                    tracing::warn!("Failed to read domain document {}: {}", path.display(), e);
                    unreadable.push(name);
                }
            }
        }

        tracing::debug!("Found {} domain documents in {}", documents.len(), dir.display());
        let mut registry = Self::from_documents(documents, shortlink_domain);
        registry.skipped_documents.extend(unreadable);
        Ok(registry)
    }

    /// Builds a registry from `(document name, content)` pairs
    pub fn from_documents<I, N, C>(documents: I, shortlink_domain: &str) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        let mut configs = Vec::new();
        let mut apexes = BTreeSet::new();
        let mut seeds = BTreeSet::new();
        let mut skipped_documents = Vec::new();

        for (name, content) in documents {
            let name = name.as_ref();
            match load_document(name, content.as_ref()) {
                Some(DocumentLoad::Loaded(config)) => {
                    apexes.insert(config.apex.clone());
                    seeds.extend(config.seed_urls());
                    configs.push(config);
                }
                Some(DocumentLoad::Malformed { apex, error }) => {
                    tracing::warn!("Skipping subdomains of {}: {}", apex, error);
                    apexes.insert(apex);
                    skipped_documents.push(name.to_string());
                }
                Some(DocumentLoad::Rejected { name, error }) => {
                    tracing::warn!("Ignoring domain document {}: {}", name, error);
                    skipped_documents.push(name);
                }
                None => {
                    tracing::debug!("{} is not a domain document", name);
                }
            }
        }

        let registered_domains = apexes.len();
        let allowed = AllowedDomains::new(
            apexes
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(shortlink_domain)),
        );

        Self {
            configs,
            allowed,
            seeds: seeds.into_iter().collect(),
            registered_domains,
            skipped_documents,
        }
    }

    /// Builds a registry directly from an allow-list and seeds
    pub fn from_parts(allowed: AllowedDomains, seeds: Vec<String>) -> Self {
        let registered_domains = allowed.len();
        Self {
            configs: Vec::new(),
            allowed,
            seeds,
            registered_domains,
            skipped_documents: Vec::new(),
        }
    }

    pub fn allowed(&self) -> &AllowedDomains {
        &self.allowed
    }

    /// Seed URLs, deduplicated and sorted
    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Successfully parsed domain documents
    pub fn configs(&self) -> &[DomainConfig] {
        &self.configs
    }

    /// Document names that were skipped while building
    pub fn skipped_documents(&self) -> &[String] {
        &self.skipped_documents
    }

    /// True when no domain was registered and there is nothing to crawl
    pub fn is_empty(&self) -> bool {
        self.registered_domains == 0 && self.seeds.is_empty()
    }

    /// Reports an empty registry as an explicit error
    pub fn ensure_not_empty(&self) -> Result<(), CrawlerError> {
        if self.is_empty() {
            return Err(CrawlerError::EmptyRegistry);
        }
        Ok(())
    }
}
