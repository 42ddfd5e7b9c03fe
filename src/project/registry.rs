//! Project registry and shared component catalog.
//!
//! The registry is the sole source of `Project` instances in an
//! application: it loads project definitions from TOML configuration,
//! constructs projects against a shared component catalog, and hands
//! them out by id filtered by access level.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::{Backend, BackendContext, DummyBackend};
use crate::error::{Error, Result};
use crate::project::{Access, Project, ProjectConfig, ProjectInfo};
use crate::util::parse_spec;
use crate::vocab::Vocabulary;

/// Constructor for a backend implementation.
pub type BackendFactory =
    Box<dyn Fn(&str, &ProjectConfig, BackendContext) -> Result<Box<dyn Backend>>>;

/// Shared lookup tables for vocabularies and backend implementations.
///
/// Populated before being shared: register vocabularies and backend
/// factories first, then hand the catalog to a `ProjectRegistry`.
pub struct ComponentCatalog {
    vocabs: BTreeMap<String, Arc<Vocabulary>>,
    backends: BTreeMap<String, BackendFactory>,
}

impl ComponentCatalog {
    /// Create a catalog with the built-in backends registered.
    pub fn new() -> Self {
        let mut catalog = Self {
            vocabs: BTreeMap::new(),
            backends: BTreeMap::new(),
        };
        catalog.register_backend("dummy", |backend_id, config, context| {
            DummyBackend::from_config(backend_id, config, context)
                .map(|backend| Box::new(backend) as Box<dyn Backend>)
        });
        catalog
    }

    /// Register a backend implementation under the given id.
    pub fn register_backend(
        &mut self,
        backend_id: impl Into<String>,
        factory: impl Fn(&str, &ProjectConfig, BackendContext) -> Result<Box<dyn Backend>> + 'static,
    ) {
        self.backends.insert(backend_id.into(), Box::new(factory));
    }

    /// Add a vocabulary, keyed by its id.
    pub fn add_vocab(&mut self, vocab: Vocabulary) {
        self.vocabs.insert(vocab.vocab_id().to_string(), Arc::new(vocab));
    }

    /// Resolve a vocabulary specification against a project language.
    ///
    /// Specs are `name` or `name(lang)`; a parenthesized language
    /// overrides the project language. The vocabulary and its effective
    /// language resolve together as a pair.
    pub fn get_vocab(&self, spec: &str, language: &str) -> Result<(Arc<Vocabulary>, String)> {
        let (name, lang_override) = parse_spec(spec)
            .ok_or_else(|| Error::Vocab(format!("invalid vocab specification '{}'", spec)))?;
        let vocab = self
            .vocabs
            .get(&name)
            .ok_or_else(|| Error::Vocab(format!("no vocabulary called '{}'", name)))?;
        let language = lang_override.unwrap_or_else(|| language.to_string());
        if !vocab.supports_language(&language) {
            return Err(Error::Vocab(format!(
                "vocabulary '{}' does not support language '{}'",
                name, language
            )));
        }
        Ok((Arc::clone(vocab), language))
    }

    /// Construct a backend instance for a project. Unregistered backend
    /// ids fail with a backend-not-available error.
    pub fn create_backend(
        &self,
        backend_id: &str,
        config: &ProjectConfig,
        context: BackendContext,
    ) -> Result<Box<dyn Backend>> {
        let factory = self
            .backends
            .get(backend_id)
            .ok_or_else(|| Error::BackendNotAvailable(backend_id.to_string()))?;
        factory(backend_id, config, context)
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of configured projects, keyed by project id.
pub struct ProjectRegistry {
    catalog: Arc<ComponentCatalog>,
    datadir: PathBuf,
    projects: BTreeMap<String, Project>,
}

impl ProjectRegistry {
    /// Create an empty registry rooted at the given data directory.
    pub fn new(catalog: ComponentCatalog, datadir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            datadir: datadir.into(),
            projects: BTreeMap::new(),
        }
    }

    /// Add a project from parsed configuration settings. Fails fast on
    /// invalid configuration (bad access value, missing language).
    pub fn add_project(&mut self, project_id: &str, config: ProjectConfig) -> Result<()> {
        let project = Project::new(project_id, config, &self.datadir, Arc::clone(&self.catalog))?;
        self.projects.insert(project_id.to_string(), project);
        Ok(())
    }

    /// Load project definitions from a TOML configuration file. Each
    /// top-level table defines one project keyed by its id.
    pub fn load_config_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)?;
        self.load_config_str(&raw)
    }

    /// Load project definitions from TOML configuration text.
    pub fn load_config_str(&mut self, raw: &str) -> Result<()> {
        let table: toml::Table = raw
            .parse()
            .map_err(|err: toml::de::Error| Error::ConfigFile(err.to_string()))?;
        for (project_id, value) in table {
            let section = value.as_table().ok_or_else(|| {
                Error::ConfigFile(format!("project '{}' is not a table", project_id))
            })?;
            let mut config = ProjectConfig::new();
            for (key, value) in section {
                config.set(key.as_str(), toml_value_to_string(value));
            }
            self.add_project(&project_id, config)?;
            log::debug!("Loaded project '{}'", project_id);
        }
        Ok(())
    }

    /// Number of registered projects, regardless of access level.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Look up a project by id, requiring at least the given access
    /// level. Projects below the level are reported as not found.
    pub fn get_project(&mut self, project_id: &str, min_access: Access) -> Result<&mut Project> {
        match self.projects.get_mut(project_id) {
            Some(project) if project.access() >= min_access => Ok(project),
            _ => Err(Error::ProjectNotFound(project_id.to_string())),
        }
    }

    /// All projects with at least the given access level, in id order.
    pub fn projects(&mut self, min_access: Access) -> impl Iterator<Item = &mut Project> {
        self.projects
            .values_mut()
            .filter(move |project| project.access() >= min_access)
    }

    /// Warm the caches of all matching projects. Per-project failures
    /// are logged and do not abort the sweep.
    pub fn initialize_all(&mut self, parallel: bool, min_access: Access) {
        for project in self.projects(min_access) {
            if let Err(err) = project.initialize(parallel) {
                log::warn!("{}", err);
            }
        }
    }

    /// Status snapshots for all matching projects.
    pub fn dump_all(&mut self, min_access: Access) -> Vec<ProjectInfo> {
        self.projects(min_access).map(|project| project.dump()).collect()
    }
}

fn toml_value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
