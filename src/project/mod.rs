//! Project lifecycle and operation surface.
//!
//! A `Project` binds one language analyzer, one transform chain, one
//! subject vocabulary and one classification backend, resolving each
//! lazily on first use. Resolution failures split into two classes:
//! misconfiguration is fatal at the call that first needs the setting,
//! while unavailable collaborators degrade with a logged warning.

mod access;
pub mod registry;

pub use access::Access;
pub use registry::{ComponentCatalog, ProjectRegistry};

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzer::{self, Analyzer};
use crate::backend::hyperopt::HpRecommendation;
use crate::backend::{Backend, BackendContext, ParamMap};
use crate::corpus::{Document, DocumentCorpus, TrainingCorpus};
use crate::defaults;
use crate::error::{Error, Result};
use crate::suggestion::{SuggestionBatch, SuggestionVector};
use crate::transform::{self, TransformChain, TransformContext};
use crate::vocab::{Subject, Vocabulary};

/// Flat configuration settings for a single project.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig(BTreeMap<String, String>);

impl ProjectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ProjectConfig {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.set(key, value);
        }
        config
    }
}

/// Immutable status snapshot of a project, suitable for serialization
/// into a status report.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    pub project_id: String,
    pub name: String,
    pub language: String,
    pub backend_id: Option<String>,
    pub is_trained: Option<bool>,
    pub modification_time: Option<DateTime<Utc>>,
}

/// Runtime backend parameters, keyed by backend id.
pub type BackendParams = HashMap<String, ParamMap>;

/// A named, independently configured subject-indexing unit.
///
/// All lazy accessors take `&mut self`; exclusive receivers make the
/// one-caller-per-instance precondition a compile-time guarantee.
pub struct Project {
    project_id: String,
    name: String,
    language: String,
    analyzer_spec: Option<String>,
    transform_spec: String,
    vocab_spec: Option<String>,
    access: Access,
    config: ProjectConfig,
    datadir: PathBuf,
    catalog: Arc<ComponentCatalog>,
    analyzer: Option<Arc<dyn Analyzer>>,
    transform: Option<Arc<TransformChain>>,
    backend: Option<Box<dyn Backend>>,
    vocab: Option<(Arc<Vocabulary>, String)>,
    initialized: bool,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("project_id", &self.project_id)
            .field("name", &self.name)
            .field("language", &self.language)
            .field("analyzer_spec", &self.analyzer_spec)
            .field("transform_spec", &self.transform_spec)
            .field("vocab_spec", &self.vocab_spec)
            .field("access", &self.access)
            .field("config", &self.config)
            .field("datadir", &self.datadir)
            .field("analyzer", &self.analyzer.as_ref().map(|a| a.name()))
            .field("transform", &self.transform.is_some())
            .field("backend", &self.backend.as_ref().map(|b| b.backend_id()))
            .field("vocab", &self.vocab.as_ref().map(|(_, id)| id))
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl Project {
    /// Construct a project from parsed configuration settings.
    ///
    /// The access level and the required `language` setting are validated
    /// eagerly; all collaborator resolution is deferred to first use.
    pub fn new(
        project_id: &str,
        config: ProjectConfig,
        base_datadir: &Path,
        catalog: Arc<ComponentCatalog>,
    ) -> Result<Self> {
        let access = config
            .get("access")
            .unwrap_or(defaults::ACCESS)
            .parse()
            .map_err(|message| Error::Configuration {
                message,
                project_id: project_id.to_string(),
            })?;
        let language = config
            .get("language")
            .ok_or_else(|| Error::Configuration {
                message: "language setting is missing".to_string(),
                project_id: project_id.to_string(),
            })?
            .to_string();

        Ok(Self {
            project_id: project_id.to_string(),
            name: config.get("name").unwrap_or(project_id).to_string(),
            language,
            analyzer_spec: config.get("analyzer").map(str::to_string),
            transform_spec: config
                .get("transform")
                .unwrap_or(defaults::TRANSFORM_SPEC)
                .to_string(),
            vocab_spec: config.get("vocab").map(str::to_string),
            access,
            datadir: base_datadir.join("projects").join(project_id),
            catalog,
            config,
            analyzer: None,
            transform: None,
            backend: None,
            vocab: None,
            initialized: false,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// The per-project storage area. Not created until a collaborator
    /// asks for it.
    pub fn datadir_path(&self) -> &Path {
        &self.datadir
    }

    /// The storage area, created on demand.
    pub fn ensure_datadir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.datadir)?;
        Ok(&self.datadir)
    }

    fn config_error(&self, message: impl Into<String>) -> Error {
        Error::Configuration {
            message: message.into(),
            project_id: self.project_id.clone(),
        }
    }

    fn backend_id_setting(&self) -> String {
        self.config.get("backend").unwrap_or_default().to_string()
    }

    // --- lazy component cache ---

    /// The resolved analyzer. Fails with a configuration error when the
    /// `analyzer` setting is absent or names an unknown analyzer.
    pub fn analyzer(&mut self) -> Result<Arc<dyn Analyzer>> {
        if let Some(analyzer) = &self.analyzer {
            return Ok(Arc::clone(analyzer));
        }
        let spec = self
            .analyzer_spec
            .clone()
            .ok_or_else(|| self.config_error("analyzer setting is missing"))?;
        let analyzer: Arc<dyn Analyzer> = Arc::from(
            analyzer::get_analyzer(&spec).map_err(|message| self.config_error(message))?,
        );
        self.analyzer = Some(Arc::clone(&analyzer));
        Ok(analyzer)
    }

    /// The resolved transform chain (default spec: `pass`).
    pub fn transform(&mut self) -> Result<Arc<TransformChain>> {
        if let Some(transform) = &self.transform {
            return Ok(Arc::clone(transform));
        }
        let context = TransformContext {
            project_id: self.project_id.clone(),
            language: self.language.clone(),
        };
        let chain = transform::get_transform(&self.transform_spec, context)
            .map_err(|message| self.config_error(message))?;
        let chain = Arc::new(chain);
        self.transform = Some(Arc::clone(&chain));
        Ok(chain)
    }

    /// Resolve the vocabulary and its effective language as a pair.
    /// Nothing is cached on failure; the next access re-attempts.
    fn resolve_vocab(&mut self) -> Result<(Arc<Vocabulary>, String)> {
        if let Some((vocab, lang)) = &self.vocab {
            return Ok((Arc::clone(vocab), lang.clone()));
        }
        let spec = self
            .vocab_spec
            .clone()
            .ok_or_else(|| self.config_error("vocab setting is missing"))?;
        let (vocab, lang) = self.catalog.get_vocab(&spec, &self.language)?;
        self.vocab = Some((Arc::clone(&vocab), lang.clone()));
        Ok((vocab, lang))
    }

    /// The resolved subject vocabulary.
    pub fn vocab(&mut self) -> Result<Arc<Vocabulary>> {
        Ok(self.resolve_vocab()?.0)
    }

    /// The language the vocabulary was resolved for.
    pub fn vocab_lang(&mut self) -> Result<String> {
        Ok(self.resolve_vocab()?.1)
    }

    /// Snapshot of the vocabulary subject list.
    pub fn subjects(&mut self) -> Result<Vec<Subject>> {
        Ok(self.vocab()?.subjects().to_vec())
    }

    /// The resolved backend, or `None` when the configured implementation
    /// is unavailable (a warning is logged and the resolution re-attempted
    /// on the next access). A missing `backend` setting is a fatal
    /// configuration error.
    pub fn backend(&mut self) -> Result<Option<&mut (dyn Backend + 'static)>> {
        if self.backend.is_none() {
            let backend_id = self
                .config
                .get("backend")
                .ok_or_else(|| self.config_error("backend setting is missing"))?
                .to_string();
            let context = BackendContext {
                project_id: self.project_id.clone(),
                language: self.language.clone(),
                datadir: self.datadir.clone(),
            };
            match self.catalog.create_backend(&backend_id, &self.config, context) {
                Ok(backend) => self.backend = Some(backend),
                Err(Error::BackendNotAvailable(_)) => {
                    log::warn!(
                        "Could not create backend '{}' for project '{}', \
                         make sure the implementation is registered",
                        backend_id,
                        self.project_id
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(self.backend.as_deref_mut())
    }

    // --- lifecycle ---

    /// Initialize this project and its backend so they are ready for use.
    ///
    /// Idempotent. Analyzer failures propagate; vocabulary and backend
    /// failures degrade to warnings. `parallel` signals that the project
    /// will be used across multiple worker processes.
    pub fn initialize(&mut self, parallel: bool) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        log::debug!("Initializing project '{}'", self.project_id);

        self.initialize_analyzer()?;
        self.initialize_subjects();
        self.initialize_backend(parallel);

        self.initialized = true;
        Ok(())
    }

    fn initialize_analyzer(&mut self) -> Result<()> {
        if self.analyzer_spec.is_none() {
            // not configured, so assume it's not needed
            return Ok(());
        }
        let analyzer = self.analyzer()?;
        log::debug!(
            "Project '{}': initialized analyzer: {}",
            self.project_id,
            analyzer.name()
        );
        Ok(())
    }

    fn initialize_subjects(&mut self) {
        match self.vocab() {
            Ok(vocab) => log::debug!(
                "Project '{}': initialized subjects: {}",
                self.project_id,
                vocab.len()
            ),
            Err(err) => log::warn!("{}", err),
        }
    }

    fn initialize_backend(&mut self, parallel: bool) {
        log::debug!("Project '{}': initializing backend", self.project_id);
        let result = match self.backend() {
            Ok(Some(backend)) => backend.initialize(parallel),
            Ok(None) => {
                log::debug!("Cannot initialize backend: does not exist");
                return;
            }
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            log::warn!("{}", err);
        }
    }

    // --- introspection ---

    fn backend_query<T>(
        &mut self,
        query: impl FnOnce(&mut dyn Backend) -> Result<T>,
    ) -> Option<T> {
        match self.backend() {
            Ok(Some(backend)) => match query(backend) {
                Ok(value) => Some(value),
                Err(err) => {
                    log::warn!("{}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }

    /// Whether the backend reports a trained model. `None` means the
    /// state could not be determined, which is distinct from `false`.
    pub fn is_trained(&mut self) -> Option<bool> {
        self.backend_query(|backend| backend.is_trained())
    }

    /// Modification time of the trained model, when known.
    pub fn modification_time(&mut self) -> Option<DateTime<Utc>> {
        self.backend_query(|backend| backend.modification_time())
            .flatten()
    }

    /// Status snapshot of this project.
    pub fn dump(&mut self) -> ProjectInfo {
        ProjectInfo {
            project_id: self.project_id.clone(),
            name: self.name.clone(),
            language: self.language.clone(),
            backend_id: self.config.get("backend").map(str::to_string),
            is_trained: self.is_trained(),
            modification_time: self.modification_time(),
        }
    }

    // --- suggestion ---

    fn runtime_params(&self, backend_params: Option<&BackendParams>) -> ParamMap {
        backend_params
            .and_then(|params| {
                self.config
                    .get("backend")
                    .and_then(|backend_id| params.get(backend_id))
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Suggest subjects for a batch of texts. Outputs are in input order
    /// and the batch width equals the vocabulary subject count.
    pub fn suggest(
        &mut self,
        texts: &[&str],
        backend_params: Option<&BackendParams>,
    ) -> Result<SuggestionBatch> {
        match self.is_trained() {
            Some(true) => {}
            Some(false) => {
                return Err(Error::NotInitialized {
                    project_id: self.project_id.clone(),
                });
            }
            None => log::warn!(
                "Could not get train state information for project '{}'",
                self.project_id
            ),
        }

        let transform = self.transform()?;
        let texts: Vec<String> = texts
            .iter()
            .map(|text| transform.transform_text(text))
            .collect();
        let width = self.vocab()?.len();
        let params = self.runtime_params(backend_params);
        let backend_id = self.backend_id_setting();
        let backend = self
            .backend()?
            .ok_or(Error::BackendNotAvailable(backend_id))?;
        let vectors = backend.suggest(&texts, &params)?;
        Ok(SuggestionBatch::from_backend(vectors, width))
    }

    /// Suggest subjects for a whole corpus, batch by batch.
    ///
    /// The returned iterator is lazy, single-pass and non-restartable; it
    /// yields one suggestion vector per document, in corpus order.
    pub fn suggest_corpus<'a>(
        &'a mut self,
        corpus: &'a mut dyn DocumentCorpus,
        backend_params: Option<&BackendParams>,
    ) -> CorpusSuggestions<'a> {
        CorpusSuggestions {
            batches: corpus.doc_batches(),
            project: self,
            params: backend_params.cloned(),
            pending: VecDeque::new(),
            failed: false,
        }
    }

    // --- training ---

    /// Train the project from a document corpus (or from the backend's
    /// cached training data). `jobs` is a concurrency hint; 0 means
    /// backend default.
    pub fn train(
        &mut self,
        corpus: TrainingCorpus,
        backend_params: Option<&BackendParams>,
        jobs: u32,
    ) -> Result<()> {
        let corpus = match corpus {
            TrainingCorpus::Cached => TrainingCorpus::Cached,
            TrainingCorpus::Documents(docs) => {
                TrainingCorpus::Documents(self.transform()?.transform_corpus(docs))
            }
        };
        let params = self.runtime_params(backend_params);
        let backend_id = self.backend_id_setting();
        let backend = self
            .backend()?
            .ok_or(Error::BackendNotAvailable(backend_id))?;
        backend.train(corpus, &params, jobs)
    }

    /// Further train the project from additional documents. Fails with a
    /// not-supported error when the backend lacks the learning capability.
    pub fn learn(
        &mut self,
        corpus: Box<dyn DocumentCorpus>,
        backend_params: Option<&BackendParams>,
    ) -> Result<()> {
        let params = self.runtime_params(backend_params);
        let backend_id = self.backend_id_setting();
        let project_id = self.project_id.clone();
        let transform = self.transform()?;
        let backend = self
            .backend()?
            .ok_or(Error::BackendNotAvailable(backend_id))?;
        match backend.as_learning() {
            Some(learner) => learner.learn(transform.transform_corpus(corpus), &params),
            None => Err(Error::NotSupported {
                message: "learning not supported by backend".to_string(),
                project_id,
            }),
        }
    }

    /// Optimize backend hyperparameters against a validation corpus.
    /// Fails with a not-supported error when the backend lacks the
    /// optimization capability.
    pub fn hyperopt(
        &mut self,
        corpus: Box<dyn DocumentCorpus>,
        trials: u32,
        jobs: u32,
        metric: &str,
        results_file: Option<&Path>,
    ) -> Result<HpRecommendation> {
        let backend_id = self.backend_id_setting();
        let project_id = self.project_id.clone();
        let backend = self
            .backend()?
            .ok_or(Error::BackendNotAvailable(backend_id))?;
        match backend.as_hyperopt() {
            Some(optimizable) => {
                let mut optimizer = optimizable.get_hp_optimizer(corpus, metric)?;
                optimizer.optimize(trials, jobs, results_file)
            }
            None => Err(Error::NotSupported {
                message: "hyperparameter optimization not supported by backend".to_string(),
                project_id,
            }),
        }
    }

    // --- teardown ---

    /// Remove the on-disk model data of this project.
    ///
    /// Also drops the cached backend instance and clears the initialized
    /// flag, so trained-state queries after teardown re-resolve instead of
    /// reporting pre-deletion values.
    pub fn remove_model_data(&mut self) -> Result<()> {
        if self.datadir.is_dir() {
            fs::remove_dir_all(&self.datadir)?;
            self.backend = None;
            self.initialized = false;
            log::info!("Removed model data for project '{}'", self.project_id);
        } else {
            log::warn!("No model data to remove for project '{}'", self.project_id);
        }
        Ok(())
    }
}

/// Lazy, single-pass stream of per-document suggestion vectors.
pub struct CorpusSuggestions<'a> {
    batches: Box<dyn Iterator<Item = Vec<Document>> + 'a>,
    project: &'a mut Project,
    params: Option<BackendParams>,
    pending: VecDeque<SuggestionVector>,
    failed: bool,
}

impl Iterator for CorpusSuggestions<'_> {
    type Item = Result<SuggestionVector>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(vector) = self.pending.pop_front() {
                return Some(Ok(vector));
            }
            if self.failed {
                return None;
            }
            let batch = self.batches.next()?;
            let texts: Vec<&str> = batch.iter().map(|doc| doc.text.as_str()).collect();
            match self.project.suggest(&texts, self.params.as_ref()) {
                Ok(suggestions) => self.pending.extend(suggestions.into_vectors()),
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
