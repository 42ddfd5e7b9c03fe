//! Shared fixtures: stub backends, vocabularies and catalog builders.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use grove::backend::hyperopt::append_trial_record;
use grove::error::{Error, Result};
use grove::{
    Backend, ComponentCatalog, DocumentCorpus, HpOptimizer, HpRecommendation, HyperoptBackend,
    ParamMap, ProjectConfig, ProjectRegistry, Subject, SubjectSuggestion, SuggestionVector,
    TrainingCorpus, TrialRecord, Vocabulary,
};

/// Trained state reported by a stub backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainState {
    Trained,
    Untrained,
    /// The trained-state query itself fails.
    Unknown,
}

/// Call counters and captured inputs shared with the test body.
#[derive(Default, Debug)]
pub struct Counters {
    pub initialize: AtomicUsize,
    pub train: AtomicUsize,
    pub suggest: AtomicUsize,
    pub suggest_texts: Mutex<Vec<String>>,
    pub train_texts: Mutex<Vec<String>>,
}

/// Backend double with a fixed suggestion result and observable calls.
/// Deliberately implements neither learning nor optimization.
#[derive(Debug)]
pub struct StubBackend {
    backend_id: String,
    state: TrainState,
    entries: Vec<SubjectSuggestion>,
    counters: Arc<Counters>,
}

impl Backend for StubBackend {
    fn backend_id(&self) -> &str {
        &self.backend_id
    }

    fn suggest(&mut self, texts: &[String], _params: &ParamMap) -> Result<Vec<SuggestionVector>> {
        self.counters.suggest.fetch_add(1, Ordering::SeqCst);
        self.counters
            .suggest_texts
            .lock()
            .unwrap()
            .extend(texts.iter().cloned());
        Ok(texts
            .iter()
            .map(|_| SuggestionVector::new(self.entries.clone()))
            .collect())
    }

    fn train(&mut self, corpus: TrainingCorpus, _params: &ParamMap, _jobs: u32) -> Result<()> {
        self.counters.train.fetch_add(1, Ordering::SeqCst);
        if let TrainingCorpus::Documents(mut docs) = corpus {
            let mut texts = self.counters.train_texts.lock().unwrap();
            for batch in docs.doc_batches() {
                texts.extend(batch.into_iter().map(|doc| doc.text));
            }
        }
        Ok(())
    }

    fn initialize(&mut self, _parallel: bool) -> Result<()> {
        self.counters.initialize.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_trained(&self) -> Result<bool> {
        match self.state {
            TrainState::Trained => Ok(true),
            TrainState::Untrained => Ok(false),
            TrainState::Unknown => Err(Error::Backend("train state unavailable".to_string())),
        }
    }
}

/// Register a stub backend factory; returns the shared counters.
pub fn register_stub(
    catalog: &mut ComponentCatalog,
    backend_id: &str,
    state: TrainState,
    entries: Vec<SubjectSuggestion>,
) -> Arc<Counters> {
    let counters = Arc::new(Counters::default());
    let shared = Arc::clone(&counters);
    catalog.register_backend(backend_id, move |backend_id, _config, _context| {
        Ok(Box::new(StubBackend {
            backend_id: backend_id.to_string(),
            state,
            entries: entries.clone(),
            counters: Arc::clone(&shared),
        }) as Box<dyn Backend>)
    });
    counters
}

/// Backend whose trained state is a marker file in the project datadir.
#[derive(Debug)]
pub struct FileMarkerBackend {
    backend_id: String,
    datadir: PathBuf,
}

impl FileMarkerBackend {
    fn marker(&self) -> PathBuf {
        self.datadir.join("trained")
    }
}

impl Backend for FileMarkerBackend {
    fn backend_id(&self) -> &str {
        &self.backend_id
    }

    fn suggest(&mut self, texts: &[String], _params: &ParamMap) -> Result<Vec<SuggestionVector>> {
        Ok(texts.iter().map(|_| SuggestionVector::default()).collect())
    }

    fn train(&mut self, _corpus: TrainingCorpus, _params: &ParamMap, _jobs: u32) -> Result<()> {
        std::fs::create_dir_all(&self.datadir)?;
        std::fs::write(self.marker(), b"trained\n")?;
        Ok(())
    }

    fn is_trained(&self) -> Result<bool> {
        Ok(self.marker().is_file())
    }

    fn modification_time(&self) -> Result<Option<DateTime<Utc>>> {
        match std::fs::metadata(self.marker()) {
            Ok(meta) => Ok(Some(DateTime::<Utc>::from(meta.modified()?))),
            Err(_) => Ok(None),
        }
    }
}

/// Register the file-marker backend factory under the given id.
pub fn register_file_marker(catalog: &mut ComponentCatalog, backend_id: &str) {
    catalog.register_backend(backend_id, |backend_id, _config, context| {
        Ok(Box::new(FileMarkerBackend {
            backend_id: backend_id.to_string(),
            datadir: context.datadir,
        }) as Box<dyn Backend>)
    });
}

/// Backend supporting hyperparameter optimization.
#[derive(Debug)]
pub struct HyperoptStubBackend {
    backend_id: String,
}

impl Backend for HyperoptStubBackend {
    fn backend_id(&self) -> &str {
        &self.backend_id
    }

    fn suggest(&mut self, texts: &[String], _params: &ParamMap) -> Result<Vec<SuggestionVector>> {
        Ok(texts.iter().map(|_| SuggestionVector::default()).collect())
    }

    fn train(&mut self, _corpus: TrainingCorpus, _params: &ParamMap, _jobs: u32) -> Result<()> {
        Ok(())
    }

    fn is_trained(&self) -> Result<bool> {
        Ok(true)
    }

    fn as_hyperopt(&mut self) -> Option<&mut dyn HyperoptBackend> {
        Some(self)
    }
}

impl HyperoptBackend for HyperoptStubBackend {
    fn get_hp_optimizer<'a>(
        &'a mut self,
        _corpus: Box<dyn DocumentCorpus>,
        metric: &str,
    ) -> Result<Box<dyn HpOptimizer + 'a>> {
        Ok(Box::new(StubOptimizer {
            metric: metric.to_string(),
        }))
    }
}

struct StubOptimizer {
    metric: String,
}

impl HpOptimizer for StubOptimizer {
    fn optimize(
        &mut self,
        trials: u32,
        _jobs: u32,
        results_file: Option<&std::path::Path>,
    ) -> Result<HpRecommendation> {
        let mut best = 0.0;
        for trial in 0..trials {
            let score = (trial + 1) as f64 / trials as f64;
            best = score;
            if let Some(path) = results_file {
                let record = TrialRecord {
                    trial,
                    score,
                    params: [("metric".to_string(), self.metric.clone())]
                        .into_iter()
                        .collect(),
                };
                append_trial_record(path, &record)?;
            }
        }
        Ok(HpRecommendation {
            score: best,
            params: [("limit".to_string(), "100".to_string())].into_iter().collect(),
        })
    }
}

/// Register the hyperopt-capable backend factory under the given id.
pub fn register_hyperopt_stub(catalog: &mut ComponentCatalog, backend_id: &str) {
    catalog.register_backend(backend_id, |backend_id, _config, _context| {
        Ok(Box::new(HyperoptStubBackend {
            backend_id: backend_id.to_string(),
        }) as Box<dyn Backend>)
    });
}

/// A three-subject vocabulary supporting English and Finnish.
pub fn three_subject_vocab() -> Vocabulary {
    Vocabulary::new(
        "v1",
        vec!["en".to_string(), "fi".to_string()],
        vec![
            Subject::new("http://example.org/s0", "archaeology"),
            Subject::new("http://example.org/s1", "geology"),
            Subject::new("http://example.org/s2", "biology"),
        ],
    )
}

/// A catalog with the three-subject vocabulary registered.
pub fn catalog() -> ComponentCatalog {
    let mut catalog = ComponentCatalog::new();
    catalog.add_vocab(three_subject_vocab());
    catalog
}

/// Minimal valid project configuration for the given backend id.
pub fn project_config(backend_id: &str) -> ProjectConfig {
    [("language", "en"), ("backend", backend_id), ("vocab", "v1")]
        .into_iter()
        .collect()
}

/// A registry rooted in a fresh temporary datadir.
pub fn registry_with(catalog: ComponentCatalog) -> (tempfile::TempDir, ProjectRegistry) {
    let dir = tempfile::tempdir().expect("create tempdir");
    let registry = ProjectRegistry::new(catalog, dir.path());
    (dir, registry)
}
