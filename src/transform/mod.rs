//! Text and corpus transforms applied before suggestion and training.
//!
//! A transform specification is a comma-separated chain such as `pass`
//! or `limit(5000),pass`, resolved into a `TransformChain` bound to the
//! owning project. The chain offers a per-text transform (used by the
//! suggestion pipeline) and a lazy corpus-level transform (used by
//! training and learning).

mod input_limiter;

pub use input_limiter::InputLimiter;

use std::sync::Arc;

use crate::corpus::{Document, DocumentCorpus};
use crate::util::parse_spec;

/// A single text transformation step.
pub trait Transform: std::fmt::Debug {
    fn name(&self) -> &str;

    /// Pure text-to-text transformation.
    fn apply(&self, text: &str) -> String;
}

/// Identity transform.
#[derive(Debug)]
pub struct PassTransform;

impl Transform for PassTransform {
    fn name(&self) -> &str {
        "pass"
    }

    fn apply(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Per-project context available to transform constructors.
#[derive(Debug, Clone)]
pub struct TransformContext {
    pub project_id: String,
    pub language: String,
}

/// An ordered pipeline of transforms bound to one project.
#[derive(Debug)]
pub struct TransformChain {
    steps: Vec<Box<dyn Transform>>,
    context: TransformContext,
}

impl TransformChain {
    pub fn new(steps: Vec<Box<dyn Transform>>, context: TransformContext) -> Self {
        Self { steps, context }
    }

    pub fn context(&self) -> &TransformContext {
        &self.context
    }

    /// Run a single text through every step in order.
    pub fn transform_text(&self, text: &str) -> String {
        self.steps
            .iter()
            .fold(text.to_string(), |text, step| step.apply(&text))
    }

    /// Wrap a corpus so every document text is transformed lazily as
    /// batches are consumed.
    pub fn transform_corpus(self: Arc<Self>, corpus: Box<dyn DocumentCorpus>) -> Box<dyn DocumentCorpus> {
        Box::new(TransformedCorpus { chain: self, inner: corpus })
    }
}

struct TransformedCorpus {
    chain: Arc<TransformChain>,
    inner: Box<dyn DocumentCorpus>,
}

impl DocumentCorpus for TransformedCorpus {
    fn doc_batches(&mut self) -> Box<dyn Iterator<Item = Vec<Document>> + '_> {
        let chain = Arc::clone(&self.chain);
        Box::new(self.inner.doc_batches().map(move |batch| {
            batch
                .into_iter()
                .map(|doc| Document {
                    text: chain.transform_text(&doc.text),
                    subjects: doc.subjects,
                })
                .collect()
        }))
    }
}

/// Resolve a transform chain specification for a project.
pub fn get_transform(
    spec: &str,
    context: TransformContext,
) -> std::result::Result<TransformChain, String> {
    let mut steps: Vec<Box<dyn Transform>> = Vec::new();
    for part in spec.split(',') {
        let (name, arg) =
            parse_spec(part).ok_or_else(|| format!("invalid transform specification '{}'", part))?;
        match name.as_str() {
            "pass" => steps.push(Box::new(PassTransform)),
            "limit" => steps.push(Box::new(InputLimiter::from_arg(arg.as_deref())?)),
            other => return Err(format!("no transform called '{}'", other)),
        }
    }
    Ok(TransformChain::new(steps, context))
}
