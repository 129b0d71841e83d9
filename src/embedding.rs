//! Embedding Providers
//!
//! The engine never embeds text itself; callers inject an [`Embedder`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hashbrown::HashMap;
use tracing::info;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::vector::normalize_vector;

/// Turns text into a fixed-length vector
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedder backed by a table of vectors computed ahead of time
#[derive(Debug, Clone, Default)]
pub struct PrecomputedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    normalize: bool,
}

impl PrecomputedEmbedder {
    pub fn new(vectors: HashMap<String, Vec<f32>>) -> Self {
        Self {
            vectors,
            normalize: false,
        }
    }

    /// Load a JSON object mapping text to vector
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let vectors: HashMap<String, Vec<f32>> = serde_json::from_reader(reader)?;
        info!("Loaded {} precomputed vectors from {}", vectors.len(), path.display());
        Ok(Self::new(vectors))
    }

    /// Scale looked-up vectors to unit length
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn insert(&mut self, text: impl Into<String>, vector: Vec<f32>) {
        self.vectors.insert(text.into(), vector);
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl Embedder for PrecomputedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = self
            .vectors
            .get(text)
            .cloned()
            .ok_or_else(|| Error::EmbeddingNotFound(text.to_string()))?;
        if self.normalize {
            normalize_vector(&mut vector);
        }
        Ok(vector)
    }
}

/// Embed each document's joined `fields`, preserving order
pub fn embed_documents<E, S>(
    embedder: &E,
    documents: &[Document],
    fields: &[S],
) -> Result<Vec<Vec<f32>>>
where
    E: Embedder + ?Sized,
    S: AsRef<str>,
{
    documents
        .iter()
        .map(|doc| embedder.embed(&doc.join_fields(fields)))
        .collect()
}
