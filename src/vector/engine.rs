//! Vector Search Engine
//!
//! Exact top-N retrieval over a fixed set of (document, embedding) pairs.
//!
//! Embeddings live in one row-major buffer; row `i` belongs to document `i`.
//! Scores are raw inner products, so embeddings are expected to be
//! normalized by whoever produced them.

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::similarity::dot_product;
use crate::error::{Error, Result};

/// Number of results returned when the caller has no preference
pub const DEFAULT_NUM_RESULTS: usize = 10;

/// A ranked hit with its score and position in the original collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDocument<T> {
    /// The stored document
    pub document: T,
    /// Inner product with the query
    pub score: f32,
    /// Insertion index of the document
    pub index: usize,
}

/// Immutable exact-search engine
#[derive(Debug, Clone)]
pub struct VectorSearchEngine<D> {
    documents: Vec<D>,
    /// Row-major, `documents.len() * dimension` values
    matrix: Vec<f32>,
    /// `None` only for an engine built from no embeddings at all
    dimension: Option<usize>,
}

impl<D> VectorSearchEngine<D> {
    /// Build an engine from documents and their positionally paired embeddings.
    ///
    /// Every embedding must share the length of the first one.
    pub fn new(documents: Vec<D>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if documents.len() != embeddings.len() {
            return Err(Error::LengthMismatch {
                documents: documents.len(),
                embeddings: embeddings.len(),
            });
        }

        let dimension = embeddings.first().map(Vec::len);
        let expected = dimension.unwrap_or(0);
        let mut matrix = Vec::with_capacity(embeddings.len() * expected);

        for row in &embeddings {
            if row.len() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: row.len(),
                });
            }
            matrix.extend_from_slice(row);
        }

        debug!(
            "Built vector search engine with {} documents of dimension {}",
            documents.len(),
            expected
        );

        Ok(Self {
            documents,
            matrix,
            dimension,
        })
    }

    /// Build an engine from an already flattened row-major matrix.
    pub fn from_matrix(documents: Vec<D>, matrix: Vec<f32>, dimension: usize) -> Result<Self> {
        let rows = if dimension == 0 {
            if !matrix.is_empty() {
                return Err(Error::InvalidArgument(
                    "matrix holds values but dimension is 0".to_string(),
                ));
            }
            documents.len()
        } else {
            if matrix.len() % dimension != 0 {
                return Err(Error::InvalidArgument(format!(
                    "matrix length {} is not a multiple of dimension {}",
                    matrix.len(),
                    dimension
                )));
            }
            matrix.len() / dimension
        };

        if rows != documents.len() {
            return Err(Error::LengthMismatch {
                documents: documents.len(),
                embeddings: rows,
            });
        }

        debug!(
            "Built vector search engine with {} documents of dimension {}",
            documents.len(),
            dimension
        );

        Ok(Self {
            documents,
            matrix,
            dimension: Some(dimension),
        })
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Embedding dimensionality, if known
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Stored documents in insertion order
    pub fn documents(&self) -> &[D] {
        &self.documents
    }

    /// Embedding row for the document at `index`
    pub fn embedding(&self, index: usize) -> Option<&[f32]> {
        if index >= self.documents.len() {
            return None;
        }
        let dim = self.dimension.unwrap_or(0);
        Some(&self.matrix[index * dim..(index + 1) * dim])
    }

    /// Score every stored embedding against `query`, in insertion order.
    pub fn scores(&self, query: &[f32]) -> Result<Vec<f32>> {
        if self.documents.is_empty() {
            return Ok(Vec::new());
        }

        let dim = self.dimension.unwrap_or(0);
        if query.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: query.len(),
            });
        }

        if dim == 0 {
            return Ok(vec![0.0; self.documents.len()]);
        }

        Ok(self
            .matrix
            .chunks_exact(dim)
            .map(|row| dot_product(row, query))
            .collect())
    }

    /// Top `num_results` documents with their scores, best first.
    ///
    /// Equal scores keep insertion order. NaN scores rank last.
    pub fn search_scored(
        &self,
        query: &[f32],
        num_results: usize,
    ) -> Result<Vec<ScoredDocument<&D>>> {
        if num_results == 0 {
            return Err(Error::InvalidArgument(
                "num_results must be a positive integer".to_string(),
            ));
        }

        let mut ranked: Vec<(usize, f32)> = self.scores(query)?.into_iter().enumerate().collect();

        // sort_by is stable, which gives the insertion-order tie-break
        ranked.sort_by(|a, b| rank_order(a.1, b.1));
        ranked.truncate(num_results);

        trace!(
            "Scored {} documents, returning {}",
            self.documents.len(),
            ranked.len()
        );

        Ok(ranked
            .into_iter()
            .map(|(index, score)| ScoredDocument {
                document: &self.documents[index],
                score,
                index,
            })
            .collect())
    }

    /// Top `num_results` documents, best first.
    pub fn search(&self, query: &[f32], num_results: usize) -> Result<Vec<&D>> {
        Ok(self
            .search_scored(query, num_results)?
            .into_iter()
            .map(|hit| hit.document)
            .collect())
    }
}

/// Descending by score with NaN last. `0.0` and `-0.0` compare equal.
fn rank_order(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
