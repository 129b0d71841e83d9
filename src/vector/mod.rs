//! Vector Module
//!
//! Similarity kernels and the exact nearest-neighbor engine.

mod engine;
mod similarity;

pub use engine::{ScoredDocument, VectorSearchEngine, DEFAULT_NUM_RESULTS};
pub use similarity::{cosine_similarity, dot_product, magnitude, normalize_vector, normalized};
