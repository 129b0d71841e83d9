//! ZOOMSEARCH - Exact Vector Search for FAQ Retrieval
//!
//! Ranks a fixed collection of embedded documents against query vectors
//! by inner product, and measures retrieval quality against ground truth.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod vector;

pub use config::{EvaluationConfig, SearchConfig};
pub use document::{filter_by_course, load_documents, Document};
pub use embedding::{embed_documents, Embedder, PrecomputedEmbedder};
pub use error::{Error, Result};
pub use evaluation::{load_ground_truth, EvaluationReport, Evaluator, GroundTruth};
pub use vector::{ScoredDocument, VectorSearchEngine, DEFAULT_NUM_RESULTS};
