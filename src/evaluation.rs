//! Retrieval Evaluation
//!
//! Measures how often the expected document shows up in the top results
//! for a set of known question/document pairs.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::panic;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EvaluationConfig;
use crate::document::Document;
use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::vector::VectorSearchEngine;

/// A question paired with the id of the document that answers it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub question: String,
    #[serde(default)]
    pub course: String,
    /// Expected document id
    pub document: String,
}

/// Load ground-truth records.
///
/// Files ending in `.csv` are read as CSV with a `question,course,document`
/// header; anything else is read as a JSON array.
pub fn load_ground_truth<P: AsRef<Path>>(path: P) -> Result<Vec<GroundTruth>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let reader = BufReader::new(File::open(path)?);

    let records: Vec<GroundTruth> = if is_csv {
        csv::Reader::from_reader(reader)
            .deserialize::<GroundTruth>()
            .collect::<std::result::Result<_, _>>()?
    } else {
        serde_json::from_reader(reader)?
    };

    info!("Loaded {} ground-truth records from {}", records.len(), path.display());
    Ok(records)
}

/// Keep only records belonging to `course`
pub fn filter_ground_truth(records: Vec<GroundTruth>, course: &str) -> Vec<GroundTruth> {
    records.into_iter().filter(|r| r.course == course).collect()
}

/// Fraction of queries whose expected document was found
pub fn hit_rate(ranks: &[Option<usize>]) -> f64 {
    if ranks.is_empty() {
        return 0.0;
    }
    ranks.iter().filter(|r| r.is_some()).count() as f64 / ranks.len() as f64
}

/// Mean reciprocal rank; misses contribute 0
pub fn mrr(ranks: &[Option<usize>]) -> f64 {
    if ranks.is_empty() {
        return 0.0;
    }
    let sum: f64 = ranks
        .iter()
        .flatten()
        .map(|&rank| 1.0 / (rank + 1) as f64)
        .sum();
    sum / ranks.len() as f64
}

/// Aggregate outcome of an evaluation run
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub total: usize,
    pub hits: usize,
    pub hit_rate: f64,
    pub mrr: f64,
    pub num_results: usize,
    pub elapsed: Duration,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationReport {
    /// Build a report from per-query zero-based ranks (`None` = miss)
    pub fn from_ranks(ranks: &[Option<usize>], num_results: usize, elapsed: Duration) -> Self {
        Self {
            total: ranks.len(),
            hits: ranks.iter().filter(|r| r.is_some()).count(),
            hit_rate: hit_rate(ranks),
            mrr: mrr(ranks),
            num_results,
            elapsed,
            evaluated_at: Utc::now(),
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "evaluated at: {}", self.evaluated_at.to_rfc3339())?;
        writeln!(f, "queries:      {}", self.total)?;
        writeln!(f, "hits@{}:       {}", self.num_results, self.hits)?;
        writeln!(f, "hit rate:     {:.4}", self.hit_rate)?;
        writeln!(f, "mrr:          {:.4}", self.mrr)?;
        write!(f, "elapsed:      {:.2?}", self.elapsed)
    }
}

/// Runs ground-truth queries against an engine
pub struct Evaluator<'a, E: ?Sized> {
    engine: &'a VectorSearchEngine<Document>,
    embedder: &'a E,
    config: EvaluationConfig,
}

impl<'a, E: Embedder + ?Sized> Evaluator<'a, E> {
    pub fn new(
        engine: &'a VectorSearchEngine<Document>,
        embedder: &'a E,
        config: EvaluationConfig,
    ) -> Self {
        Self {
            engine,
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Zero-based position of the expected document, if it was retrieved.
    ///
    /// A retrieved document without a string or numeric id is an error.
    pub fn rank_of(&self, record: &GroundTruth) -> Result<Option<usize>> {
        let query = self.embedder.embed(&record.question)?;
        let results = self.engine.search(&query, self.config.num_results)?;

        for (rank, doc) in results.iter().enumerate() {
            let id = doc.id(&self.config.id_field).ok_or_else(|| {
                Error::InvalidDocument(format!(
                    "retrieved document has no usable `{}` field",
                    self.config.id_field
                ))
            })?;
            if id == record.document.as_str() {
                return Ok(Some(rank));
            }
        }
        Ok(None)
    }

    /// Evaluate every record, splitting the work across scoped threads.
    ///
    /// The first failing record aborts the run.
    pub fn evaluate(&self, records: &[GroundTruth]) -> Result<EvaluationReport> {
        if self.config.num_results == 0 {
            return Err(Error::InvalidArgument(
                "num_results must be a positive integer".to_string(),
            ));
        }

        let start = Instant::now();
        let workers = self.config.effective_workers().min(records.len()).max(1);
        let chunk_size = records.len().div_ceil(workers).max(1);

        debug!(
            "Evaluating {} queries on {} workers (chunk size {})",
            records.len(),
            workers,
            chunk_size
        );

        let outcome = crossbeam::scope(|s| -> Result<Vec<Option<usize>>> {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move |_| {
                        chunk
                            .iter()
                            .map(|record| self.rank_of(record))
                            .collect::<Result<Vec<_>>>()
                    })
                })
                .collect();

            let mut ranks = Vec::with_capacity(records.len());
            for handle in handles {
                let part = handle.join().unwrap_or_else(|p| panic::resume_unwind(p))?;
                ranks.extend(part);
            }
            Ok(ranks)
        });
        let ranks = outcome.unwrap_or_else(|p| panic::resume_unwind(p))?;

        let report = EvaluationReport::from_ranks(&ranks, self.config.num_results, start.elapsed());
        info!(
            "Evaluation finished: {}/{} hits, hit rate {:.4}, mrr {:.4}",
            report.hits, report.total, report.hit_rate, report.mrr
        );
        Ok(report)
    }
}
