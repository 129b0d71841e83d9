//! Configuration

use crate::vector::DEFAULT_NUM_RESULTS;

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of documents returned per query
    pub num_results: usize,

    /// Field holding the unique document identifier
    pub id_field: String,

    /// Fields joined to form the text that gets embedded
    pub text_fields: Vec<String>,

    /// Restrict the collection to one course
    pub course: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            id_field: "id".to_string(),
            text_fields: vec!["question".to_string(), "text".to_string()],
            course: None,
        }
    }
}

impl SearchConfig {
    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }

    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn with_text_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    /// Derive the evaluation settings that go with this search setup
    pub fn evaluation(&self) -> EvaluationConfig {
        EvaluationConfig {
            num_results: self.num_results,
            id_field: self.id_field.clone(),
            ..EvaluationConfig::default()
        }
    }
}

/// Evaluation configuration
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Cutoff for counting a hit
    pub num_results: usize,

    /// Field compared against the ground-truth document id
    pub id_field: String,

    /// Number of query threads (0 = auto-detect)
    pub workers: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            num_results: 5,
            id_field: "id".to_string(),
            workers: 0,
        }
    }
}

impl EvaluationConfig {
    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }

    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Thread count after resolving auto-detect
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}
