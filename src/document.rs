//! Documents
//!
//! FAQ records as loosely typed JSON objects, and loaders for the two
//! collection layouts in circulation: a flat array of documents, and an
//! array of `{"course": ..., "documents": [...]}` groups.

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{Error, Result};

/// Field holding the course name
pub const COURSE_FIELD: &str = "course";

/// A single document: field name to JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a field if it holds a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Identifier stored under `id_field`, as a string.
    ///
    /// Numeric ids are rendered with their JSON spelling so `1` matches `"1"`.
    /// Null, missing or structured values have no id.
    pub fn id(&self, id_field: &str) -> Option<Cow<'_, str>> {
        match self.0.get(id_field)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Space-join the string values of `fields`, skipping missing ones.
    ///
    /// `["question", "text"]` yields the text used for embedding a FAQ entry.
    pub fn join_fields<S: AsRef<str>>(&self, fields: &[S]) -> String {
        fields
            .iter()
            .filter_map(|f| self.get_str(f.as_ref()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidDocument(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }
}

/// Parse a document collection from a JSON value.
///
/// Grouped entries (objects carrying a `documents` array) are flattened
/// and each child is stamped with the group's course name.
pub fn parse_documents(value: Value) -> Result<Vec<Document>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::InvalidDocument(format!(
                "expected a JSON array of documents, got {}",
                other
            )))
        }
    };

    let mut documents = Vec::with_capacity(items.len());
    for item in items {
        let mut map = match item {
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidDocument(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };

        match map.remove("documents") {
            Some(Value::Array(children)) => {
                let course = map.get(COURSE_FIELD).cloned();
                for child in children {
                    let mut doc = Document::try_from(child)?;
                    if let Some(course) = &course {
                        doc.0.insert(COURSE_FIELD.to_string(), course.clone());
                    }
                    documents.push(doc);
                }
            }
            Some(other) => {
                // Not a group after all; keep the field as data
                map.insert("documents".to_string(), other);
                documents.push(Document(map));
            }
            None => documents.push(Document(map)),
        }
    }

    Ok(documents)
}

/// Load a document collection from a JSON file
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let value: Value = serde_json::from_reader(reader)?;
    let documents = parse_documents(value)?;
    info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Keep only documents belonging to `course`
pub fn filter_by_course(documents: Vec<Document>, course: &str) -> Vec<Document> {
    documents
        .into_iter()
        .filter(|doc| doc.get_str(COURSE_FIELD) == Some(course))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_document_accessors() {
        let doc = Document::try_from(json!({
            "id": "abc123",
            "question": "Can I still join?",
            "text": "Yes, you can.",
            "votes": 3
        }))
        .unwrap();

        assert_eq!(doc.id("id").as_deref(), Some("abc123"));
        assert_eq!(doc.get_str("votes"), None);
        assert_eq!(doc.get("votes"), Some(&json!(3)));
        assert_eq!(
            doc.join_fields(&["question", "text"]),
            "Can I still join? Yes, you can."
        );
    }

    #[test]
    fn test_numeric_and_missing_ids() {
        let doc = Document::try_from(json!({"id": 42, "alt": null, "nested": {"a": 1}})).unwrap();
        assert_eq!(doc.id("id").as_deref(), Some("42"));
        assert_eq!(doc.id("alt"), None);
        assert_eq!(doc.id("nested"), None);
        assert_eq!(doc.id("missing"), None);
    }

    #[test]
    fn test_join_fields_skips_missing() {
        let doc = Document::new().with_field("text", "only text");
        assert_eq!(doc.join_fields(&["question", "text"]), "only text");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            Document::try_from(json!([1, 2])),
            Err(Error::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_parse_flat_collection() {
        let docs = parse_documents(json!([
            {"id": "1", "course": "a"},
            {"id": "2", "course": "b"}
        ]))
        .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].id("id").as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_grouped_collection() {
        let docs = parse_documents(json!([
            {"course": "data-engineering-zoomcamp", "documents": [
                {"question": "q1", "text": "t1"},
                {"question": "q2", "text": "t2"}
            ]},
            {"course": "mlops-zoomcamp", "documents": [
                {"question": "q3", "text": "t3"}
            ]}
        ]))
        .unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].get_str(COURSE_FIELD), Some("data-engineering-zoomcamp"));
        assert_eq!(docs[2].get_str(COURSE_FIELD), Some("mlops-zoomcamp"));
        assert_eq!(docs[2].get_str("question"), Some("q3"));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_documents(json!({"id": "1"})).is_err());
        assert!(parse_documents(json!(["text"])).is_err());
    }

    #[test]
    fn test_filter_by_course() {
        let docs = parse_documents(json!([
            {"id": "1", "course": "machine-learning-zoomcamp"},
            {"id": "2", "course": "mlops-zoomcamp"},
            {"id": "3", "course": "machine-learning-zoomcamp"},
            {"id": "4"}
        ]))
        .unwrap();

        let filtered = filter_by_course(docs, "machine-learning-zoomcamp");
        let ids: Vec<_> = filtered
            .iter()
            .filter_map(|d| d.id("id").map(Cow::into_owned))
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_load_documents_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "x", "question": "q", "text": "t", "course": "c"}}]"#
        )
        .unwrap();

        let docs = load_documents(file.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id("id").as_deref(), Some("x"));
    }

    #[test]
    fn test_load_documents_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_documents(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
