use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the passage body.
pub const TEXT_FIELD: &str = "text";

/// One nearest-neighbour hit returned by the vector store.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VectorMatch {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl VectorMatch {
    /// The stored passage, if the match carries a non-empty `text` string.
    pub fn text(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get(TEXT_FIELD)?
            .as_str()
            .filter(|text| !text.is_empty())
    }
}
