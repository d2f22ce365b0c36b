use std::collections::HashMap;

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// One puzzle of the evaluation set. Only `id` and `answer` are needed for
/// judging; everything else is carried as raw metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    #[serde(default)]
    pub question: String,
    /// Ground-truth move in SAN, without check/mate suffix
    pub answer: String,
    /// `fen`, `rating`, `themes` and anything else a dataset carries
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Position {
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    /// Cache counters and other provider fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Graded outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Serialized as `null` when no move could be extracted
    pub model_answer: Option<String>,
    pub correct_answer: String,
    pub correct: bool,
    pub confidence: f64,
}

/// A model response to one position.
///
/// A typed field is `None` when the stored key is absent or does not have the
/// expected shape; in the latter case the raw value stays in `extra` under
/// its original key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Fields written by other tools, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_response: Option<Judgment>,
}

/// Decode `key` out of `record` into `T`. On success the key is removed from
/// `record`; a null or mistyped value is left in place untouched.
fn take_field<T: DeserializeOwned>(id: &str, record: &mut Map<String, Value>, key: &str) -> Option<T> {
    let raw = record.get(key).filter(|v| !v.is_null())?;
    match T::deserialize(raw) {
        Ok(value) => {
            record.shift_remove(key);
            Some(value)
        }
        Err(e) => {
            warn!(id = %id, field = key, error = %e, "Unexpected field shape in prediction record, keeping it as is");
            None
        }
    }
}

impl Prediction {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Default::default()
        }
    }

    /// Decode a stored record field by field. Only `response` feeds the
    /// judge: when it is missing or not a string the record is judged as an
    /// empty response. No stored key is ever dropped.
    pub fn from_value(id: &str, value: Value) -> Self {
        let mut record = match value {
            Value::Object(map) => map,
            other => {
                warn!(id = %id, kind = json_kind(&other), "Prediction record is not an object, treating as empty response");
                return Self::default();
            }
        };

        let response = take_field::<String>(id, &mut record, "response");
        if response.is_none() {
            debug!(id = %id, "No usable response in prediction record");
        }
        let model = take_field(id, &mut record, "model");
        let usage = take_field(id, &mut record, "usage");
        let judge_response = take_field(id, &mut record, "judge_response");

        Self {
            model,
            response,
            usage,
            extra: record,
            judge_response,
        }
    }

    /// Text handed to the parser; empty when the record has no usable response.
    pub fn response_text(&self) -> &str {
        self.response.as_deref().unwrap_or_default()
    }

    /// Returns a copy of this prediction carrying `judgment`. A stale
    /// `judge_response` of unexpected shape is replaced.
    pub fn with_judgment(&self, judgment: Judgment) -> Self {
        let mut judged = self.clone();
        judged.extra.shift_remove("judge_response");
        judged.judge_response = Some(judgment);
        judged
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered mapping of position id to prediction. Stored order survives a
/// load/write cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionSet {
    entries: Vec<(String, Prediction)>,
    index: HashMap<String, usize>,
}

impl PredictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Prediction> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    /// Insert or replace. A replaced entry keeps its original slot.
    pub fn insert(&mut self, id: String, prediction: Prediction) {
        match self.index.get(&id) {
            Some(&i) => self.entries[i].1 = prediction,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, prediction));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prediction)> {
        self.entries.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

impl FromIterator<(String, Prediction)> for PredictionSet {
    fn from_iter<I: IntoIterator<Item = (String, Prediction)>>(iter: I) -> Self {
        let mut set = PredictionSet::new();
        for (id, prediction) in iter {
            set.insert(id, prediction);
        }
        set
    }
}

impl Serialize for PredictionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, prediction) in &self.entries {
            map.serialize_entry(id, prediction)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PredictionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(id, value)| {
                let prediction = Prediction::from_value(&id, value);
                (id, prediction)
            })
            .collect())
    }
}
