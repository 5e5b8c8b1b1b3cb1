use serde::{Deserialize, Serialize};

/// Body of every error response: `{"error": "..."}`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    pub error: String,
}
