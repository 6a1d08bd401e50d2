use serde::{Deserialize, Serialize};

use crate::errors::{require_text, ModelError};

/// Material suggestion request: a free-form project description plus a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub purchase_history: String,
    #[serde(default)]
    pub category: String,
}

impl SuggestionRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        require_text("project details", &self.purchase_history)?;
        require_text("category", &self.category)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
}
