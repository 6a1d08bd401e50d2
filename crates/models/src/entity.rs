//! The contract every persisted record kind implements.
//!
//! A kind names its slot, carries its seed set and knows how to build, patch,
//! validate and search its records. The service layer is written once against
//! this trait instead of once per kind.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ModelError;

pub trait Entity:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Input for creating a record; carries everything except the id.
    type Draft: Debug + DeserializeOwned + Send + Sync + 'static;
    /// Partial update; absent fields are left as they are.
    type Patch: Debug + DeserializeOwned + Send + Sync + 'static;

    /// Name of the slot holding this kind's collection.
    const SLOT: &'static str;
    /// Singular label used in log lines and messages.
    const LABEL: &'static str;

    fn id(&self) -> &str;

    /// Records written the first time the slot is opened empty.
    fn seed() -> Vec<Self>;

    /// Shape rules a stored record must satisfy.
    fn validate(&self) -> Result<(), ModelError>;

    /// Validate a draft and turn it into a record with the given id.
    fn from_draft(id: String, draft: Self::Draft) -> Result<Self, ModelError>;

    fn validate_patch(patch: &Self::Patch) -> Result<(), ModelError>;

    /// Apply an already validated patch in place.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Text fields searched by the admin filter box.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over `search_fields`; a blank query matches all.
    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
