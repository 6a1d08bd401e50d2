use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{require_text, ModelError};
use crate::image::ImageRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    Editor,
    Viewer,
    Contributor,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Administrator, Role::Editor, Role::Viewer, Role::Contributor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
            Role::Contributor => "Contributor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ModelError::Validation("Please select a valid role.".into()))
    }
}

/// Back-office user. `email` is opaque text; it is only required to be non-blank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Create input. `role` arrives as text so an unknown role is a validation error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Partial update. `photo: Some("")` removes the stored photo.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

fn validate_photo(photo: &str) -> Result<(), ModelError> {
    match ImageRef::parse(photo)? {
        ImageRef::Embedded { .. } => Ok(()),
        ImageRef::Url(_) => Err(ModelError::Validation("photo must be an embedded image".into())),
    }
}

fn seed_row(id: &str, name: &str, email: &str, role: Role) -> User {
    User { id: id.into(), name: name.into(), email: email.into(), role, photo: None }
}

impl Entity for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    const SLOT: &'static str = "larchcodeHubUsers";
    const LABEL: &'static str = "user";

    fn id(&self) -> &str { &self.id }

    fn seed() -> Vec<Self> {
        vec![
            seed_row("1", "Alice Wonderland", "alice@example.com", Role::Administrator),
            seed_row("2", "Bob The Builder", "bob@example.com", Role::Editor),
            seed_row("3", "Charlie Brown", "charlie@example.com", Role::Viewer),
        ]
    }

    fn validate(&self) -> Result<(), ModelError> {
        require_text("id", &self.id)?;
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;
        if let Some(photo) = &self.photo { validate_photo(photo)?; }
        Ok(())
    }

    fn from_draft(id: String, draft: NewUser) -> Result<Self, ModelError> {
        let role = draft.role.parse::<Role>()?;
        let photo = match draft.photo.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => {
                validate_photo(p)?;
                Some(p.to_string())
            }
            _ => None,
        };
        Ok(Self {
            id,
            name: require_text("name", &draft.name)?,
            email: require_text("email", &draft.email)?,
            role,
            photo,
        })
    }

    fn validate_patch(patch: &UserPatch) -> Result<(), ModelError> {
        if let Some(name) = &patch.name { require_text("name", name)?; }
        if let Some(email) = &patch.email { require_text("email", email)?; }
        if let Some(role) = &patch.role { role.parse::<Role>()?; }
        if let Some(photo) = patch.photo.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            validate_photo(photo)?;
        }
        Ok(())
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name { self.name = name.trim().to_string(); }
        if let Some(email) = patch.email { self.email = email.trim().to_string(); }
        if let Some(role) = patch.role.and_then(|r| r.parse().ok()) { self.role = role; }
        if let Some(photo) = patch.photo {
            let photo = photo.trim();
            self.photo = (!photo.is_empty()).then(|| photo.to_string());
        }
    }

    fn search_fields(&self) -> Vec<&str> { vec![self.name.as_str(), self.email.as_str(), self.role.as_str()] }
}
