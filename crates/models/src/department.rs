use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{require_text, ModelError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub head: String,
    pub members: u32,
}

/// Create input. `members` is signed so a negative count reaches validation
/// instead of failing deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub head: String,
    pub members: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DepartmentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub members: Option<i64>,
}

pub fn validate_members(members: i64) -> Result<u32, ModelError> {
    if members < 0 {
        return Err(ModelError::Validation("Number of members must be a non-negative number.".into()));
    }
    u32::try_from(members)
        .map_err(|_| ModelError::Validation(format!("Number of members must be at most {}.", u32::MAX)))
}

fn seed_row(id: &str, name: &str, head: &str, members: u32) -> Department {
    Department { id: id.into(), name: name.into(), head: head.into(), members }
}

impl Entity for Department {
    type Draft = NewDepartment;
    type Patch = DepartmentPatch;

    const SLOT: &'static str = "larchcodeHubDepartments";
    const LABEL: &'static str = "department";

    fn id(&self) -> &str { &self.id }

    fn seed() -> Vec<Self> {
        vec![
            seed_row("1", "ICT Department", "John Smith", 5),
            seed_row("2", "Human Resources (HR)", "Alice Johnson", 3),
            seed_row("3", "CEO Office", "Loice Mugwe", 2),
            seed_row("4", "Finance Department", "Robert Brown", 4),
        ]
    }

    fn validate(&self) -> Result<(), ModelError> {
        require_text("id", &self.id)?;
        require_text("name", &self.name)?;
        require_text("head", &self.head)?;
        Ok(())
    }

    fn from_draft(id: String, draft: NewDepartment) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            name: require_text("name", &draft.name)?,
            head: require_text("head", &draft.head)?,
            members: validate_members(draft.members)?,
        })
    }

    fn validate_patch(patch: &DepartmentPatch) -> Result<(), ModelError> {
        if let Some(name) = &patch.name { require_text("name", name)?; }
        if let Some(head) = &patch.head { require_text("head", head)?; }
        if let Some(members) = patch.members { validate_members(members)?; }
        Ok(())
    }

    fn apply_patch(&mut self, patch: DepartmentPatch) {
        if let Some(name) = patch.name { self.name = name.trim().to_string(); }
        if let Some(head) = patch.head { self.head = head.trim().to_string(); }
        if let Some(members) = patch.members.and_then(|m| u32::try_from(m).ok()) {
            self.members = members;
        }
    }

    fn search_fields(&self) -> Vec<&str> { vec![self.name.as_str(), self.head.as_str()] }
}
