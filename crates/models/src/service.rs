use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{require_text, ModelError};
use crate::image::ImageRef;

const PLACEHOLDER_IMAGE: &str = "https://placehold.co/1200x600.png";

/// A service shown in the homepage carousel. `alt` doubles as its display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub src: String,
    pub alt: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewService {
    pub src: String,
    pub alt: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl Service {
    pub fn image(&self) -> Result<ImageRef<'_>, ModelError> { ImageRef::parse(&self.src) }
}

fn validate_src(src: &str) -> Result<String, ModelError> {
    let trimmed = src.trim();
    ImageRef::parse(trimmed)?;
    Ok(trimmed.to_string())
}

impl Entity for Service {
    type Draft = NewService;
    type Patch = ServicePatch;

    const SLOT: &'static str = "larchcodeHubServices";
    const LABEL: &'static str = "service";

    fn id(&self) -> &str { &self.id }

    fn seed() -> Vec<Self> {
        [
            "Professional Cabro Installation",
            "Creative Landscape Design",
            "Ground Tilling and Preparation",
            "Site Clearing and Levelling",
            "Grass Planting and Seeding",
            "Ongoing Landscape Maintenance",
        ]
        .iter()
        .enumerate()
        .map(|(i, alt)| Service { id: (i + 1).to_string(), src: PLACEHOLDER_IMAGE.into(), alt: (*alt).into() })
        .collect()
    }

    fn validate(&self) -> Result<(), ModelError> {
        require_text("id", &self.id)?;
        require_text("name", &self.alt)?;
        self.image()?;
        Ok(())
    }

    fn from_draft(id: String, draft: NewService) -> Result<Self, ModelError> {
        Ok(Self { id, src: validate_src(&draft.src)?, alt: require_text("name", &draft.alt)? })
    }

    fn validate_patch(patch: &ServicePatch) -> Result<(), ModelError> {
        if let Some(src) = &patch.src { validate_src(src)?; }
        if let Some(alt) = &patch.alt { require_text("name", alt)?; }
        Ok(())
    }

    fn apply_patch(&mut self, patch: ServicePatch) {
        if let Some(src) = patch.src { self.src = src.trim().to_string(); }
        if let Some(alt) = patch.alt { self.alt = alt.trim().to_string(); }
    }

    fn search_fields(&self) -> Vec<&str> { vec![self.alt.as_str()] }
}
