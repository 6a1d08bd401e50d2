//! Image references: either a URL-like string or an embedded base64 payload.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::ModelError;

const EMBEDDED_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// Absolute or relative location, e.g. `https://placehold.co/1200x600.png` or `x.png`.
    Url(&'a str),
    /// `data:image/<subtype>;base64,<payload>`
    Embedded { mime: &'a str, payload: &'a str },
}

impl<'a> ImageRef<'a> {
    pub fn parse(src: &'a str) -> Result<Self, ModelError> {
        if src.trim().is_empty() {
            return Err(ModelError::required("image"));
        }
        if let Some(rest) = src.strip_prefix("data:") {
            if !src.starts_with(EMBEDDED_PREFIX) {
                return Err(ModelError::Validation("embedded data must be an image".into()));
            }
            let (mime, payload) = rest
                .split_once(BASE64_MARKER)
                .ok_or_else(|| ModelError::Validation("embedded image must be base64 encoded".into()))?;
            if payload.is_empty() {
                return Err(ModelError::Validation("embedded image payload is empty".into()));
            }
            STANDARD
                .decode(payload)
                .map_err(|e| ModelError::Validation(format!("embedded image payload is not valid base64: {e}")))?;
            return Ok(Self::Embedded { mime, payload });
        }
        if src.chars().any(char::is_whitespace) {
            return Err(ModelError::Validation("image URL must not contain whitespace".into()));
        }
        Ok(Self::Url(src))
    }

    pub fn is_embedded(&self) -> bool { matches!(self, Self::Embedded { .. }) }
}
