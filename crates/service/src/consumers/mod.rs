//! Surfaces that open a store: the admin editor and the public viewer.

use serde::Serialize;

pub mod editor;
pub mod viewer;

pub use editor::Editor;
pub use viewer::Viewer;

/// What a consumer should draw.
///
/// `Loading` is returned until the store is ready, so nothing (rather than an
/// empty list) is shown while the slot is being read or seeded.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum Render<E> {
    Loading,
    Empty,
    Items(Vec<E>),
}

impl<E> Render<E> {
    pub fn from_records(records: Vec<E>) -> Self {
        if records.is_empty() { Render::Empty } else { Render::Items(records) }
    }

    pub fn items(&self) -> &[E] {
        match self {
            Render::Items(items) => items,
            _ => &[],
        }
    }
}
