//! Record shapes, validation rules and seed sets for the site's persisted
//! collections, plus the payloads of the public forms.

pub mod errors;
pub mod entity;
pub mod image;
pub mod department;
pub mod service;
pub mod user;
pub mod inquiry;
pub mod suggestion;

pub use department::Department;
pub use entity::Entity;
pub use service::Service;
pub use user::{Role, User};
