//! Service layer for the site back-office.
//! - `storage`: named slots (file-backed and in-memory) with a shared quota.
//! - `codec` + `store`: one generic persisted entity store used for every record kind.
//! - `consumers`: the admin editor and the public viewer built on that store.
//! - `inquiries` / `suggestions`: the public forms and the remote suggestion call.

pub mod errors;
pub mod storage;
pub mod codec;
pub mod store;
pub mod consumers;
pub mod inquiries;
pub mod suggestions;
pub mod runtime;

pub use errors::ServiceError;
