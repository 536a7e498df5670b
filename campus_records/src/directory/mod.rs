//! Admin directory: searchable cache of every account with CRUD forwarded
//! to the remote API.

pub mod errors;
pub mod export;
pub mod models;
pub mod store;

pub use errors::{DirectoryError, DirectoryResult};
pub use export::{EXPORT_FILE_NAME, EXPORT_HEADER, export_snapshot};
pub use models::{
    DirectoryFilter, DirectorySummary, LEVELS, RoleFilter, StatusFilter, UserPatch,
};
pub use store::{DirectoryStore, LoadingFlag};
