//! Sign-in state: login, registration, token restore and logout.
//!
//! ## Example
//!
//! ```no_run
//! use campus_records::{
//!     net::RecordsApi,
//!     session::SessionStore,
//!     storage::MemoryStore,
//! };
//! use std::sync::Arc;
//!
//! async fn sign_in(api: Arc<dyn RecordsApi>) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sessions = SessionStore::new(api, Arc::new(MemoryStore::new()));
//!     let session = sessions.login("jane@uni.edu", "secret1").await?;
//!     println!("Signed in as {}", session.user.display_name());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod store;

pub use errors::{SessionError, SessionResult};
pub use models::{
    AcademicProfile, AccountStatus, RegistrationProfile, Role, Session, UserAccount, UserId,
};
pub use store::{DEFAULT_DEPARTMENT, SessionStore, generate_matric_number};
