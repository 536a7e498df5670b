//! # Campus Records
//!
//! Client-side state engine for a role-aware academic records portal.
//!
//! A signed-in user is either a student or an administrator, and the role
//! decides everything the client shows. Students keep a local list of courses
//! with grades, progress and a credit-weighted GPA. Administrators browse and
//! edit every account on the server and read the activity log.
//!
//! ## Core Modules
//!
//! - [`session`]: login, registration, token restore and logout
//! - [`records`]: course records, progress and GPA for students
//! - [`directory`]: filtered account directory and CSV export for admins
//! - [`activity`]: newest-first activity log
//! - [`router`]: tabs available to each role
//! - [`portal`]: coordinator that wires the above to one session
//! - [`net`]: the remote API trait, its error taxonomy and response parsing
//! - [`storage`]: durable key/value storage for the token and preferences
//!
//! ## Example
//!
//! ```
//! use campus_records::{
//!     records::{AcademicRecordStore, CourseDraft, Grade},
//!     router::{Tab, ViewRouter},
//!     session::Role,
//! };
//!
//! let mut router = ViewRouter::new();
//! router.enter(Role::Student);
//! assert!(!router.select(Tab::Users));
//! assert_eq!(router.title(), "Student Dashboard");
//!
//! let mut records = AcademicRecordStore::new();
//! let id = records
//!     .add_course(CourseDraft::new("Operating Systems", "cs301", 4).with_grade(Grade::BMinus))?
//!     .id;
//! records.adjust_progress(id, 250)?;
//! assert_eq!(records.stats().completed, 1);
//! # Ok::<(), campus_records::records::RecordsError>(())
//! ```

pub mod activity;
pub mod directory;
pub mod net;
pub mod portal;
pub mod preferences;
pub mod records;
pub mod router;
pub mod session;
pub mod storage;
pub mod validation;

pub use activity::{ActivityFeed, ActivityKind, ActivityLogEntry};
pub use directory::{DirectoryError, DirectoryFilter, DirectoryStore, UserPatch};
pub use net::{ApiError, ApiResult, RecordsApi};
pub use portal::{AdminWorkspace, Portal, PortalError, PortalResult, Workspace};
pub use preferences::Preferences;
pub use records::{AcademicRecordStore, Course, CourseDraft, CourseId, Gpa, Grade, RecordsError};
pub use router::{RouterState, Tab, ViewRouter};
pub use session::{
    AccountStatus, RegistrationProfile, Role, Session, SessionError, SessionStore, UserAccount,
};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use validation::ValidationError;
