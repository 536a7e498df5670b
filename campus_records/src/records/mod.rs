//! Academic records for the signed-in student.
//!
//! Courses live only in client memory for the duration of the student view.
//! The module provides:
//! - Course CRUD with local validation
//! - Progress tracking clamped to 0..=100
//! - Exact, credit-weighted GPA over any subset of courses
//!
//! ## Example
//!
//! ```
//! use campus_records::records::{AcademicRecordStore, CourseDraft, Grade};
//!
//! let mut store = AcademicRecordStore::new();
//! store.add_course(CourseDraft::new("Data Structures", "cs201", 3).with_grade(Grade::A))?;
//! store.add_course(CourseDraft::new("DB", "cs202", 3).with_grade(Grade::BPlus))?;
//!
//! assert_eq!(store.gpa().to_string(), "3.65");
//! # Ok::<(), campus_records::records::RecordsError>(())
//! ```

pub mod errors;
pub mod gpa;
pub mod models;
pub mod store;

pub use errors::{RecordsError, RecordsResult};
pub use gpa::{Gpa, GpaBreakdown, GpaOptions, courses_in_term, gpa, term_gpa};
pub use models::{Course, CourseDraft, CourseId, CourseStats, Grade};
pub use store::{AcademicRecordStore, CREDIT_HOURS_RANGE};
