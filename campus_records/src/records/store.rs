//! Course store for the signed-in student.

use chrono::Utc;
use std::ops::RangeInclusive;

use super::{
    errors::{RecordsError, RecordsResult},
    gpa::{self, Gpa, GpaOptions},
    models::{Course, CourseDraft, CourseId, CourseStats, Grade},
};
use crate::validation::{ValidationError, require};

/// Allowed credit hours per course
pub const CREDIT_HOURS_RANGE: RangeInclusive<u8> = 1..=6;

const MAX_PROGRESS: i64 = 100;

/// Hands out course ids derived from the wall clock in milliseconds.
///
/// Ids never repeat or go backwards within one store, even when several
/// courses are added in the same millisecond or the clock steps back.
#[derive(Debug, Default)]
struct IdSequence {
    last: i64,
}

impl IdSequence {
    fn next(&mut self) -> CourseId {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        CourseId(self.last)
    }

    fn observe(&mut self, id: CourseId) {
        self.last = self.last.max(id.0);
    }
}

/// Owns the student's courses and derives statistics from them
#[derive(Debug, Default)]
pub struct AcademicRecordStore {
    courses: Vec<Course>,
    ids: IdSequence,
}

impl AcademicRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing courses.
    ///
    /// Later duplicates of an id are dropped.
    pub fn with_courses(courses: Vec<Course>) -> Self {
        let mut store = Self::new();
        for course in courses {
            if store.position(course.id).is_some() {
                log::warn!("Dropping duplicate course id {}", course.id);
                continue;
            }
            store.ids.observe(course.id);
            store.courses.push(course);
        }
        store
    }

    /// Validate a draft and add it as a new course
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingField` - name or code empty
    /// * `ValidationError::OutOfRange` - credit hours outside 1..=6
    /// * `ValidationError::Negative` - negative (or non-finite) fees
    pub fn add_course(&mut self, draft: CourseDraft) -> RecordsResult<&Course> {
        require("course name", &draft.name)?;
        require("course code", &draft.code)?;

        if !CREDIT_HOURS_RANGE.contains(&draft.credit_hours) {
            return Err(ValidationError::OutOfRange {
                field: "credit hours",
                min: i64::from(*CREDIT_HOURS_RANGE.start()),
                max: i64::from(*CREDIT_HOURS_RANGE.end()),
                value: i64::from(draft.credit_hours),
            }
            .into());
        }

        if draft.fees.is_some_and(|fees| !fees.is_finite() || fees < 0.0) {
            return Err(ValidationError::Negative("fees").into());
        }

        let course = Course {
            id: self.ids.next(),
            name: draft.name.trim().to_string(),
            code: draft.code.trim().to_uppercase(),
            credit_hours: draft.credit_hours,
            grade: draft.grade.unwrap_or_default(),
            semester: draft.semester.trim().to_string(),
            year: draft.year.trim().to_string(),
            instructor: draft.instructor,
            room: draft.room,
            schedule: draft.schedule,
            description: draft.description,
            progress: 0,
            is_favorite: false,
            fees: draft.fees,
        };

        log::debug!("Added course {} ({})", course.code, course.id);
        let index = self.courses.len();
        self.courses.push(course);
        Ok(&self.courses[index])
    }

    /// Remove a course, returning it
    pub fn delete_course(&mut self, id: CourseId) -> RecordsResult<Course> {
        let index = self.position(id).ok_or(RecordsError::CourseNotFound(id))?;
        Ok(self.courses.remove(index))
    }

    /// Replace a course's grade; nothing else changes
    pub fn update_grade(&mut self, id: CourseId, grade: Grade) -> RecordsResult<()> {
        self.course_mut(id)?.grade = grade;
        Ok(())
    }

    /// Parse a grade string and apply it
    ///
    /// # Errors
    ///
    /// * `ValidationError::UnknownGrade` - not in the letter-grade table
    /// * `RecordsError::CourseNotFound` - unknown id
    pub fn update_grade_str(&mut self, id: CourseId, grade: &str) -> RecordsResult<()> {
        let grade = grade.parse::<Grade>()?;
        self.update_grade(id, grade)
    }

    /// Move progress by `delta`, clamped to 0..=100. Returns the new value.
    pub fn adjust_progress(&mut self, id: CourseId, delta: i32) -> RecordsResult<u8> {
        let course = self.course_mut(id)?;
        let next = (i64::from(course.progress) + i64::from(delta)).clamp(0, MAX_PROGRESS);
        course.progress = next as u8;
        Ok(course.progress)
    }

    /// Flip the favorite flag. Returns the new value.
    pub fn toggle_favorite(&mut self, id: CourseId) -> RecordsResult<bool> {
        let course = self.course_mut(id)?;
        course.is_favorite = !course.is_favorite;
        Ok(course.is_favorite)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(|c| c.is_favorite)
    }

    /// GPA over every course, ungraded excluded
    pub fn gpa(&self) -> Gpa {
        gpa::gpa(&self.courses, GpaOptions::default())
    }

    /// GPA over one semester and year
    pub fn term_gpa(&self, semester: &str, year: &str) -> Gpa {
        gpa::term_gpa(&self.courses, semester, year)
    }

    pub fn stats(&self) -> CourseStats {
        CourseStats::from_courses(&self.courses)
    }

    /// Drop every course, e.g. when the student signs out
    pub fn clear(&mut self) {
        self.courses.clear();
    }

    fn position(&self, id: CourseId) -> Option<usize> {
        self.courses.iter().position(|c| c.id == id)
    }

    fn course_mut(&mut self, id: CourseId) -> RecordsResult<&mut Course> {
        self.courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RecordsError::CourseNotFound(id))
    }
}
