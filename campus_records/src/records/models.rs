//! Course and grade data models.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::validation::ValidationError;

/// Letter grade, or the sentinel for a course not yet graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
    #[default]
    #[serde(rename = "ungraded")]
    Ungraded,
}

impl Grade {
    /// Every letter grade, best first. Excludes [`Grade::Ungraded`].
    pub const LETTERS: [Grade; 11] = [
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::F,
    ];

    /// Grade points in tenths (A = 40), `None` when ungraded.
    ///
    /// Tenths keep the GPA arithmetic exact.
    pub fn points_tenths(&self) -> Option<u32> {
        match self {
            Grade::A => Some(40),
            Grade::AMinus => Some(37),
            Grade::BPlus => Some(33),
            Grade::B => Some(30),
            Grade::BMinus => Some(27),
            Grade::CPlus => Some(23),
            Grade::C => Some(20),
            Grade::CMinus => Some(17),
            Grade::DPlus => Some(13),
            Grade::D => Some(10),
            Grade::F => Some(0),
            Grade::Ungraded => None,
        }
    }

    /// Grade points on the 4.0 scale
    pub fn points(&self) -> Option<f64> {
        self.points_tenths().map(|p| f64::from(p) / 10.0)
    }

    pub fn is_graded(&self) -> bool {
        !matches!(self, Grade::Ungraded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::F => "F",
            Grade::Ungraded => "ungraded",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        if normalized == "UNGRADED" {
            return Ok(Grade::Ungraded);
        }
        Grade::LETTERS
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownGrade(s.trim().to_string()))
    }
}

/// Client-generated course id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub i64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(CourseId)
            .map_err(|_| ValidationError::InvalidChoice {
                field: "course id",
                value: s.trim().to_string(),
            })
    }
}

/// A course on the signed-in student's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Upper-cased course code, e.g. `CS201`
    pub code: String,
    pub credit_hours: u8,
    pub grade: Grade,
    pub semester: String,
    pub year: String,
    pub instructor: String,
    pub room: String,
    pub schedule: String,
    pub description: String,
    /// Completion percentage, always within 0..=100
    pub progress: u8,
    pub is_favorite: bool,
    pub fees: Option<f64>,
}

impl Course {
    pub fn is_completed(&self) -> bool {
        self.progress == 100
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_graded()
    }

    /// Case-insensitive semester and year match
    pub fn in_term(&self, semester: &str, year: &str) -> bool {
        self.semester.trim().eq_ignore_ascii_case(semester.trim())
            && self.year.trim().eq_ignore_ascii_case(year.trim())
    }
}

/// Input for adding a course
#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub name: String,
    pub code: String,
    pub credit_hours: u8,
    /// Defaults to [`Grade::Ungraded`]
    pub grade: Option<Grade>,
    pub semester: String,
    pub year: String,
    pub instructor: String,
    pub room: String,
    pub schedule: String,
    pub description: String,
    pub fees: Option<f64>,
}

impl CourseDraft {
    pub fn new(name: impl Into<String>, code: impl Into<String>, credit_hours: u8) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            credit_hours,
            ..Default::default()
        }
    }

    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn with_term(mut self, semester: impl Into<String>, year: impl Into<String>) -> Self {
        self.semester = semester.into();
        self.year = year.into();
        self
    }

    pub fn with_fees(mut self, fees: f64) -> Self {
        self.fees = Some(fees);
        self
    }
}

/// Derived totals over a set of courses
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CourseStats {
    pub total: usize,
    pub completed: usize,
    pub credit_hours: u32,
    pub fees: f64,
    pub favorites: usize,
}

impl CourseStats {
    pub fn from_courses<'a, I>(courses: I) -> Self
    where
        I: IntoIterator<Item = &'a Course>,
    {
        courses
            .into_iter()
            .fold(CourseStats::default(), |mut stats, course| {
                stats.total += 1;
                stats.credit_hours += u32::from(course.credit_hours);
                stats.fees += course.fees.unwrap_or(0.0);
                if course.is_completed() {
                    stats.completed += 1;
                }
                if course.is_favorite {
                    stats.favorites += 1;
                }
                stats
            })
    }
}
