//! Credit-weighted grade point average.
//!
//! Grade points are carried in tenths and credit hours as integers, so the
//! weighted sum is exact and the only rounding happens once, to two decimals.

use serde::Serialize;
use std::fmt;

use super::models::Course;

/// A GPA rounded to two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Gpa {
    hundredths: u32,
}

impl Gpa {
    pub const ZERO: Gpa = Gpa { hundredths: 0 };

    /// GPA times 100, e.g. 365 for 3.65
    pub fn hundredths(&self) -> u32 {
        self.hundredths
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

/// How ungraded courses are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpaOptions {
    /// Leave ungraded courses out of numerator and denominator. When false
    /// they count as zero points over their credit hours.
    pub exclude_ungraded: bool,
}

impl Default for GpaOptions {
    fn default() -> Self {
        Self {
            exclude_ungraded: true,
        }
    }
}

/// Numerator and denominator of a GPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpaBreakdown {
    /// Sum of grade points (in tenths) times credit hours
    pub quality_points_tenths: u64,
    /// Credit hours counted
    pub credit_hours: u64,
}

impl GpaBreakdown {
    pub fn of<'a, I>(courses: I, options: GpaOptions) -> Self
    where
        I: IntoIterator<Item = &'a Course>,
    {
        courses
            .into_iter()
            .fold(GpaBreakdown::default(), |mut acc, course| {
                let credits = u64::from(course.credit_hours);
                match course.grade.points_tenths() {
                    Some(points) => {
                        acc.quality_points_tenths += u64::from(points) * credits;
                        acc.credit_hours += credits;
                    }
                    None if !options.exclude_ungraded => acc.credit_hours += credits,
                    None => {}
                }
                acc
            })
    }

    /// Quality points on the 4.0 scale
    pub fn quality_points(&self) -> f64 {
        self.quality_points_tenths as f64 / 10.0
    }

    /// Round half up to hundredths; zero credit hours gives 0.00.
    pub fn gpa(&self) -> Gpa {
        if self.credit_hours == 0 {
            return Gpa::ZERO;
        }
        // gpa * 100 = quality_points_tenths * 10 / credit_hours
        let numerator = self.quality_points_tenths * 10;
        let rounded = (2 * numerator + self.credit_hours) / (2 * self.credit_hours);
        Gpa {
            hundredths: rounded as u32,
        }
    }
}

/// GPA of any set of courses.
///
/// Pure: pass a filtered iterator to scope it, e.g. to one term.
pub fn gpa<'a, I>(courses: I, options: GpaOptions) -> Gpa
where
    I: IntoIterator<Item = &'a Course>,
{
    GpaBreakdown::of(courses, options).gpa()
}

/// Courses taken in the given semester and year
pub fn courses_in_term<'a>(
    courses: &'a [Course],
    semester: &'a str,
    year: &'a str,
) -> impl Iterator<Item = &'a Course> + 'a {
    courses.iter().filter(move |c| c.in_term(semester, year))
}

/// GPA restricted to one term, ungraded courses excluded
pub fn term_gpa(courses: &[Course], semester: &str, year: &str) -> Gpa {
    gpa(courses_in_term(courses, semester, year), GpaOptions::default())
}
