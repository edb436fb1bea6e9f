//! The course catalog.
//!
//! A read-only mapping from course identifier to pricing and
//! post-purchase redirect, resolved once at startup. Adding a course is
//! a configuration change, never a code change.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A validated course identifier.
///
/// Course ids are URL-safe slugs: non-empty ASCII lowercase
/// alphanumerics and `-`. Anything else is rejected at parse time, so a
/// malformed id never reaches a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

/// Error returned when a string is not a valid course id.
#[derive(Debug, thiserror::Error)]
#[error("invalid course id: {0:?}")]
pub struct InvalidCourseId(pub String);

impl CourseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CourseId {
    type Err = InvalidCourseId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidCourseId(s.to_owned()))
        }
    }
}

impl TryFrom<String> for CourseId {
    type Error = InvalidCourseId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pricing and redirect rule for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Display name shown in the payment widget.
    pub name: String,
    /// Price in minor currency units.
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
    /// Absolute site path the customer is sent to after verification.
    pub thank_you_page: String,
}

/// Immutable course id → [`Course`] mapping.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: HashMap<CourseId, Course>,
}

impl CourseCatalog {
    pub fn new(courses: HashMap<CourseId, Course>) -> Self {
        Self { courses }
    }

    /// Look up a course by id.
    pub fn get(&self, id: &CourseId) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Look up a course by a raw string id.
    ///
    /// Returns `None` both for ids that fail slug validation and for
    /// valid slugs with no catalog entry.
    pub fn resolve(&self, id: &str) -> Option<(CourseId, &Course)> {
        let id: CourseId = id.parse().ok()?;
        let course = self.courses.get(&id)?;
        Some((id, course))
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CourseId, &Course)> {
        self.courses.iter()
    }

    /// The built-in five-course table.
    ///
    /// Used as the default when the server configuration does not list
    /// its own courses.
    pub fn standard() -> Self {
        let entries = [
            (
                "fundamentals-of-facebook-ads",
                "Fundamentals of Facebook Ads",
                999,
                "/fundamentals-of-facebook-ads/thankyou",
            ),
            (
                "business-growth-plan",
                "Business Growth Plan",
                49991,
                "/psychology-driven-advanced-meta-ad-course/business-growth-plan/thankyou",
            ),
            (
                "value-plan",
                "Value Plan",
                14991,
                "/psychology-driven-advanced-meta-ad-course/value-plan/thankyou",
            ),
            (
                "meta-andromeda-base",
                "Meta Andromeda Base",
                1491,
                "/master-creative-targeting/base-plan/thankyou",
            ),
            (
                "meta-andromeda-mentorship",
                "Meta Andromeda Mentorship",
                4991,
                "/master-creative-targeting/mentorship-plan/thankyou",
            ),
        ];

        let courses = entries
            .into_iter()
            .map(|(id, name, amount, page)| {
                (
                    CourseId(id.to_owned()),
                    Course {
                        name: name.to_owned(),
                        amount,
                        currency: "INR".to_owned(),
                        thank_you_page: page.to_owned(),
                    },
                )
            })
            .collect();

        Self { courses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_accepts_slugs() {
        assert!("meta-andromeda-base".parse::<CourseId>().is_ok());
        assert!("value-plan".parse::<CourseId>().is_ok());
        assert!("course-101".parse::<CourseId>().is_ok());
    }

    #[test]
    fn course_id_rejects_non_slugs() {
        assert!("".parse::<CourseId>().is_err());
        assert!("Meta-Andromeda".parse::<CourseId>().is_err());
        assert!("value plan".parse::<CourseId>().is_err());
        assert!("value_plan".parse::<CourseId>().is_err());
        assert!("plan/../etc".parse::<CourseId>().is_err());
    }

    #[test]
    fn standard_catalog_has_five_entries() {
        let catalog = CourseCatalog::standard();
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn standard_catalog_meta_andromeda_base() {
        let catalog = CourseCatalog::standard();
        let (_, course) = catalog.resolve("meta-andromeda-base").expect("entry exists");
        assert_eq!(course.amount, 1491);
        assert_eq!(course.currency, "INR");
        assert_eq!(
            course.thank_you_page,
            "/master-creative-targeting/base-plan/thankyou"
        );
    }

    #[test]
    fn resolve_unknown_course_is_none() {
        let catalog = CourseCatalog::standard();
        assert!(catalog.resolve("sales-funnel-masterclass").is_none());
        assert!(catalog.resolve("not a slug").is_none());
    }
}
