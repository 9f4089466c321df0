//! Wire types for the grade application.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::{normalize, ShapeError};

/// Numeric code of an academic period.
pub type PeriodId = u32;

/// The caller's internal identifier in the grade application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentId(String);

impl StudentId {
    /// Accepts a non-empty, digits-only string.
    pub fn new(raw: &str) -> Result<Self, ShapeError> {
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(ShapeError::StudentIdNotFound);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response body for one period request.
///
/// Keys other than the grade map are kept so the persisted file matches
/// what the server sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodPayload {
    #[serde(rename = "semesterId2studentGrades")]
    pub grades_by_period: IndexMap<String, Vec<CourseGrade>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PeriodPayload {
    /// Replaces every markup grade detail with its extracted text.
    pub fn normalize_details(&mut self) {
        for course in self.grades_by_period.values_mut().flatten() {
            course.normalize_detail();
        }
    }

    pub fn course_count(&self) -> usize {
        self.grades_by_period.values().map(Vec::len).sum()
    }
}

/// A key that was sent, `null` included, becomes `Some`. An absent key
/// stays `None` through `#[serde(default)]` and is not written back.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// One course row inside a period block.
///
/// The known keys distinguish absent from `null` so that a payload is
/// written back with the same keys the server sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGrade {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    course_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    ga_grade: Option<Option<String>>,

    /// Grade point; kept as a JSON number so `4.0` prints as `4.0`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    gp: Option<Option<Number>>,

    /// Display name of the period the course belongs to.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    semester_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    grade_detail: Option<Option<GradeDetail>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CourseGrade {
    pub fn course_name(&self) -> Option<&str> {
        self.course_name.as_ref().and_then(|v| v.as_deref())
    }

    pub fn ga_grade(&self) -> Option<&str> {
        self.ga_grade.as_ref().and_then(|v| v.as_deref())
    }

    pub fn gp(&self) -> Option<&Number> {
        self.gp.as_ref().and_then(Option::as_ref)
    }

    pub fn semester_name(&self) -> Option<&str> {
        self.semester_name.as_ref().and_then(|v| v.as_deref())
    }

    pub fn grade_detail(&self) -> Option<&GradeDetail> {
        self.grade_detail.as_ref().and_then(Option::as_ref)
    }

    pub fn normalize_detail(&mut self) {
        if let Some(Some(GradeDetail::Markup(markup))) = &self.grade_detail {
            self.grade_detail = Some(Some(GradeDetail::Text(normalize::grade_detail_text(
                markup,
            ))));
        }
    }

    /// Plain-text detail items, extracting from markup if not yet normalized.
    pub fn detail_texts(&self) -> Vec<String> {
        match self.grade_detail() {
            Some(GradeDetail::Text(items)) => items.clone(),
            Some(GradeDetail::Markup(markup)) => normalize::grade_detail_text(markup),
            None => Vec::new(),
        }
    }
}

/// Grade detail as served (a markup fragment) or after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradeDetail {
    Markup(String),
    Text(Vec<String>),
}
