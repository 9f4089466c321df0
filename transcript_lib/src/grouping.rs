//! Grouping of raw period payloads by period display name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use transcript_api::PeriodPayload;

/// The fields of a course that the reports show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedCourse {
    pub course_name: Option<String>,
    pub ga_grade: Option<String>,
    pub gp: Option<Number>,
    pub grade_detail: Vec<String>,
}

/// Display name -> courses, in first-seen order of the display names.
pub type NormalizedDataset = IndexMap<String, Vec<CompressedCourse>>;

/// Groups every course of every block by its own display name, not by the
/// period id it was requested under. Courses without a display name are
/// dropped.
pub fn group_by_display_name(payloads: &[PeriodPayload]) -> NormalizedDataset {
    let mut dataset = NormalizedDataset::new();
    let courses = payloads
        .iter()
        .flat_map(|p| p.grades_by_period.values())
        .flatten();

    for course in courses {
        let name = match course.semester_name() {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };
        dataset
            .entry(name.to_string())
            .or_default()
            .push(CompressedCourse {
                course_name: course.course_name().map(str::to_string),
                ga_grade: course.ga_grade().map(str::to_string),
                gp: course.gp().cloned(),
                grade_detail: course.detail_texts(),
            });
    }

    dataset
}
