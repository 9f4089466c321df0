//! Plain-text extraction from grade-detail markup.

use scraper::{Html, Selector};

/// Elements carrying this class hold one component of a course grade
/// (attendance, midterm, final...).
const GRADE_PART_SELECTOR: &str = "span.subGradeProcess";

/// Returns the trimmed text of every grade-part element, in document order.
/// Markup without such elements yields an empty vec.
pub fn grade_detail_text(markup: &str) -> Vec<String> {
    let selector = match Selector::parse(GRADE_PART_SELECTOR) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Invalid grade detail selector: {:?}", e);
            return Vec::new();
        }
    };
    let fragment = Html::parse_fragment(markup);
    fragment
        .select(&selector)
        .map(|el| el.text().map(str::trim).collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_marked_spans_in_order() {
        let markup = r#"<span class="subGradeProcess">85</span><span class="subGradeProcess">A</span>"#;
        assert_eq!(grade_detail_text(markup), vec!["85", "A"]);
    }

    #[test]
    fn ignores_unmarked_elements() {
        let markup = r#"<div><span class="label">平时</span><span class="subGradeProcess"> 90 </span></div>"#;
        assert_eq!(grade_detail_text(markup), vec!["90"]);
    }

    #[test]
    fn nested_text_is_joined_and_trimmed() {
        let markup = r#"<span class="subGradeProcess big"> 期末 <b>88</b> </span>"#;
        assert_eq!(grade_detail_text(markup), vec!["期末88"]);
    }

    #[test]
    fn empty_or_plain_input_yields_nothing() {
        assert!(grade_detail_text("").is_empty());
        assert!(grade_detail_text("no markup here").is_empty());
    }
}
