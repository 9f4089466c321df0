use chrono::NaiveDate;
use quick_xml::escape::escape;
use serde_json::Number;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use transcript_lib::{CompressedCourse, NormalizedDataset};

const REPORT_TITLE: &str = "学生成绩报告";
const MISSING: &str = "N/A";

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "课程名称")]
    course_name: String,
    #[tabled(rename = "等级")]
    grade: String,
    #[tabled(rename = "绩点")]
    gp: String,
    #[tabled(rename = "成绩详情")]
    detail: String,
}

#[derive(Tabled)]
struct PeriodSummaryRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Courses")]
    courses: usize,
    #[tabled(rename = "With GP")]
    with_gp: usize,
}

// -- Cell formatting --

fn text_or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

fn format_gp(gp: Option<&Number>) -> String {
    gp.map_or_else(|| MISSING.to_string(), Number::to_string)
}

fn join_detail(items: &[String]) -> String {
    items
        .iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// -- Row builders --

fn build_course_rows(courses: &[CompressedCourse]) -> Vec<CourseRow> {
    courses
        .iter()
        .map(|c| CourseRow {
            course_name: text_or_missing(c.course_name.as_deref()),
            grade: text_or_missing(c.ga_grade.as_deref()),
            gp: format_gp(c.gp.as_ref()),
            detail: join_detail(&c.grade_detail),
        })
        .collect()
}

fn build_summary_rows(dataset: &NormalizedDataset) -> Vec<PeriodSummaryRow> {
    dataset
        .iter()
        .map(|(name, courses)| PeriodSummaryRow {
            period: name.clone(),
            courses: courses.len(),
            with_gp: courses.iter().filter(|c| c.gp.is_some()).count(),
        })
        .collect()
}

// -- Markdown report --

fn escape_markdown_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Title, then one `##` section with a table per period display name.
pub fn render_markdown(dataset: &NormalizedDataset) -> String {
    let mut out = format!("# {}\n", REPORT_TITLE);
    for (name, courses) in dataset {
        let rows: Vec<CourseRow> = build_course_rows(courses)
            .into_iter()
            .map(|r| CourseRow {
                course_name: escape_markdown_cell(&r.course_name),
                grade: escape_markdown_cell(&r.grade),
                gp: r.gp,
                detail: escape_markdown_cell(&r.detail),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::markdown());
        out.push_str(&format!("\n## {}\n\n{}\n", name, table));
    }
    out
}

// -- HTML report --

const HTML_STYLE: &str = r#"
    body { font-family: 'Noto Sans SC', sans-serif; margin: 0; padding: 2rem; background-color: #f4f6f8; color: #333; }
    .container { max-width: 900px; margin: auto; background: #ffffff; padding: 2rem; border-radius: 12px; box-shadow: 0 8px 25px rgba(0,0,0,0.1); }
    h1 { text-align: center; color: #2c3e50; margin-bottom: 0.5rem; }
    h2 { color: #34495e; border-bottom: 2px solid #e0e0e0; padding-bottom: 0.5rem; margin-top: 2.5rem; }
    table { width: 100%; margin-top: 1.5rem; border-collapse: collapse; }
    th, td { padding: 1rem; text-align: left; border-bottom: 1px solid #ddd; }
    thead th { background-color: #34495e; color: white; font-weight: 700; }
    tbody tr:nth-child(even) { background-color: #f8f9fa; }
    tbody tr:hover { background-color: #e8ecf1; }
    footer { text-align: center; margin-top: 2rem; color: #7f8c8d; font-size: 0.9em; }
"#;

/// A standalone HTML5 document with one section per period display name.
pub fn render_html(dataset: &NormalizedDataset, generated_on: NaiveDate) -> String {
    let mut parts = vec![
        "<!DOCTYPE html>".to_string(),
        r#"<html lang="zh-CN">"#.to_string(),
        "<head>".to_string(),
        r#"<meta charset="UTF-8">"#.to_string(),
        r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#.to_string(),
        format!("<title>{}</title>", REPORT_TITLE),
        format!("<style>{}</style>", HTML_STYLE),
        "</head>".to_string(),
        "<body>".to_string(),
        r#"<div class="container">"#.to_string(),
        format!("<h1>{}</h1>", REPORT_TITLE),
    ];

    for (name, courses) in dataset {
        parts.push(format!("<h2>{}</h2>", escape(name.as_str())));
        parts.push(
            "<table><thead><tr><th>课程名称</th><th>等级</th><th>绩点</th><th>成绩详情</th></tr></thead><tbody>"
                .to_string(),
        );
        for row in build_course_rows(courses) {
            parts.push(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(row.course_name.as_str()),
                escape(row.grade.as_str()),
                escape(row.gp.as_str()),
                escape(row.detail.as_str()),
            ));
        }
        parts.push("</tbody></table>".to_string());
    }

    parts.push(format!(
        "<footer>报告生成时间: {}</footer>",
        generated_on.format("%Y-%m-%d")
    ));
    parts.push("</div></body></html>".to_string());
    parts.join("\n")
}

// -- Console summary --

pub fn print_summary_table(dataset: &NormalizedDataset) {
    println!("{}", Table::new(build_summary_rows(dataset)));
}
