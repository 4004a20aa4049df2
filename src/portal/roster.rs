use regex::Regex;

use crate::core::{
    PortalError,
    StudentRecord,
};

/// Reads the students table out of the rendered home page.
///
/// Rows are `<tr data-student-id="..">` elements; name and subject come from
/// the row's delete button attributes and marks from the `marks-display`
/// cell. Rows missing any of these are skipped.
pub fn parse_roster(html: &str) -> Result<Vec<StudentRecord>, PortalError> {
    let row_re = Regex::new(r#"(?s)<tr\b[^>]*\bdata-student-id\s*=\s*"([^"]*)"[^>]*>(.*?)</tr>"#)?;
    let name_re = Regex::new(r#"\bdata-student-name\s*=\s*"([^"]*)""#)?;
    let subject_re = Regex::new(r#"\bdata-subject\s*=\s*"([^"]*)""#)?;
    let marks_re = Regex::new(
        r#"(?s)class\s*=\s*"[^"]*\bmarks-display\b[^"]*"[^>]*>\s*(-?\d+)\s*<"#,
    )?;

    let mut students = Vec::new();

    for row in row_re.captures_iter(html) {
        let id = unescape_html(&row[1]);
        let body = &row[2];

        let name = name_re.captures(body).map(|c| unescape_html(&c[1]));
        let subject = subject_re.captures(body).map(|c| unescape_html(&c[1]));
        let marks = marks_re.captures(body).and_then(|c| c[1].parse::<i64>().ok());

        match (name, subject, marks) {
            (Some(name), Some(subject), Some(marks)) if !id.is_empty() => {
                students.push(StudentRecord { id, name, subject, marks });
            }
            _ => tracing::warn!("Skipping incomplete student row {:?}", id),
        }
    }

    Ok(students)
}

pub fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
