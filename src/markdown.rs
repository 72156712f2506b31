// Markdown document assembly and persistence.
//
// The report file is the run's only persisted artifact. It is written once,
// after all upstream work has succeeded, so a failed run never leaves a
// partial file behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

/// Path of the report for a given week: `{output_dir}/week-{week:02}.md`.
///
/// The zero-padded name keeps reports sorted in directory listings.
pub fn report_path(output_dir: &Path, week: u32) -> PathBuf {
    output_dir.join(format!("week-{week:02}.md"))
}

/// Wrap the rendered text in a front-matter header.
///
/// The timestamp is passed in rather than sampled here so the exact output
/// is testable.
pub fn wrap_report(week: u32, generated: DateTime<Utc>, body: &str) -> String {
    format!(
        "---\ntitle: \"Week {week} – Weekly Report\"\ngenerated: \"{}\"\n---\n\n{}\n",
        generated.to_rfc3339_opts(SecondsFormat::Millis, true),
        body.trim()
    )
}

/// Create the output directory if needed and write the wrapped report.
/// Returns the path of the written file.
pub fn write_report(output_dir: &Path, week: u32, body: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = report_path(output_dir, week);
    std::fs::write(&path, wrap_report(week, Utc::now(), body))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn path_is_zero_padded_for_single_digit_weeks() {
        let path = report_path(Path::new("reports"), 3);
        assert_eq!(path, PathBuf::from("reports/week-03.md"));
    }

    #[test]
    fn path_keeps_two_digit_weeks_untruncated() {
        let path = report_path(Path::new("reports"), 13);
        assert_eq!(path, PathBuf::from("reports/week-13.md"));
    }

    #[test]
    fn wrap_produces_front_matter_and_trailing_newline() {
        let generated = Utc.with_ymd_and_hms(2025, 10, 7, 8, 30, 0).unwrap();
        let doc = wrap_report(5, generated, "  Body text.  \n");

        assert!(doc.starts_with("---\ntitle: \"Week 5 – Weekly Report\"\n"));
        assert!(doc.contains("generated: \"2025-10-07T08:30:00.000Z\""));
        assert!(doc.ends_with("---\n\nBody text.\n"));
    }

    #[test]
    fn write_creates_missing_directories() {
        let tmp = std::env::temp_dir().join("gazette_markdown_write");
        let _ = std::fs::remove_dir_all(&tmp);
        let out_dir = tmp.join("nested").join("reports");

        let path = write_report(&out_dir, 7, "Hello").expect("write should succeed");
        assert_eq!(path, out_dir.join("week-07.md"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Week 7 – Weekly Report"));
        assert!(content.ends_with("Hello\n"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
