//! CLI output formatting for job results.
//!
//! # Output Format
//!
//! CSS results are printed as-is, preceded by a CSS comment naming the job,
//! so the whole stream of a `run` stays a valid stylesheet when every job
//! produces CSS:
//!
//! ```text
//! /* 001 breakpoints: hero.jpg */
//! @media (max-width: 479px) {
//!   .cover {
//!     background-image: url('…');
//!   }
//! }
//! ```
//!
//! Srcset results use an entity header with indented context lines:
//!
//! ```text
//! 002 srcset: hero.jpg
//!     src: https://…
//!     srcset: https://… 480w, https://… 2000w
//! ```
//!
//! Failures print the header and the error message on stderr.
//!
//! # Architecture
//!
//! Each format function returns `Vec<String>` for testability and has a
//! `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::job::JobOutput;
use crate::rig::RigError;
use crate::types::Srcset;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Job header: positional index, kind and cover label.
///
/// ```text
/// 001 srcset: hero.jpg
/// ```
fn job_header(index: usize, kind: &str, label: &str) -> String {
    if label.is_empty() {
        format!("{} {}", format_index(index), kind)
    } else {
        format!("{} {}: {}", format_index(index), kind, label)
    }
}

/// `src`/`srcset` context lines at the given depth.
pub fn format_srcset(set: &Srcset, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    vec![
        format!("{}src: {}", pad, set.src),
        format!("{}srcset: {}", pad, set.srcset),
    ]
}

/// Format one job result. Errors are formatted too; callers route them.
pub fn format_job_result(
    index: usize,
    kind: &str,
    label: &str,
    result: &Result<JobOutput, RigError>,
) -> Vec<String> {
    let header = job_header(index, kind, label);
    match result {
        Ok(JobOutput::Css(css)) => {
            let mut lines = vec![format!("/* {} */", header)];
            lines.extend(css.lines().map(str::to_string));
            lines
        }
        Ok(JobOutput::Srcset(set)) => {
            let mut lines = vec![header];
            lines.extend(format_srcset(set, 1));
            lines
        }
        Err(e) => vec![header, format!("{}error: {}", indent(1), e)],
    }
}

/// One-line summary after a batch.
pub fn format_batch_summary(total: usize, failed: usize) -> String {
    let noun = if total == 1 { "job" } else { "jobs" };
    if failed == 0 {
        format!("Generated {} {}", total, noun)
    } else {
        format!(
            "Generated {} of {} {}, {} failed",
            total - failed,
            total,
            noun,
            failed
        )
    }
}

/// Print a job result: successes to stdout, failures to stderr.
pub fn print_job_result(
    index: usize,
    kind: &str,
    label: &str,
    result: &Result<JobOutput, RigError>,
) {
    let lines = format_job_result(index, kind, label, result);
    for line in lines {
        if result.is_ok() {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
}

/// Print srcset lines to stdout.
pub fn print_srcset(set: &Srcset) {
    for line in format_srcset(set, 0) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::InputError;

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn job_header_with_and_without_label() {
        assert_eq!(job_header(1, "srcset", "hero.jpg"), "001 srcset: hero.jpg");
        assert_eq!(job_header(2, "media", ""), "002 media");
    }

    // =========================================================================
    // Job results
    // =========================================================================

    fn sample_set() -> Srcset {
        Srcset {
            src: "https://img/full".into(),
            srcset: "https://img/400 400w".into(),
        }
    }

    #[test]
    fn css_result_starts_with_comment_header() {
        let result = Ok(JobOutput::Css("@media a {\n  .b {\n  }\n}".into()));
        let lines = format_job_result(1, "breakpoints", "hero.jpg", &result);
        assert_eq!(lines[0], "/* 001 breakpoints: hero.jpg */");
        assert_eq!(lines[1], "@media a {");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn srcset_result_indents_context() {
        let result = Ok(JobOutput::Srcset(sample_set()));
        let lines = format_job_result(3, "srcset", "hero.jpg", &result);
        assert_eq!(
            lines,
            vec![
                "003 srcset: hero.jpg",
                "    src: https://img/full",
                "    srcset: https://img/400 400w",
            ]
        );
    }

    #[test]
    fn error_result_shows_message() {
        let result = Err(RigError::Input(InputError::MissingBlock));
        let lines = format_job_result(2, "media", "", &result);
        assert_eq!(lines, vec!["002 media", "    error: block not provided"]);
    }

    #[test]
    fn format_srcset_top_level() {
        let lines = format_srcset(&sample_set(), 0);
        assert_eq!(lines[0], "src: https://img/full");
    }

    // =========================================================================
    // Summary
    // =========================================================================

    #[test]
    fn summary_all_ok() {
        assert_eq!(format_batch_summary(3, 0), "Generated 3 jobs");
        assert_eq!(format_batch_summary(1, 0), "Generated 1 job");
    }

    #[test]
    fn summary_with_failures() {
        assert_eq!(format_batch_summary(3, 1), "Generated 2 of 3 jobs, 1 failed");
    }
}
