use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::scoring::RankBreakdown;
use crate::session::{ExamSession, SessionSummary, SubjectRecord};

/// Percentage band used for coloring: >= 70 high, >= 50 mid, else low
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    High,
    Mid,
    Low,
}

pub fn percentage_band(percentage: f64) -> Band {
    if percentage >= 70.0 {
        Band::High
    } else if percentage >= 50.0 {
        Band::Mid
    } else {
        Band::Low
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Round half away from zero to one decimal place.
///
/// Rounds the value times ten, so a mean stored as 0.34999... (typed as
/// 0.35) shows as 0.4, not the 0.3 a ties-to-even `{:.1}` would print.
pub fn round_one_decimal(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid printing "-0.0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Per-subject percentage: "55.56%"
pub fn format_percentage(percentage: f64) -> String {
    format!("{:.2}%", percentage)
}

/// Average percentage: one decimal, "60.3%"
pub fn format_average(average: f64) -> String {
    format!("{:.1}%", round_one_decimal(average))
}

/// Rank with thousands separators: 101000 -> "101,000"
pub fn format_rank(rank: u64) -> String {
    let digits = rank.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Count cell: empty counts show as "-"
fn format_count(count: Option<u32>) -> String {
    count.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
}

fn colored_percentage(percentage: f64, use_colors: bool) -> String {
    let text = format_percentage(percentage);
    if !use_colors {
        return text;
    }
    match percentage_band(percentage) {
        Band::High => text.green().bold().to_string(),
        Band::Mid => text.yellow().bold().to_string(),
        Band::Low => text.red().bold().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to `width` characters (by char count, not bytes)
fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

fn format_subject_line(record: &SubjectRecord, name_width: usize, use_colors: bool) -> String {
    let name = pad_right(&truncate_name(&record.name, name_width), name_width);
    let counts = format!(
        "{:>4} {:>4} {:>4} /{:>3}",
        format_count(record.correct),
        format_count(record.wrong),
        format_count(record.unanswered),
        record.total_questions
    );
    let percentage = match record.percentage {
        Some(p) => {
            let padded = format!("{:>9}", format_percentage(p));
            if use_colors {
                // Pad before coloring so escape codes do not break alignment
                padded.replace(&format_percentage(p), &colored_percentage(p, true))
            } else {
                padded
            }
        }
        None => format!("{:>9}", "-"),
    };

    if use_colors {
        format!("{:<11} {}  {}  {}", record.id.cyan(), name, counts.dimmed(), percentage)
    } else {
        format!("{:<11} {}  {}  {}", record.id, name, counts, percentage)
    }
}

/// Format the summary lines (average and rank) under the table
pub fn format_summary(summary: &SessionSummary, use_colors: bool) -> String {
    match (summary.average, summary.rank) {
        (Some(average), Some(rank)) => {
            let average = format_average(average);
            let rank = format_rank(rank.value());
            if use_colors {
                format!(
                    "Average: {}\nEstimated rank: {}\n{}",
                    average.bold(),
                    rank.green().bold(),
                    DISCLAIMER.dimmed()
                )
            } else {
                format!("Average: {}\nEstimated rank: {}\n{}", average, rank, DISCLAIMER)
            }
        }
        _ => "No subject has been scored yet; enter correct and wrong counts to estimate a rank."
            .to_string(),
    }
}

pub const DISCLAIMER: &str =
    "The rank is a rough estimate and may differ from the official result.";

/// Format the scored session as a table with a summary below.
/// Columns: id, name, correct, wrong, unanswered / total, percentage
pub fn format_session_table(
    session: &ExamSession,
    summary: &SessionSummary,
    use_colors: bool,
) -> String {
    // id(11) + counts(21) + percentage(9) + separators(6)
    let fixed_width = 11 + 1 + 2 + 21 + 2 + 9;
    let longest = session
        .subjects
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 6 => longest.min(width - fixed_width),
        Some(_) => longest.min(6),
        None => longest,
    };

    let mut lines: Vec<String> = session
        .subjects
        .iter()
        .map(|record| format_subject_line(record, name_width, use_colors))
        .collect();

    lines.push(String::new());
    lines.push(format_summary(summary, use_colors));
    lines.join("\n")
}

/// Format the session as tab-separated values for scripting.
/// Subject rows: id, correct, wrong, unanswered, total, percentage.
/// Final rows: "average" and "rank". Empty fields mean absent.
pub fn format_tsv(session: &ExamSession, summary: &SessionSummary) -> String {
    let opt = |v: Option<u32>| v.map(|c| c.to_string()).unwrap_or_default();

    let mut lines: Vec<String> = session
        .subjects
        .iter()
        .map(|record| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                record.id,
                opt(record.correct),
                opt(record.wrong),
                opt(record.unanswered),
                record.total_questions,
                record
                    .percentage
                    .map(|p| format!("{:.2}", p))
                    .unwrap_or_default()
            )
        })
        .collect();

    lines.push(format!(
        "average\t{}",
        summary
            .average
            .map(|a| format!("{:.1}", round_one_decimal(a)))
            .unwrap_or_default()
    ));
    lines.push(format!(
        "rank\t{}",
        summary.rank.map(|r| r.value().to_string()).unwrap_or_default()
    ));
    lines.join("\n")
}

#[derive(Serialize)]
struct Report<'a> {
    subjects: &'a [SubjectRecord],
    prior_academic_score: Option<f64>,
    average: Option<f64>,
    rank: Option<u64>,
}

/// Format the session as a pretty JSON report. Absent values are `null`.
pub fn format_json(session: &ExamSession, summary: &SessionSummary) -> anyhow::Result<String> {
    let report = Report {
        subjects: &session.subjects,
        prior_academic_score: session.prior_academic_score,
        average: summary.average,
        rank: summary.rank.map(|r| r.value()),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Format the rank breakdown for verbose output
pub fn format_breakdown(breakdown: &RankBreakdown) -> String {
    let mut lines = Vec::with_capacity(breakdown.terms.len() + 1);
    for term in &breakdown.terms {
        lines.push(format!(
            "  {}: {} = {:.1}",
            term.label, term.description, term.contribution
        ));
    }
    lines.push(format!(
        "  Raw: {:.1} -> rank {}",
        breakdown.raw,
        format_rank(breakdown.rank.value())
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::scoring::{explain_rank, EstimatorConfig};

    fn scored_session() -> (ExamSession, SessionSummary) {
        let mut session = ExamSession::new(&Catalog::default());
        session.set_counts("math", Some(10), Some(5), Some(20)).unwrap();
        session.set_counts("physics", Some(25), Some(0), None).unwrap();
        session.prior_academic_score = Some(19.0);
        let summary = session.compute_all(&EstimatorConfig::default());
        (session, summary)
    }

    #[test]
    fn test_percentage_band() {
        assert_eq!(percentage_band(100.0), Band::High);
        assert_eq!(percentage_band(70.0), Band::High);
        assert_eq!(percentage_band(69.99), Band::Mid);
        assert_eq!(percentage_band(50.0), Band::Mid);
        assert_eq!(percentage_band(49.9), Band::Low);
        assert_eq!(percentage_band(-33.33), Band::Low);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(55.5555), "55.56%");
        assert_eq!(format_percentage(100.0), "100.00%");
        assert_eq!(format_percentage(-33.33), "-33.33%");
    }

    #[test]
    fn test_round_one_decimal_half_away_from_zero() {
        assert_eq!(round_one_decimal(60.25), 60.3);
        assert_eq!(round_one_decimal(-60.25), -60.3);
        assert_eq!(round_one_decimal(77.777), 77.8);
        assert_eq!(round_one_decimal(-0.04), 0.0);
        // 0.35 is stored just below the tie; still rounds up
        assert_eq!(round_one_decimal(0.35), 0.4);
        assert_eq!(round_one_decimal(-0.35), -0.4);
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(60.0), "60.0%");
        assert_eq!(format_average(60.25), "60.3%");
        assert_eq!(format_average(-0.04), "0.0%");
    }

    #[test]
    fn test_format_rank() {
        assert_eq!(format_rank(1), "1");
        assert_eq!(format_rank(999), "999");
        assert_eq!(format_rank(1000), "1,000");
        assert_eq!(format_rank(101_000), "101,000");
        assert_eq!(format_rank(1_234_567), "1,234,567");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Physics", 10), "Physics");
        assert_eq!(truncate_name("Literature", 7), "Lite...");
        assert_eq!(truncate_name("زیست‌شناسی", 20), "زیست‌شناسی");
        assert_eq!(truncate_name("Math", 2), "Ma");
    }

    #[test]
    fn test_format_summary_without_scores() {
        let summary = SessionSummary { average: None, rank: None };
        let result = format_summary(&summary, false);
        assert!(result.contains("No subject has been scored yet"));
    }

    #[test]
    fn test_format_session_table() {
        let (session, summary) = scored_session();
        let result = format_session_table(&session, &summary, false);
        let lines: Vec<&str> = result.lines().collect();

        // 8 subjects, blank line, average, rank, disclaimer
        assert_eq!(lines.len(), 12);
        assert!(lines[0].starts_with("math"));
        assert!(lines[0].contains("55.56%"));
        assert!(lines[0].contains("/ 35"));
        assert!(lines[1].contains("100.00%"));
        // Unscored subject
        assert!(lines[2].starts_with("chemistry"));
        assert!(lines[2].trim_end().ends_with('-'));
        assert!(result.contains("Average: 77.8%"));
        // (100 - 77.777...) * 1000 + (20 - 19) * 500 = 22722.2 -> 22,722
        assert!(result.contains("Estimated rank: 22,722"));
    }

    #[test]
    fn test_format_tsv() {
        let (session, summary) = scored_session();
        let result = format_tsv(&session, &summary);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "math\t10\t5\t20\t35\t55.56");
        assert_eq!(lines[1], "physics\t25\t0\t\t25\t100.00");
        assert_eq!(lines[2], "chemistry\t\t\t\t25\t");
        assert_eq!(lines[8], "average\t77.8");
        assert_eq!(lines[9], "rank\t22722");
    }

    #[test]
    fn test_format_json() {
        let (session, summary) = scored_session();
        let json = format_json(&session, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["rank"], 22722);
        assert_eq!(value["prior_academic_score"], 19.0);
        assert_eq!(value["subjects"][0]["id"], "math");
        assert_eq!(value["subjects"][0]["correct"], 10);
        assert!(value["subjects"][2]["percentage"].is_null());
        assert!(value["subjects"][2]["correct"].is_null());
    }

    #[test]
    fn test_format_json_unscored() {
        let session = ExamSession::new(&Catalog::default());
        let summary = SessionSummary { average: None, rank: None };
        let json = format_json(&session, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["average"].is_null());
        assert!(value["rank"].is_null());
    }

    #[test]
    fn test_format_breakdown() {
        let breakdown = explain_rank(60.0, Some(19.0), &EstimatorConfig::default());
        let result = format_breakdown(&breakdown);
        assert!(result.contains("Average: (100 - 60) x 1000 = 40000.0"));
        assert!(result.contains("Prior score: (20 - 19) x 500 = 500.0"));
        assert!(result.contains("rank 40,500"));
    }
}
