use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single resume vs job result, as returned by `/match-text` and `/match-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: f64,
    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub reasoning: String,
}

/// Ranked results for several resumes, as returned by the `-multiple` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiMatchReport {
    pub results: Vec<MatchReport>,
    pub best_match_index: usize,
    pub best_match_name: String,
}

/// Known result shapes. The raw payload stays authoritative; this is only for summaries.
#[derive(Debug, Clone)]
pub enum Report {
    Single(MatchReport),
    Multi(MultiMatchReport),
}

impl Report {
    pub fn from_payload(payload: &Value) -> Option<Self> {
        if let Ok(multi) = MultiMatchReport::deserialize(payload) {
            return Some(Report::Multi(multi));
        }
        MatchReport::deserialize(payload).ok().map(Report::Single)
    }

    pub fn summary(&self) -> String {
        match self {
            Report::Single(report) => single_summary(report),
            Report::Multi(multi) => {
                let mut lines = vec![format!(
                    "Best match: #{} {}",
                    multi.best_match_index.saturating_add(1),
                    multi.best_match_name
                )];
                for (i, report) in multi.results.iter().enumerate() {
                    lines.push(format!("  #{} {}", i + 1, single_summary(report)));
                }
                lines.join("\n")
            }
        }
    }
}

fn single_summary(report: &MatchReport) -> String {
    let mut line = format!(
        "score {:.0}% ({} of {} job skills matched)",
        report.score * 100.0,
        report.matched_skills.len(),
        report.job_skills.len()
    );
    if !report.missing_skills.is_empty() {
        let missing: Vec<&str> = report
            .missing_skills
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        line.push_str(&format!("; missing: {}", missing.join(", ")));
    }
    line
}
