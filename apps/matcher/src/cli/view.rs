use std::fmt::Write;

use serde_json::Value;

use crate::errors::SubmitRejected;
use crate::models::report::Report;
use crate::session::{InputAccumulator, Mode, Phase, SessionState};

pub const BANNER: &str = "\
ATS Resume Matcher: get your CV close to the job you want.
Type `help` for commands.";

const PREVIEW_CHARS: usize = 40;

/// Current mode, its inputs, and the live outcome.
pub fn render_panel(session: &SessionState) -> String {
    let mut out = String::new();
    let inputs = session.inputs();

    let _ = writeln!(
        out,
        "── {} ── threshold {}",
        session.mode(),
        session.threshold().raw()
    );

    match session.mode() {
        Mode::TextMatch => {
            let _ = writeln!(out, "resume text: {}", describe_text(inputs.resume_text()));
            let _ = writeln!(out, "job text:    {}", describe_text(inputs.job_text()));
        }
        Mode::ImageMatch => {
            let resume = inputs
                .resume_images()
                .first()
                .map(|i| i.name.as_str())
                .unwrap_or("(none)");
            let _ = writeln!(out, "resume image: {resume}");
            let _ = writeln!(out, "job image:    {}", job_image_name(inputs));
        }
        Mode::MultiTextMatch => {
            let _ = writeln!(out, "resumes ({}):", inputs.resume_texts().len());
            for (i, text) in inputs.resume_texts().iter().enumerate() {
                let _ = writeln!(out, "  [{i}] {}", preview(text));
            }
            let _ = writeln!(out, "resume box: {}", describe_text(inputs.resume_text()));
            let _ = writeln!(out, "job text:   {}", describe_text(inputs.job_text()));
        }
        Mode::MultiImageMatch => {
            let _ = writeln!(out, "resume images ({}):", inputs.resume_images().len());
            for (i, image) in inputs.resume_images().iter().enumerate() {
                let _ = writeln!(out, "  [{i}] {}", image.name);
            }
            let _ = writeln!(out, "job image: {}", job_image_name(inputs));
        }
    }

    out.push_str(&render_outcome(session));
    if let Some(at) = session.completed_at() {
        let _ = writeln!(out, "finished at {} UTC", at.format("%H:%M:%S"));
    }
    out
}

/// The live outcome only; empty when idle.
pub fn render_outcome(session: &SessionState) -> String {
    match session.phase() {
        Phase::Idle => String::new(),
        Phase::Submitting => "Matching…\n".to_string(),
        Phase::Failed => format!("error: {}\n", session.error_message().unwrap_or_default()),
        Phase::Succeeded => session.result().map(render_result).unwrap_or_default(),
    }
}

fn render_result(payload: &Value) -> String {
    let mut out = String::new();
    if let Some(report) = Report::from_payload(payload) {
        let _ = writeln!(out, "{}", report.summary());
    }
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    let _ = writeln!(out, "Result JSON:\n{pretty}");
    out
}

pub fn render_rejected(rejected: &SubmitRejected) -> String {
    match rejected {
        SubmitRejected::Busy => "busy: wait for the current match to finish".to_string(),
        SubmitRejected::Invalid(failure) => format!("error: {failure}"),
    }
}

fn job_image_name(inputs: &InputAccumulator) -> &str {
    inputs.job_image().map(|i| i.name.as_str()).unwrap_or("(none)")
}

fn describe_text(text: &str) -> String {
    if text.trim().is_empty() {
        "(empty)".to_string()
    } else {
        format!("{} ({} chars)", preview(text), text.chars().count())
    }
}

fn preview(text: &str) -> String {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if first_line.chars().count() > PREVIEW_CHARS {
        let cut: String = first_line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else {
        first_line.to_string()
    }
}
