use std::path::PathBuf;

use crate::errors::InputError;
use crate::session::Mode;

pub const HELP: &str = "\
Commands:
  mode <text|image|multi-text|multi-image>   switch matching mode (clears the result)
  threshold <value>                          set the score threshold (e.g. 0.8)
  resume <text|@file>                        set the resume text box
  job <text|@file>                           set the job description text
  add [text|@file]                           add the resume text box (or the given text) to the list
  resume-image <path>                        pick the resume image
  resume-images <path>...                    add resume images to the list
  remove <index>                             remove a resume image from the list
  job-image <path>                           pick the job description image
  clear                                      clear every input
  show                                       print the current panel
  submit                                     send the match request for the current mode
  help                                       print this help
  quit                                       exit";

/// Inline text, or `@path` to read it from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextArg {
    Inline(String),
    File(PathBuf),
}

impl TextArg {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('@') {
            Some(path) if !path.trim().is_empty() => TextArg::File(PathBuf::from(path.trim())),
            _ => TextArg::Inline(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(Mode),
    Threshold(String),
    Resume(TextArg),
    Job(TextArg),
    Add(Option<TextArg>),
    ResumeImage(PathBuf),
    ResumeImages(Vec<PathBuf>),
    Remove(usize),
    JobImage(PathBuf),
    Clear,
    Show,
    Submit,
    Help,
    Quit,
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "mode" => Command::Mode(rest.parse()?),
        "threshold" => Command::Threshold(rest.to_string()),
        "resume" => Command::Resume(TextArg::parse(rest)),
        "job" => Command::Job(TextArg::parse(rest)),
        "add" if rest.is_empty() => Command::Add(None),
        "add" => Command::Add(Some(TextArg::parse(rest))),
        "resume-image" => Command::ResumeImage(require_path(rest, "resume-image <path>")?),
        "resume-images" => {
            let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err(InputError::Usage("resume-images <path>..."));
            }
            Command::ResumeImages(paths)
        }
        "remove" => Command::Remove(
            rest.parse()
                .map_err(|_| InputError::Usage("remove <index>"))?,
        ),
        "job-image" => Command::JobImage(require_path(rest, "job-image <path>")?),
        "clear" => Command::Clear,
        "show" => Command::Show,
        "submit" | "match" => Command::Submit,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(InputError::UnknownCommand(word.to_string())),
    };

    Ok(Some(command))
}

fn require_path(rest: &str, usage: &'static str) -> Result<PathBuf, InputError> {
    if rest.is_empty() {
        Err(InputError::Usage(usage))
    } else {
        Ok(PathBuf::from(rest))
    }
}
