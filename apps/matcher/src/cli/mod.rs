//! Interactive console. Translates typed commands into session operations and prints
//! the resulting panel. Backend calls run on spawned tasks; their results come back
//! over a channel and are reconciled through `SessionState::complete`.

pub mod commands;
pub mod loader;
pub mod view;

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::errors::{InputError, MatchError};
use crate::match_client::MatchBackend;
use crate::session::{Mode, SessionState, Submission, Threshold, Ticket};
use commands::Command;

/// A finished backend call, tagged with the ticket it was issued under.
pub type Completion = (Ticket, Result<Value, MatchError>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    session: SessionState,
    backend: Arc<dyn MatchBackend>,
    completions: UnboundedSender<Completion>,
    last_render_key: Option<(Mode, u64)>,
}

impl Console {
    pub fn new(
        session: SessionState,
        backend: Arc<dyn MatchBackend>,
    ) -> (Self, UnboundedReceiver<Completion>) {
        let (completions, rx) = mpsc::unbounded_channel();
        let console = Self {
            session,
            backend,
            completions,
            last_render_key: None,
        };
        (console, rx)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Applies one command. Input errors are returned for the caller to print;
    /// they never touch the session outcome.
    pub async fn apply(&mut self, command: Command) -> Result<Flow, InputError> {
        debug!("Console command: {command:?}");
        match command {
            Command::Mode(mode) => self.session.select_mode(mode),
            Command::Threshold(raw) => self.session.set_threshold(Threshold::new(raw)),
            Command::Resume(arg) => {
                let text = loader::read_text(&arg).await?;
                self.session.inputs_mut().set_resume_text(text);
            }
            Command::Job(arg) => {
                let text = loader::read_text(&arg).await?;
                self.session.inputs_mut().set_job_text(text);
            }
            Command::Add(None) => self.session.inputs_mut().commit_resume_text(),
            Command::Add(Some(arg)) => {
                let text = loader::read_text(&arg).await?;
                self.session.inputs_mut().add_resume_text(&text);
            }
            Command::ResumeImage(path) => {
                let image = loader::load_image(&path).await?;
                self.session.inputs_mut().set_resume_images(vec![image]);
            }
            Command::ResumeImages(paths) => {
                let (images, skipped) = loader::load_images(&paths).await;
                for e in &skipped {
                    println!("skipped: {e}");
                }
                self.session.inputs_mut().append_resume_images(images);
            }
            Command::Remove(index) => {
                if self.session.inputs_mut().remove_resume_image(index).is_none() {
                    return Err(InputError::NoSuchImage(index));
                }
            }
            Command::JobImage(path) => {
                let image = loader::load_image(&path).await?;
                self.session.inputs_mut().set_job_image(Some(image));
            }
            Command::Clear => self.session.inputs_mut().clear_all(),
            Command::Show => print!("{}", view::render_panel(&self.session)),
            Command::Submit => self.submit(),
            Command::Help => println!("{}", commands::HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self) {
        let Submission { ticket, request } = match self.session.begin_submit() {
            Ok(submission) => submission,
            Err(rejected) => {
                println!("{}", view::render_rejected(&rejected));
                return;
            }
        };

        println!("Matching… ({})", request.endpoint());
        let backend = Arc::clone(&self.backend);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = backend.send(&request).await;
            // The console may already be gone; nothing to deliver to then.
            let _ = completions.send((ticket, result));
        });
    }

    /// Reconciles a finished call and prints its outcome if it still counts.
    pub fn on_complete(&mut self, (ticket, result): Completion) -> bool {
        let applied = self.session.complete(ticket, result);
        if applied {
            print!("{}", view::render_outcome(&self.session));
        }
        applied
    }

    /// Redraws the panel when the mode changed since the last draw. Outcome-only
    /// changes are printed where they happen.
    fn refresh(&mut self) {
        let key = self.session.render_key();
        let mode_changed = self.last_render_key.map(|(mode, _)| mode) != Some(key.0);
        if mode_changed {
            print!("{}", view::render_panel(&self.session));
        }
        self.last_render_key = Some(key);
    }
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(session: SessionState, backend: Arc<dyn MatchBackend>) -> Result<()> {
    let (mut console, mut completions) = Console::new(session, backend);

    println!("{}", view::BANNER);
    console.refresh();

    drive(
        &mut console,
        &mut completions,
        BufReader::new(tokio::io::stdin()),
    )
    .await?;

    info!("Console closed");
    Ok(())
}

/// Feeds `input` line by line into the console and reconciles completions as they
/// arrive. At end of input an outstanding call is still awaited so its outcome is
/// shown; `quit` returns immediately.
async fn drive<R>(
    console: &mut Console,
    completions: &mut UnboundedReceiver<Completion>,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match commands::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match console.apply(command).await {
                    Ok(Flow::Quit) => return Ok(()),
                    Ok(Flow::Continue) => console.refresh(),
                    Err(e) => println!("{e}"),
                }
            }
            Some(done) = completions.recv() => {
                console.on_complete(done);
                console.refresh();
            }
        }
    }

    if console.session().is_busy() {
        debug!("Input closed with a match in flight; waiting for it");
    }
    while console.session().is_busy() {
        let Some(done) = completions.recv().await else {
            break;
        };
        console.on_complete(done);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MatchRequest, Phase};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    /// Echoes the endpoint it was called for.
    struct EchoBackend;

    #[async_trait]
    impl MatchBackend for EchoBackend {
        async fn send(&self, request: &MatchRequest) -> Result<Value, MatchError> {
            Ok(json!({ "endpoint": request.endpoint() }))
        }
    }

    /// Answers after a short delay, like a backend doing real work.
    struct SlowBackend;

    #[async_trait]
    impl MatchBackend for SlowBackend {
        async fn send(&self, _request: &MatchRequest) -> Result<Value, MatchError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(json!({"score": 1.0}))
        }
    }

    fn console() -> (Console, UnboundedReceiver<Completion>) {
        Console::new(SessionState::new(Threshold::default()), Arc::new(EchoBackend))
    }

    async fn run_line(console: &mut Console, line: &str) -> Flow {
        let command = commands::parse(line).unwrap().unwrap();
        console.apply(command).await.unwrap()
    }

    #[tokio::test]
    async fn test_submit_round_trip_through_channel() {
        let (mut console, mut rx) = console();
        run_line(&mut console, "mode multi-text").await;
        run_line(&mut console, "resume Jane Doe").await;
        run_line(&mut console, "add").await;
        run_line(&mut console, "job Rust engineer").await;
        run_line(&mut console, "submit").await;
        assert_eq!(console.session().phase(), Phase::Submitting);

        let done = rx.recv().await.unwrap();
        assert!(console.on_complete(done));
        assert_eq!(console.session().phase(), Phase::Succeeded);
        assert_eq!(
            console.session().result(),
            Some(&json!({"endpoint": "/match-text-multiple"}))
        );
    }

    #[tokio::test]
    async fn test_submit_while_busy_keeps_first_call() {
        let (mut console, mut rx) = console();
        run_line(&mut console, "submit").await;
        run_line(&mut console, "submit").await;

        let done = rx.recv().await.unwrap();
        assert!(console.on_complete(done));
        assert!(rx.try_recv().is_err(), "second submit must not issue a call");
    }

    #[tokio::test]
    async fn test_mode_switch_drops_in_flight_result() {
        let (mut console, mut rx) = console();
        run_line(&mut console, "submit").await;
        run_line(&mut console, "mode image").await;

        let done = rx.recv().await.unwrap();
        assert!(!console.on_complete(done));
        assert_eq!(console.session().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_validation_failure_reports_without_call() {
        let (mut console, mut rx) = console();
        run_line(&mut console, "mode multi-image").await;
        run_line(&mut console, "submit").await;

        assert_eq!(console.session().phase(), Phase::Failed);
        assert_eq!(
            console.session().error_message(),
            Some("Pick at least one resume image and one job image.")
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_quit_and_missing_file() {
        let (mut console, _rx) = console();
        assert_eq!(run_line(&mut console, "quit").await, Flow::Quit);

        let err = console
            .apply(Command::JobImage("definitely/missing.png".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
        assert!(console.session().inputs().job_image().is_none());
    }

    #[tokio::test]
    async fn test_remove_out_of_range_is_an_input_error() {
        let (mut console, _rx) = console();
        let err = console.apply(Command::Remove(3)).await.unwrap_err();
        assert!(matches!(err, InputError::NoSuchImage(3)));
        assert_eq!(err.to_string(), "No resume image at index 3");
    }

    #[tokio::test]
    async fn test_end_of_input_waits_for_in_flight_call() {
        let (mut console, mut rx) = Console::new(
            SessionState::new(Threshold::default()),
            Arc::new(SlowBackend),
        );
        let input: &[u8] = b"resume A\njob B\nsubmit\n";

        drive(&mut console, &mut rx, input).await.unwrap();

        assert_eq!(console.session().phase(), Phase::Succeeded);
        assert_eq!(console.session().result(), Some(&json!({"score": 1.0})));
    }

    #[tokio::test]
    async fn test_quit_stops_reading_input() {
        let (mut console, mut rx) = console();
        let input: &[u8] = b"resume A\nquit\nresume B\n";

        drive(&mut console, &mut rx, input).await.unwrap();

        assert_eq!(console.session().inputs().resume_text(), "A");
    }
}
