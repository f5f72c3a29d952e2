// Request orchestration: per-mode input, the active mode, request construction and
// the submit/complete state machine. Nothing in here performs I/O except through
// the `MatchBackend` the caller sends a `Submission` through.

pub mod inputs;
pub mod mode;
pub mod request;
pub mod state;

pub use inputs::{ImageFile, InputAccumulator, Threshold};
pub use mode::Mode;
pub use request::MatchRequest;
pub use state::{Phase, SessionState, Submission, Ticket};
