//! Messages exchanged with the analysis worker.
//!
//! All types are owned and `Send` so they can cross from the UI loop to the
//! worker task and back over tokio channels.

use redpen_core::{AnalysisTicket, ClientError, Span};

/// One analysis request queued by the UI.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    /// Sequence number and buffer revision the request was issued against.
    pub ticket: AnalysisTicket,
    /// Snapshot of the buffer text at dispatch time.
    pub text: String,
}

/// The worker's answer to one [`AnalysisJob`].
///
/// Staleness is not decided here: the session compares `ticket` against its
/// own revision and sequence state when the reply is applied.
#[derive(Debug)]
pub struct AnalysisReply {
    pub ticket: AnalysisTicket,
    pub result: Result<Vec<Span>, ClientError>,
}
