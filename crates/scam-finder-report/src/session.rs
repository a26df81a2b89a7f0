//! Single-flight scan lifecycle.

use scam_finder_analysis_contract::ScanResult;
use thiserror::Error;

/// Where the session is in its scan lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Nothing scanned yet, or reset.
    Idle,
    /// A scan is in flight.
    Scanning,
    /// Last scan produced a result.
    Completed(ScanResult),
    /// Last scan failed with this user-facing message.
    Failed(String),
}

/// Proof that the holder started the current scan.
#[derive(Debug, PartialEq, Eq)]
pub struct ScanTicket {
    generation: u64,
}

/// Tracks one front-end's scan so at most one is in flight.
#[derive(Debug)]
pub struct ScanSession {
    state: SessionState,
    generation: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// `true` while a scan is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Scanning)
    }

    /// Latest result, if the last scan completed.
    pub fn result(&self) -> Option<&ScanResult> {
        match &self.state {
            SessionState::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// Starts a scan, clearing any previous result or error.
    ///
    /// # Errors
    /// Returns [`SessionError::Busy`] while another scan is in flight.
    pub fn begin_scan(&mut self) -> Result<ScanTicket, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }

        self.generation += 1;
        self.state = SessionState::Scanning;
        Ok(ScanTicket {
            generation: self.generation,
        })
    }

    /// Records the outcome of the scan `ticket` started.
    ///
    /// Returns `false` and leaves the state untouched when the ticket was
    /// invalidated by [`ScanSession::reset`].
    pub fn complete<E: ToString>(
        &mut self,
        ticket: ScanTicket,
        outcome: Result<ScanResult, E>,
    ) -> bool {
        if ticket.generation != self.generation || !self.is_busy() {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale scan outcome"
            );
            return false;
        }

        self.state = match outcome {
            Ok(result) => SessionState::Completed(result),
            Err(error) => SessionState::Failed(error.to_string()),
        };
        true
    }

    /// Clears input-derived state and invalidates any outstanding ticket.
    ///
    /// An in-flight network call is not aborted; its outcome is discarded.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
    }
}

/// Session errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A scan is already running.
    #[error("a scan is already in progress")]
    Busy,
}
