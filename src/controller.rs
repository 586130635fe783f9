//! Interaction controller
//!
//! Owns the [`Transcript`] and drives the two backend operations. Each
//! operation has a begin step, which checks the busy gate, updates the
//! transcript and spawns the network call, and a settle step, which waits for
//! the call and appends exactly one bot entry. Busy is cleared on every
//! settlement, including failed and panicked calls.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::api::{ApiError, LogBackend};
use crate::transcript::{ConversationEntry, Transcript};

pub const INGEST_OK: &str = "✅ Log ingestion triggered successfully.";
pub const INGEST_FAILED: &str = "❌ Failed to trigger ingestion.";
pub const RESULTS_HEADER: &str = "Here are the relevant log entries I found:";
pub const NO_RESULTS: &str = "I could not find any relevant log entries.";
pub const QUERY_FAILED: &str = "Sorry, I encountered an error querying the logs.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ingest,
    Query,
}

enum Outcome {
    Ingest(Result<(), ApiError>),
    Query(Result<Vec<String>, ApiError>),
}

struct InFlight {
    operation: Operation,
    task: JoinHandle<Outcome>,
}

pub struct Controller {
    transcript: Transcript,
    backend: Arc<dyn LogBackend>,
    in_flight: Option<InFlight>,
}

impl Controller {
    pub fn new(backend: Arc<dyn LogBackend>) -> Self {
        Self {
            transcript: Transcript::new(),
            backend,
            in_flight: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The query box text. Only the input path edits it.
    pub fn pending_input_mut(&mut self) -> &mut String {
        self.transcript.pending_input_mut()
    }

    pub fn is_busy(&self) -> bool {
        self.transcript.is_busy()
    }

    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight.as_ref().map(|f| f.operation)
    }

    /// Start an ingest. Returns false (and changes nothing) while busy.
    pub fn begin_ingest(&mut self) -> bool {
        if self.transcript.is_busy() {
            debug!("ingest ignored: a request is already outstanding");
            return false;
        }

        self.transcript.set_busy(true);

        let backend = Arc::clone(&self.backend);
        let task = tokio::spawn(async move { Outcome::Ingest(backend.ingest().await) });
        self.in_flight = Some(InFlight {
            operation: Operation::Ingest,
            task,
        });

        info!("log ingestion requested");
        true
    }

    /// Start a query. Blank input and calls while busy are no-ops.
    ///
    /// The user entry keeps the input exactly as typed; the backend receives
    /// the trimmed text.
    pub fn begin_query(&mut self, raw_input: &str) -> bool {
        let text = raw_input.trim();
        if text.is_empty() {
            return false;
        }
        if self.transcript.is_busy() {
            debug!("query ignored: a request is already outstanding");
            return false;
        }

        self.transcript.append(ConversationEntry::user(raw_input));
        self.transcript.take_pending_input();
        self.transcript.set_busy(true);

        let backend = Arc::clone(&self.backend);
        let text = text.to_string();
        info!(query = %text, "querying logs");
        let task = tokio::spawn(async move { Outcome::Query(backend.query(&text).await) });
        self.in_flight = Some(InFlight {
            operation: Operation::Query,
            task,
        });

        true
    }

    /// Start a query with whatever is in the query box.
    pub fn begin_pending_input(&mut self) -> bool {
        let raw_input = self.transcript.pending_input().to_string();
        self.begin_query(&raw_input)
    }

    /// Wait for the outstanding operation and record its outcome.
    ///
    /// Cancel-safe: dropping this future before it completes leaves the
    /// operation outstanding.
    pub async fn settle(&mut self) {
        let joined = match self.in_flight.as_mut() {
            Some(in_flight) => (&mut in_flight.task).await,
            None => {
                self.transcript.set_busy(false);
                return;
            }
        };
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        let reply = match joined {
            Ok(Outcome::Ingest(result)) => ingest_reply(result),
            Ok(Outcome::Query(result)) => query_reply(result),
            Err(err) => {
                error!(
                    operation = ?in_flight.operation,
                    error = %err,
                    "backend task did not complete"
                );
                failure_reply(in_flight.operation)
            }
        };

        self.transcript.append(ConversationEntry::bot(reply));
        self.transcript.set_busy(false);
    }

    pub async fn trigger_ingest(&mut self) -> bool {
        let started = self.begin_ingest();
        if started {
            self.settle().await;
        }
        started
    }

    pub async fn submit_query(&mut self, raw_input: &str) -> bool {
        let started = self.begin_query(raw_input);
        if started {
            self.settle().await;
        }
        started
    }

    pub async fn submit_input(&mut self) -> bool {
        let started = self.begin_pending_input();
        if started {
            self.settle().await;
        }
        started
    }
}

fn ingest_reply(result: Result<(), ApiError>) -> String {
    match result {
        Ok(()) => INGEST_OK.to_string(),
        Err(err) => {
            error!(error = %err, "failed to trigger ingestion");
            INGEST_FAILED.to_string()
        }
    }
}

fn query_reply(result: Result<Vec<String>, ApiError>) -> String {
    match result {
        Ok(results) if results.is_empty() => NO_RESULTS.to_string(),
        Ok(results) => format_results(&results),
        Err(err) => {
            error!(error = %err, "failed to query logs");
            QUERY_FAILED.to_string()
        }
    }
}

fn failure_reply(operation: Operation) -> String {
    match operation {
        Operation::Ingest => INGEST_FAILED.to_string(),
        Operation::Query => QUERY_FAILED.to_string(),
    }
}

/// Header line, then one bullet per result, blank lines in between.
pub fn format_results(results: &[String]) -> String {
    let bullets: Vec<String> = results.iter().map(|r| format!("• {}", r)).collect();
    format!("{}\n\n{}", RESULTS_HEADER, bullets.join("\n\n"))
}
