// Core data structures for the gradify portal client

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

/// Wire format the portal login form expects for birth dates
const WIRE_DATE_FORMAT: &str = "%d/%m/%Y";

/// One guessed birth date, immutable once generated
///
/// Wraps a calendar date and renders it in the exact zero-padded
/// `DD/MM/YYYY` form the login endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate(NaiveDate);

impl Candidate {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Render the candidate in the portal's wire format
    #[must_use]
    pub fn wire(self) -> String {
        self.0.format(WIRE_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_DATE_FORMAT))
    }
}

/// Classification of a single authentication probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Redirect-class response: the credential was accepted
    Matched,

    /// The portal answered with a non-redirect status
    Rejected(u16),

    /// Transport-level failure (timeout, DNS, connection); never a match
    Transient(String),

    /// No request was made because a winner was already committed
    Skipped,
}

/// Shared state for one coordinator run
///
/// The winner slot is single-assignment: the first successful `commit`
/// wins and every later commit is rejected. Once `found` is set it is
/// never unset. Transport/response counters feed the distinction between
/// "no date matched" and "the portal never answered".
#[derive(Debug)]
pub struct SearchState {
    found: AtomicBool,
    winner: Mutex<Option<Candidate>>,
    responses: AtomicU64,
    transport_failures: AtomicU64,
    cancel: CancellationToken,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            found: AtomicBool::new(false),
            winner: Mutex::new(None),
            responses: AtomicU64::new(0),
            transport_failures: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        })
    }

    /// Whether a winner has been committed
    pub fn is_found(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    /// Commit `candidate` as the winner
    ///
    /// Returns `true` for the first caller; later callers get `false` and
    /// the recorded winner is left untouched. A successful commit trips the
    /// cancellation token so in-flight probes abort.
    pub fn commit(&self, candidate: Candidate) -> bool {
        let mut winner = self.winner.lock().unwrap_or_else(PoisonError::into_inner);
        if winner.is_some() {
            return false;
        }
        *winner = Some(candidate);
        drop(winner);

        self.found.store(true, Ordering::Release);
        self.cancel.cancel();
        true
    }

    /// The committed winner, if any
    pub fn winner(&self) -> Option<Candidate> {
        *self.winner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Token raced against every in-flight probe request
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Record that a probe received an HTTP response
    pub fn record_response(&self) {
        self.responses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transport-level probe failure
    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn responses(&self) -> u64 {
        self.responses.load(Ordering::Relaxed)
    }

    pub fn transport_failures(&self) -> u64 {
        self.transport_failures.load(Ordering::Relaxed)
    }
}

/// Normalized rows/cells extracted from a portal document
///
/// The first row is header-like by convention. Produced once by the
/// extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header row, when the table has one
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Widest row length, used by the aligned text renderer
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Result of a complete search-login-extract workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    /// The discovered birth date that authenticated the student
    pub birth_date: Candidate,

    /// Student identity table from the dossier page
    pub info: Table,

    /// Grades table from the dossier page
    pub grades: Table,
}
