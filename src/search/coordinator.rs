//! Bounded-concurrency brute-force coordination
//!
//! The coordinator walks the caller's candidate years in priority order.
//! For each year it feeds the full candidate set through an mpsc channel
//! consumed by a fixed number of worker tasks, so the worker bound is a
//! hard cap on in-flight probes. The first `Matched` outcome commits the
//! winner through the single-assignment [`SearchState`] slot and trips the
//! shared cancellation token; queued candidates are abandoned and in-flight
//! requests abort. A committed winner is never overwritten by a late match.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::SearchError;
use crate::models::{Candidate, ProbeOutcome, SearchState};
use crate::search::calendar::candidates_for_year;
use crate::search::probe::ProbeClient;

/// Buffered candidates between the feeder and the workers
const CANDIDATE_CHANNEL_SIZE: usize = 64;

/// Brute-force birth-date search over one or more candidate years
pub struct BirthDateSearch {
    probe: Arc<ProbeClient>,
    worker_bound: usize,
}

impl BirthDateSearch {
    #[must_use]
    pub fn new(probe: ProbeClient, worker_bound: usize) -> Self {
        Self {
            probe: Arc::new(probe),
            worker_bound: worker_bound.max(1),
        }
    }

    /// Search `years` in the given priority order for the birth date that
    /// authenticates `identifier`
    ///
    /// # Errors
    ///
    /// Returns `SearchError::NoMatch` when every candidate was answered and
    /// rejected, and `SearchError::Unreachable` when no probe ever received
    /// an HTTP response.
    pub async fn run(&self, identifier: &str, years: &[i32]) -> Result<Candidate, SearchError> {
        let state = SearchState::new();

        for &year in years {
            if state.is_found() {
                break;
            }

            tracing::info!(identifier, year, workers = self.worker_bound, "probing candidate year");
            self.search_year(identifier, year, &state).await;

            if let Some(winner) = state.winner() {
                tracing::info!(identifier, date = %winner, "birth date found");
                return Ok(winner);
            }

            tracing::info!(
                year,
                responses = state.responses(),
                transport_failures = state.transport_failures(),
                "year exhausted without a match"
            );
        }

        if let Some(winner) = state.winner() {
            return Ok(winner);
        }

        // A run where the portal never answered is a connectivity problem,
        // not a definitive "no such date".
        if state.responses() == 0 && state.transport_failures() > 0 {
            Err(SearchError::Unreachable {
                probes: state.transport_failures(),
            })
        } else {
            Err(SearchError::NoMatch {
                years_tried: years.len(),
            })
        }
    }

    /// Probe every candidate of one year through the bounded worker pool
    async fn search_year(&self, identifier: &str, year: i32, state: &Arc<SearchState>) {
        let (tx, rx) = mpsc::channel::<Candidate>(CANDIDATE_CHANNEL_SIZE);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let handles = self.spawn_probe_workers(identifier, &rx, state);

        for candidate in candidates_for_year(year) {
            if state.is_found() {
                break;
            }
            if tx.send(candidate).await.is_err() {
                break;
            }
        }

        // Close the channel so idle workers drain and exit
        drop(tx);

        for handle in handles {
            let _ = handle.await;
        }
    }

    /// Spawn the fixed set of probe worker tasks for one year
    fn spawn_probe_workers(
        &self,
        identifier: &str,
        rx: &Arc<tokio::sync::Mutex<mpsc::Receiver<Candidate>>>,
        state: &Arc<SearchState>,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(self.worker_bound);

        for worker_id in 0..self.worker_bound {
            let rx = Arc::clone(rx);
            let state = Arc::clone(state);
            let probe = Arc::clone(&self.probe);
            let identifier = identifier.to_string();

            let handle = tokio::spawn(async move {
                loop {
                    let candidate = {
                        let mut rx = rx.lock().await;
                        rx.recv().await
                    };

                    let Some(candidate) = candidate else {
                        break; // channel closed, year exhausted
                    };

                    if state.is_found() {
                        break;
                    }

                    match probe.probe(&identifier, candidate, &state).await {
                        ProbeOutcome::Matched => {
                            if state.commit(candidate) {
                                tracing::debug!(worker_id, date = %candidate, "probe accepted, winner committed");
                            } else {
                                tracing::debug!(
                                    worker_id,
                                    date = %candidate,
                                    "probe accepted after a winner was committed; ignored"
                                );
                            }
                            break;
                        }
                        ProbeOutcome::Rejected(status) => {
                            tracing::trace!(worker_id, date = %candidate, status, "probe rejected");
                        }
                        ProbeOutcome::Transient(detail) => {
                            tracing::debug!(
                                worker_id,
                                date = %candidate,
                                detail,
                                "transient probe failure, continuing"
                            );
                        }
                        ProbeOutcome::Skipped => break,
                    }
                }

                tracing::trace!(worker_id, "probe worker shutting down");
            });

            handles.push(handle);
        }

        handles
    }
}
