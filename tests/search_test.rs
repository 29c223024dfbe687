//! Integration tests for probing and brute-force coordination using wiremock

mod common;

use std::time::Duration;

use chrono::NaiveDate;
use gradify::error::SearchError;
use gradify::models::{Candidate, ProbeOutcome, SearchState};
use gradify::search::{BirthDateSearch, ProbeClient};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{test_config, unreachable_base_url};

fn candidate(y: i32, m: u32, d: u32) -> Candidate {
    Candidate::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Redirect-class responses are the accepted-credential signal
#[tokio::test]
async fn test_probe_classifies_redirect_as_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/home.php"))
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let state = SearchState::new();

    let outcome = probe.probe("12345", candidate(2003, 3, 17), &state).await;

    assert_eq!(outcome, ProbeOutcome::Matched);
    assert_eq!(state.responses(), 1);
    assert_eq!(state.transport_failures(), 0);
}

/// Any non-redirect HTTP response counts as a rejection
#[tokio::test]
async fn test_probe_classifies_ok_as_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("wrong date"))
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let state = SearchState::new();

    let outcome = probe.probe("12345", candidate(2003, 3, 17), &state).await;

    assert_eq!(outcome, ProbeOutcome::Rejected(200));
}

/// A wedged request times out and is reported as transient, not a match
#[tokio::test]
async fn test_probe_timeout_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(
            ResponseTemplate::new(302).set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let state = SearchState::new();

    let outcome = probe.probe("12345", candidate(2003, 3, 17), &state).await;

    assert!(matches!(outcome, ProbeOutcome::Transient(_)));
    assert_eq!(state.responses(), 0);
    assert_eq!(state.transport_failures(), 1);
}

/// Once a winner is committed no further request leaves the process
#[tokio::test]
async fn test_probe_short_circuits_after_win() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(302))
        .expect(0)
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let state = SearchState::new();
    assert!(state.commit(candidate(2003, 3, 17)));

    let outcome = probe.probe("12345", candidate(2003, 3, 18), &state).await;

    assert_eq!(outcome, ProbeOutcome::Skipped);
}

/// With exactly one accepted candidate the coordinator reports it, and the
/// reported winner is stable across repeated runs
#[tokio::test]
async fn test_finds_unique_matching_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .and(body_string_contains("pass=17%2F03%2F2003"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/home.php"))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let search = BirthDateSearch::new(probe, 16);

    for _ in 0..3 {
        let winner = search.run("12345", &[2003]).await.unwrap();
        assert_eq!(winner.wire(), "17/03/2003");
    }
}

/// A match in an early year stops the search before later years start
#[tokio::test]
async fn test_match_skips_remaining_years() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .and(body_string_contains("pass=02%2F01%2F2003"))
        .respond_with(ResponseTemplate::new(302))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let search = BirthDateSearch::new(probe, 4);

    let winner = search.run("12345", &[2003, 2004, 2005]).await.unwrap();
    assert_eq!(winner.wire(), "02/01/2003");

    // nothing from the later years was ever probed
    let requests = mock_server.received_requests().await.unwrap();
    let probed_2004 = requests
        .iter()
        .any(|r| String::from_utf8_lossy(&r.body).contains("%2F2004"));
    assert!(!probed_2004);
}

/// After a match is observed the number of further probes stays bounded
/// instead of approaching the remaining candidate count
#[tokio::test]
async fn test_cancellation_bounds_probe_volume() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .and(body_string_contains("pass=05%2F01%2F2003"))
        .respond_with(ResponseTemplate::new(302))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    // rejections trickle in slowly so in-flight probes are still pending
    // when the winner lands
    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let search = BirthDateSearch::new(probe, 8);

    let winner = search.run("12345", &[2003]).await.unwrap();
    assert_eq!(winner.wire(), "05/01/2003");

    let issued = mock_server.received_requests().await.unwrap().len();
    assert!(
        issued < 50,
        "expected a bounded number of probes after the match, got {issued}"
    );
}

/// Exhausting every candidate with answered rejections is a definitive
/// no-match, not a connectivity error
#[tokio::test]
async fn test_exhausted_years_report_no_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let search = BirthDateSearch::new(probe, 32);

    let err = search.run("12345", &[2003]).await.unwrap_err();
    assert!(matches!(err, SearchError::NoMatch { years_tried: 1 }));
}

/// When no probe ever gets an HTTP response the failure is reported as
/// unreachable, never as no-match
#[tokio::test]
async fn test_dead_portal_reports_unreachable() {
    let config = test_config(&unreachable_base_url());

    let probe = ProbeClient::new(&config).unwrap();
    let search = BirthDateSearch::new(probe, 32);

    let err = search.run("12345", &[2003]).await.unwrap_err();
    assert!(matches!(err, SearchError::Unreachable { probes } if probes > 0));
}

/// A handful of transient probe failures must not turn an exhausted search
/// into a connectivity error
#[tokio::test]
async fn test_transient_failures_do_not_mask_no_match() {
    let mock_server = MockServer::start().await;

    // this one candidate times out against the 1s probe timeout
    Mock::given(method("POST"))
        .and(path("/check.php"))
        .and(body_string_contains("pass=01%2F01%2F2003"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/check.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let probe = ProbeClient::new(&test_config(&mock_server.uri())).unwrap();
    let search = BirthDateSearch::new(probe, 16);

    let err = search.run("12345", &[2003]).await.unwrap_err();
    assert!(matches!(err, SearchError::NoMatch { .. }));
}
