//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns an
//! [`HttpResponse`]. Domain failures become `{ "error": … }` bodies with a
//! status that says who failed: 409 for the session, 502 for the scoring
//! service, 503 when the service could not be reached or understood.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::analytics::logger;
use crate::assessment::client::ScoringClient;
use crate::assessment::{AssessError, AssessmentRequest, AssessmentResult, InputSource, MetricField};
use crate::report::{self, ReportError};
use crate::risk::RiskTier;
use crate::session::{self, InputMethod, SessionView};
use crate::timeline;

use super::{AppState, HttpResponse, content_type_json, error_response, header};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct NavigateRequest {
    direction: String,
}

#[derive(Deserialize)]
struct MethodRequest {
    method: InputMethod,
}

#[derive(Deserialize)]
struct MetricUpdateRequest {
    field: String,
    value: f64,
}

#[derive(Deserialize)]
struct AssessRequest {
    source: InputSource,
    #[serde(default)]
    text: Option<String>,
}

/// Assessment API response: the raw result plus the refreshed session.
#[derive(Serialize)]
struct AssessResponse {
    result: AssessmentResult,
    session: SessionView,
}

#[derive(Serialize)]
struct HealthResponse {
    version: &'static str,
    scoring_endpoint: String,
    scoring_reachable: bool,
    timeout_ms: u64,
    logging_enabled: bool,
    log_exists: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Parse a JSON body, or produce the 400 response for it.
fn parse_body<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, HttpResponse> {
    serde_json::from_str(body)
        .map_err(|e| error_response(400, &format!("invalid request body: {e}")))
}

/// Parse the `?key=value` query parameter from a URL.
fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

fn assess_error_status(err: &AssessError) -> u16 {
    match err {
        AssessError::Busy => 409,
        AssessError::Server { .. } => 502,
        AssessError::Transport { .. } | AssessError::MalformedResponse(_) => 503,
    }
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

/// `GET /api/session`: full view of the dashboard session.
pub fn get_session(state: &AppState) -> Result<HttpResponse> {
    let view = session::lock(&state.session).view();
    json_response(&view)
}

/// `POST /api/navigate`: `{"direction": "next" | "prev"}`.
///
/// Moving past either end is not an error; the view simply stays put.
pub fn post_navigate(state: &AppState, body: &str) -> Result<HttpResponse> {
    let req: NavigateRequest = match parse_body(body) {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };

    let mut session = session::lock(&state.session);
    match req.direction.as_str() {
        "next" => {
            session.next_panel();
        }
        "prev" => {
            session.prev_panel();
        }
        other => {
            return Ok(error_response(
                400,
                &format!("unknown direction '{other}' (expected next or prev)"),
            ));
        }
    }
    json_response(&session.view())
}

/// `POST /api/method`: `{"method": "slider" | "text"}`.
pub fn post_method(state: &AppState, body: &str) -> Result<HttpResponse> {
    let req: MethodRequest = match parse_body(body) {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };

    let mut session = session::lock(&state.session);
    session.set_method(req.method);
    json_response(&session.view())
}

/// `PUT /api/metrics`: `{"field": "sleep", "value": 7.5}`.
pub fn put_metric(state: &AppState, body: &str) -> Result<HttpResponse> {
    let req: MetricUpdateRequest = match parse_body(body) {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };
    let field: MetricField = match req.field.parse() {
        Ok(f) => f,
        Err(msg) => return Ok(error_response(400, &msg)),
    };

    let mut session = session::lock(&state.session);
    if let Err(err) = session.set_metric(field, req.value) {
        return Ok(error_response(400, &err.to_string()));
    }
    json_response(&session.view())
}

// ---------------------------------------------------------------------------
// Assessment handlers
// ---------------------------------------------------------------------------

/// `POST /api/assess`: `{"source": "sliders"}` or
/// `{"source": "text", "text": "..."}`.
///
/// The session lock is released while the scoring service is called, so
/// other routes stay responsive and a second trigger is answered with 409.
pub fn post_assess(state: &AppState, body: &str) -> Result<HttpResponse> {
    let req: AssessRequest = match parse_body(body) {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };
    let request = match req.source {
        InputSource::Sliders => AssessmentRequest::Sliders,
        InputSource::Text => AssessmentRequest::Text(req.text.unwrap_or_default()),
    };

    match session::run_shared(&state.session, &request, state.scorer.as_ref()) {
        Ok(result) => {
            let view = session::lock(&state.session).view();
            json_response(&AssessResponse {
                result,
                session: view,
            })
        }
        Err(err) => Ok(error_response(assess_error_status(&err), &err.to_string())),
    }
}

/// `GET /api/timeline?tier=low|moderate|high`: plan geometry.
///
/// A missing or unrecognized tier yields the tick-only empty plan.
pub fn get_timeline(url: &str) -> Result<HttpResponse> {
    let tier = query_param(url, "tier").and_then(RiskTier::from_level_name);
    json_response(&timeline::layout_timeline(tier))
}

/// `GET /api/report`: text report as a download.
pub fn get_report(state: &AppState) -> Result<HttpResponse> {
    let generated = report::generate_report_now(&session::lock(&state.session));
    match generated {
        Ok(report) => {
            let disposition = format!("attachment; filename=\"{}\"", report.file_name);
            Ok(Response::from_data(report.content.into_bytes())
                .with_header(header("Content-Type", "text/plain; charset=utf-8"))
                .with_header(header("Content-Disposition", &disposition))
                .with_status_code(StatusCode(200)))
        }
        Err(err @ ReportError::NoAssessment) => Ok(error_response(409, &err.to_string())),
        Err(err) => Err(err).context("failed to generate report"),
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// `GET /api/health`: scoring endpoint reachability and log status.
pub fn get_health(state: &AppState) -> Result<HttpResponse> {
    let scoring = &state.config.scoring;
    let resp = HealthResponse {
        version: env!("CARGO_PKG_VERSION"),
        scoring_endpoint: state.scorer.endpoint().to_string(),
        scoring_reachable: ScoringClient::from_config(scoring).is_reachable(),
        timeout_ms: scoring.timeout_ms,
        logging_enabled: state.config.logging.enabled,
        log_exists: logger::assessment_log_path()
            .map(|p| p.exists())
            .unwrap_or(false),
    };
    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::{Arc, Mutex};
    use std::thread;

    use tiny_http::Method;

    use super::*;
    use crate::assessment::{MetricInput, ScoringService};
    use crate::config::schema::ClaridianConfig;
    use crate::web::dispatch;

    struct Fixed {
        score: f64,
        level: &'static str,
        seen: Mutex<Vec<MetricInput>>,
    }

    impl Fixed {
        fn new(score: f64, level: &'static str) -> Self {
            Self {
                score,
                level,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ScoringService for Fixed {
        fn assess(&self, input: &MetricInput) -> Result<AssessmentResult, AssessError> {
            self.seen.lock().unwrap().push(*input);
            Ok(AssessmentResult {
                risk_score: self.score,
                risk_level: self.level.to_string(),
                triggered_rules: vec!["Rule fired".to_string()],
                interpretation_text: None,
            })
        }

        fn endpoint(&self) -> &str {
            "fixed"
        }
    }

    struct Failing(fn() -> AssessError);

    impl ScoringService for Failing {
        fn assess(&self, _input: &MetricInput) -> Result<AssessmentResult, AssessError> {
            Err((self.0)())
        }

        fn endpoint(&self) -> &str {
            "failing"
        }
    }

    /// Blocks inside `assess` until released, so a request can be held
    /// in flight.
    struct Gated {
        entered: Mutex<Sender<()>>,
        release: Mutex<Receiver<()>>,
    }

    impl ScoringService for Gated {
        fn assess(&self, _input: &MetricInput) -> Result<AssessmentResult, AssessError> {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(AssessmentResult {
                risk_score: 20.0,
                risk_level: "Low".to_string(),
                triggered_rules: vec![],
                interpretation_text: None,
            })
        }

        fn endpoint(&self) -> &str {
            "gated"
        }
    }

    fn state_with(scorer: impl ScoringService + 'static) -> AppState {
        let mut config = ClaridianConfig::default();
        config.logging.enabled = false;
        AppState::new(config, Box::new(scorer))
    }

    fn call(state: &AppState, method: Method, url: &str, body: Option<&str>) -> (u16, String) {
        let resp = dispatch(state, &method, url, body).unwrap();
        let status = resp.status_code().0;
        let mut text = String::new();
        resp.into_reader().read_to_string(&mut text).unwrap();
        (status, text)
    }

    fn json(text: &str) -> serde_json::Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("/api/timeline?tier=high", "tier"), Some("high"));
        assert_eq!(query_param("/api/timeline?x=1&tier=low", "tier"), Some("low"));
        assert_eq!(query_param("/api/timeline", "tier"), None);
    }

    #[test]
    fn initial_session_is_idle() {
        let state = state_with(Fixed::new(50.0, "Moderate"));
        let (status, body) = call(&state, Method::Get, "/api/session", None);
        assert_eq!(status, 200);
        let v = json(&body);
        assert_eq!(v["dashboard"]["gauge"]["label"], "Awaiting Input");
        assert_eq!(v["trigger_enabled"], true);
        assert_eq!(v["assessment_run"], false);
        assert_eq!(v["navigator"]["title"], "Core Metrics (1/2)");
    }

    #[test]
    fn navigate_moves_between_panels() {
        let state = state_with(Fixed::new(50.0, "Moderate"));
        let (_, body) = call(&state, Method::Post, "/api/navigate", Some(r#"{"direction":"next"}"#));
        assert_eq!(json(&body)["navigator"]["title"], "Extended Metrics (2/2)");

        let (status, _) = call(&state, Method::Post, "/api/navigate", Some(r#"{"direction":"up"}"#));
        assert_eq!(status, 400);
    }

    #[test]
    fn metric_update_reaches_the_payload() {
        let state = state_with(Fixed::new(50.0, "Moderate"));
        let (status, _) = call(
            &state,
            Method::Put,
            "/api/metrics",
            Some(r#"{"field":"sleep","value":2.5}"#),
        );
        assert_eq!(status, 200);

        let (status, body) = call(&state, Method::Post, "/api/assess", Some(r#"{"source":"sliders"}"#));
        assert_eq!(status, 200);
        assert_eq!(json(&body)["result"]["risk_level"], "Moderate");
    }

    #[test]
    fn unknown_metric_is_bad_request() {
        let state = state_with(Fixed::new(50.0, "Moderate"));
        let (status, body) = call(
            &state,
            Method::Put,
            "/api/metrics",
            Some(r#"{"field":"mood","value":2}"#),
        );
        assert_eq!(status, 400);
        assert!(json(&body)["error"].as_str().unwrap().contains("mood"));
    }

    #[test]
    fn text_assessment_uses_heuristic_profile() {
        let scorer = Arc::new(Fixed::new(88.0, "High"));
        let state = state_with(ArcScorer(Arc::clone(&scorer)));
        let long = "x".repeat(51);
        let body = serde_json::json!({ "source": "text", "text": long }).to_string();
        let (status, resp) = call(&state, Method::Post, "/api/assess", Some(&body));
        assert_eq!(status, 200);
        assert_eq!(scorer.seen.lock().unwrap()[0], MetricInput::HIGH_RISK_PROFILE);

        let v = json(&resp);
        assert_eq!(v["session"]["dashboard"]["gauge"]["label"], "High Risk");
        assert_eq!(v["session"]["dashboard"]["timeline"]["items"].as_array().unwrap().len(), 7);
    }

    struct ArcScorer(Arc<Fixed>);

    impl ScoringService for ArcScorer {
        fn assess(&self, input: &MetricInput) -> Result<AssessmentResult, AssessError> {
            self.0.assess(input)
        }

        fn endpoint(&self) -> &str {
            self.0.endpoint()
        }
    }

    #[test]
    fn failures_map_to_statuses() {
        let cases: [(fn() -> AssessError, u16); 3] = [
            (
                || AssessError::Server {
                    status: 400,
                    message: "Missing data".to_string(),
                },
                502,
            ),
            (
                || AssessError::Transport {
                    endpoint: "http://127.0.0.1:1".to_string(),
                    detail: "refused".to_string(),
                },
                503,
            ),
            (|| AssessError::MalformedResponse("eof".to_string()), 503),
        ];

        for (make, expected) in cases {
            let state = state_with(Failing(make));
            let (status, body) =
                call(&state, Method::Post, "/api/assess", Some(r#"{"source":"sliders"}"#));
            assert_eq!(status, expected);
            assert!(json(&body)["error"].is_string());

            // Trigger is re-enabled and nothing was recorded.
            let (_, session) = call(&state, Method::Get, "/api/session", None);
            let v = json(&session);
            assert_eq!(v["trigger_enabled"], true);
            assert_eq!(v["assessment_run"], false);
        }
    }

    #[test]
    fn server_error_message_is_verbatim() {
        let state = state_with(Failing(|| AssessError::Server {
            status: 400,
            message: "Missing data".to_string(),
        }));
        let (_, body) = call(&state, Method::Post, "/api/assess", Some(r#"{"source":"sliders"}"#));
        assert_eq!(json(&body)["error"], "Error from server: Missing data");
    }

    #[test]
    fn second_trigger_while_in_flight_is_busy() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let state = Arc::new(state_with(Gated {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        }));

        let first = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                call(&state, Method::Post, "/api/assess", Some(r#"{"source":"sliders"}"#)).0
            })
        };
        entered_rx.recv().unwrap();

        let (status, body) = call(&state, Method::Post, "/api/assess", Some(r#"{"source":"sliders"}"#));
        assert_eq!(status, 409);
        assert_eq!(json(&body)["error"], "an assessment is already in progress");

        let (_, session) = call(&state, Method::Get, "/api/session", None);
        assert_eq!(json(&session)["trigger_enabled"], false);

        release_tx.send(()).unwrap();
        assert_eq!(first.join().unwrap(), 200);

        let (_, session) = call(&state, Method::Get, "/api/session", None);
        assert_eq!(json(&session)["trigger_enabled"], true);
    }

    #[test]
    fn report_requires_an_assessment() {
        let state = state_with(Fixed::new(72.5, "High"));
        let (status, body) = call(&state, Method::Get, "/api/report", None);
        assert_eq!(status, 409);
        assert_eq!(
            json(&body)["error"],
            "Please run an assessment before generating a report."
        );

        call(&state, Method::Post, "/api/assess", Some(r#"{"source":"sliders"}"#));
        let resp = dispatch(&state, &Method::Get, "/api/report", None).unwrap();
        assert_eq!(resp.status_code().0, 200);
        let disposition = resp
            .headers()
            .iter()
            .find(|h| h.field.equiv("Content-Disposition"))
            .map(|h| h.value.as_str().to_string())
            .unwrap();
        assert!(disposition.contains("CLARIDIAN_Report_High_"));

        let mut text = String::new();
        resp.into_reader().read_to_string(&mut text).unwrap();
        assert!(text.contains("Risk Score: 72.5%"));
        assert!(text.contains("Risk Level: High"));
    }

    #[test]
    fn timeline_route_handles_unknown_tier() {
        let (status, body) = call(
            &state_with(Fixed::new(1.0, "Low")),
            Method::Get,
            "/api/timeline?tier=severe",
            None,
        );
        assert_eq!(status, 200);
        let v = json(&body);
        assert!(v["items"].as_array().unwrap().is_empty());
        assert_eq!(v["ticks"].as_array().unwrap().len(), 24);
    }

    #[test]
    fn unknown_route_is_404() {
        let (status, _) = call(&state_with(Fixed::new(1.0, "Low")), Method::Get, "/api/nope", None);
        assert_eq!(status, 404);
    }
}
