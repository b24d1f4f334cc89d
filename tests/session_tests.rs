//! Session and assessment-flow tests.
//!
//! Drives a `Session` through the public API with in-memory scoring
//! services: payload resolution, failure handling, the in-flight guard and
//! report gating. Tests against a real HTTP endpoint are in
//! `client_tests.rs`.

use std::sync::Mutex;

use chrono::{FixedOffset, TimeZone};
use claridian::assessment::{
    AssessError, AssessmentRequest, AssessmentResult, MetricField, MetricInput, ScoringService,
};
use claridian::navigator::Panel;
use claridian::report::{self, ReportError};
use claridian::risk::RiskTier;
use claridian::session::{self, Session};

struct Recording {
    result: AssessmentResult,
    seen: Mutex<Vec<MetricInput>>,
}

impl Recording {
    fn new(score: f64, level: &str) -> Self {
        Self {
            result: AssessmentResult {
                risk_score: score,
                risk_level: level.to_string(),
                triggered_rules: vec!["Sleep disturbance detected".to_string()],
                interpretation_text: Some("summary".to_string()),
            },
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<MetricInput> {
        self.seen.lock().unwrap().clone()
    }
}

impl ScoringService for Recording {
    fn assess(&self, input: &MetricInput) -> Result<AssessmentResult, AssessError> {
        self.seen.lock().unwrap().push(*input);
        Ok(self.result.clone())
    }

    fn endpoint(&self) -> &str {
        "memory"
    }
}

struct Refusing;

impl ScoringService for Refusing {
    fn assess(&self, _input: &MetricInput) -> Result<AssessmentResult, AssessError> {
        Err(AssessError::Transport {
            endpoint: "http://127.0.0.1:1".to_string(),
            detail: "connection refused".to_string(),
        })
    }

    fn endpoint(&self) -> &str {
        "http://127.0.0.1:1"
    }
}

// ---------------------------------------------------------------------------
// Payload resolution
// ---------------------------------------------------------------------------

#[test]
fn slider_values_are_sent_as_set() {
    let service = Recording::new(40.0, "Moderate");
    let mut session = Session::new();
    session.set_metric(MetricField::Sleep, 1.5).unwrap();
    session.set_metric(MetricField::Functioning, 9.0).unwrap();
    session
        .run_assessment(&AssessmentRequest::Sliders, &service)
        .unwrap();

    let sent = service.seen()[0];
    assert_eq!(sent.sleep, 1.5);
    assert_eq!(sent.functioning, 9.0);
    assert_eq!(sent.suspiciousness, 5.0);
}

#[test]
fn slider_values_are_clamped() {
    let mut session = Session::new();
    session.set_metric(MetricField::Attention, 14.0).unwrap();
    session.set_metric(MetricField::Coherence, -3.0).unwrap();
    assert_eq!(session.metrics().attention, 10.0);
    assert_eq!(session.metrics().coherence, 0.0);
}

#[test]
fn nan_slider_is_refused_and_payload_stays_numeric() {
    let service = Recording::new(40.0, "Moderate");
    let mut session = Session::new();
    assert!(session.set_metric(MetricField::Sleep, f64::NAN).is_err());
    session
        .run_assessment(&AssessmentRequest::Sliders, &service)
        .unwrap();

    let sent = service.seen()[0];
    assert_eq!(sent, MetricInput::default());
    let body = serde_json::to_string(&sent).unwrap();
    assert!(!body.contains("null"), "{body}");
}

#[test]
fn text_heuristic_threshold() {
    let service = Recording::new(80.0, "High");
    let mut session = Session::new();

    let long = "a".repeat(51);
    let short = "a".repeat(50);
    session
        .run_assessment(&AssessmentRequest::Text(long), &service)
        .unwrap();
    session
        .run_assessment(&AssessmentRequest::Text(short), &service)
        .unwrap();

    let seen = service.seen();
    assert_eq!(seen[0], MetricInput::HIGH_RISK_PROFILE);
    assert_eq!(seen[1], MetricInput::LOW_RISK_PROFILE);
}

#[test]
fn text_request_ignores_sliders() {
    let service = Recording::new(10.0, "Low");
    let mut session = Session::new();
    session.set_metric(MetricField::Sleep, 0.0).unwrap();
    session
        .run_assessment(&AssessmentRequest::Text(String::new()), &service)
        .unwrap();
    assert_eq!(service.seen()[0], MetricInput::LOW_RISK_PROFILE);
    assert_eq!(session.metrics().sleep, 0.0);
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[test]
fn success_updates_dashboard() {
    let service = Recording::new(72.0, "High");
    let mut session = Session::new();
    session
        .run_assessment(&AssessmentRequest::Sliders, &service)
        .unwrap();

    let view = session.view();
    assert!(view.assessment_run);
    assert!(view.trigger_enabled);
    assert_eq!(view.dashboard.tier, Some(RiskTier::High));
    assert_eq!(view.dashboard.gauge.value, 72.0);
    assert_eq!(view.dashboard.triggered_rules.len(), 1);
    assert_eq!(view.dashboard.timeline.items.len(), 7);
}

#[test]
fn failure_keeps_previous_result() {
    let mut session = Session::new();
    session
        .run_assessment(&AssessmentRequest::Sliders, &Recording::new(20.0, "Low"))
        .unwrap();

    let err = session
        .run_assessment(&AssessmentRequest::Sliders, &Refusing)
        .unwrap_err();
    assert!(matches!(err, AssessError::Transport { .. }));
    assert!(err.to_string().contains("Ensure it is running"));

    assert!(session.trigger_enabled());
    assert_eq!(session.last_result().unwrap().risk_score, 20.0);
    assert_eq!(session.dashboard().gauge.label, "Low Risk");
}

#[test]
fn failure_before_any_success_keeps_idle_dashboard() {
    let mut session = Session::new();
    let _ = session.run_assessment(&AssessmentRequest::Sliders, &Refusing);
    assert!(!session.has_assessment());
    assert_eq!(session.dashboard().gauge.label, "Awaiting Input");
}

// ---------------------------------------------------------------------------
// In-flight guard
// ---------------------------------------------------------------------------

#[test]
fn second_trigger_is_busy_and_sends_nothing() {
    let service = Recording::new(50.0, "Moderate");
    let mut session = Session::new();

    let pending = session.begin_assessment(&AssessmentRequest::Sliders).unwrap();
    assert!(!session.trigger_enabled());

    let err = session
        .begin_assessment(&AssessmentRequest::Text("again".to_string()))
        .unwrap_err();
    assert!(matches!(err, AssessError::Busy));

    let outcome = service.assess(&pending.input);
    session.finish_assessment(pending, outcome).unwrap();
    assert!(session.trigger_enabled());
    assert_eq!(service.seen().len(), 1);
}

/// Service that tries to trigger again on the same shared session while its
/// own request is in flight.
struct Reentrant<'a> {
    session: &'a Mutex<Session>,
    inner_was_busy: Mutex<Option<bool>>,
}

impl ScoringService for Reentrant<'_> {
    fn assess(&self, _input: &MetricInput) -> Result<AssessmentResult, AssessError> {
        let busy = Recording::new(0.0, "Low");
        let inner = session::run_shared(self.session, &AssessmentRequest::Sliders, &busy);
        *self.inner_was_busy.lock().unwrap() = Some(matches!(inner, Err(AssessError::Busy)));
        assert!(busy.seen().is_empty());
        Err(AssessError::MalformedResponse("truncated".to_string()))
    }

    fn endpoint(&self) -> &str {
        "reentrant"
    }
}

#[test]
fn shared_session_rejects_overlap_and_recovers() {
    let shared = Mutex::new(Session::new());
    let service = Reentrant {
        session: &shared,
        inner_was_busy: Mutex::new(None),
    };

    let err = session::run_shared(&shared, &AssessmentRequest::Sliders, &service).unwrap_err();
    assert!(matches!(err, AssessError::MalformedResponse(_)));
    assert_eq!(*service.inner_was_busy.lock().unwrap(), Some(true));
    assert!(session::lock(&shared).trigger_enabled());
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn panel_navigation_saturates() {
    let mut session = Session::new();
    assert_eq!(session.navigator().panel(), Panel::Core);
    assert!(!session.prev_panel());
    assert!(session.next_panel());
    assert!(!session.next_panel());
    assert_eq!(session.navigator().panel(), Panel::Extended);
    assert_eq!(session.view().navigator.title, "Extended Metrics (2/2)");
}

// ---------------------------------------------------------------------------
// Report gating
// ---------------------------------------------------------------------------

#[test]
fn report_gated_on_success() {
    let now = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 9, 9, 30, 0)
        .unwrap();
    let mut session = Session::new();

    assert!(matches!(
        report::generate_report(&session, &now),
        Err(ReportError::NoAssessment)
    ));

    let _ = session.run_assessment(&AssessmentRequest::Sliders, &Refusing);
    assert!(report::generate_report(&session, &now).is_err());

    session
        .run_assessment(&AssessmentRequest::Sliders, &Recording::new(33.3, "Low"))
        .unwrap();
    let report = report::generate_report(&session, &now).unwrap();
    assert_eq!(report.file_name, "CLARIDIAN_Report_Low_2026-03-09.txt");
    assert!(report.content.contains("Date: 03/09/2026 - 09:30 AM"));
    assert!(report.content.contains("Risk Score: 33.3%"));
    assert!(report.content.contains("Risk Level: Low"));
}
