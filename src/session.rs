//! Per-user dashboard session.
//!
//! Holds every piece of mutable dashboard state in one place: the panel
//! navigator, the active input method, slider values, the last successful
//! result, and the in-flight guard. Handlers take the session explicitly
//! instead of reaching for globals.
//!
//! # Overlapping triggers
//!
//! Only one assessment may be in flight per session. [`Session::begin_assessment`]
//! fails with [`AssessError::Busy`] while another is pending, and
//! [`Session::finish_assessment`] always re-enables the trigger, whatever the
//! outcome. [`run_shared`] splits the two around the outbound request so a
//! `Mutex<Session>` is never held while waiting on the network. Outcome
//! log lines are written by [`Session::run_assessment`] and [`run_shared`]
//! once the state update is done, never while the lock is held.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analytics::logger;
use crate::assessment::metrics::{NonFiniteMetric, SLIDER_MAX, SLIDER_MIN, SliderView};
use crate::assessment::{
    AssessError, AssessmentRequest, AssessmentResult, InputSource, MetricField, MetricInput,
    ScoringService,
};
use crate::dashboard::DashboardView;
use crate::navigator::{Navigator, NavigatorView};

/// Which input area is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    #[default]
    Slider,
    Text,
}

/// Token handed out by [`Session::begin_assessment`].
#[derive(Debug)]
pub struct PendingAssessment {
    pub source: InputSource,
    pub input: MetricInput,
    started: Instant,
}

/// Serializable snapshot of the whole session for the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub navigator: NavigatorView,
    pub method: InputMethod,
    pub sliders: Vec<SliderView>,
    pub trigger_enabled: bool,
    pub assessment_run: bool,
    pub dashboard: DashboardView,
}

#[derive(Debug, Default)]
pub struct Session {
    navigator: Navigator,
    method: InputMethod,
    metrics: MetricInput,
    last_result: Option<AssessmentResult>,
    dashboard: Option<DashboardView>,
    in_flight: bool,
    log_outcomes: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that appends every assessment outcome to the operational log.
    pub fn with_logging(enabled: bool) -> Self {
        Self {
            log_outcomes: enabled,
            ..Self::default()
        }
    }

    // -- Input side --

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn next_panel(&mut self) -> bool {
        self.navigator.next()
    }

    pub fn prev_panel(&mut self) -> bool {
        self.navigator.prev()
    }

    pub fn method(&self) -> InputMethod {
        self.method
    }

    pub fn set_method(&mut self, method: InputMethod) {
        self.method = method;
    }

    pub fn metrics(&self) -> &MetricInput {
        &self.metrics
    }

    /// Move one slider. Values are clamped to the slider range, as a range
    /// input would; NaN and infinities are refused and leave the slider as is.
    pub fn set_metric(
        &mut self,
        field: MetricField,
        value: f64,
    ) -> Result<SliderView, NonFiniteMetric> {
        if !value.is_finite() {
            return Err(NonFiniteMetric { field, value });
        }
        let value = value.clamp(SLIDER_MIN, SLIDER_MAX);
        self.metrics.set(field, value);
        Ok(SliderView::new(field, value))
    }

    pub fn sliders(&self) -> Vec<SliderView> {
        MetricField::ALL
            .into_iter()
            .map(|f| SliderView::new(f, self.metrics.get(f)))
            .collect()
    }

    // -- Assessment lifecycle --

    /// Whether the assess controls are enabled (nothing in flight).
    pub fn trigger_enabled(&self) -> bool {
        !self.in_flight
    }

    /// Whether at least one assessment has succeeded in this session.
    pub fn has_assessment(&self) -> bool {
        self.last_result.is_some()
    }

    pub fn last_result(&self) -> Option<&AssessmentResult> {
        self.last_result.as_ref()
    }

    /// Claim the trigger and resolve the payload for `request`.
    pub fn begin_assessment(
        &mut self,
        request: &AssessmentRequest,
    ) -> Result<PendingAssessment, AssessError> {
        if self.in_flight {
            return Err(AssessError::Busy);
        }
        self.in_flight = true;
        Ok(PendingAssessment {
            source: request.source(),
            input: request.resolve(&self.metrics),
            started: Instant::now(),
        })
    }

    /// Release the trigger and apply the outcome.
    ///
    /// Failures leave the previous result and dashboard untouched.
    pub fn finish_assessment(
        &mut self,
        _pending: PendingAssessment,
        outcome: Result<AssessmentResult, AssessError>,
    ) -> Result<AssessmentResult, AssessError> {
        self.in_flight = false;

        let result = outcome?;
        self.dashboard = Some(DashboardView::from_result(&result));
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Run one assessment start to finish on an exclusively borrowed session.
    pub fn run_assessment(
        &mut self,
        request: &AssessmentRequest,
        service: &dyn ScoringService,
    ) -> Result<AssessmentResult, AssessError> {
        let log = self.log_outcomes;
        let pending = match self.begin_assessment(request) {
            Ok(pending) => pending,
            Err(err) => {
                let rejected = Err(err);
                if log {
                    write_log(request.source(), None, &rejected);
                }
                return rejected;
            }
        };
        let outcome = service.assess(&pending.input);
        let (source, started) = (pending.source, pending.started);
        let result = self.finish_assessment(pending, outcome);
        if log {
            write_log(source, Some(elapsed_ms(started)), &result);
        }
        result
    }

    // -- Output side --

    pub fn dashboard(&self) -> DashboardView {
        self.dashboard
            .clone()
            .unwrap_or_else(DashboardView::initial)
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            navigator: self.navigator.view(),
            method: self.method,
            sliders: self.sliders(),
            trigger_enabled: self.trigger_enabled(),
            assessment_run: self.has_assessment(),
            dashboard: self.dashboard(),
        }
    }
}

/// Lock a shared session, recovering the state if a holder panicked.
pub fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run one assessment on a shared session without holding the lock across
/// the outbound request. The outcome is logged after the lock is released.
pub fn run_shared(
    session: &Mutex<Session>,
    request: &AssessmentRequest,
    service: &dyn ScoringService,
) -> Result<AssessmentResult, AssessError> {
    run_shared_with(session, request, service, write_log)
}

/// [`run_shared`] with the log writer supplied by the caller.
///
/// `record` gets the latency in milliseconds, or `None` for a rejected
/// trigger, and is only called when the session has logging enabled.
pub(crate) fn run_shared_with(
    session: &Mutex<Session>,
    request: &AssessmentRequest,
    service: &dyn ScoringService,
    record: impl FnOnce(InputSource, Option<u64>, &Result<AssessmentResult, AssessError>),
) -> Result<AssessmentResult, AssessError> {
    let (begun, log) = {
        let mut guard = lock(session);
        (guard.begin_assessment(request), guard.log_outcomes)
    };
    let pending = match begun {
        Ok(pending) => pending,
        Err(err) => {
            let rejected = Err(err);
            if log {
                record(request.source(), None, &rejected);
            }
            return rejected;
        }
    };

    let outcome = service.assess(&pending.input);
    let (source, started) = (pending.source, pending.started);
    let result = lock(session).finish_assessment(pending, outcome);
    if log {
        record(source, Some(elapsed_ms(started)), &result);
    }
    result
}

fn write_log(
    source: InputSource,
    latency_ms: Option<u64>,
    outcome: &Result<AssessmentResult, AssessError>,
) {
    match latency_ms {
        Some(ms) => logger::log_outcome(source, outcome, ms),
        None => logger::log_rejected(source),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
