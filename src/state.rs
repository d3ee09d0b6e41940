use serde::Serialize;

use crate::models::PlantReport;

pub const PROGRESS_TICK_MS: u64 = 400;
pub const PROGRESS_STEP: u8 = 7;
/// The ticker is cosmetic; only a settled cycle may show 100.
pub const PROGRESS_CEILING: u8 = 93;
pub const RESULT_HOLD_MS: u64 = 400;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Previewing,
    Analyzing { progress: u8 },
    Result { report: PlantReport },
    Error { message: String },
}

/// What the page polls. The notice is a dismissible popup independent of
/// the phase: closing it never moves the machine.
#[derive(Debug, Clone, Serialize)]
pub struct UiSession {
    #[serde(flatten)]
    pub phase: Phase,
    pub notice: Option<String>,
}

impl UiSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            notice: None,
        }
    }

    /// A candidate passed intake; any earlier error message is cleared.
    pub fn preview(&mut self) {
        self.phase = Phase::Previewing;
        self.notice = None;
    }

    /// Intake rejected the selection: no candidate survives, only the
    /// message does.
    pub fn reject_candidate(&mut self, message: String) {
        self.phase = Phase::Idle;
        self.notice = Some(message);
    }

    /// Returns false while a cycle is already in flight.
    pub fn begin_analysis(&mut self) -> bool {
        if matches!(self.phase, Phase::Analyzing { .. }) {
            return false;
        }
        self.phase = Phase::Analyzing { progress: 0 };
        self.notice = None;
        true
    }

    /// Advance the cosmetic progress value, capped below completion.
    pub fn tick_progress(&mut self) {
        if let Phase::Analyzing { progress } = &mut self.phase {
            *progress = progress.saturating_add(PROGRESS_STEP).min(PROGRESS_CEILING);
        }
    }

    pub fn set_progress(&mut self, value: u8) {
        if let Phase::Analyzing { .. } = self.phase {
            self.phase = Phase::Analyzing { progress: value };
        }
    }

    pub fn finish(&mut self, report: PlantReport) {
        self.phase = Phase::Result { report };
    }

    pub fn fail(&mut self, message: String) {
        self.phase = Phase::Error {
            message: message.clone(),
        };
        self.notice = Some(message);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// "Analyze another": back to a blank slate.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for UiSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> PlantReport {
        serde_json::from_str(r#"{"name": "Rose"}"#).unwrap()
    }

    #[test]
    fn ticker_never_reaches_completion_on_its_own() {
        let mut session = UiSession::new();
        assert!(session.begin_analysis());
        for _ in 0..1000 {
            session.tick_progress();
        }
        match session.phase {
            Phase::Analyzing { progress } => {
                assert_eq!(progress, PROGRESS_CEILING);
                assert!(progress < 100);
            }
            other => panic!("expected Analyzing, got {other:?}"),
        }
    }

    #[test]
    fn second_cycle_is_refused_while_one_is_in_flight() {
        let mut session = UiSession::new();
        assert!(session.begin_analysis());
        assert!(!session.begin_analysis());
    }

    #[test]
    fn beginning_a_cycle_clears_the_notice() {
        let mut session = UiSession::new();
        session.reject_candidate("unsupported file type".to_string());
        session.preview();
        assert!(session.notice.is_none());
        assert!(matches!(session.phase, Phase::Previewing));
    }

    #[test]
    fn failure_sets_error_phase_and_notice() {
        let mut session = UiSession::new();
        session.begin_analysis();
        session.fail("analysis request failed".to_string());
        assert!(matches!(session.phase, Phase::Error { .. }));
        assert_eq!(session.notice.as_deref(), Some("analysis request failed"));
    }

    #[test]
    fn dismissing_the_notice_keeps_the_phase() {
        let mut session = UiSession::new();
        session.begin_analysis();
        session.fail("boom".to_string());
        session.dismiss_notice();
        assert!(session.notice.is_none());
        assert!(matches!(session.phase, Phase::Error { .. }));
    }

    #[test]
    fn success_path_ends_in_result() {
        let mut session = UiSession::new();
        session.preview();
        assert!(session.begin_analysis());
        session.set_progress(100);
        session.finish(report());
        assert!(matches!(session.phase, Phase::Result { .. }));
    }

    #[test]
    fn ticks_after_settling_are_ignored() {
        let mut session = UiSession::new();
        session.begin_analysis();
        session.finish(report());
        session.tick_progress();
        assert!(matches!(session.phase, Phase::Result { .. }));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = UiSession::new();
        session.begin_analysis();
        session.fail("boom".to_string());
        session.reset();
        assert!(matches!(session.phase, Phase::Idle));
        assert!(session.notice.is_none());
    }

    #[test]
    fn status_serializes_with_a_phase_tag() {
        let mut session = UiSession::new();
        session.begin_analysis();
        session.tick_progress();
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["phase"], "analyzing");
        assert_eq!(json["progress"], u64::from(PROGRESS_STEP));
    }
}
