use std::fmt;
use std::sync::Arc;

use contrib_core::{ContributionSummary, Profile};

// ── View state ──

/// What the widget is showing. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Connecting,
    Loading,
    Ready {
        profile: Profile,
        summary: Arc<ContributionSummary>,
        year: i32,
    },
    Error {
        title: String,
        message: String,
    },
}

/// Discriminant of [`ViewState`], used for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Connecting,
    Loading,
    Ready,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Connecting => "connecting",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Error => "error",
        };
        f.write_str(s)
    }
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Connecting => Phase::Connecting,
            ViewState::Loading => Phase::Loading,
            ViewState::Ready { .. } => Phase::Ready,
            ViewState::Error { .. } => Phase::Error,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready { .. })
    }

    pub fn summary(&self) -> Option<&Arc<ContributionSummary>> {
        match self {
            ViewState::Ready { summary, .. } => Some(summary),
            _ => None,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        ViewState::Error {
            title: title.into(),
            message: message.into(),
        }
    }
}

// ── Valid transitions ──

const VALID_TRANSITIONS: &[(Phase, &[Phase])] = &[
    // Host never became ready.
    (Phase::Connecting, &[Phase::Loading, Phase::Error]),
    // Authorization failures mid-load fall back to Connecting.
    (Phase::Loading, &[Phase::Ready, Phase::Error, Phase::Connecting]),
    (Phase::Ready, &[Phase::Loading]), // refresh or reconfigure
    (Phase::Error, &[Phase::Loading, Phase::Connecting]), // retry
];

pub fn is_valid_transition(from: Phase, to: Phase) -> bool {
    VALID_TRANSITIONS
        .iter()
        .any(|(f, targets)| *f == from && targets.contains(&to))
}
