use std::sync::{Arc, Mutex};

use contrib_core::WidgetSettings;
use contrib_layout::GridView;
use tokio::sync::watch;

use crate::state::machine::{Phase, ViewState};

/// Receives what the controller publishes. Presentation layers implement
/// this; they only ever read.
pub trait ViewObserver: Send + Sync {
    fn on_state(&self, state: &ViewState);

    /// A grid was (re)built, or cosmetic settings changed around an existing one.
    fn on_render(&self, _grid: &Arc<GridView>, _settings: &WidgetSettings) {}
}

/// Collects everything in memory (for testing).
#[derive(Default)]
pub struct CollectObserver {
    states: Mutex<Vec<ViewState>>,
    renders: Mutex<Vec<(Arc<GridView>, WidgetSettings)>>,
}

impl CollectObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<ViewState> {
        self.states.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.states().iter().map(ViewState::phase).collect()
    }

    pub fn renders(&self) -> Vec<(Arc<GridView>, WidgetSettings)> {
        self.renders.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_grid(&self) -> Option<Arc<GridView>> {
        self.renders().last().map(|(g, _)| Arc::clone(g))
    }

    pub fn clear(&self) {
        self.states.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.renders.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl ViewObserver for CollectObserver {
    fn on_state(&self, state: &ViewState) {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(state.clone());
    }

    fn on_render(&self, grid: &Arc<GridView>, settings: &WidgetSettings) {
        self.renders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((Arc::clone(grid), settings.clone()));
    }
}

/// Latest state plus the last grid built, as one value.
///
/// The grid survives a refresh so a renderer can keep showing the previous
/// data while the state is `Loading`.
#[derive(Debug, Clone, Default)]
pub struct ViewFrame {
    pub state: ViewState,
    pub grid: Option<Arc<GridView>>,
    pub settings: WidgetSettings,
}

/// Publishes into a `watch` channel for a renderer on another task.
pub struct WatchObserver {
    tx: watch::Sender<ViewFrame>,
}

impl WatchObserver {
    pub fn channel(settings: WidgetSettings) -> (Self, watch::Receiver<ViewFrame>) {
        let (tx, rx) = watch::channel(ViewFrame {
            settings,
            ..ViewFrame::default()
        });
        (Self { tx }, rx)
    }
}

impl ViewObserver for WatchObserver {
    fn on_state(&self, state: &ViewState) {
        self.tx.send_modify(|frame| frame.state = state.clone());
    }

    fn on_render(&self, grid: &Arc<GridView>, settings: &WidgetSettings) {
        self.tx.send_modify(|frame| {
            frame.grid = Some(Arc::clone(grid));
            frame.settings = settings.clone();
        });
    }
}
