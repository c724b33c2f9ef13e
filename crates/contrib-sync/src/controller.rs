use std::sync::Arc;
use std::time::Duration;

use contrib_core::{
    CacheEntry, ContributionSummary, Profile, Result, SyncError, Viewport, WidgetSettings, CACHE_KEY,
};
use contrib_github::{fetch_contributions, fetch_profile, Authorizer, PROVIDER, REQUIRED_SCOPE};
use contrib_layout::{GridOptions, GridView};
use contrib_store::CacheStore;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::observer::ViewObserver;
use crate::signal::Signal;
use crate::state::machine::{is_valid_transition, Phase, ViewState};
use crate::timer::RefreshTimer;

/// Title of the error view when the load sequence fails.
pub const LOAD_ERROR_TITLE: &str = "Failed to Load Data";

pub const HOST_ERROR_TITLE: &str = "Host Not Available";
pub const HOST_ERROR_MESSAGE: &str = "host integration never became ready";

const TARGET: &str = "contrib::sync";

/// External collaborators, injected so tests can substitute fakes.
#[derive(Clone)]
pub struct Collaborators {
    pub auth: Arc<dyn Authorizer>,
    pub store: Arc<dyn CacheStore>,
    pub clock: Arc<dyn Clock>,
    pub observer: Arc<dyn ViewObserver>,
}

/// Owns the view state, the cache policy and the refresh timer.
///
/// Every operation takes `&mut self`, so a second load sequence cannot start
/// while one is in flight.
pub struct SyncController {
    deps: Collaborators,
    settings: WidgetSettings,
    viewport: Viewport,
    state: ViewState,
    grid: Option<Arc<GridView>>,
    timer: RefreshTimer,
    hidden: bool,
    projections: u64,
}

impl SyncController {
    pub fn new(deps: Collaborators, settings: WidgetSettings, viewport: Viewport) -> Self {
        let timer = RefreshTimer::from_minutes(settings.refresh_minutes());
        Self {
            deps,
            settings,
            viewport,
            state: ViewState::Connecting,
            grid: None,
            timer,
            hidden: false,
            projections: 0,
        }
    }

    // ── Accessors ──

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn grid(&self) -> Option<&Arc<GridView>> {
        self.grid.as_ref()
    }

    pub fn timer(&self) -> &RefreshTimer {
        &self.timer
    }

    /// Number of grids built so far.
    pub fn projection_count(&self) -> u64 {
        self.projections
    }

    // ── Operations ──

    /// Publish `Connecting`, check connectivity, and load if connected.
    /// Stays in `Connecting` otherwise; nothing polls.
    pub async fn start(&mut self) {
        info!(target: TARGET, "starting");
        self.deps.observer.on_state(&self.state);
        if self.check_connectivity().await {
            self.load().await;
        }
    }

    /// Run the load sequence: cache, then profile and contributions.
    pub async fn load(&mut self) {
        self.enter(ViewState::Loading);
        let year = self.settings.target_year(self.deps.clock.current_year());
        match self.load_sequence(year).await {
            Ok((profile, summary)) => self.enter_ready(profile, summary, year),
            Err(SyncError::Authorization(msg)) => {
                warn!(target: TARGET, error = %msg, "authorization lost during load");
                self.enter(ViewState::Connecting);
            }
            Err(e) => {
                warn!(target: TARGET, kind = e.kind(), error = %e, "load failed");
                self.enter(ViewState::error(LOAD_ERROR_TITLE, e.user_message()));
            }
        }
    }

    /// Re-check connectivity first; never blindly repeat the failed call.
    pub async fn retry(&mut self) {
        match self.state.phase() {
            Phase::Error | Phase::Connecting => {
                if self.check_connectivity().await {
                    self.load().await;
                } else if self.state.phase() != Phase::Connecting {
                    self.enter(ViewState::Connecting);
                }
            }
            phase => debug!(target: TARGET, %phase, "retry ignored"),
        }
    }

    /// Scheduled or externally triggered reload. Only meaningful in `Ready`.
    pub async fn refresh_tick(&mut self) {
        if self.state.is_ready() {
            info!(target: TARGET, "refresh");
            self.load().await;
        } else {
            debug!(target: TARGET, phase = %self.state.phase(), "refresh ignored");
        }
    }

    /// Apply a replacement settings snapshot.
    ///
    /// A year change reloads. Structural changes rebuild the grid from the
    /// summary already held. A new refresh interval replaces the armed timer.
    /// Cosmetic changes are only passed through.
    pub async fn reconfigure(&mut self, next: WidgetSettings) {
        let diff = self.settings.diff(&next, self.deps.clock.current_year());
        self.settings = next;
        self.timer
            .set_period(Duration::from_secs(u64::from(self.settings.refresh_minutes()) * 60));
        if diff.is_empty() {
            return;
        }
        if !self.state.is_ready() {
            debug!(target: TARGET, phase = %self.state.phase(), ?diff, "settings stored");
            return;
        }
        if diff.year_changed {
            info!(target: TARGET, "target year changed; reloading");
            self.load().await;
            return;
        }
        if diff.structural {
            self.reproject();
        } else if diff.cosmetic {
            self.pass_through();
        }
        if diff.refresh_interval && self.timer.is_armed() {
            self.arm_timer();
        }
    }

    /// Hidden disarms the refresh timer; visible re-arms it in `Ready` only if
    /// nothing is pending, so repeated visible signals keep the deadline.
    pub fn set_visibility(&mut self, hidden: bool) {
        self.hidden = hidden;
        if hidden {
            if self.timer.disarm() {
                debug!(target: TARGET, "timer disarmed (hidden)");
            }
        } else if self.state.is_ready() && !self.timer.is_armed() {
            self.arm_timer();
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.state.is_ready() {
            self.reproject();
        }
    }

    /// The timer fired.
    pub async fn on_timer(&mut self) {
        self.timer.disarm();
        self.refresh_tick().await;
    }

    /// The host integration never resolved its readiness handle.
    pub fn host_unavailable(&mut self) {
        error!(target: TARGET, "host never became ready");
        self.enter(ViewState::error(HOST_ERROR_TITLE, HOST_ERROR_MESSAGE));
    }

    pub async fn handle(&mut self, signal: Signal) {
        debug!(target: TARGET, ?signal, "signal");
        match signal {
            Signal::Retry => self.retry().await,
            Signal::Reconfigure(settings) => self.reconfigure(*settings).await,
            Signal::Visibility { hidden } => self.set_visibility(hidden),
            Signal::Resize(viewport) => self.resize(viewport),
            Signal::RefreshTick => self.refresh_tick().await,
            Signal::Shutdown => {}
        }
    }

    // ── Internals ──

    async fn check_connectivity(&self) -> bool {
        match self.deps.auth.is_connected(PROVIDER).await {
            Ok(true) => {}
            Ok(false) => {
                info!(target: TARGET, "not connected; waiting for retry");
                return false;
            }
            Err(e) => {
                warn!(target: TARGET, error = %e, "connectivity check failed");
                return false;
            }
        }
        match self.deps.auth.has_scope(PROVIDER, REQUIRED_SCOPE).await {
            Ok(true) => true,
            Ok(false) => {
                info!(target: TARGET, scope = REQUIRED_SCOPE, "missing grant; waiting for retry");
                false
            }
            Err(e) => {
                warn!(target: TARGET, error = %e, "scope check failed");
                false
            }
        }
    }

    async fn load_sequence(&self, year: i32) -> Result<(Profile, Arc<ContributionSummary>)> {
        let now = self.deps.clock.now_ms();
        if let Some(entry) = self.read_cache().await {
            if entry.is_fresh(year, now, self.settings.refresh_window_ms()) {
                info!(target: TARGET, year, age_ms = now - entry.fetched_at_ms, "cache hit");
                return Ok((entry.profile, Arc::new(entry.summary)));
            }
            debug!(target: TARGET, cached_year = entry.year, year, "cache stale");
        }

        let auth = self.deps.auth.as_ref();
        let profile = fetch_profile(auth).await?;
        let summary = fetch_contributions(auth, &profile.login, year).await?;
        info!(target: TARGET, login = %profile.login, year, "fetched");

        let entry = CacheEntry {
            profile,
            summary,
            year,
            fetched_at_ms: self.deps.clock.now_ms(),
        };
        self.write_cache(&entry).await;
        Ok((entry.profile, Arc::new(entry.summary)))
    }

    /// Storage failures read as a miss.
    async fn read_cache(&self) -> Option<CacheEntry> {
        match self.deps.store.get(CACHE_KEY).await {
            Ok(entry) => entry,
            Err(e) => {
                let e = SyncError::from(e);
                warn!(target: TARGET, error = %e, "cache read failed; fetching live");
                None
            }
        }
    }

    async fn write_cache(&self, entry: &CacheEntry) {
        if let Err(e) = self.deps.store.set(CACHE_KEY, entry).await {
            let e = SyncError::from(e);
            warn!(target: TARGET, error = %e, "cache write failed");
        }
    }

    fn enter(&mut self, next: ViewState) {
        let (from, to) = (self.state.phase(), next.phase());
        if !is_valid_transition(from, to) {
            error!(target: TARGET, %from, %to, "invalid transition ignored");
            return;
        }
        if to != Phase::Ready && self.timer.disarm() {
            debug!(target: TARGET, "timer disarmed");
        }
        info!(target: TARGET, %from, %to, "state");
        self.state = next;
        self.deps.observer.on_state(&self.state);
    }

    fn enter_ready(&mut self, profile: Profile, summary: Arc<ContributionSummary>, year: i32) {
        self.enter(ViewState::Ready {
            profile,
            summary,
            year,
        });
        self.reproject();
        if !self.hidden {
            self.arm_timer();
        }
    }

    fn arm_timer(&mut self) {
        self.timer.arm(Instant::now());
        debug!(target: TARGET, period_s = self.timer.period().as_secs(), "timer armed");
    }

    /// Rebuild the grid from the summary already held. No network.
    fn reproject(&mut self) {
        let Some(summary) = self.state.summary() else {
            return;
        };
        let grid = GridView::build(
            &summary.calendar,
            GridOptions::from(&self.settings),
            self.viewport,
            self.deps.clock.today(),
        );
        let grid = Arc::new(grid);
        self.projections += 1;
        debug!(
            target: TARGET,
            weeks = grid.weeks.len(),
            observed_max = grid.observed_max,
            "grid rebuilt"
        );
        self.deps.observer.on_render(&grid, &self.settings);
        self.grid = Some(grid);
    }

    fn pass_through(&self) {
        if let Some(grid) = &self.grid {
            self.deps.observer.on_render(grid, &self.settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::observer::CollectObserver;
    use contrib_github::{ApiResponse, MockAuthorizer};
    use contrib_store::MemoryStore;
    use time::macros::date;

    fn harness(auth: MockAuthorizer) -> (SyncController, Arc<MockAuthorizer>, Arc<CollectObserver>) {
        let auth = Arc::new(auth);
        let observer = Arc::new(CollectObserver::new());
        let deps = Collaborators {
            auth: auth.clone(),
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(ManualClock::on(date!(2024 - 05 - 01))),
            observer: observer.clone(),
        };
        let ctl = SyncController::new(deps, WidgetSettings::default(), Viewport::new(800.0, 200.0));
        (ctl, auth, observer)
    }

    #[tokio::test]
    async fn disconnected_start_stays_connecting() {
        let (mut ctl, auth, obs) = harness(MockAuthorizer::disconnected());
        ctl.start().await;
        assert_eq!(ctl.state(), &ViewState::Connecting);
        assert_eq!(obs.phases(), vec![Phase::Connecting]);
        assert_eq!(auth.request_count(), 0);
        assert!(!ctl.timer().is_armed());
    }

    #[tokio::test]
    async fn missing_scope_stays_connecting() {
        let auth = MockAuthorizer::connected();
        auth.set_scope_granted(false);
        let (mut ctl, auth, _) = harness(auth);
        ctl.start().await;
        assert_eq!(ctl.state().phase(), Phase::Connecting);
        assert_eq!(auth.request_count(), 0);
    }

    #[tokio::test]
    async fn failing_connectivity_check_stays_connecting() {
        let auth = MockAuthorizer::connected();
        auth.set_connectivity_fails(true);
        let (mut ctl, _, _) = harness(auth);
        ctl.start().await;
        assert_eq!(ctl.state().phase(), Phase::Connecting);
    }

    #[tokio::test]
    async fn transport_failure_shows_error_with_title() {
        let auth = MockAuthorizer::connected();
        auth.push_response("/user", ApiResponse::status(401));
        let (mut ctl, _, obs) = harness(auth);
        ctl.start().await;
        assert_eq!(
            ctl.state(),
            &ViewState::error(LOAD_ERROR_TITLE, "GitHub API error: 401")
        );
        assert_eq!(obs.phases(), vec![Phase::Connecting, Phase::Loading, Phase::Error]);
        assert!(!ctl.timer().is_armed());
    }

    #[tokio::test]
    async fn refresh_tick_outside_ready_is_ignored() {
        let (mut ctl, auth, obs) = harness(MockAuthorizer::disconnected());
        ctl.start().await;
        ctl.refresh_tick().await;
        assert_eq!(obs.phases(), vec![Phase::Connecting]);
        assert_eq!(auth.request_count(), 0);
    }

    #[tokio::test]
    async fn settings_outside_ready_are_stored_only() {
        let (mut ctl, auth, _) = harness(MockAuthorizer::disconnected());
        ctl.start().await;
        let next = WidgetSettings {
            refresh_interval: 5,
            ..WidgetSettings::default()
        };
        ctl.reconfigure(next).await;
        assert_eq!(ctl.settings().refresh_minutes(), 5);
        assert_eq!(ctl.timer().period(), Duration::from_secs(300));
        assert_eq!(auth.request_count(), 0);
    }

    #[tokio::test]
    async fn host_unavailable_is_an_error() {
        let (mut ctl, _, _) = harness(MockAuthorizer::connected());
        ctl.host_unavailable();
        assert_eq!(
            ctl.state(),
            &ViewState::error(HOST_ERROR_TITLE, HOST_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn auth_error_during_load_routes_to_connecting() {
        struct Revoked;
        #[async_trait::async_trait]
        impl Authorizer for Revoked {
            async fn is_connected(&self, _: &str) -> Result<bool> {
                Ok(true)
            }
            async fn request(&self, _: &str, _: &str, _: contrib_github::ApiRequest) -> Result<ApiResponse> {
                Err(SyncError::Authorization("token revoked".into()))
            }
        }
        let observer = Arc::new(CollectObserver::new());
        let deps = Collaborators {
            auth: Arc::new(Revoked),
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(ManualClock::on(date!(2024 - 05 - 01))),
            observer: observer.clone(),
        };
        let mut ctl = SyncController::new(deps, WidgetSettings::default(), Viewport::default());
        ctl.start().await;
        assert_eq!(
            observer.phases(),
            vec![Phase::Connecting, Phase::Loading, Phase::Connecting]
        );
    }
}
