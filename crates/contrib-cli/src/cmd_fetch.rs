use std::path::Path;
use std::sync::Arc;

use contrib_core::{Viewport, WidgetSettings, YearSetting};
use contrib_github::{HttpAuthorizer, REQUIRED_SCOPE};
use contrib_layout::stats_row;
use contrib_store::FileStore;
use contrib_sync::{Collaborators, SyncController, SystemClock, ViewObserver, ViewState};

use crate::settings_file;

/// Where to reach GitHub and with which token.
pub struct ApiOptions {
    pub token: Option<String>,
    pub api_url: String,
}

/// Shared wiring for every command that runs the controller.
pub fn collaborators(api: &ApiOptions, observer: Arc<dyn ViewObserver>) -> Collaborators {
    Collaborators {
        auth: Arc::new(HttpAuthorizer::new(api.api_url.clone(), api.token.clone())),
        store: Arc::new(FileStore::new(FileStore::default_root())),
        clock: Arc::new(SystemClock),
        observer,
    }
}

pub fn not_connected_message() -> String {
    format!("not connected: set GITHUB_TOKEN (needs {REQUIRED_SCOPE}) or pass --token")
}

/// Prints phase changes to stderr.
struct PhaseObserver;

impl ViewObserver for PhaseObserver {
    fn on_state(&self, state: &ViewState) {
        eprintln!("[contrib-graph] {}", state.phase());
    }
}

/// `contrib-graph fetch`
pub fn execute(config: &Path, api: &ApiOptions, year: Option<i32>, json: bool) -> anyhow::Result<()> {
    let mut settings: WidgetSettings = settings_file::load(config)?;
    if let Some(year) = year {
        settings.year = YearSetting::Fixed(year);
    }

    let deps = collaborators(api, Arc::new(PhaseObserver));
    let mut ctl = SyncController::new(deps, settings, Viewport::default());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(ctl.start());

    match ctl.state() {
        ViewState::Ready {
            profile,
            summary,
            year,
        } => {
            if json {
                let out = serde_json::json!({
                    "profile": profile,
                    "year": year,
                    "summary": summary.as_ref(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{} · {}", profile.login, year);
                for (label, value) in stats_row(summary) {
                    println!("  {label:<8} {value}");
                }
            }
            Ok(())
        }
        ViewState::Connecting => anyhow::bail!(not_connected_message()),
        ViewState::Error { title, message } => anyhow::bail!("{title}: {message}"),
        ViewState::Loading => anyhow::bail!("load did not settle"),
    }
}
