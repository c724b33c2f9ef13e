//! The controller that decides what data the widget shows.
//!
//! [`SyncController`] owns the [`ViewState`], consults the cache, runs the
//! two-call fetch and schedules refreshes. [`run`] drives it from a queue of
//! [`Signal`]s so that at most one load sequence is ever in flight.

pub mod clock;
pub mod controller;
pub mod observer;
pub mod runner;
pub mod signal;
pub mod state;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{
    Collaborators, SyncController, HOST_ERROR_MESSAGE, HOST_ERROR_TITLE, LOAD_ERROR_TITLE,
};
pub use observer::{CollectObserver, ViewFrame, ViewObserver, WatchObserver};
pub use runner::run;
pub use signal::{host_ready, HostReady, ReadyHandle, Signal};
pub use state::machine::{Phase, ViewState};
pub use timer::RefreshTimer;
