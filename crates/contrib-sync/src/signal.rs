use contrib_core::{Viewport, WidgetSettings};
use tokio::sync::oneshot;

/// Inbound events, handled strictly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Re-check connectivity, then reload.
    Retry,
    /// Full replacement settings snapshot.
    Reconfigure(Box<WidgetSettings>),
    Visibility { hidden: bool },
    Resize(Viewport),
    /// Reload now, as if the refresh timer fired.
    RefreshTick,
    Shutdown,
}

/// Resolved by the host integration once it can serve requests.
pub struct ReadyHandle(oneshot::Sender<()>);

impl ReadyHandle {
    pub fn resolve(self) {
        // Nobody waiting is not an error.
        let _ = self.0.send(());
    }
}

/// Awaited once by the run loop before anything else happens.
pub struct HostReady(oneshot::Receiver<()>);

impl HostReady {
    /// Already resolved.
    pub fn resolved() -> Self {
        let (handle, ready) = host_ready();
        handle.resolve();
        ready
    }

    /// `false` if the handle was dropped without resolving.
    pub async fn wait(self) -> bool {
        self.0.await.is_ok()
    }
}

pub fn host_ready() -> (ReadyHandle, HostReady) {
    let (tx, rx) = oneshot::channel();
    (ReadyHandle(tx), HostReady(rx))
}
