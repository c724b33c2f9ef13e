use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::SyncController;
use crate::signal::{HostReady, Signal};

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(d).await,
        None => std::future::pending().await,
    }
}

/// Drive `controller` until shutdown.
///
/// Waits once for the host to become ready, starts, then handles signals and
/// timer expiries one at a time. A signal that arrives during a load sequence
/// stays queued until that sequence settles.
pub async fn run(
    controller: &mut SyncController,
    ready: HostReady,
    signals: &mut mpsc::Receiver<Signal>,
    cancel: CancellationToken,
) {
    tokio::select! {
        ok = ready.wait() => {
            if !ok {
                controller.host_unavailable();
                return;
            }
        }
        _ = cancel.cancelled() => return,
    }

    controller.start().await;

    loop {
        let deadline = controller.timer().deadline();
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(target: "contrib::sync", "cancelled");
                break;
            }
            signal = signals.recv() => match signal {
                None | Some(Signal::Shutdown) => break,
                Some(signal) => controller.handle(signal).await,
            },
            _ = until(deadline) => controller.on_timer().await,
        }
    }
    info!(target: "contrib::sync", "stopped");
}
