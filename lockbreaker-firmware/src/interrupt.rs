//! SIGINT/SIGTERM handling
//!
//! Signals only raise a flag. The orchestrator checks it between attempts
//! so a dial move in progress always completes.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::signal::unix::{signal, SignalKind};

/// Watch for SIGINT and SIGTERM and set `flag` when either arrives
///
/// The handlers are registered before this returns. A second signal after
/// the first is ignored; stopping is already in progress.
pub fn install(flag: Arc<AtomicBool>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;

    let (mut terminate, mut interrupt) = runtime.block_on(async {
        Ok::<_, io::Error>((
            signal(SignalKind::terminate())?,
            signal(SignalKind::interrupt())?,
        ))
    })?;

    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            runtime.block_on(async {
                tokio::select! {
                    _ = terminate.recv() => tracing::info!("received SIGTERM"),
                    _ = interrupt.recv() => tracing::info!("received SIGINT"),
                }
            });
            flag.store(true, Ordering::SeqCst);
            tracing::info!("stopping after the current attempt");
        })?;

    Ok(())
}
