//! Cooperative cancellation
//!
//! Exports watch a `tokio::sync::watch` channel that flips to `true` on
//! shutdown. The flag is polled at every suspension point of the pipeline.

use crate::domain::{Result, ScribeError};
use tokio::sync::watch;

/// Receiving end of the shutdown channel
pub type ShutdownSignal = watch::Receiver<bool>;

/// A signal that never fires, for callers without a shutdown source
pub fn never_cancelled() -> ShutdownSignal {
    // The receiver keeps the last value after the sender is dropped
    watch::channel(false).1
}

pub fn is_cancelled(signal: &ShutdownSignal) -> bool {
    *signal.borrow()
}

/// Fail with [`ScribeError::Cancelled`] if shutdown was requested
pub fn ensure_running(signal: &ShutdownSignal, stage: &str) -> Result<()> {
    if is_cancelled(signal) {
        tracing::warn!(stage, "Shutdown requested, abandoning export");
        return Err(ScribeError::Cancelled(stage.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_cancelled() {
        let signal = never_cancelled();
        assert!(!is_cancelled(&signal));
        assert!(ensure_running(&signal, "assembling").is_ok());
    }

    #[test]
    fn test_ensure_running_after_shutdown() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let err = ensure_running(&rx, "streaming").unwrap_err();
        assert!(err.is_cancelled());
        assert!(err.to_string().contains("streaming"));
    }
}
