use std::error::Error;

use tracing::{debug, error, info};

/// Sink for the scanner's trace output.
///
/// One logger handle is shared by the walker and every worker, so
/// implementations must be thread safe.
pub trait ScanLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, error: &dyn Error, message: &str);
}

/// Default logger; discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl ScanLogger for NoopLogger {
    #[inline]
    fn debug(&self, _message: &str) {}

    #[inline]
    fn info(&self, _message: &str) {}

    #[inline]
    fn error(&self, _error: &dyn Error, _message: &str) {}
}

/// Forwards scanner logs to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ScanLogger for TracingLogger {
    fn debug(&self, message: &str) {
        debug!("{}", message);
    }

    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, err: &dyn Error, message: &str) {
        if message.is_empty() {
            error!("{}", err);
        } else {
            error!("{}: {}", message, err);
        }
    }
}
