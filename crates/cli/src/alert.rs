//! User-facing failure surface.

/// Receives failures the user has to see.
#[cfg_attr(test, mockall::automock)]
pub trait Alert {
    /// Show `message` to the user.
    fn alert(&self, message: &str);
}

/// Writes alerts to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrAlert;

impl Alert for StderrAlert {
    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}
