//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. Returns `false` if a
/// global subscriber was already installed, in which case nothing changes.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        // The first call may lose to another test in the same binary.
        let _ = init("debug");
        assert!(!init("info"));
    }
}
