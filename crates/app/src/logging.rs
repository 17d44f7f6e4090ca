//! Logging initialisation.

use once_cell::sync::OnceCell;
use restprobe_application::ConfigResolver;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INSTALLED: OnceCell<bool> = OnceCell::new();

/// Installs a console subscriber when `logging.enabled` is true.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Only the first
/// call has an effect. Returns whether this crate's subscriber is the
/// global one; `false` if logging is disabled or another subscriber was
/// installed first.
pub fn init_logging(config: &ConfigResolver) -> bool {
    if !config.logging_enabled() {
        return INSTALLED.get().copied().unwrap_or(false);
    }

    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    })
}
