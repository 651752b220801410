//! Logging setup for DAL entry points.
//!
//! The subscriber is never installed globally: [`init_logging`] returns a
//! [`Logger`] owning a [`Dispatch`], and callers run their work inside
//! [`Logger::in_scope`].

use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Environment variable holding an `EnvFilter` directive (e.g. `dal_helper=debug`).
pub const LOG_ENV: &str = "DAL_LOG";

/// Handle to the subscriber created by [`init_logging`].
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    fallback: bool,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Run `f` with this logger as the current subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// `true` when `DAL_LOG` was set but unusable and the verbosity level was used instead.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Map `-v` occurrences to a level: warn, info, debug, then trace.
#[must_use]
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Create the process logger, writing to stderr.
///
/// Filter selection: `DAL_LOG` if set and valid, otherwise the level implied by
/// `verbose`. An invalid `DAL_LOG` falls back to the verbosity level and emits a
/// warning through the new logger.
#[must_use]
pub fn init_logging(verbose: u8) -> Logger {
    build_logger(std::env::var(LOG_ENV).ok().as_deref(), verbose, std::io::stderr)
}

/// Same as [`init_logging`] with an explicit filter directive and writer.
#[must_use]
pub fn build_logger<W>(directive: Option<&str>, verbose: u8, writer: W) -> Logger
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let default_level = level_for_verbosity(verbose);

    let (filter, rejected) = match directive.map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, None),
        Some(Err(e)) => (EnvFilter::new(default_level.to_string()), Some(e)),
        None => (EnvFilter::new(default_level.to_string()), None),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .finish();

    let logger = Logger {
        dispatch: Dispatch::new(subscriber),
        fallback: rejected.is_some(),
    };

    if let Some(e) = rejected {
        logger.in_scope(|| {
            tracing::warn!(env = LOG_ENV, error = %e, "falling back to default log filter");
        });
    }

    logger
}
