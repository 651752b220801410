//! # dal-helper
//!
//! Scaffolding for command-line entry points around DAL (Data Access/Abstraction
//! Layer) types that read personal data exports from local files.
//!
//! A DAL author supplies a factory (usually the DAL's constructor) and a demo;
//! this crate parses `--source`, expands it into paths, builds the DAL, prints
//! it, and then runs the demo or an interactive session.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::fmt;
//! use dal_helper::{MainConfig, Runner, Sources};
//!
//! struct Export(Vec<std::path::PathBuf>);
//!
//! impl fmt::Display for Export {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Export({} files)", self.0.len())
//!     }
//! }
//!
//! fn open(sources: Sources) -> anyhow::Result<Export> {
//!     Ok(Export(sources.into_paths()))
//! }
//!
//! fn demo(export: &Export) -> anyhow::Result<()> {
//!     println!("first file: {:?}", export.0.first());
//!     Ok(())
//! }
//!
//! let runner = Runner::new(open).demo(demo);
//! if let Err(e) = dal_helper::run(&MainConfig::default(), runner) {
//!     eprintln!("Error: {e}");
//!     std::process::exit(e.exit_code());
//! }
//! ```

mod config;
mod dispatch;
mod error;
mod inspector;
pub mod logging;
mod resolve;

pub use config::{DEFAULT_BINDING, DEFAULT_SHELL_HEADER, DalArgs, MainConfig, make_parser};
pub use dispatch::{DalFactory, Demo, InteractiveHost, Runner};
pub use error::DalError;
pub use inspector::{Editor, Input, Inspector, LineReader, Lines};
pub use logging::{Logger, init_logging};
pub use resolve::{GLOB_WILDCARD, Sources, resolve};

use std::ffi::OsString;
use std::io::Write;

use tracing::debug;

/// A JSON object, the usual shape of a single exported record.
pub type Json = serde_json::Map<String, serde_json::Value>;

/// Errors as values, for DAL iterators that keep going past bad records.
pub type Res<T> = Result<T, anyhow::Error>;

/// Parse the process arguments and run `runner` against the resolved sources.
///
/// The DAL rendering goes to stdout; logs go to stderr.
///
/// # Errors
///
/// See [`run_from`].
pub fn run<F: DalFactory>(config: &MainConfig, runner: Runner<'_, F>) -> Result<(), DalError> {
    let stdout = std::io::stdout();
    run_from(std::env::args_os(), config, runner, &mut stdout.lock())
}

/// Like [`run`], with explicit arguments (including the program name) and output.
///
/// # Errors
///
/// - [`DalError::Args`] if the arguments do not parse (this includes `--help`)
/// - any error from [`Runner::dispatch`]
pub fn run_from<I, T, F>(
    args: I,
    config: &MainConfig,
    runner: Runner<'_, F>,
    out: &mut dyn Write,
) -> Result<(), DalError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: DalFactory,
{
    let matches = make_parser(config.single_source).try_get_matches_from(args)?;
    let args = DalArgs::from_matches(&matches);

    let logger = init_logging(args.verbose);
    let mut runner = runner.session_from_config(config);

    logger.in_scope(|| {
        debug!(
            source = %args.source,
            single_source = config.single_source,
            no_glob = args.no_glob,
            interactive = args.interactive,
            "starting"
        );
        let sources = resolve(&args.source, config.single_source, args.no_glob);
        runner.dispatch(sources, args.interactive, out)
    })
}
