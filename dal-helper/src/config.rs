//! Command-line schema and entry-point configuration.
//!
//! The parser is built at runtime rather than derived: `--no-glob` only exists
//! in multi-source mode, so the schema depends on [`MainConfig::single_source`].

use clap::{Arg, ArgAction, ArgMatches, Command};

/// Header shown when entering the interactive session.
pub const DEFAULT_SHELL_HEADER: &str = "Feel free to mess with 'dal' object in the interactive shell";

/// Name the DAL instance is bound to inside the interactive session.
pub const DEFAULT_BINDING: &str = "dal";

const EPILOG: &str = "\
A DAL (Data Access/Abstraction Layer) gives programmatic access to your exported data, even offline.

- the main use case is to depend on it as a library and query the data from your own code

- to test it against your export, run: --source /path/to/export

- to poke at it interactively, run: --source /path/to/export --interactive
";

/// Entry-point options supplied by the DAL author (not by the command line).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct MainConfig {
    /// Exports are not cumulative: exactly one path is expected and `--source`
    /// is never glob-expanded.
    pub single_source: bool,
    /// Header printed when the interactive session starts.
    pub shell_header: String,
    /// Name the DAL instance is bound to in the interactive session.
    pub binding: String,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            single_source: false,
            shell_header: DEFAULT_SHELL_HEADER.to_owned(),
            binding: DEFAULT_BINDING.to_owned(),
        }
    }
}

impl MainConfig {
    /// Configuration for DALs backed by a single, non-cumulative export.
    #[must_use]
    pub fn single_source() -> Self {
        Self {
            single_source: true,
            ..Self::default()
        }
    }
}

/// Typed view of the parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DalArgs {
    /// Raw `--source` value (path or glob).
    pub source: String,
    /// Treat `--source` literally. Always `false` in single-source mode.
    pub no_glob: bool,
    /// Enter the interactive session instead of running the demo.
    pub interactive: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl DalArgs {
    /// Extract arguments from matches produced by [`make_parser`].
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        // `no-glob` is not registered in single-source mode.
        let no_glob = matches
            .try_get_one::<bool>("no-glob")
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false);

        Self {
            source: matches
                .get_one::<String>("source")
                .cloned()
                .unwrap_or_default(),
            no_glob,
            interactive: matches.get_flag("interactive"),
            verbose: matches.get_count("verbose"),
        }
    }
}

/// Build the command-line schema shared by all DAL entry points.
#[must_use]
pub fn make_parser(single_source: bool) -> Command {
    let source_help = if single_source {
        "Path to exported data".to_owned()
    } else {
        "Path to exported data. Can be single file, or a glob, e.g. '/path/to/exports/*.ext'"
            .to_owned()
    };

    let mut cmd = Command::new("dal")
        .about("DAL (Data Access/Abstraction Layer)")
        .after_help(EPILOG)
        .arg(
            Arg::new("source")
                .long("source")
                .value_name("SOURCE")
                .required(true)
                .help(source_help),
        );

    if !single_source {
        cmd = cmd.arg(
            Arg::new("no-glob")
                .long("no-glob")
                .action(ArgAction::SetTrue)
                .help("Treat path in --source literally"),
        );
    }

    cmd.arg(
        Arg::new("interactive")
            .short('i')
            .long("interactive")
            .action(ArgAction::SetTrue)
            .help("Start an interactive session to play with the data"),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
    )
}
