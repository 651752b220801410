// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stderr: CLI tools are expected to print errors to stderr.
// - exit: Calling `std::process::exit()` is standard for CLI apps to signal failure to the shell.
#![allow(clippy::print_stderr, clippy::exit)]

use dal_helper::{DalError, MainConfig, Runner};
use dal_json::{JsonExport, demo};

fn main() {
    let runner = Runner::new(JsonExport::open).demo(demo);
    match dal_helper::run(&MainConfig::default(), runner) {
        Ok(()) => {}
        Err(DalError::Args(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(e.exit_code());
        }
    }
}
