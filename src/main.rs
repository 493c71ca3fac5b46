//! Entry point for the dupecheck CLI.

use clap::Parser;
use dupecheck::{
    cli::Cli,
    error::{ConfigError, ExitCode},
};

fn main() {
    let cli = Cli::parse();

    match dupecheck::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err.downcast_ref::<ConfigError>().is_some() {
                ExitCode::ConfigError
            } else {
                ExitCode::GeneralError
            };
            eprintln!("Error: {err:#}");
            std::process::exit(exit_code.as_i32());
        }
    }
}
