//! textdupe - Duplicated Text Finder
//!
//! Entry point for the textdupe CLI application.

use clap::Parser;
use textdupe::{
    cli::Cli,
    error::{ExitCode, StructuredError},
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    match textdupe::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);

            if json_errors {
                match serde_json::to_string_pretty(&StructuredError::new(&err, exit_code)) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err),
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
