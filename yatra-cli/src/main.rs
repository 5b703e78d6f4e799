//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use yatra_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match yatra_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("yatra: {err}");
            std::process::exit(1);
        }
    }
}
