#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! multitool: a multi-command CLI root.

use multitool::cli::{Output, OutputFormat, write_error};
use multitool::commands::build_registry;
use multitool::config::AppConfig;
use multitool::dispatch::{Dispatcher, restricted_platform_available};
use multitool::types::ErrorOutput;

fn main() {
    let config = AppConfig::from_env();

    let registry = match build_registry(restricted_platform_available()) {
        Ok(registry) => registry,
        Err(err) => {
            let error_output = ErrorOutput::from_cli_error(&err, config.name);
            write_error(&mut Output::stderr(), &error_output, OutputFormat::Table);
            std::process::exit(err.exit_code());
        }
    };

    let status = Dispatcher::new(config, registry).dispatch(std::env::args_os());
    std::process::exit(status);
}
