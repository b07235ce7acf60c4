mod barrel;
mod cli;
mod commands;
mod config;
mod error;
mod icons;
mod init;
mod prompt;
mod scaffold;
mod templates;
mod utils;

use clap::Parser;

use crate::{cli::Cli, config::RunMode, utils::env_bool_truthy};

fn main() {
    let cli = Cli::parse();

    let debug = cli.debug || env_bool_truthy("REACT_GEN_DEBUG").unwrap_or(false);
    let mode = if debug {
        RunMode::Debug
    } else {
        RunMode::Production
    };
    env_logger::Builder::new()
        .filter_level(mode.log_level())
        .format_timestamp(None)
        .parse_env("REACT_GEN_LOG")
        .init();

    std::process::exit(error::exit_code(commands::run(cli, mode)));
}
