use std::path::PathBuf;

use clap::Parser;
use jot::cli::commands::Cli;
use jot::cli::handlers;
use jot::model::AppConfig;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → interactive session
            let config_path = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from("jot.toml"));
            let result = AppConfig::load(&config_path)
                .map_err(Into::into)
                .and_then(|config| {
                    let data_path = handlers::data_path(&cli, &config);
                    jot::session::run(&data_path, &config)
                });
            if let Err(e) = result {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
