//! # kirana
//!
//! Entry point for the `kirana` binary. Setup lives in the library so the
//! commands stay testable.

use std::process::ExitCode;

use clap::Parser;
use kirana_cli::cli::Cli;
use kirana_cli::config::AppConfig;
use kirana_cli::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    kirana_cli::init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    let result = match AppConfig::from_env() {
        Ok(config) => kirana_cli::run(cli, config).await,
        Err(e) => Err(CliError::from(e)),
    };

    match result.and_then(|reply| reply.render(json)) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err, json);
            ExitCode::from(err.code.exit_code())
        }
    }
}

fn report(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string_pretty(err) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{}", err);
    }
}
