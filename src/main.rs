use clap::Parser;

use atrium_api::cli::Cli;

fn main() -> anyhow::Result<()> {
    // Load .env if present so atrium picks up APP_ENV, VERIFIER_PAIR_CAP, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = atrium_api::config::config();
    tracing::debug!("Atrium CLI starting in {:?} mode", config.environment);

    let cli = Cli::parse();

    if let Err(e) = atrium_api::cli::run(cli) {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
