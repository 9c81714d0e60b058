use resgen_cli::config::ResgenConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let matches = resgen_cli::cli().get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let config = match ResgenConfig::load(config_path.map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    };

    let default_filter = resgen_cli::log_filter(&config, matches.get_count("verbose"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = resgen_cli::run(&matches, &config) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
