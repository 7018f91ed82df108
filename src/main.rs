use eventscout::cli::{self, USAGE};
use log::error;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .init();

    let invocation = match cli::parse_args(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(invocation).await {
        error!("{:#}", e);
        process::exit(1);
    }
}
