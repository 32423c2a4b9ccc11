use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use wordcheck::{
    cli::CLI,
    exit_code,
    initializers::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let CLI { opts } = CLI::parse();
    init_tracing(&opts);

    let outcome = wordcheck::run(&opts).await;
    match &outcome {
        Ok(report) => println!("{report}"),
        Err(err) => error!("{err:?}"),
    }
    ExitCode::from(exit_code(&outcome))
}
