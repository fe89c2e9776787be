use clap::Parser;
use harness_cli::{Cli, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::from_cli(&cli)?;

    let result = session.execute(&cli.command).await;
    eprintln!("{}", session.metrics().to_json()?);

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}
