use clap::Parser;

use dapur_buzzer::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    let _log_handle = cli::init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = dapur_buzzer::pkg_version(),
        base_url = %settings.backend.base_url,
        "starting"
    );

    cli::execute_command(&cli, settings).await?;
    Ok(())
}
