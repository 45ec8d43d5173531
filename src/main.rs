use clap::Parser;

use release_digest::{
    cli::Args,
    config::WorkflowConfig,
    forge::github::Github,
    workflow::{self, Outcome},
};

fn initialize_logger(debug: bool) -> color_eyre::Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_digest")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = WorkflowConfig::from_env(&cli_args)?;
    let forge = Github::new(config.remote.clone())?;

    match workflow::run(&config, &forge).await? {
        Outcome::NothingMerged => {
            log::info!("nothing merged on {}", config.target_date)
        }
        Outcome::DryRun(release) => {
            log::info!("dry run complete for {}", release.identifier)
        }
        Outcome::Released(release) => {
            log::info!("published release {}", release.identifier)
        }
    }

    Ok(())
}
