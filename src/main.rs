use clap::Parser;
use standards_influence::cli::{Cli, Commands};
use standards_influence::config::Config;
use standards_influence::prepare::{PrepareOptions, SURVEY_REPO_DIR};
use standards_influence::{pipeline, prepare, table};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "standards_influence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Prepare {
            keys,
            standards,
            bibliography,
        } => {
            let config = Config::load(&keys)?;
            let options = PrepareOptions {
                standards_file: standards,
                bibliography_file: bibliography,
                survey_dir: SURVEY_REPO_DIR.into(),
            };
            prepare::run_prepare(&config, &options).await?;
        }
        Commands::Import {
            keys,
            standards,
            bibliography,
            survey,
            out_dir,
            mock,
            as_of,
            drop_column,
            print_preamble,
        } => {
            let config = Config::load(&keys)?;
            if !mock {
                // fail before any work rather than in the Scholar stage
                config.require_serp_api_key()?;
            }
            let options = pipeline::ImportOptions {
                standards_file: standards,
                bibliography_file: bibliography,
                survey_file: survey,
                out_dir,
                mock,
                as_of: as_of.unwrap_or_else(|| chrono::Local::now().date_naive()),
                drop_columns: drop_column,
            };
            pipeline::run_import(&config, &options).await?;
            if print_preamble {
                print!("{}", table::latex::PACKAGES_AND_COMMANDS);
            }
        }
    }

    Ok(())
}
