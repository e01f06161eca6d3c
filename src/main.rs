use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ytsound::extractors::youtube::YtDlp;
use ytsound::media::Ffmpeg;
use ytsound::{output, utils, Cli, Config, Pipeline, PipelineRequest};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "ytsound=debug" } else { "ytsound=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().await?;

    if cli.show_config {
        config.display();
        return Ok(ExitCode::SUCCESS);
    }

    // Check for required external dependencies (non-fatal, the tools may live elsewhere)
    let missing_deps = utils::check_dependencies(&config.tools.yt_dlp, &config.tools.ffmpeg).await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    let Some(url) = cli.url else {
        anyhow::bail!("--url is required");
    };

    let request = PipelineRequest {
        url,
        interval: cli.interval,
        filename: cli.filename,
        output_dir: cli.output.unwrap_or_else(|| config.music_dir()),
        extension: cli.extension,
        default_extension: config.default_extension.clone(),
        preferred_source_ext: config.preferred_source_ext.clone(),
    };

    let yt_dlp = || YtDlp::new(config.tools.yt_dlp.clone()).quiet(cli.quiet);
    let pipeline = Pipeline::new(
        Box::new(yt_dlp()),
        Box::new(yt_dlp()),
        Box::new(Ffmpeg::new(config.tools.ffmpeg.clone(), config.tools.ffmpeg_loglevel.clone())),
    )
    .quiet(cli.quiet);

    tracing::info!("Fetching audio from: {}", request.url);

    match pipeline.run(&request).await {
        Ok(outcome) => {
            output::print_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            output::print_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
