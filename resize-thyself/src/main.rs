use anyhow::Context;
use clap::Parser;
use resize_hal::{Ec2Hal, ImdsClient};
use resize_thyself::cli::Cli;
use resize_thyself::orchestrator::ResizeOutcome;
use resize_thyself::{logging, pipeline, Config, DeviceOutcome, ResizeError};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref());

    if let Err(err) = run(&cli) {
        log::error!("{:#}", err);
        let code = err
            .downcast_ref::<ResizeError>()
            .map(ResizeError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::try_from(cli)?;
    if config.dry_run {
        log::info!("DRY RUN: no changes will be made");
    }

    let hal = Ec2Hal::connect(ImdsClient::from_env(), config.region.clone())
        .map_err(ResizeError::Metadata)
        .context("connecting to the instance metadata service")?;

    for outcome in pipeline::run(&hal, &config)? {
        match outcome {
            DeviceOutcome::NoResizeNeeded { device, usage } => {
                log::debug!("{}: {:.1}% used, left alone", device, usage * 100.0)
            }
            DeviceOutcome::Resized(ResizeOutcome::Completed {
                volume_id,
                new_size,
                polls,
            }) => log::info!(
                "Resized {} to {} GiB after {} status checks",
                volume_id,
                new_size,
                polls
            ),
            DeviceOutcome::Resized(ResizeOutcome::Skipped {
                volume_id,
                new_size,
            }) => log::info!("DRY RUN: would have resized {} to {} GiB", volume_id, new_size),
        }
    }
    Ok(())
}
