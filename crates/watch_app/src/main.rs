mod config;

use std::process::ExitCode;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use watch_core::RunState;
use watch_engine::{FetchSettings, INaturalistFetcher, NotifySettings, NtfySink, Poller};
use watch_logging::{watch_error, watch_info};

use crate::config::Config;

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            println!("ERROR: {err}");
            return ExitCode::FAILURE;
        }
    };

    watch_logging::initialize_terminal(config.log_level);

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            watch_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    let fetcher =
        INaturalistFetcher::new(FetchSettings::default()).context("building observation client")?;
    let sink = NtfySink::new(NotifySettings::new(
        config.ntfy_url.clone(),
        config.ntfy_token.clone(),
    ))
    .context("building notification client")?;
    let poller = Poller::new(fetcher, sink, config.poll_interval);
    let state = RunState::new(config.targets());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    watch_info!(
        "Watching {} taxa in place {} every {:?}",
        config.taxon_ids.len(),
        config.place_id,
        poller.interval()
    );

    runtime.block_on(async {
        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    watch_info!("Received shutdown signal, finishing current cycle");
                    signal_token.cancel();
                }
                Err(err) => watch_error!("Unable to listen for Ctrl+C: {err}"),
            }
        });

        let state = poller.run(state, &shutdown).await;
        watch_info!("Stopped after {} cycles", state.view().cycles_completed);
    });

    Ok(())
}
