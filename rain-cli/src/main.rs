//! `rain` - digital rain in the current terminal.

use std::io;
use std::thread;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rain_cli::{env, setup_logging, Args};
use rain_core::{visibility, Environment, RainConfig, Size, Visibility};
use rain_loop::{RainRenderer, StartOutcome};
use rain_term::{tty, CellMetrics, ScreenGuard, TermSurface, WindowSize};
use tokio::signal::unix::{signal, SignalKind};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose, args.log_file.as_deref())?;

    let config = args.resolve_config()?;
    tracing::info!(?config, "starting rain");

    run(&args, &config).await
}

async fn run(args: &Args, config: &RainConfig) -> Result<()> {
    if !tty::stdout_is_terminal() {
        bail!("stdout is not a terminal");
    }

    let environment = current_environment(args);

    let tier = match visibility(config, &environment) {
        Visibility::Run(tier) => tier,
        Visibility::Suppressed(reason) => {
            tracing::info!(?reason, "rain suppressed; nothing to show");
            return Ok(());
        }
    };

    let screen = ScreenGuard::enter(io::stdout()).context("entering alternate screen")?;
    let surface = TermSurface::new(
        io::stdout(),
        CellMetrics::for_glyph_size(tier.profile().glyph_size),
        WindowSize::Tty,
    );

    let (mut renderer, events) = RainRenderer::new(surface);
    let event_log = thread::Builder::new()
        .name("rain-events".into())
        .spawn(move || {
            for event in events.iter() {
                tracing::debug!(?event, "rain event");
            }
        })
        .context("spawning event logger")?;

    match renderer.start(config, &environment)? {
        StartOutcome::Started { intensity } => tracing::info!(%intensity, "rain running"),
        other => tracing::warn!(?other, "rain did not start"),
    }

    let outcome = wait_for_exit(&mut renderer, args).await;

    renderer.stop();
    drop(renderer);
    if event_log.join().is_err() {
        tracing::warn!("event logger panicked");
    }
    drop(screen);
    outcome
}

/// Host signals for the terminal as it is now.
///
/// The viewport is measured with default cells; the tier picks the real ones.
fn current_environment(args: &Args) -> Environment {
    let (cols, rows) =
        tty::window_size().unwrap_or((rain_term::DEFAULT_COLS, rain_term::DEFAULT_ROWS));
    let viewport = Size::new(
        cols as f32 * CellMetrics::DEFAULT.width,
        rows as f32 * CellMetrics::DEFAULT.height,
    );
    env::detect(viewport, args.reduced_motion)
}

/// Forward terminal signals to the renderer until Ctrl-C or the duration ends.
///
/// A window change re-checks visibility first, so `--mobile-only` rain pauses
/// while the terminal is wide and resumes when it narrows again.
async fn wait_for_exit<S>(renderer: &mut RainRenderer<S>, args: &Args) -> Result<()>
where
    S: rain_core::Surface + Send + 'static,
{
    let mut winch = signal(SignalKind::window_change()).context("installing SIGWINCH handler")?;
    let mut usr1 = signal(SignalKind::user_defined1()).context("installing SIGUSR1 handler")?;

    let deadline = async {
        match args.duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("waiting for Ctrl-C")?;
                tracing::info!("interrupted");
                return Ok(());
            }
            _ = &mut deadline => {
                tracing::info!("duration elapsed");
                return Ok(());
            }
            Some(()) = winch.recv() => {
                let outcome = renderer.update_environment(&current_environment(args))?;
                tracing::debug!(?outcome, "window changed");
                renderer.resize();
            }
            Some(()) = usr1.recv() => renderer.trigger_glitch(),
        }
    }
}
