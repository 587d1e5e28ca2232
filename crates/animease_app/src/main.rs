// SPDX-License-Identifier: MIT OR Apache-2.0
//! `AnimEase` - bulk keyframe editing for rig animation
//!
//! A command-line tool for editing the curves of a rig's action:
//! - Spline/stepped interpolation toggles
//! - Keyframe splicing that keeps the curve shape
//! - Loopable end frames copied from the first key
//! - A modal splice gesture driven by input events
//!
//! ## Architecture
//!
//! The curve arithmetic lives in `animease_curves`. This binary plays the
//! host: it owns the scene and settings, runs operators against them, and
//! reads/writes RON documents.

mod app;
mod cli;
mod modal;
mod operators;
mod scene;
mod settings;

use app::AppError;
use cli::{CliError, Invocation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
        .add_directive(
            "animease_app=info"
                .parse()
                .unwrap_or_else(|_| LevelFilter::INFO.into()),
        );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting AnimEase v{}", env!("CARGO_PKG_VERSION"));

    let result = Invocation::parse(std::env::args().skip(1))
        .map_err(AppError::from)
        .and_then(|invocation| app::run(&invocation));

    match result {
        Ok(()) => {}
        Err(AppError::Cli(CliError::Help)) => println!("{}", cli::USAGE),
        Err(AppError::Cli(e)) => {
            eprintln!("animease: {e}\n\n{}", cli::USAGE);
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
