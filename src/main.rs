mod args;

use std::{process, time::Duration};

use args::Args;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use whr_processor::{
    error::WhrError,
    model::{rating_engine::RatingEngine, structures::engine_config::EngineConfig},
    persistence::{records::sort_chronologically, RatingReport, SavedBase},
    utils::progress_utils::progress_bar
};

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    if let Err(e) = run(&args) {
        error!("Processing failed: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), WhrError> {
    let base = SavedBase::read(&args.input)?;
    let config = EngineConfig {
        w2: args.w2.unwrap_or(base.w2),
        debug: args.debug,
        schedule: args.schedule
    };
    info!("Rating with w2 = {}, schedule = {}", config.w2, config.schedule);

    let mut records = base.observations;
    sort_chronologically(&mut records);

    let mut engine = RatingEngine::new(config);
    let bar = progress_bar(records.len() as u64, "Submitting observations".to_string());
    for record in &records {
        engine.submit_record(record)?;
        bar.inc(1);
    }
    bar.finish();

    let (iterations, converged) = engine.auto_iterate(Duration::from_secs(args.time_limit), args.precision)?;
    if converged {
        info!("Converged after {} iterations", iterations);
    } else {
        info!("Stopped after {} iterations without converging", iterations);
    }

    for rating in engine.ordered_ratings(true).iter().rev() {
        if let Some(elo) = rating.elo.last() {
            info!("{:>32}: {:.0}", rating.name, elo);
        }
    }

    if let Some(accuracy) = engine.prediction_accuracy()? {
        info!("Prediction accuracy: {:.3}", accuracy);
    }

    if let Some(output) = &args.output {
        let mut report = RatingReport::new();
        report.record_metric(&args.metric, &engine);
        report.write(output)?;
        info!("Wrote {} ratings to {}", report.len(), output.display());
    }

    Ok(())
}
