use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use dayplan_core::history::DEFAULT_LOOKBACK_DAYS;
use dayplan_core::{CompletionRecord, TimePredictor};

#[derive(Args)]
pub struct PredictArgs {
    /// Completion history JSON file (array of records)
    history: PathBuf,
    /// Task name to predict
    #[arg(long)]
    task: String,
    /// Reference date (YYYY-MM-DD). Defaults to the local date.
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Lookback window in days
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
    lookback: i64,
    /// Also list the N most frequently completed tasks
    #[arg(long)]
    recommend: Option<usize>,
}

pub fn run(args: PredictArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.history)
        .map_err(|e| format!("cannot read {}: {e}", args.history.display()))?;
    let records: Vec<CompletionRecord> = serde_json::from_str(&content)?;

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let predictor = TimePredictor::new(today).with_lookback(args.lookback);

    println!("Task: {}", args.task);
    match predictor.predict_start_time(&records, &args.task) {
        Some(start) => println!("Predicted start: {start}"),
        None => println!(
            "Predicted start: no history in the last {} days",
            args.lookback
        ),
    }
    if let Some(hours) = predictor.average_duration_hours(&records, &args.task) {
        println!("Average duration: {hours:.2} h");
    }

    if let Some(limit) = args.recommend {
        println!("\nMost completed:");
        for (name, count) in predictor.recommended_tasks(&records, limit) {
            println!("  {name} ({count}x)");
        }
    }

    Ok(())
}
