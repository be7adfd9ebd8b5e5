use clap::Args;
use dayplan_core::{calculate_priority_with_weights, Config, PriorityWeights};

#[derive(Args)]
pub struct PriorityArgs {
    /// Effort on a 1-10 scale
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    effort: u8,
    /// Urgency on a 1-10 scale
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    urgency: u8,
    /// Task length in hours
    #[arg(long, value_parser = positive_hours)]
    length: f64,
    /// Effort, urgency and length weights, comma-separated (e.g. "0.3,0.5,0.2").
    /// Defaults to the configured weights.
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,
}

fn positive_hours(s: &str) -> Result<f64, String> {
    let hours: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(format!("length must be a positive number of hours, got {s}"));
    }
    Ok(hours)
}

pub fn run(args: PriorityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let weights = match args.weights.as_deref() {
        Some(&[effort, urgency, length]) => PriorityWeights::new(effort, urgency, length),
        Some(other) => {
            return Err(format!("--weights takes exactly 3 values, got {}", other.len()).into());
        }
        None => Config::load_or_default().priority,
    };

    let score = calculate_priority_with_weights(args.effort, args.urgency, args.length, &weights)?;
    println!("{score:.2}");
    Ok(())
}
