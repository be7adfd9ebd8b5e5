use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use dayplan_core::task::TaskRecord;
use dayplan_core::{
    BreakInserter, Booking, Chronotype, Config, GreedyScheduler, RecurringCommitment,
    ScheduleOutcome, Segment, SegmentKind, Task,
};
use serde::{Deserialize, Serialize};

#[derive(Args)]
pub struct ScheduleArgs {
    /// Day plan JSON file ({ date, chronotype, tasks, commitments, bookings })
    plan: PathBuf,
    /// Split placements into Pomodoro work/break segments
    #[arg(long)]
    breaks: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// One day's scheduling input.
#[derive(Deserialize)]
struct DayPlan {
    date: NaiveDate,
    #[serde(default)]
    chronotype: Chronotype,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
    #[serde(default)]
    commitments: Vec<RecurringCommitment>,
    #[serde(default)]
    bookings: Vec<Booking>,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    outcome: &'a ScheduleOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<Vec<Segment>>,
}

pub fn run(args: ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.plan)
        .map_err(|e| format!("cannot read {}: {e}", args.plan.display()))?;
    let plan: DayPlan = serde_json::from_str(&content)?;
    let config = Config::load_or_default();

    // Missing priorities use the configured weights.
    let tasks = plan
        .tasks
        .into_iter()
        .map(|r| {
            Task::with_weights(
                r.id,
                &r.name,
                r.effort,
                r.urgency,
                r.length,
                r.priority,
                &config.priority,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut scheduler = GreedyScheduler::with_config(config.scheduler.clone());
    for commitment in &plan.commitments {
        scheduler.add_commitment(commitment, plan.date)?;
    }

    let outcome = scheduler.schedule_tasks(&tasks, plan.chronotype, plan.date, &plan.bookings)?;

    let segments = if args.breaks {
        Some(BreakInserter::with_config(config.breaks.clone()).insert_breaks(&outcome.placements)?)
    } else {
        None
    };

    if args.json {
        let report = Report {
            outcome: &outcome,
            segments,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Schedule for {} ({})", outcome.date, outcome.chronotype);
    for p in outcome.timeline() {
        let tag = if p.is_commitment() { " [commitment]" } else { "" };
        println!("  {}-{}  {}{tag}", p.start_time, p.end_time, p.name());
    }

    if let Some(segments) = segments {
        println!("\nPomodoro segments:");
        for s in &segments {
            match s.kind {
                SegmentKind::Work => println!(
                    "  {}-{}  WORK   {}",
                    s.start_time,
                    s.end_time,
                    s.task_name.as_deref().unwrap_or_default()
                ),
                SegmentKind::Break => println!("  {}-{}  BREAK", s.start_time, s.end_time),
            }
        }
    }

    if !outcome.waitlisted.is_empty() {
        println!("\nWaitlisted:");
        for task in &outcome.waitlisted {
            println!("  - {} (priority {:.2})", task.name(), task.priority());
        }
    }

    Ok(())
}
