//! Task and recurring commitment records.
//!
//! Both are built by the caller from external storage and are immutable once
//! constructed. Deserialization goes through the same validating constructors.

use serde::{Deserialize, Serialize};

use crate::clock::{hours_to_minutes, ClockTime};
use crate::error::{ScheduleError, ValidationError};
use crate::priority::{calculate_priority_with_weights, PriorityWeights};

pub const MAX_NAME_CHARS: usize = 100;
pub const MIN_SCALE: u8 = 1;
pub const MAX_SCALE: u8 = 10;
pub const MAX_LENGTH_HOURS: f64 = 24.0;

/// A variable-duration task with a priority score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: String,
    name: String,
    effort: u8,
    urgency: u8,
    length: f64,
    priority: f64,
}

/// Raw task fields as read from storage or JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub effort: u8,
    pub urgency: u8,
    pub length: f64,
    #[serde(default)]
    pub priority: Option<f64>,
}

impl Task {
    /// Create a validated task.
    ///
    /// When `priority` is `None` it is computed once with the default weights.
    pub fn new(
        id: impl Into<String>,
        name: &str,
        effort: u8,
        urgency: u8,
        length: f64,
        priority: Option<f64>,
    ) -> Result<Self, ValidationError> {
        Self::with_weights(
            id,
            name,
            effort,
            urgency,
            length,
            priority,
            &PriorityWeights::default(),
        )
    }

    /// Create a validated task, computing a missing priority from `weights`.
    pub fn with_weights(
        id: impl Into<String>,
        name: &str,
        effort: u8,
        urgency: u8,
        length: f64,
        priority: Option<f64>,
        weights: &PriorityWeights,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        validate_scale("effort", effort)?;
        validate_scale("urgency", urgency)?;
        validate_length(length)?;

        let priority = match priority {
            Some(p) if !p.is_finite() => {
                return Err(ValidationError::invalid("priority", "must be a finite number"));
            }
            Some(p) => p,
            None => calculate_priority_with_weights(effort, urgency, length, weights)
                .map_err(|e| ValidationError::invalid("weights", e.to_string()))?,
        };

        Ok(Self {
            id: id.into(),
            name,
            effort,
            urgency,
            length,
            priority,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effort(&self) -> u8 {
        self.effort
    }

    pub fn urgency(&self) -> u8 {
        self.urgency
    }

    /// Length in hours.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Duration rounded to whole minutes.
    pub fn duration_minutes(&self) -> u32 {
        hours_to_minutes(self.length)
    }

    /// Whether this task is searched in the peak window first.
    pub fn is_high_priority(&self, threshold: f64) -> bool {
        self.priority >= threshold
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(r: TaskRecord) -> Result<Self, Self::Error> {
        Task::new(r.id, &r.name, r.effort, r.urgency, r.length, r.priority)
    }
}

/// A fixed-time daily commitment. Never bumped by greedy placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CommitmentRecord")]
pub struct RecurringCommitment {
    id: String,
    name: String,
    start_time: ClockTime,
    length: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitmentRecord {
    pub id: String,
    pub name: String,
    pub start_time: ClockTime,
    pub length: f64,
}

impl RecurringCommitment {
    pub fn new(
        id: impl Into<String>,
        name: &str,
        start_time: ClockTime,
        length: f64,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        validate_length(length)?;
        Ok(Self {
            id: id.into(),
            name,
            start_time,
            length,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> ClockTime {
        self.start_time
    }

    /// Length in hours.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn duration_minutes(&self) -> u32 {
        hours_to_minutes(self.length)
    }

    /// End time, or `OutOfDay` if the commitment runs past midnight.
    pub fn end_time(&self) -> Result<ClockTime, ScheduleError> {
        let minutes = self.duration_minutes();
        self.start_time
            .checked_add_minutes(minutes)
            .ok_or_else(|| ScheduleError::OutOfDay {
                start: self.start_time.to_string(),
                minutes,
            })
    }
}

impl TryFrom<CommitmentRecord> for RecurringCommitment {
    type Error = ValidationError;

    fn try_from(r: CommitmentRecord) -> Result<Self, Self::Error> {
        RecurringCommitment::new(r.id, &r.name, r.start_time, r.length)
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let chars = trimmed.chars().count();
    if chars < 1 || chars > MAX_NAME_CHARS {
        return Err(ValidationError::invalid(
            "name",
            format!("must be 1-{MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_scale(field: &str, value: u8) -> Result<(), ValidationError> {
    if !(MIN_SCALE..=MAX_SCALE).contains(&value) {
        return Err(ValidationError::invalid(
            field,
            format!("must be between {MIN_SCALE}-{MAX_SCALE}"),
        ));
    }
    Ok(())
}

fn validate_length(length: f64) -> Result<(), ValidationError> {
    if !length.is_finite() || length <= 0.0 {
        return Err(ValidationError::invalid("length", "must be positive"));
    }
    if length > MAX_LENGTH_HOURS {
        return Err(ValidationError::invalid(
            "length",
            format!("cannot exceed {MAX_LENGTH_HOURS} hours"),
        ));
    }
    Ok(())
}
