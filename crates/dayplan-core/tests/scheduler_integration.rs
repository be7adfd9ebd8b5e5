//! Integration tests for a full scheduling run.
//!
//! These tests drive the public API end to end: tasks and bookings in,
//! placements, waitlist and Pomodoro segments out.

use chrono::NaiveDate;
use proptest::prelude::*;

use dayplan_core::waitlist::Waitlist;
use dayplan_core::{
    find_earliest_slot, BreakInserter, Booking, Chronotype, ClockTime, ConflictIndex,
    GreedyScheduler, RecurringCommitment, SearchWindow, SegmentKind, Task, TimeSpan,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

fn t(h: u32, m: u32) -> ClockTime {
    ClockTime::from_hm(h, m).unwrap()
}

fn task(id: &str, priority: f64, length: f64) -> Task {
    Task::new(id, id, 5, 5, length, Some(priority)).unwrap()
}

#[test]
fn test_ten_two_hour_tasks_fill_day_in_input_order() {
    let scheduler = GreedyScheduler::new();
    let tasks: Vec<Task> = (0..10).map(|i| task(&format!("t{i}"), 3.0, 2.0)).collect();

    let outcome = scheduler
        .schedule_tasks(&tasks, Chronotype::Middle, date(), &[] as &[Booking])
        .unwrap();

    assert_eq!(outcome.placements.len(), 8);
    for (i, p) in outcome.placements.iter().enumerate() {
        assert_eq!(p.item.id(), format!("t{i}"));
        assert_eq!(p.start_time, t(6 + 2 * i as u32, 0));
        assert_eq!(p.end_time, t(8 + 2 * i as u32, 0));
        assert_eq!(p.date, date());
    }

    let waitlisted: Vec<&str> = outcome.waitlisted.iter().map(Task::id).collect();
    assert_eq!(waitlisted, vec!["t8", "t9"]);
}

#[test]
fn test_early_chronotype_with_booking() {
    let scheduler = GreedyScheduler::new();
    let bookings = vec![Booking::new(Some("cal-1".into()), t(8, 0), t(9, 0)).unwrap()];
    let tasks = vec![task("A", 8.0, 1.0), task("B", 3.0, 2.0)];

    let outcome = scheduler
        .schedule_tasks(&tasks, Chronotype::Early, date(), &bookings)
        .unwrap();

    // A goes first and takes the earliest peak slot; B then finds
    // 07:00-09:00 blocked by the booking and lands after it.
    let a = &outcome.placements[0];
    let b = &outcome.placements[1];
    assert_eq!((a.item.id(), a.start_time, a.end_time), ("A", t(6, 0), t(7, 0)));
    assert_eq!((b.item.id(), b.start_time, b.end_time), ("B", t(9, 0), t(11, 0)));
    assert!(!a.overlaps(&bookings[0]));
    assert!(!b.overlaps(&bookings[0]));
}

#[test]
fn test_peak_window_beats_earlier_free_slot() {
    let scheduler = GreedyScheduler::new();
    let bookings = vec![Booking::new(None, t(14, 0), t(15, 0)).unwrap()];
    let tasks = vec![task("focus", 7.5, 1.5)];

    let outcome = scheduler
        .schedule_tasks(&tasks, Chronotype::Late, date(), &bookings)
        .unwrap();

    let p = &outcome.placements[0];
    assert_eq!((p.start_time, p.end_time), (t(15, 0), t(16, 30)));
    assert!(Chronotype::Late.peak_window().contains(p.start_time, p.end_time));
}

#[test]
fn test_zero_length_never_raises() {
    let index: ConflictIndex<()> = ConflictIndex::new();
    assert!(find_earliest_slot(&index, 0.0, SearchWindow::FULL_DAY).is_none());

    // Records reject a zero length outright.
    assert!(Task::new("z", "Zero", 5, 5, 0.0, None).is_err());

    // A length that rounds to zero minutes reaches the scheduler and is waitlisted.
    let scheduler = GreedyScheduler::new();
    let outcome = scheduler
        .schedule_tasks(
            &[task("blink", 9.0, 0.001)],
            Chronotype::Early,
            date(),
            &[] as &[Booking],
        )
        .unwrap();
    assert!(outcome.placements.is_empty());
    assert_eq!(outcome.waitlisted[0].id(), "blink");
}

#[test]
fn test_waitlist_fifo_on_tie() {
    let mut waitlist = Waitlist::new();
    waitlist.push(5.0, "first");
    waitlist.push(5.0, "second");
    waitlist.push(6.0, "urgent");

    assert_eq!(waitlist.pop().unwrap(), (6.0, "urgent"));
    assert_eq!(waitlist.pop().unwrap(), (5.0, "first"));
    assert_eq!(waitlist.pop().unwrap(), (5.0, "second"));
    assert!(waitlist.pop().is_err());
}

#[test]
fn test_scheduled_placement_segments_into_pomodoros() {
    let scheduler = GreedyScheduler::new();
    let essay = task("essay", 5.0, 130.0 / 60.0);
    let outcome = scheduler
        .schedule_tasks(&[essay], Chronotype::Early, date(), &[] as &[Booking])
        .unwrap();
    let placement = &outcome.placements[0];
    assert_eq!(placement.duration_minutes(), 130);

    let segments = BreakInserter::new().insert_breaks(&outcome.placements).unwrap();
    let shape: Vec<(SegmentKind, u32)> = segments
        .iter()
        .map(|s| (s.kind, s.duration_minutes()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (SegmentKind::Work, 50),
            (SegmentKind::Break, 10),
            (SegmentKind::Work, 50),
            (SegmentKind::Break, 10),
            (SegmentKind::Work, 30),
        ]
    );
    let span = segments.last().unwrap().end_time.minutes() - placement.start_time.minutes();
    assert_eq!(span, 150);
}

#[test]
fn test_sixteen_hour_task_is_cut_at_end_of_day() {
    let scheduler = GreedyScheduler::new();
    let marathon = scheduler
        .schedule_tasks(
            &[task("marathon", 5.0, 16.0)],
            Chronotype::Middle,
            date(),
            &[] as &[Booking],
        )
        .unwrap();
    let placement = &marathon.placements[0];
    assert_eq!((placement.start_time, placement.end_time), (t(6, 0), t(22, 0)));

    let errand = scheduler
        .schedule_tasks(
            &[task("errand", 5.0, 0.5)],
            Chronotype::Middle,
            date(),
            &[] as &[Booking],
        )
        .unwrap();
    let mut placements = marathon.placements.clone();
    placements.extend(errand.placements.iter().cloned());

    let segments = BreakInserter::new().insert_breaks(&placements).unwrap();
    let errand_id = errand.placements[0].id.as_str();
    let (short, long): (Vec<_>, Vec<_>) = segments
        .iter()
        .partition(|s| s.placement_id.as_deref() == Some(errand_id));

    // 18 work/break cycles fill 06:00-24:00; the last hour of work is dropped.
    assert_eq!(long.len(), 36);
    assert_eq!(long[0].start_time, t(6, 0));
    assert_eq!(long.last().unwrap().end_time, ClockTime::END_OF_DAY);
    assert!(segments.iter().all(|s| s.duration_minutes() > 0));
    let worked: u32 = long
        .iter()
        .filter(|s| s.kind == SegmentKind::Work)
        .map(|s| s.duration_minutes())
        .sum();
    assert_eq!(worked, 15 * 60);

    assert_eq!(short.len(), 1);
    assert_eq!(short[0].kind, SegmentKind::Work);
    assert_eq!(short[0].duration_minutes(), 30);
}

#[test]
fn test_commitment_blocks_every_run() {
    let mut scheduler = GreedyScheduler::new();
    let standup = RecurringCommitment::new("c1", "Standup", t(9, 0), 0.5).unwrap();
    scheduler.add_commitment(&standup, date()).unwrap();

    let tasks = vec![task("deep", 8.0, 4.0)];
    for _ in 0..3 {
        let outcome = scheduler
            .schedule_tasks(&tasks, Chronotype::Early, date(), &[] as &[Booking])
            .unwrap();
        let p = &outcome.placements[0];
        // 06:00-10:00 would cross the standup, so the task starts after it.
        assert_eq!((p.start_time, p.end_time), (t(9, 30), t(13, 30)));
        assert!(!p.overlaps(&outcome.commitments[0]));
    }
}

#[test]
fn test_shared_scheduler_serves_concurrent_runs() {
    let mut scheduler = GreedyScheduler::new();
    let lunch = RecurringCommitment::new("c1", "Lunch", t(12, 0), 1.0).unwrap();
    scheduler.add_commitment(&lunch, date()).unwrap();
    let scheduler = &scheduler;

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                s.spawn(move || {
                    let tasks: Vec<Task> = (0..n + 2)
                        .map(|i| task(&format!("w{n}-{i}"), 4.0, 3.0))
                        .collect();
                    let outcome = scheduler
                        .schedule_tasks(&tasks, Chronotype::Middle, date(), &[] as &[Booking])
                        .unwrap();
                    (tasks.len(), outcome)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Lunch splits the day: 06-09, 09-12, then 13-16, 16-19, 19-22.
    let expected_starts = [t(6, 0), t(9, 0), t(13, 0), t(16, 0), t(19, 0)];
    for (count, outcome) in results {
        assert!(outcome.waitlisted.is_empty());
        let starts: Vec<ClockTime> = outcome.placements.iter().map(|p| p.start_time).collect();
        assert_eq!(starts, expected_starts[..count].to_vec());
    }
}

fn booking_strategy() -> impl Strategy<Value = Booking> {
    (0u32..95, 1u32..=8).prop_map(|(slot, quarters)| {
        let start = slot * 15;
        let end = (start + quarters * 15).min(24 * 60);
        Booking::new(
            None,
            ClockTime::from_minutes(start).unwrap(),
            ClockTime::from_minutes(end).unwrap(),
        )
        .unwrap()
    })
}

fn task_strategy() -> impl Strategy<Value = (f64, f64)> {
    (0u32..=100, 1u32..=16).prop_map(|(p, quarters)| (f64::from(p) / 10.0, f64::from(quarters) / 4.0))
}

fn chronotype_strategy() -> impl Strategy<Value = Chronotype> {
    prop_oneof![
        Just(Chronotype::Early),
        Just(Chronotype::Middle),
        Just(Chronotype::Late),
        Just(Chronotype::Other),
    ]
}

proptest! {
    #[test]
    fn prop_no_two_intervals_overlap(
        specs in prop::collection::vec(task_strategy(), 0..25),
        bookings in prop::collection::vec(booking_strategy(), 0..6),
        chronotype in chronotype_strategy(),
    ) {
        let tasks: Vec<Task> = specs
            .iter()
            .enumerate()
            .map(|(i, &(priority, length))| task(&format!("p{i}"), priority, length))
            .collect();

        let outcome = GreedyScheduler::new()
            .schedule_tasks(&tasks, chronotype, date(), &bookings)
            .unwrap();

        prop_assert_eq!(outcome.placements.len() + outcome.waitlisted.len(), tasks.len());

        for (i, a) in outcome.placements.iter().enumerate() {
            prop_assert!(SearchWindow::FULL_DAY.contains(a.start_time, a.end_time));
            for b in &outcome.placements[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
            for booking in &bookings {
                prop_assert!(!a.overlaps(booking));
            }
        }
    }

    #[test]
    fn prop_earliest_slot_is_earliest(
        intervals in prop::collection::vec((360u32..1320, 1u32..240), 0..10),
        quarters in 1u32..=24,
    ) {
        let mut index = ConflictIndex::new();
        for &(start, len) in &intervals {
            index.insert(start, (start + len).min(1440), ());
        }
        let duration = quarters * 15;
        let window = SearchWindow::FULL_DAY;

        let free = |s: u32| !index.has_overlap(s, s + duration);
        let brute = (window.start_minutes()..=window.end_minutes() - duration).find(|&s| free(s));

        let found = find_earliest_slot(&index, f64::from(quarters) / 4.0, window);
        prop_assert_eq!(found.map(|slot| slot.start.minutes()), brute);
        if let Some(slot) = found {
            prop_assert_eq!(slot.end.minutes() - slot.start.minutes(), duration);
        }
    }

    #[test]
    fn prop_equal_priorities_keep_input_order(count in 1usize..20) {
        let tasks: Vec<Task> = (0..count).map(|i| task(&format!("e{i}"), 2.0, 3.0)).collect();
        let outcome = GreedyScheduler::new()
            .schedule_tasks(&tasks, Chronotype::Other, date(), &[] as &[Booking])
            .unwrap();

        let order: Vec<&str> = outcome
            .placements
            .iter()
            .map(|p| p.item.id())
            .chain(outcome.waitlisted.iter().map(Task::id))
            .collect();
        let expected: Vec<&str> = tasks.iter().map(Task::id).collect();
        prop_assert_eq!(order, expected);
    }
}
