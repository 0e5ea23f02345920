use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use milestone_timeline::engine::snapshot::Unavailable;
use milestone_timeline::engine::{
    derive_status, Clock, EngineSettings, SnapshotError, SnapshotRenderer, StatusThresholds,
    TimelineImage,
};
use milestone_timeline::io::SessionStore;
use milestone_timeline::model::milestone::ADD_CONCERN_ID;
use milestone_timeline::{
    Category, Milestone, MilestoneCollectionState, MilestoneEngine, MilestoneStatus,
};

/// Clock that only moves when told to.
#[derive(Clone)]
struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

struct FixedRenderer {
    result: Result<TimelineImage, SnapshotError>,
    calls: usize,
}

impl SnapshotRenderer for FixedRenderer {
    fn capture_timeline_snapshot(&mut self) -> Result<TimelineImage, SnapshotError> {
        self.calls += 1;
        self.result.clone()
    }
}

type Emitted = Rc<RefCell<Vec<MilestoneCollectionState>>>;

fn engine_with(
    data: Option<MilestoneCollectionState>,
    interval: Duration,
) -> (MilestoneEngine, Emitted, ManualClock) {
    let emitted: Emitted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emitted);
    let clock = ManualClock::new();
    let settings = EngineSettings {
        min_write_interval: interval,
        ..EngineSettings::default()
    };
    let engine = MilestoneEngine::with_clock(
        data,
        settings,
        Box::new(move |state: &MilestoneCollectionState| {
            sink.borrow_mut().push(state.clone())
        }),
        Box::new(clock.clone()),
    );
    (engine, emitted, clock)
}

fn engine() -> (MilestoneEngine, Emitted, ManualClock) {
    engine_with(None, Duration::ZERO)
}

fn sentinel_count(state: &MilestoneCollectionState) -> usize {
    state
        .milestones
        .iter()
        .filter(|m| m.id == ADD_CONCERN_ID)
        .count()
}

#[test]
fn starts_from_catalog_when_data_is_missing_or_empty() {
    let (engine, emitted, _) = engine();
    assert!(engine.state().milestones.len() > 20);
    assert_eq!(sentinel_count(engine.state()), 1);
    assert!(engine.state().placed().next().is_none());
    assert!(emitted.borrow().is_empty());

    let empty = MilestoneCollectionState {
        milestones: Vec::new(),
        ..MilestoneCollectionState::default()
    };
    let (engine, _, _) = engine_with(Some(empty), Duration::ZERO);
    assert!(engine.milestone("head_control").is_some());
}

#[test]
fn head_control_scenarios() {
    let (mut engine, _, _) = engine();

    assert!(engine.place_milestone("head_control", 3));
    assert_eq!(engine.milestone("head_control").unwrap().status, MilestoneStatus::Typical);

    engine.place_milestone("head_control", 7);
    assert_eq!(engine.milestone("head_control").unwrap().status, MilestoneStatus::Monitor);

    engine.place_milestone("head_control", 15);
    assert_eq!(engine.milestone("head_control").unwrap().status, MilestoneStatus::Delayed);

    // Under the stricter preset month 15 is still delayed.
    assert_eq!(
        derive_status(Some(15), 3, &StatusThresholds::STRICT),
        MilestoneStatus::Delayed
    );
}

#[test]
fn placement_touches_only_its_target() {
    let (mut engine, emitted, _) = engine();
    engine.place_milestone("walking", 12);
    let before = engine.state().milestones.clone();

    engine.place_milestone("babbling", 6);

    for (old, new) in before.iter().zip(&engine.state().milestones) {
        if new.id != "babbling" {
            assert_eq!(old.actual_age, new.actual_age, "{}", new.id);
        }
    }
    let last = emitted.borrow().last().cloned().unwrap();
    assert_eq!(last.find("babbling").unwrap().actual_age, Some(6));
}

#[test]
fn unknown_id_and_sentinel_are_ignored() {
    let (mut engine, emitted, _) = engine();
    let before = engine.state().clone();

    assert!(!engine.place_milestone("no_such_milestone", 5));
    assert!(!engine.place_milestone(ADD_CONCERN_ID, 5));
    assert!(!engine.unplace_milestone("no_such_milestone"));

    assert_eq!(engine.state(), &before);
    assert!(emitted.borrow().is_empty());
}

#[test]
fn boundary_months_are_accepted() {
    let (mut engine, _, _) = engine();
    assert!(engine.place_milestone("cooing", 0));
    assert!(engine.place_milestone("sentences", 72));

    for id in ["cooing", "sentences"] {
        assert_ne!(engine.milestone(id).unwrap().status, MilestoneStatus::Pending);
    }
    assert_eq!(engine.milestone("cooing").unwrap().actual_age, Some(0));
    assert_eq!(engine.milestone("sentences").unwrap().actual_age, Some(72));
}

#[test]
fn months_past_max_age_are_clamped() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 500);
    assert_eq!(engine.milestone("walking").unwrap().actual_age, Some(72));
}

#[test]
fn unplaced_milestones_are_pending() {
    let (mut engine, _, _) = engine();
    assert!(engine
        .state()
        .milestones
        .iter()
        .all(|m| m.status == MilestoneStatus::Pending));

    engine.place_milestone("walking", 20);
    assert!(engine.unplace_milestone("walking"));
    let walking = engine.milestone("walking").unwrap();
    assert_eq!(walking.status, MilestoneStatus::Pending);
    assert_eq!(walking.actual_age, None);
    assert_eq!(walking.stack_position, None);

    // Nothing left to remove.
    assert!(!engine.unplace_milestone("walking"));
}

#[test]
fn same_month_gets_different_rows() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("first_words", 12);
    engine.place_milestone("walking", 12);

    let a = engine.milestone("first_words").unwrap().stack_position;
    let b = engine.milestone("walking").unwrap().stack_position;
    assert!(a.is_some() && b.is_some());
    assert_ne!(a, b);
}

#[test]
fn placement_sequence_is_deterministic() {
    let sequence = [
        ("walking", 12),
        ("first_words", 12),
        ("pointing", 13),
        ("waves_bye", 11),
        ("babbling", 6),
        ("running", 12),
        ("first_words", 14),
    ];
    let run = || {
        let (mut engine, _, _) = engine();
        for (id, month) in sequence {
            engine.place_milestone(id, month);
        }
        engine
            .state()
            .milestones
            .iter()
            .map(|m| (m.id.clone(), m.stack_position))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn rows_stay_within_cap() {
    let (mut engine, _, _) = engine();
    let ids: Vec<String> = engine
        .state()
        .milestones
        .iter()
        .filter(|m| !m.is_sentinel())
        .map(|m| m.id.clone())
        .collect();
    for id in &ids {
        engine.place_milestone(id, 24);
    }
    let max_rows = engine.settings().layout.max_rows;
    assert!(engine
        .state()
        .placed()
        .all(|m| m.stack_position.unwrap() < max_rows));
}

#[test]
fn custom_concern_round_trip() {
    let (mut engine, emitted, _) = engine();
    let before = engine.state().milestones.len();

    let id = engine.add_custom_concern("Echolalia").unwrap();

    let state = engine.state();
    assert_eq!(state.milestones.len(), before + 1);
    let matches: Vec<_> = state
        .milestones
        .iter()
        .filter(|m| m.title == "Echolalia")
        .collect();
    assert_eq!(matches.len(), 1);
    let concern = matches[0];
    assert_eq!(concern.id, id);
    assert_eq!(concern.category, Category::Concerns);
    assert_eq!(concern.expected_age, 0);
    assert!(concern.is_custom);
    assert_eq!(sentinel_count(state), 1);
    assert_eq!(state.milestones.last().unwrap().id, ADD_CONCERN_ID);
    assert_eq!(emitted.borrow().len(), 1);
}

#[test]
fn custom_concern_text_is_trimmed_and_bounded() {
    let (mut engine, _, _) = engine();
    let before = engine.state().milestones.len();
    assert!(engine.add_custom_concern("   ").is_none());
    assert_eq!(engine.state().milestones.len(), before);

    let long = "x".repeat(80);
    let id = engine.add_custom_concern(&format!("  {long}  ")).unwrap();
    assert_eq!(engine.milestone(&id).unwrap().title.chars().count(), 50);

    let other = engine.add_custom_concern("Echolalia").unwrap();
    assert_ne!(id, other);
}

#[test]
fn custom_concern_can_be_placed() {
    let (mut engine, _, _) = engine();
    let id = engine.add_custom_concern("Toe walking").unwrap();
    assert!(engine.place_milestone(&id, 30));
    assert_eq!(engine.milestone(&id).unwrap().status, MilestoneStatus::Typical);
}

#[test]
fn history_is_independent_of_placements() {
    let (mut engine, emitted, _) = engine();
    engine.place_milestone("walking", 12);
    engine.set_history("Born at 38 weeks.");

    assert_eq!(engine.state().history, "Born at 38 weeks.");
    assert_eq!(engine.milestone("walking").unwrap().actual_age, Some(12));
    assert_eq!(emitted.borrow().len(), 2);

    // Unchanged text does not emit.
    engine.set_history("Born at 38 weeks.");
    assert_eq!(emitted.borrow().len(), 2);
}

#[test]
fn report_toggle_is_symmetric() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 12);
    let initial = (
        engine.state().timeline_image.clone(),
        engine.state().milestone_timeline_data.clone(),
    );
    assert_eq!(initial, (None, None));

    engine.set_include_timeline_in_report(true);
    assert!(engine.needs_snapshot());
    engine.export_snapshot(&mut FixedRenderer {
        result: Ok(TimelineImage::new(1, 1, vec![0, 0, 0, 255])),
        calls: 0,
    });
    assert!(engine.state().timeline_image.is_some());
    assert!(engine.state().milestone_timeline_data.is_some());

    engine.set_include_timeline_in_report(false);
    assert_eq!(engine.state().timeline_image, None);
    assert_eq!(engine.state().milestone_timeline_data, None);
    assert!(!engine.needs_snapshot());
}

#[test]
fn snapshot_writes_summary_and_image() {
    let (mut engine, emitted, _) = engine();
    engine.place_milestone("head_control", 3);
    let id = engine.add_custom_concern("Echolalia").unwrap();
    engine.place_milestone(&id, 20);
    engine.set_include_timeline_in_report(true);

    let mut renderer = FixedRenderer {
        result: Ok(TimelineImage::new(2, 2, vec![255; 16])),
        calls: 0,
    };
    engine.export_snapshot(&mut renderer);

    assert_eq!(renderer.calls, 1);
    assert!(!engine.needs_snapshot());
    let state = engine.state();
    assert!(state
        .timeline_image
        .as_deref()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    let summary = state.milestone_timeline_data.as_deref().unwrap();
    let records: Vec<&str> = summary.split("||").collect();
    assert_eq!(records.len(), 2);
    assert!(records.contains(&"Head control|Expected at 3 months|3|3|typical"));
    assert!(records.contains(&"Echolalia|Custom milestone|N/A|20|typical"));
    assert_eq!(emitted.borrow().last().unwrap(), state);
}

#[test]
fn render_failure_keeps_summary() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 12);
    engine.set_include_timeline_in_report(true);

    engine.export_snapshot(&mut Unavailable(SnapshotError::NotMounted));

    assert_eq!(engine.state().timeline_image, None);
    assert!(engine
        .state()
        .milestone_timeline_data
        .as_deref()
        .unwrap()
        .starts_with("Walking independently|"));
}

#[test]
fn bad_pixels_leave_image_empty() {
    let (mut engine, _, _) = engine();
    engine.set_include_timeline_in_report(true);
    engine.export_snapshot(&mut FixedRenderer {
        result: Ok(TimelineImage::new(10, 10, vec![0; 3])),
        calls: 0,
    });
    assert_eq!(engine.state().timeline_image, None);
    assert!(engine.state().milestone_timeline_data.is_some());
}

#[test]
fn snapshot_without_inclusion_clears_artifacts() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 12);
    let mut renderer = FixedRenderer {
        result: Ok(TimelineImage::new(1, 1, vec![0; 4])),
        calls: 0,
    };
    engine.export_snapshot(&mut renderer);

    assert_eq!(renderer.calls, 0);
    assert_eq!(engine.state().timeline_image, None);
    assert_eq!(engine.state().milestone_timeline_data, None);
}

#[test]
fn placements_mark_snapshot_stale_only_when_included() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 12);
    assert!(!engine.needs_snapshot());

    engine.set_include_timeline_in_report(true);
    engine.export_snapshot(&mut Unavailable(SnapshotError::TimedOut));
    assert!(!engine.needs_snapshot());

    engine.place_milestone("running", 18);
    assert!(engine.needs_snapshot());
    assert!(engine
        .state()
        .milestone_timeline_data
        .as_deref()
        .unwrap()
        .contains("Running|"));
}

#[test]
fn rapid_writes_are_deferred_not_dropped() {
    let (mut engine, emitted, clock) = engine_with(None, Duration::from_secs(1));

    engine.place_milestone("walking", 12);
    assert_eq!(emitted.borrow().len(), 1);

    clock.advance(Duration::from_millis(100));
    engine.place_milestone("running", 18);
    engine.set_history("Rapid edit");
    assert_eq!(emitted.borrow().len(), 1);
    assert!(engine.has_pending_write());
    assert_eq!(engine.time_until_flush(), Some(Duration::from_millis(900)));

    clock.advance(Duration::from_millis(500));
    assert!(!engine.flush_pending());
    assert_eq!(emitted.borrow().len(), 1);

    clock.advance(Duration::from_millis(400));
    assert!(engine.flush_pending());
    assert!(!engine.flush_pending());

    let emitted = emitted.borrow();
    assert_eq!(emitted.len(), 2);
    let last = emitted.last().unwrap();
    assert_eq!(last.find("running").unwrap().actual_age, Some(18));
    assert_eq!(last.history, "Rapid edit");
}

#[test]
fn flush_now_ignores_the_interval() {
    let (mut engine, emitted, _) = engine_with(None, Duration::from_secs(1));
    assert!(!engine.flush_now());

    engine.set_history("a");
    engine.set_history("ab");
    assert!(engine.flush_now());
    assert_eq!(emitted.borrow().len(), 2);
    assert_eq!(emitted.borrow()[1].history, "ab");
    assert!(!engine.has_pending_write());
}

#[test]
fn engines_do_not_share_write_windows() {
    let (mut first, first_emitted, _) = engine_with(None, Duration::from_secs(1));
    let (mut second, second_emitted, _) = engine_with(None, Duration::from_secs(1));

    first.set_history("one");
    second.set_history("two");

    assert_eq!(first_emitted.borrow().len(), 1);
    assert_eq!(second_emitted.borrow().len(), 1);
}

#[test]
fn last_updated_moves_on_commit() {
    let (mut engine, _, _) = engine();
    let before = engine.state().last_updated;
    std::thread::sleep(Duration::from_millis(2));
    engine.set_history("x");
    assert!(engine.state().last_updated > before);
}

#[test]
fn loaded_data_is_normalized() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 12);
    let mut data = engine.state().clone();

    // Simulate a hand-edited file: sentinel removed, stale status and rows,
    // a duplicate entry and artifacts left behind.
    data.milestones.retain(|m| m.id != ADD_CONCERN_ID);
    let walking = data
        .milestones
        .iter_mut()
        .find(|m| m.id == "walking")
        .unwrap();
    walking.status = MilestoneStatus::Pending;
    walking.stack_position = None;
    walking.actual_age = Some(200);
    let duplicate = data.milestones[0].clone();
    data.milestones.push(duplicate);
    data.timeline_image = Some("data:image/png;base64,AAAA".into());

    let (engine, _, _) = engine_with(Some(data), Duration::ZERO);
    let state = engine.state();
    assert_eq!(sentinel_count(state), 1);
    let walking = state.find("walking").unwrap();
    assert_eq!(walking.actual_age, Some(72));
    assert_eq!(walking.status, MilestoneStatus::Delayed);
    assert!(walking.stack_position.is_some());
    let first_id = &state.milestones[0].id;
    assert_eq!(state.milestones.iter().filter(|m| &m.id == first_id).count(), 1);
    assert_eq!(state.timeline_image, None);
}

#[test]
fn loaded_sentinel_and_rows_are_repaired() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 12);
    let mut data = engine.state().clone();
    for m in &mut data.milestones {
        if m.id == ADD_CONCERN_ID {
            m.title = "Add".into();
            m.category = Category::Motor;
        }
        if m.id == "walking" {
            m.stack_position = Some(40);
        }
    }

    let (engine, _, _) = engine_with(Some(data), Duration::ZERO);
    let state = engine.state();
    let sentinel = state.find(ADD_CONCERN_ID).unwrap();
    assert_eq!(sentinel, &Milestone::add_concern_sentinel());
    let max_rows = engine.settings().layout.max_rows;
    assert!(state.find("walking").unwrap().stack_position.unwrap() < max_rows);
}

#[test]
fn capture_taken_before_a_change_stays_stale() {
    let (mut engine, _, _) = engine();
    engine.place_milestone("walking", 12);
    engine.set_include_timeline_in_report(true);

    // Screenshot requested, then a placement lands before it arrives.
    let requested = engine.timeline_revision();
    engine.place_milestone("running", 18);
    let mut renderer = FixedRenderer {
        result: Ok(TimelineImage::new(1, 1, vec![0, 0, 0, 255])),
        calls: 0,
    };
    engine.export_captured_snapshot(&mut renderer, requested);

    assert!(engine.state().timeline_image.is_some());
    assert!(engine.needs_snapshot());

    let current = engine.timeline_revision();
    engine.export_captured_snapshot(&mut renderer, current);
    assert!(!engine.needs_snapshot());

    // History is not drawn on the timeline.
    let current = engine.timeline_revision();
    engine.set_history("notes");
    engine.export_captured_snapshot(&mut renderer, current);
    assert!(!engine.needs_snapshot());
}

#[test]
fn reset_restores_catalog() {
    let (mut engine, emitted, _) = engine();
    engine.place_milestone("walking", 12);
    engine.add_custom_concern("Echolalia");
    engine.set_history("notes");

    engine.reset();

    let state = engine.state();
    assert!(state.placed().next().is_none());
    assert!(state.milestones.iter().all(|m| !m.is_custom));
    assert!(state.history.is_empty());
    assert_eq!(emitted.borrow().last().unwrap(), state);
}

#[test]
fn session_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    assert!(store.load().unwrap().is_none());

    let sink = store.clone();
    let mut engine = MilestoneEngine::new(
        None,
        EngineSettings {
            min_write_interval: Duration::ZERO,
            ..EngineSettings::default()
        },
        Box::new(move |state: &MilestoneCollectionState| sink.save(state).unwrap()),
    );
    engine.place_milestone("walking", 14);
    let id = engine.add_custom_concern("Echolalia").unwrap();
    engine.set_history("Born at term.");

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(&loaded, engine.state());

    let restored = MilestoneEngine::new(
        Some(loaded),
        EngineSettings::default(),
        Box::new(|_: &MilestoneCollectionState| {}),
    );
    assert_eq!(restored.milestone("walking").unwrap().actual_age, Some(14));
    assert!(restored.milestone(&id).unwrap().is_custom);
    assert_eq!(restored.state().history, "Born at term.");
}
