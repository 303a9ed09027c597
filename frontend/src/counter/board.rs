use std::collections::HashMap;

use log::{debug, warn};

use super::driver::{InterpolationDriver, TickOutcome};
use super::element::{CounterSource, ElementId, TrackedElement};
use super::error::CounterError;
use super::schedule::{Scheduler, TaskHandle, TextSurface};
use super::visibility::{Bounds, ReplayPolicy, VisibilityTrigger};

/// Timing shared by every counter on a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSettings {
    pub threshold: f64,
    pub duration_ms: u32,
    pub stagger_ms: u32,
    pub replay: ReplayPolicy,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            duration_ms: 2000,
            stagger_ms: 0,
            replay: ReplayPolicy::Once,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    Idle,
    Observing,
    Animating,
    Settled,
}

#[derive(Debug)]
struct CounterEntry {
    element: TrackedElement,
    group: ElementId,
    state: CounterState,
    pending_start: Option<TaskHandle>,
}

/// Owns the counters of one family on the page: which group each counter
/// belongs to, the visibility trigger for the groups and the runs in flight.
///
/// A group is the element being observed. Its counters are either nested
/// inside it or the group element itself (a counter may share its group's
/// id).
#[derive(Debug)]
pub struct CounterBoard {
    settings: BoardSettings,
    trigger: VisibilityTrigger,
    driver: InterpolationDriver,
    groups: HashMap<ElementId, Vec<ElementId>>,
    counters: HashMap<ElementId, CounterEntry>,
}

impl CounterBoard {
    pub fn new(settings: BoardSettings) -> Self {
        Self {
            trigger: VisibilityTrigger::new(settings.replay),
            settings,
            driver: InterpolationDriver::new(),
            groups: HashMap::new(),
            counters: HashMap::new(),
        }
    }

    pub fn state(&self, counter: ElementId) -> Option<CounterState> {
        self.counters.get(&counter).map(|entry| entry.state)
    }

    #[cfg(test)]
    pub fn counters_in(&self, group: ElementId) -> &[ElementId] {
        self.groups.get(&group).map_or(&[], Vec::as_slice)
    }

    pub fn groups(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.groups.keys().copied()
    }

    pub fn counters(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.counters.keys().copied()
    }

    pub fn is_animating(&self, counter: ElementId) -> bool {
        self.driver.is_active(counter)
    }

    /// Starts observing `group` and parses its counters once. Counters
    /// with a missing or unparsable target are skipped. Returns how many
    /// counters were registered.
    pub fn register_group(
        &mut self,
        group: ElementId,
        bounds: Option<Bounds>,
        sources: Vec<CounterSource>,
    ) -> Result<usize, CounterError> {
        if self.groups.contains_key(&group) {
            return Ok(0);
        }
        if !self.trigger.register(group, self.settings.threshold, bounds) {
            return Err(CounterError::DetachedElement);
        }

        let mut members = Vec::with_capacity(sources.len());
        for source in sources {
            if self.counters.contains_key(&source.id) {
                continue;
            }
            match TrackedElement::parse(&source, self.settings.duration_ms) {
                Ok(element) => {
                    members.push(source.id);
                    self.counters.insert(
                        source.id,
                        CounterEntry {
                            element,
                            group,
                            state: CounterState::Observing,
                            pending_start: None,
                        },
                    );
                }
                Err(CounterError::MissingTarget) => {
                    debug!("skipping counter {:?}: no target", source.id);
                }
                Err(err) => warn!("skipping counter {:?}: {}", source.id, err),
            }
        }

        let registered = members.len();
        self.groups.insert(group, members);
        Ok(registered)
    }

    /// Feeds an intersection ratio for `group`. When the group becomes
    /// visible, its counters start one `stagger_ms` apart. Returns whether
    /// the group fired.
    pub fn on_visibility<S: Scheduler>(&mut self, group: ElementId, ratio: f64, scheduler: &mut S) -> bool {
        if !self.trigger.report(group, ratio) {
            return false;
        }
        let Some(members) = self.groups.get(&group) else {
            return true;
        };

        let mut slot = 0u32;
        for id in members {
            let Some(entry) = self.counters.get_mut(id) else {
                continue;
            };
            let eligible = match entry.state {
                CounterState::Observing => true,
                CounterState::Settled => self.settings.replay == ReplayPolicy::EveryEntry,
                CounterState::Idle | CounterState::Animating => false,
            };
            if !eligible {
                continue;
            }

            entry.state = CounterState::Animating;
            let delay = slot.saturating_mul(self.settings.stagger_ms);
            slot += 1;
            if delay == 0 {
                self.driver.start(&entry.element, scheduler);
            } else {
                entry.pending_start = Some(scheduler.set_timeout(*id, delay));
            }
        }
        true
    }

    /// A staggered start came due.
    pub fn on_timer<S: Scheduler>(&mut self, counter: ElementId, scheduler: &mut S) -> bool {
        let Some(entry) = self.counters.get_mut(&counter) else {
            return false;
        };
        if entry.pending_start.take().is_none() || entry.state != CounterState::Animating {
            return false;
        }
        self.driver.start(&entry.element, scheduler)
    }

    pub fn on_frame<S: Scheduler, T: TextSurface>(
        &mut self,
        counter: ElementId,
        timestamp_ms: f64,
        scheduler: &mut S,
        surface: &mut T,
    ) -> TickOutcome {
        let Some(entry) = self.counters.get_mut(&counter) else {
            return TickOutcome::Ignored;
        };
        let outcome = self.driver.tick(counter, timestamp_ms, scheduler, surface);
        if outcome == TickOutcome::Completed {
            entry.state = CounterState::Settled;
        }
        outcome
    }

    /// Jumps an animating counter straight to its final value, for when its
    /// frames cannot be scheduled.
    pub fn finish<S: Scheduler, T: TextSurface>(&mut self, counter: ElementId, scheduler: &mut S, surface: &mut T) -> bool {
        let Some(entry) = self.counters.get_mut(&counter) else {
            return false;
        };
        if entry.state != CounterState::Animating {
            return false;
        }
        if let Some(pending) = entry.pending_start.take() {
            scheduler.cancel(pending);
        }
        self.driver.cancel(counter, scheduler);
        surface.set_text(counter, &entry.element.final_text());
        entry.state = CounterState::Settled;
        true
    }

    /// Returns a settled counter to its start value. While its group is
    /// still registered it goes straight back to observing and the group is
    /// re-armed, so the next entry replays it once.
    pub fn reset<T: TextSurface>(&mut self, counter: ElementId, surface: &mut T) -> Option<CounterState> {
        let entry = self.counters.get_mut(&counter)?;
        if entry.state != CounterState::Settled {
            return Some(entry.state);
        }

        surface.set_text(counter, &entry.element.start_text());
        entry.state = CounterState::Idle;
        if self.trigger.is_registered(entry.group) {
            self.trigger.reset(entry.group);
            entry.state = CounterState::Observing;
        }
        Some(entry.state)
    }

    /// Shows every final value right away, for visitors who prefer reduced
    /// motion.
    pub fn settle_all<S: Scheduler, T: TextSurface>(&mut self, scheduler: &mut S, surface: &mut T) {
        for (id, entry) in self.counters.iter_mut() {
            if entry.state == CounterState::Settled {
                continue;
            }
            if let Some(pending) = entry.pending_start.take() {
                scheduler.cancel(pending);
            }
            self.driver.cancel(*id, scheduler);
            surface.set_text(*id, &entry.element.final_text());
            entry.state = CounterState::Settled;
        }
    }

    /// Stops observing `group` and cancels everything its counters had
    /// scheduled. Nothing is written for them afterwards.
    pub fn unregister_group<S: Scheduler>(&mut self, group: ElementId, scheduler: &mut S) -> bool {
        self.trigger.unregister(group);
        let Some(members) = self.groups.remove(&group) else {
            return false;
        };
        for id in members {
            if let Some(entry) = self.counters.remove(&id) {
                if let Some(pending) = entry.pending_start {
                    scheduler.cancel(pending);
                }
            }
            self.driver.cancel(id, scheduler);
        }
        true
    }

    pub fn teardown<S: Scheduler>(&mut self, scheduler: &mut S) {
        let groups: Vec<ElementId> = self.groups.keys().copied().collect();
        for group in groups {
            self.unregister_group(group, scheduler);
        }
        self.driver.cancel_all(scheduler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::element::SuffixRule;
    use crate::counter::testing::{run_frames, ManualScheduler, RecordingSurface};

    const GROUP: ElementId = ElementId(100);

    fn stat_rule() -> SuffixRule {
        SuffixRule::UnlessTarget {
            suffix: "+".to_string(),
            except: 98,
        }
    }

    fn bounds() -> Option<Bounds> {
        Some(Bounds::new(800.0, 400.0))
    }

    fn stats_board(settings: BoardSettings) -> CounterBoard {
        let mut board = CounterBoard::new(settings);
        let sources = vec![
            CounterSource::new(ElementId(1), Some("250")).with_suffix(stat_rule()),
            CounterSource::new(ElementId(2), Some("98")).with_suffix(stat_rule()),
            CounterSource::new(ElementId(3), Some("15")).with_suffix(stat_rule()),
        ];
        assert_eq!(board.register_group(GROUP, bounds(), sources), Ok(3));
        board
    }

    #[test]
    fn visible_group_counts_every_member_to_its_final_text() {
        let mut board = stats_board(BoardSettings {
            stagger_ms: 150,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();

        assert!(board.on_visibility(GROUP, 0.5, &mut scheduler));
        // The first counter starts at once, the others wait for their slot.
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.pending_timers(), 2);

        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);

        assert_eq!(surface.last(ElementId(1)), Some("250+"));
        assert_eq!(surface.last(ElementId(2)), Some("98"));
        assert_eq!(surface.last(ElementId(3)), Some("15+"));
        for id in [1, 2, 3] {
            assert_eq!(board.state(ElementId(id)), Some(CounterState::Settled));
        }
    }

    #[test]
    fn stagger_delays_later_counters() {
        let mut board = stats_board(BoardSettings {
            stagger_ms: 150,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();
        board.on_visibility(GROUP, 1.0, &mut scheduler);

        run_frames(&mut board, &mut scheduler, &mut surface, 10.0, 10);
        assert!(!surface.texts(ElementId(1)).is_empty());
        assert!(surface.texts(ElementId(2)).is_empty());
        assert!(surface.texts(ElementId(3)).is_empty());
        assert_eq!(board.state(ElementId(3)), Some(CounterState::Animating));
        assert!(!board.is_animating(ElementId(3)));
    }

    #[test]
    fn never_visible_means_never_written() {
        let mut board = stats_board(BoardSettings::default());
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();

        assert!(!board.on_visibility(GROUP, 0.0, &mut scheduler));
        assert!(!board.on_visibility(GROUP, 0.05, &mut scheduler));
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 500);

        assert!(surface.writes.is_empty());
        assert_eq!(board.state(ElementId(1)), Some(CounterState::Observing));
    }

    #[test]
    fn one_shot_group_does_not_replay() {
        let mut board = stats_board(BoardSettings::default());
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();

        board.on_visibility(GROUP, 1.0, &mut scheduler);
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);
        let writes = surface.writes.len();

        board.on_visibility(GROUP, 0.0, &mut scheduler);
        assert!(!board.on_visibility(GROUP, 1.0, &mut scheduler));
        assert!(scheduler.is_idle());
        assert_eq!(surface.writes.len(), writes);
    }

    #[test]
    fn every_entry_group_replays_settled_counters() {
        let mut board = stats_board(BoardSettings {
            replay: ReplayPolicy::EveryEntry,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();

        board.on_visibility(GROUP, 1.0, &mut scheduler);
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);
        board.on_visibility(GROUP, 0.0, &mut scheduler);
        assert!(board.on_visibility(GROUP, 1.0, &mut scheduler));
        assert_eq!(board.state(ElementId(1)), Some(CounterState::Animating));

        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);
        let finals = surface.texts(ElementId(1)).iter().filter(|t| **t == "250+").count();
        assert_eq!(finals, 2);
    }

    #[test]
    fn reentry_while_animating_keeps_a_single_run() {
        let mut board = stats_board(BoardSettings {
            replay: ReplayPolicy::EveryEntry,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();

        board.on_visibility(GROUP, 1.0, &mut scheduler);
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 5);
        board.on_visibility(GROUP, 0.0, &mut scheduler);
        board.on_visibility(GROUP, 1.0, &mut scheduler);

        // One frame in flight per counter, no duplicates.
        assert_eq!(scheduler.pending_frames(), 3);
    }

    #[test]
    fn reset_allows_exactly_one_more_run() {
        let mut board = stats_board(BoardSettings::default());
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();
        let counter = ElementId(1);

        board.on_visibility(GROUP, 1.0, &mut scheduler);
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);
        assert_eq!(board.state(counter), Some(CounterState::Settled));

        assert_eq!(board.reset(counter, &mut surface), Some(CounterState::Observing));
        assert_eq!(surface.last(counter), Some("0"));

        board.on_visibility(GROUP, 0.0, &mut scheduler);
        assert!(board.on_visibility(GROUP, 1.0, &mut scheduler));
        assert_eq!(board.state(counter), Some(CounterState::Animating));
        // Counters that were not reset stay settled.
        assert_eq!(board.state(ElementId(2)), Some(CounterState::Settled));
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);
        assert_eq!(board.state(counter), Some(CounterState::Settled));

        board.on_visibility(GROUP, 0.0, &mut scheduler);
        assert!(!board.on_visibility(GROUP, 1.0, &mut scheduler));
        let finals = surface.texts(counter).iter().filter(|t| **t == "250+").count();
        assert_eq!(finals, 2);
    }

    #[test]
    fn reset_of_an_unsettled_counter_changes_nothing() {
        let mut board = stats_board(BoardSettings::default());
        let mut surface = RecordingSurface::new();
        assert_eq!(board.reset(ElementId(1), &mut surface), Some(CounterState::Observing));
        assert_eq!(board.reset(ElementId(42), &mut surface), None);
        assert!(surface.writes.is_empty());
    }

    #[test]
    fn reset_after_unregister_leaves_counter_idle() {
        let mut board = CounterBoard::new(BoardSettings::default());
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();
        let counter = ElementId(5);
        board
            .register_group(counter, bounds(), vec![CounterSource::new(counter, Some("12"))])
            .unwrap();
        board.on_visibility(counter, 1.0, &mut scheduler);
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);

        board.trigger.unregister(counter);
        assert_eq!(board.reset(counter, &mut surface), Some(CounterState::Idle));
    }

    #[test]
    fn unregister_mid_animation_stops_writes() {
        let mut board = stats_board(BoardSettings {
            stagger_ms: 150,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();

        board.on_visibility(GROUP, 1.0, &mut scheduler);
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 20);
        let writes = surface.writes.len();
        assert!(writes > 0);

        assert!(board.unregister_group(GROUP, &mut scheduler));
        assert!(scheduler.is_idle());
        scheduler.advance(5000.0);
        for id in [1, 2, 3] {
            let now = scheduler.now();
            assert_eq!(
                board.on_frame(ElementId(id), now, &mut scheduler, &mut surface),
                TickOutcome::Ignored
            );
            assert!(!board.on_timer(ElementId(id), &mut scheduler));
        }
        assert_eq!(surface.writes.len(), writes);
        assert_eq!(board.state(ElementId(1)), None);
    }

    #[test]
    fn bad_targets_are_skipped_without_failing_the_group() {
        let mut board = CounterBoard::new(BoardSettings::default());
        let sources = vec![
            CounterSource::new(ElementId(1), Some("12")),
            CounterSource::new(ElementId(2), Some("twelve")),
            CounterSource::new(ElementId(3), None),
        ];
        assert_eq!(board.register_group(GROUP, bounds(), sources), Ok(1));
        assert_eq!(board.counters_in(GROUP), &[ElementId(1)]);
        assert_eq!(board.state(ElementId(2)), None);
        assert_eq!(board.state(ElementId(3)), None);
    }

    #[test]
    fn detached_group_is_not_registered() {
        let mut board = CounterBoard::new(BoardSettings::default());
        let mut scheduler = ManualScheduler::new();
        let sources = vec![CounterSource::new(ElementId(1), Some("12"))];
        assert_eq!(
            board.register_group(GROUP, None, sources),
            Err(CounterError::DetachedElement)
        );
        assert!(!board.on_visibility(GROUP, 1.0, &mut scheduler));
        assert_eq!(board.state(ElementId(1)), None);
    }

    #[test]
    fn settle_all_writes_final_values_immediately() {
        let mut board = stats_board(BoardSettings {
            stagger_ms: 150,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();
        board.on_visibility(GROUP, 1.0, &mut scheduler);

        board.settle_all(&mut scheduler, &mut surface);

        assert!(scheduler.is_idle());
        assert_eq!(surface.last(ElementId(1)), Some("250+"));
        assert_eq!(surface.last(ElementId(2)), Some("98"));
        assert_eq!(board.state(ElementId(3)), Some(CounterState::Settled));
    }

    #[test]
    fn teardown_cancels_everything() {
        let mut board = stats_board(BoardSettings {
            stagger_ms: 150,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        board.on_visibility(GROUP, 1.0, &mut scheduler);
        assert!(!scheduler.is_idle());

        board.teardown(&mut scheduler);
        assert!(scheduler.is_idle());
        assert!(board.counters_in(GROUP).is_empty());
    }

    #[test]
    fn finish_jumps_to_final_text_when_frames_are_unavailable() {
        let mut board = stats_board(BoardSettings {
            stagger_ms: 150,
            ..BoardSettings::default()
        });
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();
        board.on_visibility(GROUP, 1.0, &mut scheduler);

        // One running, one waiting on its stagger slot.
        assert!(board.finish(ElementId(1), &mut scheduler, &mut surface));
        assert!(board.finish(ElementId(2), &mut scheduler, &mut surface));
        assert_eq!(surface.last(ElementId(1)), Some("250+"));
        assert_eq!(surface.last(ElementId(2)), Some("98"));
        assert_eq!(board.state(ElementId(1)), Some(CounterState::Settled));
        assert!(!board.is_animating(ElementId(1)));
        assert_eq!(scheduler.cancelled.len(), 2);

        let writes = surface.writes.len();
        scheduler.advance(1000.0);
        let due = scheduler.take_due_timers();
        for id in due {
            board.on_timer(id, &mut scheduler);
        }
        run_frames(&mut board, &mut scheduler, &mut surface, 16.0, 10_000);
        // Only the untouched third counter keeps animating.
        assert!(surface.writes[writes..].iter().all(|(id, _)| *id == ElementId(3)));
        assert_eq!(surface.last(ElementId(1)), Some("250+"));
    }

    #[test]
    fn finish_ignores_counters_that_are_not_animating() {
        let mut board = stats_board(BoardSettings::default());
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();

        assert!(!board.finish(ElementId(1), &mut scheduler, &mut surface));
        assert!(!board.finish(ElementId(42), &mut scheduler, &mut surface));
        assert!(surface.writes.is_empty());
        assert_eq!(board.state(ElementId(1)), Some(CounterState::Observing));
    }
}
