//! Virtual-clock scheduler and recording surface for counter tests.

use std::collections::BTreeMap;

use super::board::CounterBoard;
use super::element::ElementId;
use super::schedule::{Scheduler, TaskHandle, TextSurface};

#[derive(Debug, Clone, Copy)]
enum Task {
    Frame(ElementId),
    Timer { element: ElementId, due: f64 },
}

#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: f64,
    next: u64,
    tasks: BTreeMap<u64, Task>,
    pub cancelled: Vec<TaskHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }

    pub fn pending_frames(&self) -> usize {
        self.tasks.values().filter(|t| matches!(t, Task::Frame(_))).count()
    }

    pub fn pending_timers(&self) -> usize {
        self.tasks.values().filter(|t| matches!(t, Task::Timer { .. })).count()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes and returns every requested frame, in request order.
    pub fn take_frames(&mut self) -> Vec<ElementId> {
        let handles: Vec<u64> = self
            .tasks
            .iter()
            .filter(|(_, t)| matches!(t, Task::Frame(_)))
            .map(|(h, _)| *h)
            .collect();
        handles
            .into_iter()
            .filter_map(|h| match self.tasks.remove(&h) {
                Some(Task::Frame(element)) => Some(element),
                _ => None,
            })
            .collect()
    }

    /// Removes and returns timers whose delay has elapsed.
    pub fn take_due_timers(&mut self) -> Vec<ElementId> {
        let now = self.now;
        let handles: Vec<u64> = self
            .tasks
            .iter()
            .filter(|(_, t)| matches!(t, Task::Timer { due, .. } if *due <= now))
            .map(|(h, _)| *h)
            .collect();
        handles
            .into_iter()
            .filter_map(|h| match self.tasks.remove(&h) {
                Some(Task::Timer { element, .. }) => Some(element),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, task: Task) -> TaskHandle {
        self.next += 1;
        self.tasks.insert(self.next, task);
        TaskHandle(self.next)
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self, element: ElementId) -> TaskHandle {
        self.push(Task::Frame(element))
    }

    fn set_timeout(&mut self, element: ElementId, delay_ms: u32) -> TaskHandle {
        let due = self.now + f64::from(delay_ms);
        self.push(Task::Timer { element, due })
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.tasks.remove(&handle.0).is_some() {
            self.cancelled.push(handle);
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub writes: Vec<(ElementId, String)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self, element: ElementId) -> Vec<&str> {
        self.writes
            .iter()
            .filter(|(id, _)| *id == element)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    pub fn last(&self, element: ElementId) -> Option<&str> {
        self.texts(element).last().copied()
    }
}

impl TextSurface for RecordingSurface {
    fn set_text(&mut self, element: ElementId, text: &str) {
        self.writes.push((element, text.to_string()));
    }
}

/// Advances virtual time by `step_ms` per frame, firing due timers and
/// frames, until nothing is pending or `max_frames` is reached.
pub fn run_frames(
    board: &mut CounterBoard,
    scheduler: &mut ManualScheduler,
    surface: &mut RecordingSurface,
    step_ms: f64,
    max_frames: usize,
) -> usize {
    let mut frames = 0;
    while frames < max_frames && !scheduler.is_idle() {
        scheduler.advance(step_ms);
        for element in scheduler.take_due_timers() {
            board.on_timer(element, scheduler);
        }
        for element in scheduler.take_frames() {
            let now = scheduler.now();
            board.on_frame(element, now, scheduler, surface);
        }
        frames += 1;
    }
    frames
}
