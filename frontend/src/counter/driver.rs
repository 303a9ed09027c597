use std::collections::HashMap;

use log::debug;

use super::easing::{ease_out_quart, interpolate};
use super::element::{ElementId, TrackedElement};
use super::schedule::{Scheduler, TaskHandle, TextSurface};

/// What a frame did to its run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No run is active for the element; nothing was written.
    Ignored,
    Running { value: u64, progress: f64 },
    /// The final text was written and the run dropped.
    Completed,
}

#[derive(Debug)]
struct AnimationRun {
    element: TrackedElement,
    started_at: Option<f64>,
    elapsed: f64,
    progress: f64,
    frame: Option<TaskHandle>,
}

/// Owns every in-flight count-up run, at most one per element.
#[derive(Debug, Default)]
pub struct InterpolationDriver {
    runs: HashMap<ElementId, AnimationRun>,
}

impl InterpolationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, element: ElementId) -> bool {
        self.runs.contains_key(&element)
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.runs.len()
    }

    #[cfg(test)]
    pub fn progress(&self, element: ElementId) -> Option<f64> {
        self.runs.get(&element).map(|run| run.progress)
    }

    /// Starts a run and requests its first frame. A second start while a
    /// run is active is ignored and returns `false`.
    pub fn start<S: Scheduler>(&mut self, element: &TrackedElement, scheduler: &mut S) -> bool {
        let id = element.id();
        if self.runs.contains_key(&id) {
            debug!("counter {:?} already animating", id);
            return false;
        }
        let frame = scheduler.request_frame(id);
        self.runs.insert(
            id,
            AnimationRun {
                element: element.clone(),
                started_at: None,
                elapsed: 0.0,
                progress: 0.0,
                frame: Some(frame),
            },
        );
        true
    }

    /// Advances the run for `element` to `timestamp_ms`.
    ///
    /// The first tick anchors the start time. Elapsed time never goes
    /// backwards within a run, even if a timestamp does.
    pub fn tick<S: Scheduler, T: TextSurface>(
        &mut self,
        element: ElementId,
        timestamp_ms: f64,
        scheduler: &mut S,
        surface: &mut T,
    ) -> TickOutcome {
        let Some(run) = self.runs.get_mut(&element) else {
            return TickOutcome::Ignored;
        };
        run.frame = None;

        let started_at = *run.started_at.get_or_insert(timestamp_ms);
        run.elapsed = (timestamp_ms - started_at).max(run.elapsed);

        let duration = f64::from(run.element.duration_ms());
        let progress = if duration > 0.0 {
            (run.elapsed / duration).min(1.0)
        } else {
            1.0
        };
        run.progress = run.progress.max(progress);

        if run.progress >= 1.0 {
            surface.set_text(element, &run.element.final_text());
            self.runs.remove(&element);
            return TickOutcome::Completed;
        }

        let value = interpolate(
            run.element.start(),
            run.element.target(),
            ease_out_quart(run.progress),
        );
        surface.set_text(element, &value.to_string());
        run.frame = Some(scheduler.request_frame(element));
        TickOutcome::Running {
            value,
            progress: run.progress,
        }
    }

    /// Stops the run for `element` without writing anything further.
    pub fn cancel<S: Scheduler>(&mut self, element: ElementId, scheduler: &mut S) -> bool {
        match self.runs.remove(&element) {
            Some(run) => {
                if let Some(frame) = run.frame {
                    scheduler.cancel(frame);
                }
                true
            }
            None => false,
        }
    }

    pub fn cancel_all<S: Scheduler>(&mut self, scheduler: &mut S) {
        for (_, run) in self.runs.drain() {
            if let Some(frame) = run.frame {
                scheduler.cancel(frame);
            }
        }
    }
}
