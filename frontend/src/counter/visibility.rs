use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use super::element::ElementId;

/// Slack for intersection ratios reported right at a threshold crossing.
const RATIO_EPSILON: f64 = 1e-3;

/// Whether an element keeps firing after its first reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// Fire on the first hidden→visible transition only, until reset.
    #[default]
    Once,
    /// Fire on every hidden→visible transition.
    EveryEntry,
}

/// Layout size of an element at registration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_renderable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && (self.width > 0.0 || self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    threshold: f64,
    visible: bool,
    fired: bool,
}

/// Tracks which elements have crossed their visibility threshold.
#[derive(Debug, Default)]
pub struct VisibilityTrigger {
    policy: ReplayPolicy,
    observations: HashMap<ElementId, Observation>,
}

impl VisibilityTrigger {
    pub fn new(policy: ReplayPolicy) -> Self {
        Self {
            policy,
            observations: HashMap::new(),
        }
    }

    /// Starts observing `element`. Returns `false` when it was already
    /// registered or has nothing to intersect with.
    pub fn register(&mut self, element: ElementId, threshold: f64, bounds: Option<Bounds>) -> bool {
        if !bounds.map_or(false, |b| b.is_renderable()) {
            debug!("not observing {:?}: detached or zero-sized", element);
            return false;
        }
        if self.observations.contains_key(&element) {
            return false;
        }
        self.observations.insert(
            element,
            Observation {
                threshold: threshold.clamp(0.0, 1.0),
                visible: false,
                fired: false,
            },
        );
        true
    }

    pub fn unregister(&mut self, element: ElementId) -> bool {
        self.observations.remove(&element).is_some()
    }

    pub fn is_registered(&self, element: ElementId) -> bool {
        self.observations.contains_key(&element)
    }

    #[cfg(test)]
    pub fn has_fired(&self, element: ElementId) -> bool {
        self.observations.get(&element).map_or(false, |o| o.fired)
    }

    /// Feeds the latest intersection ratio for `element`. Returns `true`
    /// when this report is a become-visible transition that should fire.
    pub fn report(&mut self, element: ElementId, ratio: f64) -> bool {
        let Some(observation) = self.observations.get_mut(&element) else {
            return false;
        };

        let now_visible = ratio > 0.0 && ratio + RATIO_EPSILON >= observation.threshold;
        let entered = now_visible && !observation.visible;
        observation.visible = now_visible;
        if !entered {
            return false;
        }

        match self.policy {
            ReplayPolicy::Once if observation.fired => false,
            _ => {
                observation.fired = true;
                true
            }
        }
    }

    /// Re-arms a fired element so its next entry fires again.
    pub fn reset(&mut self, element: ElementId) {
        if let Some(observation) = self.observations.get_mut(&element) {
            observation.fired = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EL: ElementId = ElementId(7);

    fn visible_box() -> Option<Bounds> {
        Some(Bounds::new(300.0, 120.0))
    }

    #[test]
    fn fires_once_by_default() {
        let mut trigger = VisibilityTrigger::default();
        assert!(trigger.register(EL, 0.1, visible_box()));

        assert!(!trigger.report(EL, 0.05));
        assert!(trigger.report(EL, 0.2));
        assert!(!trigger.report(EL, 0.6));
        assert!(!trigger.report(EL, 0.0));
        assert!(!trigger.report(EL, 0.4));
        assert!(trigger.has_fired(EL));
    }

    #[test]
    fn every_entry_policy_replays() {
        let mut trigger = VisibilityTrigger::new(ReplayPolicy::EveryEntry);
        trigger.register(EL, 0.5, visible_box());

        assert!(trigger.report(EL, 0.5));
        assert!(!trigger.report(EL, 0.9));
        assert!(!trigger.report(EL, 0.0));
        assert!(trigger.report(EL, 1.0));
    }

    #[test]
    fn reset_rearms_a_one_shot_element() {
        let mut trigger = VisibilityTrigger::new(ReplayPolicy::Once);
        trigger.register(EL, 0.3, visible_box());
        assert!(trigger.report(EL, 0.5));
        trigger.reset(EL);
        assert!(!trigger.has_fired(EL));
        assert!(!trigger.report(EL, 0.0));
        assert!(trigger.report(EL, 0.5));
    }

    #[test]
    fn ratio_just_under_threshold_counts() {
        let mut trigger = VisibilityTrigger::default();
        trigger.register(EL, 0.1, visible_box());
        assert!(trigger.report(EL, 0.0999));
    }

    #[test]
    fn detached_elements_are_not_observed() {
        let mut trigger = VisibilityTrigger::default();
        assert!(!trigger.register(EL, 0.1, None));
        assert!(!trigger.register(EL, 0.1, Some(Bounds::new(0.0, 0.0))));
        assert!(!trigger.register(EL, 0.1, Some(Bounds::new(f64::NAN, 10.0))));
        assert!(!trigger.is_registered(EL));
        assert!(!trigger.report(EL, 1.0));
    }

    #[test]
    fn register_twice_and_unregister_unknown_are_noops() {
        let mut trigger = VisibilityTrigger::default();
        assert!(trigger.register(EL, 0.1, visible_box()));
        assert!(trigger.report(EL, 1.0));
        assert!(!trigger.register(EL, 0.9, visible_box()));
        assert!(trigger.has_fired(EL));

        assert!(trigger.unregister(EL));
        assert!(!trigger.unregister(EL));
        assert!(!trigger.unregister(ElementId(99)));
    }
}
