use log::{warn, Level};
use serde::Deserialize;
use web_sys::window;

use crate::counter::{BoardSettings, ReplayPolicy};

/// Id of the optional `<script type="application/json">` element holding
/// overrides for [`SiteConfig`].
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub header: HeaderConfig,
    pub counters: Vec<CounterProfile>,
    pub carousel: CarouselConfig,
    pub toast: ToastConfig,
    pub typing: TypingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header: HeaderConfig::default(),
            counters: CounterProfile::defaults(),
            carousel: CarouselConfig::default(),
            toast: ToastConfig::default(),
            typing: TypingConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads overrides from the page, falling back to defaults when the
    /// config element is absent or malformed.
    pub fn load() -> Self {
        let json = window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) if !json.trim().is_empty() => Self::from_json(&json).unwrap_or_else(|err| {
                warn!("ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Scroll offset past which the header turns solid and back-to-top shows.
    pub scrolled_after_px: f64,
    pub throttle_ms: u32,
    /// Added to the scroll offset when picking the active nav section.
    pub section_offset_px: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scrolled_after_px: 100.0,
            throttle_ms: 100,
            section_offset_px: 150.0,
        }
    }
}

/// Marker class that gives a counter a suffix, unless its target is the
/// exception value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuffixMarker {
    pub class: String,
    pub suffix: String,
    #[serde(default)]
    pub except_target: Option<u64>,
}

/// One family of count-up numbers on the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterProfile {
    pub name: String,
    /// Elements observed for visibility.
    pub group_selector: String,
    /// Counters inside a group. `None` means the group is the counter.
    pub counter_selector: Option<String>,
    pub target_attribute: String,
    pub threshold: f64,
    pub root_margin: String,
    pub duration_ms: u32,
    pub stagger_ms: u32,
    pub replay: ReplayPolicy,
    /// Class added to a group when it is revealed.
    pub reveal_class: Option<String>,
    /// Class added to a counter when it settles.
    pub settled_class: Option<String>,
    pub suffix_marker: Option<SuffixMarker>,
}

impl Default for CounterProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            group_selector: "[data-aos]".to_string(),
            counter_selector: Some("[data-count]".to_string()),
            target_attribute: "data-count".to_string(),
            threshold: 0.1,
            root_margin: "0px".to_string(),
            duration_ms: 2000,
            stagger_ms: 0,
            replay: ReplayPolicy::Once,
            reveal_class: None,
            settled_class: None,
            suffix_marker: None,
        }
    }
}

impl CounterProfile {
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                name: "reveal".to_string(),
                root_margin: "0px 0px -50px 0px".to_string(),
                stagger_ms: 150,
                reveal_class: Some("aos-animate".to_string()),
                suffix_marker: Some(SuffixMarker {
                    class: "stat-number-lux".to_string(),
                    suffix: "+".to_string(),
                    except_target: Some(98),
                }),
                ..Self::default()
            },
            Self {
                name: "stats".to_string(),
                group_selector: ".counter".to_string(),
                counter_selector: None,
                target_attribute: "data-target".to_string(),
                threshold: 0.5,
                replay: ReplayPolicy::EveryEntry,
                settled_class: Some("counted".to_string()),
                ..Self::default()
            },
            Self {
                name: "about".to_string(),
                group_selector: ".counter-about".to_string(),
                counter_selector: None,
                threshold: 0.3,
                duration_ms: 2500,
                settled_class: Some("counter-pulse".to_string()),
                ..Self::default()
            },
        ]
    }

    pub fn board_settings(&self) -> BoardSettings {
        BoardSettings {
            threshold: self.threshold,
            duration_ms: self.duration_ms,
            stagger_ms: self.stagger_ms,
            replay: self.replay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub autoplay_ms: u32,
    pub swipe_threshold_px: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay_ms: 5000,
            swipe_threshold_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub visible_ms: u32,
    pub exit_ms: u32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            visible_ms: 3000,
            exit_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub words: Vec<String>,
    pub type_ms: u32,
    pub delete_ms: u32,
    pub hold_ms: u32,
    pub next_word_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            words: ["Web Apps", "Mobile Solutions", "Cloud Architecture", "Digital Products"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            type_ms: 100,
            delete_ms: 50,
            hold_ms: 2000,
            next_word_ms: 500,
        }
    }
}
