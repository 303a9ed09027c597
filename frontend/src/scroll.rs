use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions};
use yew::prelude::*;
use yew_hooks::use_event_with_window;

use crate::config::HeaderConfig;

/// Vertical extent of a `section[id]`, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// The section containing `scroll_y + offset`. When sections overlap the
/// last one in document order wins.
pub fn active_section(sections: &[SectionBounds], scroll_y: f64, offset: f64) -> Option<&str> {
    let probe = scroll_y + offset;
    sections
        .iter()
        .filter(|s| probe >= s.top && probe < s.top + s.height)
        .last()
        .map(|s| s.id.as_str())
}

pub fn measure_sections() -> Vec<SectionBounds> {
    let Some(document) = window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let Ok(list) = document.query_selector_all("section[id]") else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(|section| SectionBounds {
            id: section.id(),
            top: f64::from(section.offset_top()),
            height: f64::from(section.offset_height()),
        })
        .collect()
}

pub fn current_scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn scroll_into_view(element: &Element, block: ScrollLogicalPosition) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(block);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Smoothly scrolls to the element with `id`, if there is one.
pub fn scroll_to_section(id: &str) -> bool {
    let target = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id));
    match target {
        Some(element) => {
            scroll_into_view(&element, ScrollLogicalPosition::Start);
            true
        }
        None => false,
    }
}

/// `#services` → `services`. Anything that is not an in-page anchor is `None`.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn scroll_to_top() {
    if let Some(window) = window() {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

/// Header state derived from the window's scroll position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrollState {
    pub scrolled: bool,
    pub active: Option<String>,
}

impl ScrollState {
    pub fn measure(header: &HeaderConfig) -> Self {
        let scroll_y = current_scroll_y();
        let sections = measure_sections();
        Self {
            scrolled: is_scrolled(scroll_y, header.scrolled_after_px),
            active: active_section(&sections, scroll_y, header.section_offset_px).map(str::to_string),
        }
    }
}

/// Tracks [`ScrollState`], re-measuring at most once per `throttle_ms`
/// while the page scrolls.
#[hook]
pub fn use_scroll_state(header: HeaderConfig) -> ScrollState {
    let state = use_state_eq(ScrollState::default);
    let pending: Rc<RefCell<Option<Timeout>>> = use_mut_ref(|| None);

    {
        let state = state.clone();
        let header = header.clone();
        let pending = pending.clone();
        use_effect_with_deps(
            move |_| {
                state.set(ScrollState::measure(&header));
                move || drop(pending.borrow_mut().take())
            },
            (),
        );
    }

    {
        let state = state.clone();
        use_event_with_window("scroll", move |_: Event| {
            if pending.borrow().is_some() {
                return;
            }
            let state = state.clone();
            let header = header.clone();
            let slot = pending.clone();
            *pending.borrow_mut() = Some(Timeout::new(header.throttle_ms, move || {
                slot.borrow_mut().take();
                state.set(ScrollState::measure(&header));
            }));
        });
    }

    (*state).clone()
}
