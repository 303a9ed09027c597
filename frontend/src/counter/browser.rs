use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    window, Document, Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};
use yew::prelude::*;

use super::{Bounds, CounterBoard, CounterSource, ElementId, Scheduler, SuffixRule, TaskHandle, TextSurface, TickOutcome};
use crate::config::{CounterProfile, SiteConfig};

/// Attribute carrying an element's [`ElementId`] so observer entries can be
/// mapped back to their group.
const ID_ATTR: &str = "data-counter-id";
const SUFFIX_ATTR: &str = "data-suffix";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct DomSurface {
    elements: HashMap<ElementId, Element>,
}

impl DomSurface {
    fn add_class(&self, id: ElementId, class: &str) {
        if let Some(element) = self.elements.get(&id) {
            let _ = element.class_list().add_1(class);
        }
    }
}

impl TextSurface for DomSurface {
    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(el) = self.elements.get(&element) {
            el.set_text_content(Some(text));
        }
    }
}

/// Which board each group and counter belongs to. Frames and timers are
/// routed through it, so an element matched by several profiles stays with
/// the first one that claimed it.
#[derive(Debug, Default)]
struct Owners(HashMap<ElementId, usize>);

impl Owners {
    fn claim(&mut self, id: ElementId, board: usize) -> bool {
        *self.0.entry(id).or_insert(board) == board
    }

    fn board_of(&self, id: ElementId) -> Option<usize> {
        self.0.get(&id).copied()
    }
}

enum Pending {
    Frame(i32),
    Timer(Timeout),
}

/// requestAnimationFrame and `setTimeout`, calling back into the page that
/// owns this scheduler.
struct BrowserScheduler {
    window: Window,
    page: Weak<RefCell<Page>>,
    next: u64,
    pending: HashMap<TaskHandle, Pending>,
    /// Elements whose animation frame could not be requested.
    stalled: Vec<ElementId>,
}

impl BrowserScheduler {
    fn next_handle(&mut self) -> TaskHandle {
        self.next += 1;
        TaskHandle(self.next)
    }

    fn cancel_all(&mut self) {
        let handles: Vec<TaskHandle> = self.pending.keys().copied().collect();
        for handle in handles {
            self.cancel(handle);
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn request_frame(&mut self, element: ElementId) -> TaskHandle {
        let handle = self.next_handle();
        let page = self.page.clone();
        let callback = Closure::once_into_js(move |timestamp: f64| {
            Page::frame(&page, handle, element, timestamp);
        });
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(request) => {
                self.pending.insert(handle, Pending::Frame(request));
            }
            Err(err) => {
                warn!("requestAnimationFrame failed for {:?}: {:?}", element, err);
                self.stalled.push(element);
            }
        }
        handle
    }

    fn set_timeout(&mut self, element: ElementId, delay_ms: u32) -> TaskHandle {
        let handle = self.next_handle();
        let page = self.page.clone();
        let timeout = Timeout::new(delay_ms, move || {
            Page::timer(&page, handle, element);
        });
        self.pending.insert(handle, Pending::Timer(timeout));
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        match self.pending.remove(&handle) {
            Some(Pending::Frame(request)) => {
                let _ = self.window.cancel_animation_frame(request);
            }
            // Dropping a gloo Timeout clears it.
            Some(Pending::Timer(timeout)) => drop(timeout),
            None => {}
        }
    }
}

struct ProfileBoard {
    profile: CounterProfile,
    board: CounterBoard,
}

struct Page {
    boards: Vec<ProfileBoard>,
    owners: Owners,
    surface: DomSurface,
    scheduler: BrowserScheduler,
    observers: Vec<(IntersectionObserver, ObserverCallback)>,
    next_id: u32,
}

impl Page {
    fn with_page(page: &Weak<RefCell<Page>>, f: impl FnOnce(&mut Page)) {
        let Some(page) = page.upgrade() else {
            return;
        };
        // A callback arriving while the page is mid-update is a re-entrant
        // start; the run already in flight covers it.
        match page.try_borrow_mut() {
            Ok(mut page) => {
                f(&mut *page);
                page.finish_stalled();
            }
            Err(_) => debug!("counter callback dropped: page busy"),
        };
    }

    fn frame(page: &Weak<RefCell<Page>>, handle: TaskHandle, element: ElementId, timestamp: f64) {
        Page::with_page(page, |page| {
            page.scheduler.pending.remove(&handle);
            let Some(index) = page.owners.board_of(element) else {
                return;
            };
            let entry = &mut page.boards[index];
            let outcome = entry
                .board
                .on_frame(element, timestamp, &mut page.scheduler, &mut page.surface);
            if outcome == TickOutcome::Completed {
                if let Some(class) = &entry.profile.settled_class {
                    page.surface.add_class(element, class);
                }
            }
        });
    }

    fn timer(page: &Weak<RefCell<Page>>, handle: TaskHandle, element: ElementId) {
        Page::with_page(page, |page| {
            page.scheduler.pending.remove(&handle);
            if let Some(index) = page.owners.board_of(element) {
                page.boards[index].board.on_timer(element, &mut page.scheduler);
            }
        });
    }

    fn intersections(page: &Weak<RefCell<Page>>, index: usize, entries: Array) {
        Page::with_page(page, |page| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let Some(group) = entry
                    .target()
                    .get_attribute(ID_ATTR)
                    .and_then(|raw| raw.parse::<u32>().ok())
                    .map(ElementId)
                else {
                    continue;
                };
                let ratio = if entry.is_intersecting() {
                    entry.intersection_ratio()
                } else {
                    0.0
                };

                let profile_board = &mut page.boards[index];
                if profile_board
                    .board
                    .on_visibility(group, ratio, &mut page.scheduler)
                {
                    debug!("{} group {:?} revealed", profile_board.profile.name, group);
                    if let Some(class) = &profile_board.profile.reveal_class {
                        page.surface.add_class(group, class);
                    }
                }
            }
        });
    }

    /// Counters whose frames could not be scheduled jump to their final
    /// value instead of staying stuck mid-count.
    fn finish_stalled(&mut self) {
        let stalled = std::mem::take(&mut self.scheduler.stalled);
        for element in stalled {
            let Some(index) = self.owners.board_of(element) else {
                continue;
            };
            let entry = &mut self.boards[index];
            if entry.board.finish(element, &mut self.scheduler, &mut self.surface) {
                if let Some(class) = &entry.profile.settled_class {
                    self.surface.add_class(element, class);
                }
            }
        }
    }

    fn allocate(&mut self, element: &Element) -> ElementId {
        if let Some(existing) = element
            .get_attribute(ID_ATTR)
            .and_then(|raw| raw.parse::<u32>().ok())
            .map(ElementId)
            .filter(|id| self.surface.elements.contains_key(id))
        {
            return existing;
        }
        self.next_id += 1;
        let id = ElementId(self.next_id);
        let _ = element.set_attribute(ID_ATTR, &id.0.to_string());
        self.surface.elements.insert(id, element.clone());
        id
    }

    /// Registers every group and counter of one profile found in `document`.
    fn scan(&mut self, document: &Document, index: usize) -> Vec<Element> {
        let profile = self.boards[index].profile.clone();
        let mut observed = Vec::new();

        for group_el in query_all(document.query_selector_all(&profile.group_selector)) {
            let group = self.allocate(&group_el);
            let counter_els = match &profile.counter_selector {
                Some(selector) => query_all(group_el.query_selector_all(selector)),
                None => vec![group_el.clone()],
            };
            let mut sources = Vec::with_capacity(counter_els.len());
            for el in &counter_els {
                let id = self.allocate(el);
                if !self.owners.claim(id, index) {
                    debug!("{}: counter {:?} already belongs to another profile", profile.name, id);
                    continue;
                }
                sources.push(
                    CounterSource::new(id, el.get_attribute(&profile.target_attribute).as_deref())
                        .with_suffix(suffix_rule(&profile, el)),
                );
            }
            if profile.counter_selector.is_none() && sources.is_empty() {
                continue;
            }

            match self.boards[index]
                .board
                .register_group(group, bounds_of(&group_el), sources)
            {
                Ok(count) => {
                    debug!("{}: group {:?} with {} counters", profile.name, group, count);
                    observed.push(group_el);
                }
                Err(err) => debug!("{}: skipping group {:?}: {}", profile.name, group, err),
            }
        }
        observed
    }

    fn observe(&mut self, page: &Weak<RefCell<Page>>, index: usize, targets: &[Element]) -> Result<(), JsValue> {
        if targets.is_empty() {
            return Ok(());
        }
        let profile = &self.boards[index].profile;
        let options = IntersectionObserverInit::new();
        options.set_root_margin(&profile.root_margin);
        options.set_threshold(&JsValue::from_f64(profile.threshold));

        let page = page.clone();
        let callback: ObserverCallback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            Page::intersections(&page, index, entries);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for target in targets {
            observer.observe(target);
        }
        self.observers.push((observer, callback));
        Ok(())
    }

    /// Reduced motion: final values and reveal classes, no observers.
    fn settle(&mut self) {
        for entry in self.boards.iter_mut() {
            entry.board.settle_all(&mut self.scheduler, &mut self.surface);
            if let Some(class) = &entry.profile.reveal_class {
                for group in entry.board.groups() {
                    self.surface.add_class(group, class);
                }
            }
            if let Some(class) = &entry.profile.settled_class {
                for counter in entry.board.counters() {
                    self.surface.add_class(counter, class);
                }
            }
        }
    }

    fn teardown(&mut self) {
        for (observer, _) in self.observers.drain(..) {
            observer.disconnect();
        }
        for entry in self.boards.iter_mut() {
            entry.board.teardown(&mut self.scheduler);
        }
        self.scheduler.cancel_all();
    }
}

/// Count-up numbers wired to the live document. Dropping it disconnects the
/// observers and stops every animation.
pub struct PageCounters {
    page: Rc<RefCell<Page>>,
}

impl PageCounters {
    pub fn mount(config: &SiteConfig) -> Option<Self> {
        let window = window()?;
        let document = window.document()?;
        let reduced_motion = prefers_reduced_motion(&window);

        let page = Rc::new_cyclic(|weak: &Weak<RefCell<Page>>| {
            RefCell::new(Page {
                boards: config
                    .counters
                    .iter()
                    .map(|profile| ProfileBoard {
                        board: CounterBoard::new(profile.board_settings()),
                        profile: profile.clone(),
                    })
                    .collect(),
                owners: Owners::default(),
                surface: DomSurface {
                    elements: HashMap::new(),
                },
                scheduler: BrowserScheduler {
                    window: window.clone(),
                    page: weak.clone(),
                    next: 0,
                    pending: HashMap::new(),
                    stalled: Vec::new(),
                },
                observers: Vec::new(),
                next_id: 0,
            })
        });

        {
            let weak = Rc::downgrade(&page);
            let mut guard = page.borrow_mut();
            let state = &mut *guard;
            for index in 0..state.boards.len() {
                let targets = state.scan(&document, index);
                if reduced_motion {
                    continue;
                }
                if let Err(err) = state.observe(&weak, index, &targets) {
                    warn!("{}: IntersectionObserver unavailable: {:?}", state.boards[index].profile.name, err);
                    state.boards[index].board.teardown(&mut state.scheduler);
                }
            }
            if reduced_motion {
                info!("reduced motion preferred, showing final counter values");
                state.settle();
            }
            info!("counters mounted: {} elements", state.surface.elements.len());
        }

        Some(Self { page })
    }
}

impl Drop for PageCounters {
    fn drop(&mut self) {
        match self.page.try_borrow_mut() {
            Ok(mut page) => page.teardown(),
            Err(_) => warn!("counters dropped while busy"),
        }
    }
}

/// Mounts the page's counters after the first render and tears them down
/// when the component unmounts.
#[hook]
pub fn use_page_counters(config: Rc<SiteConfig>) {
    use_effect_with_deps(
        move |_| {
            let counters = PageCounters::mount(&config);
            move || drop(counters)
        },
        (),
    );
}

fn query_all(list: Result<web_sys::NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn bounds_of(element: &Element) -> Option<Bounds> {
    if !element.is_connected() {
        return None;
    }
    let rect = element.get_bounding_client_rect();
    Some(Bounds::new(rect.width(), rect.height()))
}

fn suffix_rule(profile: &CounterProfile, element: &Element) -> SuffixRule {
    if let Some(suffix) = element.get_attribute(SUFFIX_ATTR) {
        return SuffixRule::Always(suffix);
    }
    match &profile.suffix_marker {
        Some(marker) if element.class_list().contains(&marker.class) => match marker.except_target {
            Some(except) => SuffixRule::UnlessTarget {
                suffix: marker.suffix.clone(),
                except,
            },
            None => SuffixRule::Always(marker.suffix.clone()),
        },
        _ => SuffixRule::None,
    }
}

pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map_or(false, |query| query.matches())
}
