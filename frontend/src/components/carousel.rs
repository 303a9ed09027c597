use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use yew::prelude::*;

use crate::config::SiteConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideAction {
    Next,
    Prev,
    GoTo(usize),
}

/// Which review is showing. Navigation wraps at both ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn apply(&mut self, action: SlideAction) {
        if self.len == 0 {
            return;
        }
        self.index = match action {
            SlideAction::Next => (self.index + 1) % self.len,
            SlideAction::Prev => (self.index + self.len - 1) % self.len,
            SlideAction::GoTo(index) if index < self.len => index,
            SlideAction::GoTo(_) => self.index,
        };
    }

    pub fn track_transform(&self) -> String {
        format!("transform: translateX(-{}%);", self.index * 100)
    }

    pub fn progress_percent(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        (self.index + 1) as f64 / self.len as f64 * 100.0
    }
}

impl Reducible for Carousel {
    type Action = SlideAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// Direction of a touch swipe, if it travelled far enough. Swiping left
/// (finger moving towards smaller x) goes to the next slide.
pub fn swipe_action(start_x: f64, end_x: f64, threshold: f64) -> Option<SlideAction> {
    let diff = start_x - end_x;
    if diff.abs() <= threshold {
        None
    } else if diff > 0.0 {
        Some(SlideAction::Next)
    } else {
        Some(SlideAction::Prev)
    }
}

#[derive(Clone, PartialEq)]
pub struct Review {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

#[derive(Properties, PartialEq)]
pub struct ReviewsSliderProps {
    pub reviews: Vec<Review>,
}

#[function_component(ReviewsSlider)]
pub fn reviews_slider(props: &ReviewsSliderProps) -> Html {
    let config = use_context::<Rc<SiteConfig>>().unwrap_or_default();
    let carousel = {
        let len = props.reviews.len();
        use_reducer(move || Carousel::new(len))
    };
    let autoplay: Rc<RefCell<Option<Interval>>> = use_mut_ref(|| None);
    let touch_start = use_mut_ref(|| 0.0f64);

    let stop_autoplay = {
        let autoplay = autoplay.clone();
        Rc::new(move || {
            autoplay.borrow_mut().take();
        })
    };

    let restart_autoplay = {
        let autoplay = autoplay.clone();
        let dispatcher = carousel.dispatcher();
        let millis = config.carousel.autoplay_ms;
        Rc::new(move || {
            let dispatcher = dispatcher.clone();
            // Replacing the old interval drops, and so clears, it.
            *autoplay.borrow_mut() = Some(Interval::new(millis, move || dispatcher.dispatch(SlideAction::Next)));
        })
    };

    {
        let restart_autoplay = restart_autoplay.clone();
        let stop_autoplay = stop_autoplay.clone();
        use_effect_with_deps(
            move |_| {
                restart_autoplay();
                move || stop_autoplay()
            },
            (),
        );
    }

    let navigate = {
        let carousel = carousel.clone();
        let restart_autoplay = restart_autoplay.clone();
        move |action: SlideAction| {
            let carousel = carousel.clone();
            let restart_autoplay = restart_autoplay.clone();
            Callback::from(move |_: MouseEvent| {
                carousel.dispatch(action);
                restart_autoplay();
            })
        }
    };

    let on_touch_start = {
        let touch_start = touch_start.clone();
        let stop_autoplay = stop_autoplay.clone();
        Callback::from(move |e: TouchEvent| {
            if let Some(touch) = e.touches().get(0) {
                *touch_start.borrow_mut() = f64::from(touch.client_x());
            }
            stop_autoplay();
        })
    };

    let on_touch_end = {
        let carousel = carousel.clone();
        let restart_autoplay = restart_autoplay.clone();
        let threshold = config.carousel.swipe_threshold_px;
        Callback::from(move |e: TouchEvent| {
            if let Some(touch) = e.changed_touches().get(0) {
                let start = *touch_start.borrow();
                if let Some(action) = swipe_action(start, f64::from(touch.client_x()), threshold) {
                    carousel.dispatch(action);
                }
            }
            restart_autoplay();
        })
    };

    let on_mouse_enter = {
        let stop_autoplay = stop_autoplay.clone();
        Callback::from(move |_: MouseEvent| stop_autoplay())
    };
    let on_mouse_leave = {
        let restart_autoplay = restart_autoplay.clone();
        Callback::from(move |_: MouseEvent| restart_autoplay())
    };

    if props.reviews.is_empty() {
        return html! {};
    }

    let current = carousel.index();

    html! {
        <div class="reviews-slider">
            <div class="slider-viewport">
                <div
                    id="sliderTrack"
                    class="slider-track"
                    style={carousel.track_transform()}
                    ontouchstart={on_touch_start}
                    ontouchend={on_touch_end}
                    onmouseenter={on_mouse_enter}
                    onmouseleave={on_mouse_leave}
                >
                    { for props.reviews.iter().enumerate().map(|(i, review)| html! {
                        <div class={classes!("review-card-luxury", (i == current).then_some("active"))}>
                            <p class="review-quote">{ review.quote }</p>
                            <div class="review-author">
                                <strong>{ review.author }</strong>
                                <span>{ review.role }</span>
                            </div>
                        </div>
                    }) }
                </div>
            </div>
            <div class="slider-controls">
                <button id="prevBtn" class="slider-btn" aria-label="Previous review" onclick={navigate(SlideAction::Prev)}>
                    <i class="fas fa-chevron-left"></i>
                </button>
                <div class="slider-dots">
                    { for (0..props.reviews.len()).map(|i| html! {
                        <button
                            class={classes!("dot", (i == current).then_some("active"))}
                            aria-label={format!("Show review {}", i + 1)}
                            onclick={navigate(SlideAction::GoTo(i))}
                        />
                    }) }
                </div>
                <button id="nextBtn" class="slider-btn" aria-label="Next review" onclick={navigate(SlideAction::Next)}>
                    <i class="fas fa-chevron-right"></i>
                </button>
            </div>
            <div class="slider-progress">
                <div id="progressBar" class="progress-bar" style={format!("width: {}%;", carousel.progress_percent())}></div>
            </div>
        </div>
    }
}
