use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::config::{SiteConfig, TypingConfig};

/// One frame of the typing headline: what to show, and how long to wait
/// before the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStep {
    pub text: String,
    pub delay_ms: u32,
}

/// Types a word one character at a time, holds it, deletes it, then moves on
/// to the next word.
#[derive(Debug, Clone)]
pub struct Typewriter {
    words: Vec<Vec<char>>,
    word: usize,
    chars: usize,
    deleting: bool,
    config: TypingConfig,
}

impl Typewriter {
    pub fn new(config: &TypingConfig) -> Self {
        Self {
            words: config
                .words
                .iter()
                .filter(|w| !w.is_empty())
                .map(|w| w.chars().collect())
                .collect(),
            word: 0,
            chars: 0,
            deleting: false,
            config: config.clone(),
        }
    }

    pub fn step(&mut self) -> TypeStep {
        let Some(word) = self.words.get(self.word) else {
            return TypeStep {
                text: String::new(),
                delay_ms: self.config.hold_ms,
            };
        };

        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
        } else {
            self.chars = (self.chars + 1).min(word.len());
        }
        let text: String = word[..self.chars].iter().collect();

        let mut delay_ms = if self.deleting {
            self.config.delete_ms
        } else {
            self.config.type_ms
        };
        if !self.deleting && self.chars == word.len() {
            delay_ms = self.config.hold_ms;
            self.deleting = true;
        } else if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.word = (self.word + 1) % self.words.len();
            delay_ms = self.config.next_word_ms;
        }

        TypeStep { text, delay_ms }
    }
}

#[function_component(TypingHeadline)]
pub fn typing_headline() -> Html {
    let config = use_context::<Rc<SiteConfig>>().unwrap_or_default();
    let writer = {
        let typing = config.typing.clone();
        use_mut_ref(move || Typewriter::new(&typing))
    };
    let step = use_state(|| TypeStep {
        text: String::new(),
        delay_ms: 0,
    });
    // Bumped on every step so the effect below re-arms even when the text
    // repeats.
    let generation = use_state(|| 0u64);

    {
        let writer = writer.clone();
        let step_setter = step.setter();
        let generation_setter = generation.setter();
        let delay = step.delay_ms;
        let current = *generation;
        use_effect_with_deps(
            move |_| {
                let timeout = Timeout::new(delay, move || {
                    let next = writer.borrow_mut().step();
                    step_setter.set(next);
                    generation_setter.set(current + 1);
                });
                move || drop(timeout)
            },
            current,
        );
    }

    html! {
        <span id="typing-text" class="typing-text">{ &step.text }</span>
    }
}
