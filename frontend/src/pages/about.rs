use std::rc::Rc;

use yew::prelude::*;

use crate::components::cta::CtaButton;
use crate::config::SiteConfig;
use crate::counter::browser::use_page_counters;

struct Milestone {
    target: u32,
    label: &'static str,
}

const MILESTONES: &[Milestone] = &[
    Milestone { target: 12, label: "Years in business" },
    Milestone { target: 45, label: "Engineers and designers" },
    Milestone { target: 8, label: "Open source libraries" },
    Milestone { target: 3, label: "Offices" },
];

#[function_component(About)]
pub fn about() -> Html {
    let config = use_context::<Rc<SiteConfig>>().unwrap_or_default();
    use_page_counters(config);

    html! {
        <div class="about-page">
            <style>{ ABOUT_CSS }</style>
            <section id="story" class="story-section">
                <div class="section-header" data-aos="fade-up">
                    <h1>{"Our Story"}</h1>
                    <p>
                        {"We started as three engineers fixing other people's launches. \
                          Today we run the launches ourselves, with the same small-team habits."}
                    </p>
                </div>
                <div class="milestones">
                    { for MILESTONES.iter().map(|m| html! {
                        <div class="milestone">
                            <span class="counter-about" data-count={m.target.to_string()}>{"0"}</span>
                            <span class="milestone-label">{ m.label }</span>
                        </div>
                    }) }
                </div>
            </section>
            <section id="join" class="join-section" data-aos="fade-up">
                <h2>{"Have something in mind?"}</h2>
                <CtaButton label="Get in Touch" target="contact-footer" />
            </section>
        </div>
    }
}

const ABOUT_CSS: &str = r#"
    .about-page section {
        padding: 6rem 2rem;
        max-width: 1100px;
        margin: 0 auto;
    }
    .milestones {
        display: grid;
        grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
        gap: 2rem;
        margin-top: 3rem;
    }
    .counter-about {
        display: block;
        font-size: 3rem;
        font-weight: 700;
        font-variant-numeric: tabular-nums;
    }
    @media (prefers-reduced-motion: no-preference) {
        .counter-about.counter-pulse {
            animation: counterPulse 0.4s ease;
        }
    }
    @keyframes counterPulse {
        50% {
            transform: scale(1.1);
        }
    }
    .join-section {
        text-align: center;
    }
"#;
