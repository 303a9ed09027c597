use std::rc::Rc;

use yew::prelude::*;

use crate::components::carousel::{Review, ReviewsSlider};
use crate::components::cta::CtaButton;
use crate::components::forms::{ComingSoonButton, ContactForm};
use crate::components::services::{Service, Services};
use crate::components::typing::TypingHeadline;
use crate::config::SiteConfig;
use crate::counter::browser::use_page_counters;

const FEATURED_SERVICES: &[Service] = &[
    Service {
        icon: "fas fa-code",
        title: "Web Applications",
        blurb: "Fast, accessible web apps built on modern frameworks and tested from day one.",
    },
    Service {
        icon: "fas fa-mobile-alt",
        title: "Mobile Solutions",
        blurb: "Native and cross-platform apps that feel at home on every device.",
    },
    Service {
        icon: "fas fa-cloud",
        title: "Cloud Architecture",
        blurb: "Infrastructure that scales with your traffic and not with your bill.",
    },
];

const MORE_SERVICES: &[Service] = &[
    Service {
        icon: "fas fa-paint-brush",
        title: "Product Design",
        blurb: "Research-led interface design, from wireframes to design systems.",
    },
    Service {
        icon: "fas fa-shield-alt",
        title: "Security Audits",
        blurb: "Reviews of code, infrastructure and processes with a prioritised fix list.",
    },
    Service {
        icon: "fas fa-chart-line",
        title: "Growth Analytics",
        blurb: "Tracking plans and dashboards that answer the questions you actually ask.",
    },
];

const REVIEWS: &[Review] = &[
    Review {
        quote: "They shipped our platform rebuild two weeks early and traffic doubled without a hiccup.",
        author: "Maya Lindqvist",
        role: "CTO, Northwind Retail",
    },
    Review {
        quote: "Clear communication, honest estimates and code our own team enjoys maintaining.",
        author: "Samuel Okafor",
        role: "Head of Product, Tallyo",
    },
    Review {
        quote: "The mobile app they built is now our biggest sales channel.",
        author: "Inés Navarro",
        role: "Founder, Verde Market",
    },
    Review {
        quote: "Our cloud costs dropped by a third after their architecture review.",
        author: "Daniel Brooks",
        role: "VP Engineering, Fieldline",
    },
];

/// Stat shown in the about section. `data-count` holds the target; the
/// `stat-number-lux` class adds a "+" to every value except the satisfaction
/// rate.
fn stat(target: u32, label: &'static str) -> Html {
    html! {
        <div class="stat-item">
            <span class="stat-number-lux" data-count={target.to_string()}>{"0"}</span>
            <span class="stat-label">{ label }</span>
        </div>
    }
}

fn counter(target: u32, suffix: Option<&'static str>, label: &'static str) -> Html {
    html! {
        <div class="counter-card">
            <span class="counter" data-target={target.to_string()} data-suffix={suffix}>{"0"}</span>
            <span class="counter-label">{ label }</span>
        </div>
    }
}

#[function_component(Home)]
pub fn home() -> Html {
    let config = use_context::<Rc<SiteConfig>>().unwrap_or_default();
    use_page_counters(config);

    html! {
        <div class="home-page">
            <style>{ HOME_CSS }</style>

            <section id="home" class="hero-section">
                <div class="hero-content" data-aos="fade-up">
                    <h1>{"We build "}<TypingHeadline /></h1>
                    <p class="hero-subtitle">
                        {"A product studio turning ambitious ideas into software people love to use."}
                    </p>
                    <div class="hero-actions">
                        <CtaButton label="Start a Project" target="contact" />
                        <ComingSoonButton label="View Case Studies" />
                    </div>
                </div>
            </section>

            <section id="about" class="about-section">
                <div class="section-header" data-aos="fade-up">
                    <h2>{"Why Teams Choose Us"}</h2>
                    <p>{"Senior engineers, short feedback loops and no surprises on the invoice."}</p>
                </div>
                <div class="stats-grid" data-aos="fade-up">
                    { stat(250, "Projects Delivered") }
                    { stat(120, "Happy Clients") }
                    { stat(15, "Countries Served") }
                    { stat(98, "% Client Satisfaction") }
                </div>
            </section>

            <Services featured={FEATURED_SERVICES.to_vec()} more={MORE_SERVICES.to_vec()} />

            <section id="impact" class="impact-section">
                <div class="section-header" data-aos="fade-up">
                    <h2>{"Impact In Numbers"}</h2>
                </div>
                <div class="counter-grid">
                    { counter(40, Some("%"), "Average cost reduction") }
                    { counter(3, Some("x"), "Faster release cadence") }
                    { counter(1200, None, "Deploys last year") }
                </div>
            </section>

            <section id="reviews" class="reviews-section">
                <div class="section-header" data-aos="fade-up">
                    <h2>{"What Clients Say"}</h2>
                </div>
                <ReviewsSlider reviews={REVIEWS.to_vec()} />
            </section>

            <section id="contact" class="contact-section">
                <div class="section-header" data-aos="fade-up">
                    <h2>{"Let's Talk"}</h2>
                    <p>{"Tell us what you are building. We reply within one business day."}</p>
                </div>
                <ContactForm />
            </section>
        </div>
    }
}

const HOME_CSS: &str = r#"
    .home-page section {
        padding: 6rem 2rem;
        max-width: 1200px;
        margin: 0 auto;
    }
    .hero-section {
        min-height: 90vh;
        display: flex;
        align-items: center;
    }
    .hero-content h1 {
        font-size: 3.5rem;
        line-height: 1.15;
    }
    .typing-text {
        color: #3b82f6;
        border-right: 3px solid #3b82f6;
        padding-right: 4px;
    }
    .hero-actions {
        display: flex;
        gap: 1rem;
        margin-top: 2rem;
    }
    .btn-ceo-cta {
        --x: 50%;
        --y: 50%;
        padding: 1rem 2rem;
        border: none;
        border-radius: 999px;
        color: white;
        cursor: pointer;
        background: radial-gradient(circle at var(--x) var(--y), #3b82f6, #10b981);
    }
    [data-aos] {
        opacity: 0;
        transform: translateY(30px);
        transition: opacity 0.6s ease, transform 0.6s ease;
    }
    [data-aos].aos-animate {
        opacity: 1;
        transform: none;
    }
    .stats-grid, .counter-grid, .services-grid {
        display: grid;
        grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
        gap: 2rem;
    }
    .stat-number-lux, .counter {
        display: block;
        font-size: 3rem;
        font-weight: 700;
        font-variant-numeric: tabular-nums;
    }
    .counter.counted {
        color: #10b981;
    }
    .hidden-services {
        display: none;
        margin-top: 2rem;
    }
    .hidden-services.show {
        display: grid;
    }
    .show-more-btn {
        margin: 2rem auto 0;
        display: flex;
        gap: 0.5rem;
        align-items: center;
    }
    .reviews-slider {
        overflow: hidden;
    }
    .slider-track {
        display: flex;
        transition: transform 0.5s ease;
    }
    .review-card-luxury {
        flex: 0 0 100%;
        padding: 2rem;
        opacity: 0.4;
        transition: opacity 0.5s ease;
    }
    .review-card-luxury.active {
        opacity: 1;
    }
    .slider-controls {
        display: flex;
        justify-content: center;
        align-items: center;
        gap: 1rem;
    }
    .dot {
        width: 10px;
        height: 10px;
        border-radius: 50%;
        border: none;
        background: #cbd5e1;
    }
    .dot.active {
        background: #3b82f6;
    }
    .slider-progress {
        height: 3px;
        background: #e2e8f0;
        margin-top: 1rem;
    }
    .progress-bar {
        height: 100%;
        background: #3b82f6;
        transition: width 0.5s ease;
    }
    .contact-form {
        display: flex;
        flex-direction: column;
        gap: 1rem;
        max-width: 640px;
    }
    @media (max-width: 768px) {
        .hero-content h1 {
            font-size: 2.4rem;
        }
        .hero-actions {
            flex-direction: column;
        }
    }
"#;
