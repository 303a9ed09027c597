use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, ScrollLogicalPosition};
use yew::prelude::*;

use crate::scroll::{scroll_into_view, scroll_to_section};

/// Delay before the revealed panel is scrolled into view, so its opening
/// transition has started.
const REVEAL_SCROLL_DELAY_MS: u32 = 300;

pub fn toggle_label(expanded: bool) -> &'static str {
    if expanded {
        "Show Less Services"
    } else {
        "Show More Services"
    }
}

pub fn toggle_icon(expanded: bool) -> &'static str {
    if expanded {
        "fas fa-arrow-up"
    } else {
        "fas fa-arrow-down"
    }
}

#[derive(Clone, PartialEq)]
pub struct Service {
    pub icon: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
}

/// Cards in the collapsed panel have no layout until shown, so only the
/// featured ones take part in the scroll reveal.
fn service_card(service: &Service, reveal: bool) -> Html {
    html! {
        <div class="service-card" data-aos={reveal.then_some("fade-up")}>
            <div class="service-icon"><i class={service.icon}></i></div>
            <h3>{ service.title }</h3>
            <p>{ service.blurb }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ServicesProps {
    pub featured: Vec<Service>,
    pub more: Vec<Service>,
}

#[function_component(Services)]
pub fn services(props: &ServicesProps) -> Html {
    let expanded = use_state(|| false);
    let hidden_ref = use_node_ref();

    let toggle = {
        let expanded = expanded.clone();
        let hidden_ref = hidden_ref.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let opening = !*expanded;
            expanded.set(opening);
            if opening {
                let hidden_ref = hidden_ref.clone();
                spawn_local(async move {
                    TimeoutFuture::new(REVEAL_SCROLL_DELAY_MS).await;
                    if let Some(panel) = hidden_ref.cast::<Element>() {
                        scroll_into_view(&panel, ScrollLogicalPosition::Nearest);
                    }
                });
            } else {
                scroll_to_section("services");
            }
        })
    };

    html! {
        <section id="services" class="services-section">
            <div class="section-header" data-aos="fade-up">
                <h2>{"What We Build"}</h2>
                <p>{"Products engineered end to end, from first sketch to production traffic."}</p>
            </div>
            <div class="services-grid">
                { for props.featured.iter().map(|s| service_card(s, true)) }
            </div>
            <div
                id="hiddenServices"
                ref={hidden_ref}
                class={classes!("services-grid", "hidden-services", (*expanded).then_some("show"))}
            >
                { for props.more.iter().map(|s| service_card(s, false)) }
            </div>
            <button
                id="showMoreBtn"
                class={classes!("show-more-btn", (*expanded).then_some("active"))}
                onclick={toggle}
            >
                <span class="btn-text">{ toggle_label(*expanded) }</span>
                <span class="btn-icon"><i class={toggle_icon(*expanded)}></i></span>
            </button>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_state() {
        assert_eq!(toggle_label(false), "Show More Services");
        assert_eq!(toggle_label(true), "Show Less Services");
        assert_eq!(toggle_icon(false), "fas fa-arrow-down");
        assert_eq!(toggle_icon(true), "fas fa-arrow-up");
    }
}
