use std::rc::Rc;

use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

mod config;
mod counter;
mod scroll;
mod components {
    pub mod carousel;
    pub mod cta;
    pub mod forms;
    pub mod notification;
    pub mod services;
    pub mod typing;
}
mod pages {
    pub mod about;
    pub mod home;
}

use components::forms::NewsletterForm;
use components::notification::ToastProvider;
use config::SiteConfig;
use pages::{about::About, home::Home};
use scroll::{anchor_target, scroll_to_section, scroll_to_top, use_scroll_state, ScrollState};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/about")]
    About,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        }
        Route::About => {
            info!("Rendering About page");
            html! { <About /> }
        }
        Route::NotFound => html! {
            <section class="not-found">
                <h1>{"Page not found"}</h1>
                <Link<Route> to={Route::Home}>{"Back to the homepage"}</Link<Route>>
            </section>
        },
    }
}

/// In-page sections linked from the header, in document order.
const NAV_SECTIONS: &[(&str, &str)] = &[
    ("#home", "Home"),
    ("#about", "About"),
    ("#services", "Services"),
    ("#reviews", "Reviews"),
    ("#contact", "Contact"),
];

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub scroll: ScrollState,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let menu_open = use_state(|| false);
    let navigator = use_navigator();

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let follow_anchor = {
        let menu_open = menu_open.clone();
        move |href: &'static str| {
            let menu_open = menu_open.clone();
            let navigator = navigator.clone();
            Callback::from(move |e: MouseEvent| {
                e.prevent_default();
                menu_open.set(false);
                let Some(id) = anchor_target(href) else {
                    return;
                };
                // Sections only exist on the home page.
                if !scroll_to_section(id) {
                    if let Some(navigator) = &navigator {
                        navigator.push(&Route::Home);
                    }
                }
            })
        }
    };

    let active = props.scroll.active.as_deref();

    html! {
        <header id="header" class={classes!("header", props.scroll.scrolled.then_some("scrolled"))}>
            <nav class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"globaxify"}
                </Link<Route>>
                <button
                    id="navToggle"
                    class={classes!("nav-toggle", (*menu_open).then_some("active"))}
                    aria-label="Toggle navigation"
                    onclick={toggle_menu}
                >
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <ul id="navMenu" class={classes!("nav-menu", (*menu_open).then_some("active"))}>
                    { for NAV_SECTIONS.iter().map(|(href, label)| {
                        let is_active = anchor_target(href) == active;
                        html! {
                            <li>
                                <a
                                    href={*href}
                                    class={classes!("nav-link", is_active.then_some("active"))}
                                    onclick={follow_anchor(*href)}
                                >
                                    { *label }
                                </a>
                            </li>
                        }
                    }) }
                    <li onclick={{
                        let menu_open = menu_open.clone();
                        Callback::from(move |_: MouseEvent| menu_open.set(false))
                    }}>
                        <Link<Route> to={Route::About} classes="nav-link">{"Our Story"}</Link<Route>>
                    </li>
                </ul>
            </nav>
        </header>
    }
}

#[derive(Properties, PartialEq)]
pub struct BackToTopProps {
    pub visible: bool,
}

#[function_component(BackToTop)]
pub fn back_to_top(props: &BackToTopProps) -> Html {
    let onclick = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        scroll_to_top();
    });

    html! {
        <button
            id="backToTop"
            class={classes!("back-to-top", props.visible.then_some("active"))}
            aria-label="Back to top"
            {onclick}
        >
            <i class="fas fa-arrow-up"></i>
        </button>
    }
}

#[function_component(Footer)]
fn footer() -> Html {
    html! {
        <footer id="contact-footer" class="footer">
            <div class="footer-content">
                <div class="footer-brand">
                    <h3>{"globaxify"}</h3>
                    <p>{"Software studio for teams that ship."}</p>
                </div>
                <div class="footer-newsletter">
                    <h4>{"Newsletter"}</h4>
                    <p>{"One email a month about what we learned building products."}</p>
                    <NewsletterForm />
                </div>
            </div>
            <p class="footer-bottom">{"© globaxify. All rights reserved."}</p>
        </footer>
    }
}

#[function_component(Layout)]
fn layout() -> Html {
    let config = use_context::<Rc<SiteConfig>>().unwrap_or_default();
    let scroll = use_scroll_state(config.header.clone());
    let scrolled = scroll.scrolled;

    html! {
        <>
            <style>{ LAYOUT_CSS }</style>
            <Nav scroll={scroll} />
            <main>
                <Switch<Route> render={switch} />
            </main>
            <Footer />
            <BackToTop visible={scrolled} />
        </>
    }
}

#[function_component]
fn App() -> Html {
    let config = use_memo(|_| SiteConfig::load(), ());

    html! {
        <ContextProvider<Rc<SiteConfig>> context={config}>
            <ToastProvider>
                <BrowserRouter>
                    <Layout />
                </BrowserRouter>
            </ToastProvider>
        </ContextProvider<Rc<SiteConfig>>>
    }
}

const LAYOUT_CSS: &str = r#"
    .header {
        position: fixed;
        top: 0;
        width: 100%;
        z-index: 100;
        background: transparent;
        transition: background 0.3s ease, box-shadow 0.3s ease;
    }
    .header.scrolled {
        background: rgba(255, 255, 255, 0.96);
        box-shadow: 0 2px 20px rgba(0, 0, 0, 0.08);
    }
    .nav-content {
        max-width: 1200px;
        margin: 0 auto;
        padding: 1rem 2rem;
        display: flex;
        justify-content: space-between;
        align-items: center;
    }
    .nav-menu {
        display: flex;
        gap: 2rem;
        list-style: none;
    }
    .nav-link.active {
        color: #3b82f6;
    }
    .nav-toggle {
        display: none;
        background: none;
        border: none;
    }
    .nav-toggle span {
        display: block;
        width: 24px;
        height: 2px;
        margin: 5px 0;
        background: currentColor;
    }
    .back-to-top {
        position: fixed;
        right: 2rem;
        bottom: 2rem;
        opacity: 0;
        visibility: hidden;
        transition: opacity 0.3s ease;
    }
    .back-to-top.active {
        opacity: 1;
        visibility: visible;
    }
    @media (max-width: 768px) {
        .nav-toggle {
            display: block;
        }
        .nav-menu {
            position: fixed;
            top: 64px;
            left: -100%;
            width: 100%;
            flex-direction: column;
            background: white;
            transition: left 0.3s ease;
        }
        .nav-menu.active {
            left: 0;
        }
    }
"#;

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
