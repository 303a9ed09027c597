use log::info;
use web_sys::{HtmlFormElement, HtmlInputElement};
use yew::prelude::*;

use super::notification::use_notifier;

pub const CONTACT_SENT: &str = "Thank you! Your message has been sent successfully.";
pub const SUBSCRIBED: &str = "Thank you for subscribing!";
pub const COMING_SOON: &str = "Coming soon!";
pub const EMAIL_REQUIRED: &str = "Please enter your email address.";

/// Loose check that catches empty and obviously malformed addresses; the
/// browser's own `type="email"` validation does the rest.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[function_component(ContactForm)]
pub fn contact_form() -> Html {
    let notifier = use_notifier();
    let email = use_state(String::new);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let onsubmit = {
        let email = email.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !looks_like_email(&email) {
                notifier.error(EMAIL_REQUIRED);
                return;
            }
            info!("contact form submitted");
            notifier.success(CONTACT_SENT);
            if let Some(form) = e.target_dyn_into::<HtmlFormElement>() {
                form.reset();
            }
            email.set(String::new());
        })
    };

    html! {
        <form id="contactForm" class="contact-form" {onsubmit}>
            <div class="form-row">
                <input type="text" name="name" placeholder="Your name" required=true />
                <input type="email" name="email" placeholder="Your email" value={(*email).clone()} oninput={on_email} required=true />
            </div>
            <input type="text" name="subject" placeholder="Subject" />
            <textarea name="message" rows="5" placeholder="Tell us about your project" required=true />
            <button type="submit" class="btn btn-primary">{"Send Message"}</button>
        </form>
    }
}

#[function_component(NewsletterForm)]
pub fn newsletter_form() -> Html {
    let notifier = use_notifier();
    let input_ref = use_node_ref();

    let onsubmit = {
        let input_ref = input_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let email = input_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            if !looks_like_email(&email) {
                notifier.error(EMAIL_REQUIRED);
                return;
            }
            notifier.success(SUBSCRIBED);
            if let Some(form) = e.target_dyn_into::<HtmlFormElement>() {
                form.reset();
            }
        })
    };

    html! {
        <form class="newsletter-form" {onsubmit}>
            <input ref={input_ref} type="email" name="email" placeholder="Your email" required=true />
            <button type="submit" aria-label="Subscribe"><i class="fas fa-paper-plane"></i></button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct ComingSoonProps {
    pub label: AttrValue,
}

#[function_component(ComingSoonButton)]
pub fn coming_soon_button(props: &ComingSoonProps) -> Html {
    let notifier = use_notifier();
    let onclick = Callback::from(move |_: MouseEvent| notifier.success(COMING_SOON));

    html! {
        <button class="btn btn-outline" {onclick}>{ props.label.clone() }</button>
    }
}
