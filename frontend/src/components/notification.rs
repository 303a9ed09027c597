use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, warn};
use stylist::yew::styled_component;
use yew::prelude::*;

use crate::config::SiteConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "fas fa-check-circle",
            ToastKind::Error => "fas fa-exclamation-circle",
        }
    }

    fn background(self) -> &'static str {
        match self {
            ToastKind::Success => "linear-gradient(135deg, #10b981, #3b82f6)",
            ToastKind::Error => "#ef4444",
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ToastPhase {
    Showing,
    Leaving,
}

/// A new toast replacing the one with id `previous`, if any.
pub fn replace_toast(previous: Option<u32>, message: String, kind: ToastKind) -> Toast {
    let id = previous.map_or(1, |id| id.wrapping_add(1).max(1));
    Toast { id, message, kind }
}

/// Handle for raising toasts from anywhere under [`ToastProvider`].
#[derive(Clone, PartialEq)]
pub struct Notifier {
    show: Callback<(String, ToastKind)>,
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.show.emit((message.into(), ToastKind::Success));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show.emit((message.into(), ToastKind::Error));
    }
}

#[hook]
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().unwrap_or_else(|| {
        warn!("use_notifier outside of ToastProvider");
        Notifier {
            show: Callback::from(|_| ()),
        }
    })
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let config = use_context::<Rc<SiteConfig>>().unwrap_or_default();
    let current = use_state(|| None::<Toast>);
    // Latest id, readable from callbacks created before the last render.
    let latest = use_mut_ref(|| 0u32);

    let notifier = {
        let current = current.clone();
        let latest = latest.clone();
        use_memo(
            move |_| Notifier {
                show: Callback::from(move |(message, kind): (String, ToastKind)| {
                    let previous = *latest.borrow();
                    let toast = replace_toast((previous > 0).then_some(previous), message, kind);
                    debug!("toast {}: {}", toast.id, toast.message);
                    *latest.borrow_mut() = toast.id;
                    current.set(Some(toast));
                }),
            },
            (),
        )
    };

    let on_done = {
        let current = current.clone();
        let latest = latest.clone();
        Callback::from(move |id: u32| {
            if *latest.borrow() == id {
                current.set(None);
            }
        })
    };

    html! {
        <ContextProvider<Notifier> context={(*notifier).clone()}>
            { for props.children.iter() }
            {
                if let Some(toast) = (*current).clone() {
                    let id = toast.id;
                    html! {
                        <ToastView
                            key={id}
                            toast={toast}
                            visible_ms={config.toast.visible_ms}
                            exit_ms={config.toast.exit_ms}
                            on_done={on_done}
                        />
                    }
                } else {
                    html! {}
                }
            }
        </ContextProvider<Notifier>>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastViewProps {
    pub toast: Toast,
    pub visible_ms: u32,
    pub exit_ms: u32,
    pub on_done: Callback<u32>,
}

#[styled_component(ToastView)]
pub fn toast_view(props: &ToastViewProps) -> Html {
    let phase = use_state(|| ToastPhase::Showing);

    {
        let phase = phase.setter();
        let on_done = props.on_done.clone();
        let id = props.toast.id;
        let visible_ms = props.visible_ms;
        let exit_ms = props.exit_ms;
        use_effect_with_deps(
            move |_| {
                let leave = Timeout::new(visible_ms, move || phase.set(ToastPhase::Leaving));
                let remove = Timeout::new(visible_ms.saturating_add(exit_ms), move || on_done.emit(id));
                // Dropping the timeouts cancels them if this toast is replaced.
                move || {
                    drop(leave);
                    drop(remove);
                }
            },
            id,
        );
    }

    let animation = match *phase {
        ToastPhase::Showing => "toastSlideIn 0.3s ease",
        ToastPhase::Leaving => "toastSlideOut 0.3s ease forwards",
    };
    let kind = props.toast.kind;

    html! {
        <div
            class={classes!(
                "notification",
                kind.class(),
                css!(
                    r#"
                        position: fixed;
                        top: 100px;
                        right: 30px;
                        background: ${background};
                        color: white;
                        padding: 15px 25px;
                        border-radius: 12px;
                        box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2);
                        display: flex;
                        align-items: center;
                        gap: 10px;
                        z-index: 10000;
                        animation: ${animation};
                        font-weight: 500;
                        font-family: 'Poppins', sans-serif;
                    "#,
                    background = kind.background(),
                    animation = animation,
                )
            )}
            role="status"
        >
            <style>
                {r#"
                    @keyframes toastSlideIn {
                        from { transform: translateX(100%); opacity: 0; }
                        to { transform: translateX(0); opacity: 1; }
                    }
                    @keyframes toastSlideOut {
                        from { transform: translateX(0); opacity: 1; }
                        to { transform: translateX(100%); opacity: 0; }
                    }
                "#}
            </style>
            <i class={kind.icon()}></i>
            <span>{ &props.toast.message }</span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_toast_replaces_current_with_fresh_id() {
        let first = replace_toast(None, "Thank you for subscribing!".to_string(), ToastKind::Success);
        assert_eq!(first.id, 1);
        let second = replace_toast(Some(first.id), "Coming soon!".to_string(), ToastKind::Error);
        assert_eq!(second.id, 2);
        assert_eq!(second.message, "Coming soon!");
        assert_eq!(second.kind, ToastKind::Error);
    }

    #[test]
    fn toast_ids_skip_zero_on_wrap() {
        let toast = replace_toast(Some(u32::MAX), "again".to_string(), ToastKind::Success);
        assert_eq!(toast.id, 1);
    }

    #[test]
    fn repeated_message_still_remounts_the_view() {
        // The view is keyed by id, so its timers restart only if the id changes.
        let first = replace_toast(None, COMING.to_string(), ToastKind::Success);
        let again = replace_toast(Some(first.id), COMING.to_string(), ToastKind::Success);
        assert_eq!(first.message, again.message);
        assert_ne!(first.id, again.id);
    }

    const COMING: &str = "Coming soon!";
}
