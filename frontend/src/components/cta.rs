use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::scroll::scroll_to_section;

/// Pointer position relative to a box, as percentages of its size.
pub fn pointer_percent(left: f64, top: f64, width: f64, height: f64, x: f64, y: f64) -> Option<(f64, f64)> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(((x - left) / width * 100.0, (y - top) / height * 100.0))
}

#[derive(Properties, PartialEq)]
pub struct CtaButtonProps {
    pub label: AttrValue,
    /// Section scrolled to on click.
    pub target: AttrValue,
}

/// Call-to-action button whose glow follows the pointer through the `--x`
/// and `--y` custom properties.
#[function_component(CtaButton)]
pub fn cta_button(props: &CtaButtonProps) -> Html {
    let onmousemove = Callback::from(|e: MouseEvent| {
        let Some(button) = e.current_target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let rect = button.get_bounding_client_rect();
        if let Some((x, y)) = pointer_percent(
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height(),
            f64::from(e.client_x()),
            f64::from(e.client_y()),
        ) {
            let style = button.style();
            let _ = style.set_property("--x", &format!("{x}%"));
            let _ = style.set_property("--y", &format!("{y}%"));
        }
    });

    let onclick = {
        let target = props.target.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            scroll_to_section(&target);
        })
    };

    html! {
        <button class="btn-ceo-cta" {onmousemove} {onclick}>
            <span>{ props.label.clone() }</span>
        </button>
    }
}
