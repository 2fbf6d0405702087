use food_share_domain::AppContext;
use gloo::timers::callback::Timeout;
use shared::ModalId;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};
use yew::prelude::*;

use crate::services::timers::millis;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub app: Rc<AppContext>,
    pub id: ModalId,
    pub open: bool,
    pub title: AttrValue,
    #[prop_or_default]
    pub children: Html,
}

/// Overlay shell shared by every modal: backdrop, close button, first-field focus
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    use_effect_with(props.open, {
        let id = props.id;
        let delay = props.app.config().focus_delay();
        move |open: &bool| {
            let timer = open.then(|| Timeout::new(millis(delay), move || focus_first_field(id)));
            move || drop(timer)
        }
    });

    if !props.open {
        return html! {};
    }

    let on_backdrop_click = {
        let app = props.app.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            app.page().close_all_modals();
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_close_click = {
        let app = props.app.clone();
        let id = props.id;
        Callback::from(move |_: MouseEvent| {
            app.page().close_modal(id);
        })
    };

    html! {
        <div id={props.id.element_id()} class="modal" style="display: block;" onclick={on_backdrop_click}>
            <div class="modal-content" onclick={on_modal_click}>
                <div class="modal-header">
                    <h2>{props.title.clone()}</h2>
                    <span class="close" onclick={on_close_click}>{"×"}</span>
                </div>
                <div class="modal-body">
                    {props.children.clone()}
                </div>
            </div>
        </div>
    }
}

fn focus_first_field(id: ModalId) {
    let first = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id.element_id()))
        .and_then(|modal| modal.query_selector("input, select, textarea").ok().flatten())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());
    if let Some(element) = first {
        let _ = element.focus();
    }
}
