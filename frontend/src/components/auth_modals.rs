use food_share_domain::validation::FormState;
use food_share_domain::AppContext;
use shared::ModalId;
use std::rc::Rc;
use web_sys::MouseEvent;
use yew::prelude::*;

use super::form_view::FormView;
use super::modal::Modal;

#[derive(Properties, PartialEq)]
pub struct AuthModalProps {
    pub app: Rc<AppContext>,
    pub open: bool,
    pub state: FormState,
}

fn switch_link(app: &Rc<AppContext>, from: ModalId, to: ModalId, prompt: &str, link: &str) -> Html {
    let onclick = {
        let app = app.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            app.page().switch_modal(from, to);
        })
    };
    html! {
        <p class="auth-switch">
            {prompt}{" "}
            <a href="#" {onclick}>{link}</a>
        </p>
    }
}

#[function_component(LoginModal)]
pub fn login_modal(props: &AuthModalProps) -> Html {
    let footer = switch_link(&props.app, ModalId::Login, ModalId::Signup, "Don't have an account?", "Sign up");
    html! {
        <Modal app={props.app.clone()} id={ModalId::Login} open={props.open} title="Welcome Back">
            <FormView app={props.app.clone()} state={props.state.clone()} submit_label="Login" {footer} />
        </Modal>
    }
}

#[function_component(SignupModal)]
pub fn signup_modal(props: &AuthModalProps) -> Html {
    let footer = switch_link(&props.app, ModalId::Signup, ModalId::Login, "Already have an account?", "Login");
    html! {
        <Modal app={props.app.clone()} id={ModalId::Signup} open={props.open} title="Join FoodShare">
            <FormView app={props.app.clone()} state={props.state.clone()} submit_label="Create Account" {footer} />
        </Modal>
    }
}
