use food_share_domain::AppContext;
use shared::{ModalId, Session};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

use super::modal::Modal;

#[derive(Properties, PartialEq)]
pub struct ProfileModalProps {
    pub app: Rc<AppContext>,
    pub open: bool,
    pub session: Option<Session>,
}

fn profile_field(label: &'static str, value: String) -> Html {
    html! {
        <div class="profile-field">
            <label class="profile-label">{label}</label>
            <div class="profile-value">{value}</div>
        </div>
    }
}

#[function_component(ProfileModal)]
pub fn profile_modal(props: &ProfileModalProps) -> Html {
    let on_dashboard = {
        let app = props.app.clone();
        Callback::from(move |_: MouseEvent| {
            app.page().close_modal(ModalId::Profile);
            app.open_dashboard();
        })
    };

    let on_sign_out = {
        let app = props.app.clone();
        Callback::from(move |_: MouseEvent| {
            let app = app.clone();
            spawn_local(async move {
                if app.actions().sign_out().await.is_ok() {
                    app.page().close_modal(ModalId::Profile);
                }
            });
        })
    };

    html! {
        <Modal app={props.app.clone()} id={ModalId::Profile} open={props.open} title="My Profile">
            {if let Some(session) = &props.session {
                html! {
                    <div class="profile-info">
                        {profile_field("Name", session.display_name().unwrap_or("Not provided").to_string())}
                        {profile_field("Email", session.email.clone())}
                        {profile_field("Role", session.role().map(|r| r.label()).unwrap_or("Not set").to_string())}
                        {profile_field("Signed in via", session.provider_label().to_string())}
                        <div class="profile-buttons">
                            <button type="button" class="btn btn-secondary" onclick={on_dashboard}>
                                {"Open Dashboard"}
                            </button>
                            <button type="button" class="btn btn-outline" onclick={on_sign_out}>
                                {"Sign Out"}
                            </button>
                        </div>
                    </div>
                }
            } else {
                html! {
                    <div class="profile-no-user">
                        <p>{"You are not signed in"}</p>
                    </div>
                }
            }}
        </Modal>
    }
}
