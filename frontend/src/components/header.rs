use food_share_domain::navigation::{AuthRegion, NavBar, ProviderEntry};
use food_share_domain::AppContext;
use shared::ModalId;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub app: Rc<AppContext>,
    pub navigation: NavBar,
    pub auth_region: Option<AuthRegion>,
}

fn open_modal(app: &Rc<AppContext>, target: ModalId) -> Callback<MouseEvent> {
    let app = app.clone();
    Callback::from(move |_: MouseEvent| {
        if target == ModalId::Dashboard {
            app.open_dashboard();
        } else {
            app.page().open_modal(target);
        }
    })
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="header">
            <nav class="navbar">
                <div class="nav-brand">
                    <i class="fas fa-hand-holding-heart"></i>
                    <span>{"FoodShare"}</span>
                </div>
                <div class="nav-buttons">
                    {for props.navigation.buttons.iter().map(|button| html! {
                        <button class={button.style.css_class()} onclick={open_modal(&props.app, button.target)}>
                            {&button.caption}
                        </button>
                    })}
                </div>
                {match &props.auth_region {
                    Some(region) => html! {
                        <div id="authContainer" class="auth-container">
                            <AuthRegionView app={props.app.clone()} region={region.clone()} />
                        </div>
                    },
                    None => html! {},
                }}
            </nav>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct AuthRegionProps {
    app: Rc<AppContext>,
    region: AuthRegion,
}

#[function_component(AuthRegionView)]
fn auth_region_view(props: &AuthRegionProps) -> Html {
    match &props.region {
        AuthRegion::Pending => html! {
            <span class="auth-loading">{"Loading..."}</span>
        },
        AuthRegion::Guest { email_login, providers } => html! {
            <>
                {if *email_login {
                    html! {
                        <button class="btn btn-primary" onclick={open_modal(&props.app, ModalId::Login)}>
                            <i class="fas fa-sign-in-alt"></i>
                            {"Login"}
                        </button>
                    }
                } else { html! {} }}
                {for providers.iter().map(|entry| provider_button(&props.app, entry))}
            </>
        },
        AuthRegion::Member { email, provider_label, .. } => {
            let on_sign_out = {
                let actions = props.app.actions().clone();
                Callback::from(move |_: MouseEvent| {
                    let actions = actions.clone();
                    spawn_local(async move {
                        let _ = actions.sign_out().await;
                    });
                })
            };
            html! {
                <div class="auth-user">
                    <div class="user-info">
                        <div class="user-avatar">
                            <i class="fas fa-user-circle"></i>
                        </div>
                        <div class="user-details">
                            <span class="user-email">{email}</span>
                            <span class="user-provider">{format!("via {}", provider_label)}</span>
                        </div>
                    </div>
                    <button class="btn btn-outline" onclick={on_sign_out}>
                        <i class="fas fa-sign-out-alt"></i>
                        {"Sign Out"}
                    </button>
                </div>
            }
        }
    }
}

fn provider_button(app: &Rc<AppContext>, entry: &ProviderEntry) -> Html {
    let onclick = {
        let actions = app.actions().clone();
        let provider = entry.provider.clone();
        Callback::from(move |_: MouseEvent| {
            let actions = actions.clone();
            let provider = provider.clone();
            spawn_local(async move {
                let _ = actions.sign_in_with_provider_redirect(&provider).await;
            });
        })
    };
    html! {
        <button class="btn btn-outline" {onclick}>
            <i class={format!("fab fa-{}", entry.provider.to_ascii_lowercase())}></i>
            {format!("Sign in with {}", entry.label)}
        </button>
    }
}
