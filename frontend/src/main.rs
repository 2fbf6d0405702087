use anyhow::{anyhow, Context};
use food_share_domain::validation::FormId;
use food_share_domain::{AppConfig, AppContext};
use gloo::events::EventListener;
use shared::ModalId;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{KeyboardEvent, MouseEvent};
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::{
    DashboardModal, DonationModal, FormView, Header, LoginModal, NotificationToast, ProfileModal,
    RequestModal, SignupModal,
};
use hooks::use_page_state;
use services::{GlooDelay, SupabaseAuth};

const CONFIG_DOCUMENT: &str = include_str!("../config.json");

fn load_config() -> AppConfig {
    let mut config = AppConfig::load(
        CONFIG_DOCUMENT,
        option_env!("SUPABASE_URL"),
        option_env!("SUPABASE_ANON_KEY"),
    );
    if config.redirect_url.is_none() {
        config.redirect_url = page_origin();
    }
    config
}

fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

/// Lock page scrolling while an overlay is up
fn set_scroll_locked(locked: bool) -> anyhow::Result<()> {
    let body = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
        .context("document has no body")?;
    let overflow = if locked { "hidden" } else { "auto" };
    body.style()
        .set_property("overflow", overflow)
        .map_err(|e| anyhow!("could not set body overflow: {:?}", e))
}

#[derive(Properties, PartialEq)]
struct AppProps {
    app: Rc<AppContext>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let app = &props.app;
    let state = use_page_state(app);

    // Initial session query and form binding
    use_effect_with((), {
        let app = app.clone();
        move |_| {
            spawn_local(async move {
                app.start().await;
            });
            || ()
        }
    });

    // Escape closes every overlay
    use_effect_with((), {
        let app = app.clone();
        move |_| {
            let listener = web_sys::window().and_then(|window| window.document()).map(|document| {
                EventListener::new(&document, "keydown", move |event| {
                    let is_escape = event
                        .dyn_ref::<KeyboardEvent>()
                        .is_some_and(|key| key.key() == "Escape");
                    if is_escape {
                        app.page().close_all_modals();
                    }
                })
            });
            move || drop(listener)
        }
    });

    let scroll_locked = state.modals.scroll_locked();
    use_effect_with(scroll_locked, |locked| {
        if let Err(e) = set_scroll_locked(*locked) {
            warn!("{:#}", e);
        }
        || ()
    });

    let open_modal = |target: ModalId| {
        let app = app.clone();
        Callback::from(move |_: MouseEvent| app.page().open_modal(target))
    };

    let is_open = |id: ModalId| state.modals.is_open(id);
    let form = |id: FormId| state.form(id).cloned();

    html! {
        <>
            <Header
                app={app.clone()}
                navigation={state.navigation.clone()}
                auth_region={state.auth_region.clone()}
            />

            <main>
                <section class="hero" id="home">
                    <h1>{"Share Food, Share Hope"}</h1>
                    <p>{"Connect surplus food with the people and organizations who need it."}</p>
                    <div class="hero-buttons">
                        <button class="btn btn-primary" onclick={open_modal(ModalId::Donation)}>
                            <i class="fas fa-heart"></i>
                            {"Donate Food"}
                        </button>
                        <button class="btn btn-secondary" onclick={open_modal(ModalId::Request)}>
                            <i class="fas fa-hands-helping"></i>
                            {"Request Food"}
                        </button>
                    </div>
                </section>

                <section class="contact" id="contact">
                    <h2>{"Get in Touch"}</h2>
                    {match form(FormId::Contact) {
                        Some(contact) => html! {
                            <FormView app={app.clone()} state={contact} submit_label="Send Message" />
                        },
                        None => html! {},
                    }}
                </section>
            </main>

            {match form(FormId::Login) {
                Some(login) => html! { <LoginModal app={app.clone()} open={is_open(ModalId::Login)} state={login} /> },
                None => html! {},
            }}
            {match form(FormId::Signup) {
                Some(signup) => html! { <SignupModal app={app.clone()} open={is_open(ModalId::Signup)} state={signup} /> },
                None => html! {},
            }}
            {match form(FormId::Donation) {
                Some(donation) => html! { <DonationModal app={app.clone()} open={is_open(ModalId::Donation)} state={donation} /> },
                None => html! {},
            }}
            {match form(FormId::Request) {
                Some(request) => html! { <RequestModal app={app.clone()} open={is_open(ModalId::Request)} state={request} /> },
                None => html! {},
            }}
            <DashboardModal
                app={app.clone()}
                open={is_open(ModalId::Dashboard)}
                board={state.board.clone()}
                tab={state.dashboard_tab}
            />
            <ProfileModal
                app={app.clone()}
                open={is_open(ModalId::Profile)}
                session={app.machine().current_session()}
            />

            <NotificationToast app={app.clone()} notification={state.notifications.current().cloned()} />
        </>
    }
}

fn main() {
    let config = load_config();
    services::logging::init(&config.log_level);
    info!("FoodShare starting");

    let provider = Rc::new(SupabaseAuth::new(&config.supabase_url, &config.anon_key));
    let app = AppContext::new(config, provider, Rc::new(GlooDelay));

    yew::Renderer::<App>::with_props(AppProps { app }).render();
}
