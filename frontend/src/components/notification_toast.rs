use food_share_domain::notification::Notification;
use food_share_domain::AppContext;
use gloo::timers::callback::Timeout;
use std::rc::Rc;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::services::timers::millis;

#[derive(Properties, PartialEq)]
pub struct NotificationToastProps {
    pub app: Rc<AppContext>,
    pub notification: Option<Notification>,
}

#[function_component(NotificationToast)]
pub fn notification_toast(props: &NotificationToastProps) -> Html {
    // One timer per toast; a replaced toast's timer is dropped with it
    use_effect_with(props.notification.clone(), {
        let app = props.app.clone();
        move |notification: &Option<Notification>| {
            let timer = notification.as_ref().map(|n| {
                let id = n.id;
                Timeout::new(millis(n.auto_dismiss), move || {
                    app.page().dismiss_notification(id);
                })
            });
            move || drop(timer)
        }
    });

    let Some(notification) = &props.notification else {
        return html! {};
    };

    let on_close = {
        let app = props.app.clone();
        let id = notification.id;
        Callback::from(move |_: MouseEvent| {
            app.page().dismiss_notification(id);
        })
    };

    html! {
        <div class={notification.kind.css_class()}>
            <div class="notification-content">
                <i class={notification.kind.icon()}></i>
                <span>{&notification.message}</span>
            </div>
            <button class="notification-close" onclick={on_close}>
                <i class="fas fa-times"></i>
            </button>
        </div>
    }
}
