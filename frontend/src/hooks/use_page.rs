use food_share_domain::{AppContext, PageState};
use std::rc::Rc;
use yew::prelude::*;

/// Snapshot of the page that re-renders the caller on every page change
#[hook]
pub fn use_page_state(app: &Rc<AppContext>) -> PageState {
    let trigger = use_force_update();

    use_effect_with((), {
        let page = app.page().clone();
        move |_| {
            let id = page.subscribe(move || trigger.force_update());
            move || page.unsubscribe(id)
        }
    });

    app.page().read().clone()
}
