use food_share_domain::listings::{cards_for, DashboardTab, ListingBoard, ListingCard};
use food_share_domain::AppContext;
use shared::ModalId;
use std::rc::Rc;
use web_sys::MouseEvent;
use yew::prelude::*;

use super::modal::Modal;

#[derive(Properties, PartialEq)]
pub struct DashboardModalProps {
    pub app: Rc<AppContext>,
    pub open: bool,
    pub board: ListingBoard,
    pub tab: DashboardTab,
}

fn card_class(tab: DashboardTab) -> &'static str {
    match tab {
        DashboardTab::Donations => "donation-card",
        DashboardTab::Requests => "request-card",
        DashboardTab::Available => "available-card",
    }
}

#[function_component(DashboardModal)]
pub fn dashboard_modal(props: &DashboardModalProps) -> Html {
    let cards = cards_for(&props.board, props.tab);

    html! {
        <Modal app={props.app.clone()} id={ModalId::Dashboard} open={props.open} title="My Dashboard">
            <div class="dashboard">
                <div class="dashboard-tabs">
                    {for DashboardTab::ALL.iter().map(|tab| {
                        let onclick = {
                            let app = props.app.clone();
                            let tab = *tab;
                            Callback::from(move |_: MouseEvent| app.page().select_tab(tab))
                        };
                        html! {
                            <button class={classes!("tab-btn", (*tab == props.tab).then_some("active"))} {onclick}>
                                {tab.label()}
                            </button>
                        }
                    })}
                </div>
                <div class="tab-content active">
                    {if cards.is_empty() {
                        html! { <p class="empty-state">{props.tab.empty_message()}</p> }
                    } else {
                        html! {
                            <div class="cards-grid">
                                {for cards.iter().map(|card| listing_card(card, card_class(props.tab)))}
                            </div>
                        }
                    }}
                </div>
            </div>
        </Modal>
    }
}

fn listing_card(card: &ListingCard, class: &'static str) -> Html {
    html! {
        <div class={class} key={card.id.to_string()}>
            <div class="card-header">
                <h4>{&card.title}</h4>
                <span class={card.status_class()}>{card.status.as_str()}</span>
            </div>
            <div class="card-details">
                {for card.details.iter().map(|(label, value)| html! {
                    <div class="card-detail">
                        <span>{*label}</span>
                        <span>{value}</span>
                    </div>
                })}
            </div>
        </div>
    }
}
