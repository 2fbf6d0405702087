use food_share_domain::validation::FormState;
use food_share_domain::AppContext;
use shared::ModalId;
use std::rc::Rc;
use yew::prelude::*;

use super::form_view::FormView;
use super::modal::Modal;

#[derive(Properties, PartialEq)]
pub struct ListingModalProps {
    pub app: Rc<AppContext>,
    pub open: bool,
    pub state: FormState,
}

#[function_component(DonationModal)]
pub fn donation_modal(props: &ListingModalProps) -> Html {
    html! {
        <Modal app={props.app.clone()} id={ModalId::Donation} open={props.open} title="Donate Food">
            <FormView app={props.app.clone()} state={props.state.clone()} submit_label="Submit Donation" />
        </Modal>
    }
}

#[function_component(RequestModal)]
pub fn request_modal(props: &ListingModalProps) -> Html {
    html! {
        <Modal app={props.app.clone()} id={ModalId::Request} open={props.open} title="Request Food">
            <FormView app={props.app.clone()} state={props.state.clone()} submit_label="Submit Request" />
        </Modal>
    }
}
