use chrono::{Local, NaiveDate, Utc};
use food_share_domain::validation::{FieldError, FieldKind, FieldSpec, FormId, FormState};
use food_share_domain::AppContext;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Choices offered by select and radio fields
pub fn field_options(name: &str) -> &'static [(&'static str, &'static str)] {
    match name {
        "foodType" => &[
            ("Fruits & Vegetables", "Fruits & Vegetables"),
            ("Grains & Bread", "Grains & Bread"),
            ("Dairy", "Dairy"),
            ("Meat & Protein", "Meat & Protein"),
            ("Prepared Meals", "Prepared Meals"),
            ("Canned Goods", "Canned Goods"),
            ("Other", "Other"),
        ],
        "orgType" => &[
            ("Homeless Shelter", "Homeless Shelter"),
            ("Food Bank", "Food Bank"),
            ("Community Center", "Community Center"),
            ("School", "School"),
            ("Other", "Other"),
        ],
        "urgent" => &[("low", "Low"), ("medium", "Medium"), ("high", "High")],
        "role" => &[("donor", "Food Donor"), ("recipient", "Food Recipient")],
        _ => &[],
    }
}

/// Current value of whichever form control raised `e`
fn control_value(e: &Event) -> Option<String> {
    let target = e.target()?;
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        return Some(area.value());
    }
    target.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
}

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Email => "email",
        FieldKind::Password => "password",
        FieldKind::Tel => "tel",
        FieldKind::Date => "date",
        FieldKind::Number => "number",
        _ => "text",
    }
}

#[derive(Properties, PartialEq)]
pub struct FormViewProps {
    pub app: Rc<AppContext>,
    pub state: FormState,
    pub submit_label: AttrValue,
    #[prop_or_default]
    pub footer: Html,
}

#[function_component(FormView)]
pub fn form_view(props: &FormViewProps) -> Html {
    let form = props.state.layout.id;

    let on_submit = {
        let app = props.app.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let app = app.clone();
            spawn_local(async move {
                app.submit_form(form, Utc::now(), today()).await;
            });
        })
    };

    html! {
        <form class="modal-form" onsubmit={on_submit} novalidate=true>
            {match &props.state.message {
                Some(message) => html! {
                    <div class={classes!("message", message.kind.as_str())}>{&message.text}</div>
                },
                None => html! {},
            }}
            {for props.state.layout.fields.iter().map(|spec| html! {
                <FormField
                    app={props.app.clone()}
                    {form}
                    spec={spec.clone()}
                    value={props.state.value(spec.name).to_string()}
                    error={props.state.error(spec.name).cloned()}
                />
            })}
            <button type="submit" class="btn btn-primary btn-full">{props.submit_label.clone()}</button>
            {props.footer.clone()}
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct FormFieldProps {
    pub app: Rc<AppContext>,
    pub form: FormId,
    pub spec: FieldSpec,
    pub value: String,
    pub error: Option<FieldError>,
}

/// One labelled input; checks itself on blur
#[function_component(FormField)]
pub fn form_field(props: &FormFieldProps) -> Html {
    let FormFieldProps { app, form, spec, value, error } = props;
    let (form, name) = (*form, spec.name);

    let on_input = {
        let app = app.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = control_value(&e) {
                app.page().set_field(form, name, value);
            }
        })
    };
    let on_change = {
        let app = app.clone();
        Callback::from(move |e: Event| {
            if let Some(value) = control_value(&e) {
                app.page().set_field(form, name, value);
            }
        })
    };
    let on_blur = {
        let app = app.clone();
        Callback::from(move |_: FocusEvent| {
            app.page().validate_field(form, name, today());
        })
    };

    let control = match spec.kind {
        FieldKind::Select => html! {
            <select id={name} name={name} required={spec.required} onchange={on_change} onblur={on_blur}>
                <option value="" selected={value.is_empty()}>{format!("Select {}", spec.label)}</option>
                {for field_options(name).iter().map(|(option, label)| html! {
                    <option value={*option} selected={value.as_str() == *option}>{*label}</option>
                })}
            </select>
        },
        FieldKind::TextArea => html! {
            <textarea id={name} name={name} required={spec.required} value={value.clone()}
                oninput={on_input} onblur={on_blur} rows="3" />
        },
        FieldKind::Radio => html! {
            <div class="radio-group">
                {for field_options(name).iter().map(|(option, label)| html! {
                    <label class="radio-option">
                        <input type="radio" name={name} value={*option}
                            checked={value.as_str() == *option} onchange={on_change.clone()} />
                        <span>{*label}</span>
                    </label>
                })}
            </div>
        },
        kind => html! {
            <input type={input_type(kind)} id={name} name={name} required={spec.required}
                class={classes!(error.is_some().then_some("error"))}
                value={value.clone()} oninput={on_input} onblur={on_blur} />
        },
    };

    html! {
        <div class="form-group">
            <label for={name}>{spec.label}</label>
            {control}
            {match error {
                Some(error) => html! { <div class="field-error">{error.message()}</div> },
                None => html! {},
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_fields_have_options() {
        for name in ["foodType", "orgType", "urgent", "role"] {
            assert!(!field_options(name).is_empty(), "{} has no options", name);
        }
        assert!(field_options("quantity").is_empty());
    }

    #[test]
    fn test_urgency_options_parse() {
        for (value, _) in field_options("urgent") {
            assert!(value.parse::<shared::Urgency>().is_ok());
        }
    }
}
