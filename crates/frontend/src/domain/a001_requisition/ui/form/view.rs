use contracts::domain::a001_requisition::draft::{DraftField, MAX_DRAFTS};
use contracts::domain::a001_requisition::validation::is_complete;
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use super::view_model::RequisitionFormViewModel;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_FORM;
use crate::system::auth::context::use_auth;

#[component]
pub fn RequisitionForm() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let vm = RequisitionFormViewModel::new(auth_state);
    vm.load_areas();

    // only a tab switch rebuilds the editor; field edits update in place
    let active_id = Memo::new(move |_| vm.batch.with(|b| b.active_draft().id));

    view! {
        <PageFrame page_id="a001_requisition--form" category=PAGE_CAT_FORM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Nueva solicitud de compra"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| vm.add_draft()
                        disabled=Signal::derive(move || {
                            vm.submitting.get() || !vm.batch.with(|b| b.can_add())
                        })
                    >
                        {icon("plus")}
                        {move || format!(" Agregar ({}/{})", vm.batch.with(|b| b.len()), MAX_DRAFTS)}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| vm.submit_command()
                        disabled=Signal::derive(move || vm.submitting.get())
                    >
                        {move || {
                            if vm.submitting.get() {
                                "Enviando...".to_string()
                            } else {
                                format!("Enviar {} solicitud(es)", vm.batch.with(|b| b.len()))
                            }
                        }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <DraftTabs vm=vm />
                {move || {
                    let draft_id = active_id.get();
                    view! { <DraftEditor vm=vm draft_id=draft_id /> }
                }}
            </div>
        </PageFrame>
    }
}

/// One tab per draft; incomplete drafts are marked
#[component]
fn DraftTabs(vm: RequisitionFormViewModel) -> impl IntoView {
    let tabs = move || {
        vm.batch.with(|b| {
            b.drafts()
                .iter()
                .enumerate()
                .map(|(index, d)| (index, d.id, is_complete(d), index == b.active()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="draft-tabs">
            <For
                each=tabs
                key=|tab| *tab
                children=move |(index, _, complete, active)| {
                    let class = match (active, complete) {
                        (true, _) => "draft-tab draft-tab--active",
                        (false, false) => "draft-tab draft-tab--incomplete",
                        (false, true) => "draft-tab",
                    };
                    view! {
                        <div class=class on:click=move |_| vm.select_tab(index)>
                            <span>{format!("Formulario #{}", index + 1)}</span>
                            <Show when=move || vm.can_remove()>
                                <button
                                    class="draft-tab__close"
                                    title="Quitar formulario"
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        vm.remove_draft(index);
                                    }
                                >
                                    {icon("x")}
                                </button>
                            </Show>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// Controls for every field of one draft
#[component]
fn DraftEditor(vm: RequisitionFormViewModel, draft_id: u32) -> impl IntoView {
    let disabled = move || vm.submitting.get();

    view! {
        <div class="requisition-form">
            <div class="requisition-form__grid">
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Priority />
                <CostCenterControl vm=vm draft_id=draft_id />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::ItemType />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Description />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Machine />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Quantity />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Price />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Unit />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Currency />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Family />
                <FieldControl vm=vm draft_id=draft_id field=DraftField::Subfamily />
            </div>

            <div class="form-group">
                <label>{DraftField::Reason.label()}</label>
                <textarea
                    rows="3"
                    prop:value=move || vm.field_value(draft_id, DraftField::Reason)
                    on:input=move |ev| vm.set_field(draft_id, DraftField::Reason, event_target_value(&ev))
                    disabled=disabled
                ></textarea>
            </div>

            <div class="form-group">
                <label>"Imagen (opcional)"</label>
                <input
                    type="file"
                    accept="image/*"
                    disabled=disabled
                    on:change=move |ev| {
                        let file = ev
                            .target()
                            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                            .and_then(|input| input.files())
                            .and_then(|files| files.get(0));
                        if let Some(file) = file {
                            vm.attach_file(draft_id, file);
                        }
                    }
                />
                {move || vm.attachment(draft_id).map(|data| view! {
                    <div class="requisition-form__preview">
                        <img src=format!("data:image/*;base64,{}", data) alt="Vista previa" />
                        <button class="btn-link" on:click=move |_| vm.clear_attachment(draft_id)>
                            "Quitar imagen"
                        </button>
                    </div>
                })}
            </div>
        </div>
    }
}

/// Text input or select, depending on the field
#[component]
fn FieldControl(vm: RequisitionFormViewModel, draft_id: u32, field: DraftField) -> impl IntoView {
    let required = field != DraftField::Machine;
    let label = if required {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    };
    let disabled = move || vm.submitting.get();
    let value = Memo::new(move |_| vm.field_value(draft_id, field));
    let options = Memo::new(move |_| {
        vm.batch.with(|b| {
            b.drafts()
                .iter()
                .find(|d| d.id == draft_id)
                .and_then(|d| field.options(&d.fields))
        })
    });
    let input_type = match field {
        DraftField::Quantity | DraftField::Price => "number",
        _ => "text",
    };

    view! {
        <div class="form-group">
            <label>{label}</label>
            {move || match options.get() {
                Some(choices) => view! {
                    <select
                        on:change=move |ev| vm.set_field(draft_id, field, event_target_value(&ev))
                        disabled=disabled
                    >
                        <option value="" selected=move || value.get().is_empty()>"Seleccione..."</option>
                        {choices.into_iter().map(|code| view! {
                            <option value=code selected=move || value.get() == code>{code}</option>
                        }).collect_view()}
                    </select>
                }.into_any(),
                None => view! {
                    <input
                        type=input_type
                        min=(input_type == "number").then_some("0")
                        step=(field == DraftField::Price).then_some("0.01")
                        prop:value=move || value.get()
                        on:input=move |ev| vm.set_field(draft_id, field, event_target_value(&ev))
                        disabled=disabled
                    />
                }.into_any(),
            }}
        </div>
    }
}

/// Cost center: fixed for the remote site, a select when areas are known
#[component]
fn CostCenterControl(vm: RequisitionFormViewModel, draft_id: u32) -> impl IntoView {
    let field = DraftField::CostCenter;
    let fixed = vm.batch.with_untracked(|b| b.fixed_cost_center().map(str::to_string));
    let disabled = move || vm.submitting.get();
    let value = Memo::new(move |_| vm.field_value(draft_id, field));

    let control = match fixed {
        Some(cost_center) => view! { <input type="text" value=cost_center readonly /> }.into_any(),
        None => (move || {
            let areas = vm.areas.get();
            if areas.is_empty() {
                view! {
                    <input
                        type="text"
                        prop:value=move || value.get()
                        on:input=move |ev| vm.set_field(draft_id, field, event_target_value(&ev))
                        disabled=disabled
                    />
                }
                .into_any()
            } else {
                view! {
                    <select
                        on:change=move |ev| vm.set_field(draft_id, field, event_target_value(&ev))
                        disabled=disabled
                    >
                        <option value="" selected=move || value.get().is_empty()>"Seleccione..."</option>
                        {areas.into_iter().map(|area| {
                            let current = area.clone();
                            view! {
                                <option value=area.clone() selected=move || value.get() == current>{area.clone()}</option>
                            }
                        }).collect_view()}
                    </select>
                }
                .into_any()
            }
        })
        .into_any(),
    };

    view! {
        <div class="form-group">
            <label>{format!("{} *", field.label())}</label>
            {control}
        </div>
    }
}
