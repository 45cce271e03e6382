use contracts::domain::a001_requisition::catalog::{Family, Subfamily};
use contracts::domain::a001_requisition::export::UNASSIGNED_PURCHASE_ORDER;
use contracts::domain::a001_requisition::record::{Requisition, RequisitionStatus};
use contracts::domain::a001_requisition::review::PendingEdit;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use super::state::ReviewState;
use super::ReviewMode;
use crate::domain::a001_requisition::ui::detail::status_badge_class;
use crate::shared::icons::icon;
use crate::shared::number_format::{format_amount, format_quantity};

/// One table row. Cells read the record by id so a committed edit or a
/// rollback re-renders in place.
#[component]
pub fn ReviewRow(
    id: i64,
    mode: ReviewMode,
    state: RwSignal<ReviewState>,
    on_propose: Callback<Option<PendingEdit>>,
    on_detail: Callback<i64>,
    on_download: Callback<i64>,
) -> impl IntoView {
    let text = move |read: fn(&Requisition) -> String| {
        move || state.with(|s| s.board.record(id).map(read).unwrap_or_default())
    };
    let status = Memo::new(move |_| {
        state.with(|s| s.board.record(id).map(|r| r.status).unwrap_or_default())
    });

    view! {
        <tr>
            <td>
                <a
                    href="#"
                    class="table__link"
                    on:click=move |ev| {
                        ev.prevent_default();
                        on_detail.run(id);
                    }
                >
                    {format!("RQ{}", id)}
                </a>
            </td>
            <td>{text(|r| r.priority.clone())}</td>
            <td>{text(|r| r.item_type.clone())}</td>
            <td class="table__cell--wrap">{text(|r| r.description.clone())}</td>
            <td class="table__cell--number">
                {text(|r| format!("{} {}", format_quantity(&r.quantity), r.unit))}
            </td>
            <td class="table__cell--number">
                {text(|r| format!("{} {}", format_amount(&r.price), r.currency))}
            </td>
            <td>
                {match mode {
                    ReviewMode::Purchasing => view! { <CategoryCell id=id state=state on_propose=on_propose /> }.into_any(),
                    ReviewMode::Manager => text(|r| format!("{} / {}", r.family, r.subfamily)).into_any(),
                }}
            </td>
            <td>{move || state.with(|s| s.requester_name(id))}</td>
            <td>
                {match mode {
                    ReviewMode::Manager => view! { <StatusCell id=id state=state on_propose=on_propose /> }.into_any(),
                    ReviewMode::Purchasing => view! {
                        <span class=move || status_badge_class(status.get())>
                            {move || status.get().code()}
                        </span>
                    }.into_any(),
                }}
            </td>
            <td>
                {move || {
                    if mode == ReviewMode::Purchasing && status.get() == RequisitionStatus::Approved {
                        view! { <PurchaseOrderCell id=id state=state on_propose=on_propose /> }.into_any()
                    } else {
                        text(|r| {
                            r.assigned_purchase_order()
                                .unwrap_or(UNASSIGNED_PURCHASE_ORDER)
                                .to_string()
                        })
                        .into_any()
                    }
                }}
            </td>
            <td>
                <button
                    class="table__icon-btn"
                    title="Descargar imagen"
                    on:click=move |_| on_download.run(id)
                >
                    {icon("image")}
                </button>
            </td>
        </tr>
    }
}

/// Status select; the shown value always follows the stored status
#[component]
fn StatusCell(
    id: i64,
    state: RwSignal<ReviewState>,
    on_propose: Callback<Option<PendingEdit>>,
) -> impl IntoView {
    let stored = move || {
        state.with(|s| {
            // a rollback bumps the revision even when the record is unchanged
            let _ = s.board.revision();
            s.board
                .record(id)
                .map(|r| r.status.code().to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <select
            class="status-select"
            prop:value=stored
            on:change=move |ev| {
                let chosen = RequisitionStatus::from_code(&event_target_value(&ev));
                let edit = state.with_untracked(|s| {
                    s.board
                        .record(id)
                        .zip(chosen)
                        .and_then(|(record, status)| PendingEdit::status(record, status))
                });
                on_propose.run(edit);
            }
        >
            {RequisitionStatus::all().into_iter().map(|status| view! {
                <option value=status.code()>{status.code()}</option>
            }).collect_view()}
        </select>
    }
}

/// Purchase-order input, committed on blur or Enter
#[component]
fn PurchaseOrderCell(
    id: i64,
    state: RwSignal<ReviewState>,
    on_propose: Callback<Option<PendingEdit>>,
) -> impl IntoView {
    let stored = move || {
        state.with(|s| {
            let _ = s.board.revision();
            s.board
                .record(id)
                .and_then(|r| r.assigned_purchase_order().map(str::to_string))
                .unwrap_or_default()
        })
    };

    view! {
        <input
            type="text"
            class="po-input"
            placeholder="Sin asignar"
            prop:value=stored
            on:blur=move |ev| {
                let typed = event_target_value(&ev);
                let edit = state.with_untracked(|s| {
                    s.board.record(id).and_then(|r| PendingEdit::purchase_order(r, &typed))
                });
                on_propose.run(edit);
            }
            on:keydown=move |ev| {
                if ev.key() == "Enter" {
                    // blur runs the commit path once
                    if let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
                        let _ = input.blur();
                    }
                }
            }
        />
    }
}

/// Family and subfamily selects; a new family waits for its subfamily
#[component]
fn CategoryCell(
    id: i64,
    state: RwSignal<ReviewState>,
    on_propose: Callback<Option<PendingEdit>>,
) -> impl IntoView {
    let chosen_family = RwSignal::new(None::<Family>);
    let revision = Memo::new(move |_| state.with(|s| s.board.revision()));
    let stored_family = Memo::new(move |_| {
        state.with(|s| s.board.record(id).and_then(|r| r.family_kind()))
    });
    let stored_subfamily = Memo::new(move |_| {
        state.with(|s| s.board.record(id).and_then(|r| r.subfamily_kind()))
    });

    // a cancelled or failed edit drops the half-made choice
    Effect::new(move |_| {
        revision.track();
        chosen_family.set(None);
    });

    let family = move || chosen_family.get().or(stored_family.get());
    let subfamily_value = move || {
        let _ = revision.get();
        if chosen_family.get().is_some() {
            String::new()
        } else {
            stored_subfamily.get().map(|s| s.code().to_string()).unwrap_or_default()
        }
    };

    view! {
        <div class="category-cell">
            <select
                prop:value=move || {
                    let _ = revision.get();
                    family().map(|f| f.code().to_string()).unwrap_or_default()
                }
                on:change=move |ev| chosen_family.set(Family::from_code(&event_target_value(&ev)))
            >
                <option value="">"—"</option>
                {Family::all().into_iter().map(|f| view! {
                    <option value=f.code()>{f.code()}</option>
                }).collect_view()}
            </select>
            <select
                prop:value=subfamily_value
                on:change=move |ev| {
                    let code = event_target_value(&ev);
                    let edit = family().and_then(|family| {
                        let subfamily = Subfamily::from_code_in(family, &code)?;
                        state.with_untracked(|s| {
                            s.board
                                .record(id)
                                .and_then(|r| PendingEdit::category(r, family, subfamily))
                        })
                    });
                    chosen_family.set(None);
                    on_propose.run(edit);
                }
            >
                <option value="">"—"</option>
                {move || {
                    family()
                        .map(|f| f.subfamilies())
                        .unwrap_or_default()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.code()}</option> })
                        .collect_view()
                }}
            </select>
        </div>
    }
}
