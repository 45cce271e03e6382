pub mod row;
pub mod state;

use contracts::domain::a001_requisition::catalog::{ItemType, Priority};
use contracts::domain::a001_requisition::export::{
    attachment_file_name, export_file_name, RequisitionExportRow,
};
use contracts::domain::a001_requisition::record::{ListScope, RequisitionStatus};
use contracts::domain::a001_requisition::review::{send_edit, PendingEdit, RowEdit, REVIEW_PAGE_SIZE};
use contracts::shared::page::PageQuery;
use contracts::system::users::cached_name;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use self::row::ReviewRow;
use self::state::create_state;
use super::detail::RequisitionDetailDialog;
use crate::domain::a001_requisition::api::{self, HttpRequisitionApi};
use crate::shared::components::confirm_dialog::ConfirmDialog;
use crate::shared::components::filter_panel::FilterPanel;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::export::{download_bytes, export_csv};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_auth;
use crate::system::users::api as users_api;

/// What a reviewer may change in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
    /// Status transitions
    Manager,
    /// Purchase orders and classification
    Purchasing,
}

impl ReviewMode {
    fn scope(&self) -> ListScope {
        match self {
            ReviewMode::Manager => ListScope::Manager,
            ReviewMode::Purchasing => ListScope::All,
        }
    }
}

fn edit_subject(edit: &PendingEdit) -> &'static str {
    match edit.edit {
        RowEdit::Status(_) => "el estado",
        RowEdit::PurchaseOrder(_) => "la orden de compra",
        RowEdit::Category { .. } => "la clasificación",
    }
}

fn export_stamp() -> String {
    chrono::DateTime::from_timestamp_millis(js_sys::Date::now() as i64)
        .map(|d| d.format("%Y%m%d_%H%M%S").to_string())
        .unwrap_or_default()
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[component]
pub fn ReviewTable(mode: ReviewMode) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let state = create_state();
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let filters_expanded = RwSignal::new(false);
    let confirm_open = RwSignal::new(false);
    let detail_open = RwSignal::new(false);
    let detail_id = RwSignal::new(None::<i64>);

    let token = move || {
        auth_state
            .get_untracked()
            .session
            .and_then(|s| s.token().map(str::to_string))
    };

    let load_page = move |page: usize| {
        let Some(token) = token() else {
            set_error.set(Some("No hay una sesión activa.".to_string()));
            return;
        };
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let query = PageQuery {
                page,
                size: REVIEW_PAGE_SIZE,
            };
            match api::fetch_page(&token, mode.scope(), query).await {
                Ok(loaded) => {
                    let ids: Vec<i64> = loaded.content.iter().map(|r| r.user_id).collect();
                    state.update(|s| {
                        s.board.load(page, loaded);
                        s.is_loaded = true;
                    });
                    let known = state.with_untracked(|s| s.names.clone());
                    let resolved = users_api::resolve_names(&token, ids, &known).await;
                    if !resolved.is_empty() {
                        state.update(|s| s.names.extend(resolved));
                    }
                }
                Err(e) => {
                    log!("review page {} failed: {}", page, e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_page(0);
        }
    });

    let on_propose = Callback::new(move |edit: Option<PendingEdit>| {
        if edit.is_none() {
            // nothing to confirm: put the control back to the stored value
            state.update(|s| s.board.cancel());
            return;
        }
        state.update(|s| s.board.propose(edit));
        confirm_open.set(true);
    });

    let on_confirm = Callback::new(move |_: ()| {
        let mut taken = None;
        state.update(|s| taken = s.board.take_pending());
        let Some(edit) = taken else {
            return;
        };
        let token = token();
        spawn_local(async move {
            match send_edit(&HttpRequisitionApi, token.as_deref(), &edit).await {
                Ok(()) => state.update(|s| s.board.commit(&edit)),
                Err(e) => {
                    state.update(|s| s.board.rollback());
                    alert(&format!("No se pudo actualizar RQ{}: {}", edit.requisition_id, e));
                }
            }
        });
    });

    let on_cancel = Callback::new(move |_: ()| {
        state.update(|s| {
            if s.board.pending().is_some() {
                s.board.cancel();
            }
        });
    });

    let on_detail = Callback::new(move |id: i64| {
        detail_id.set(Some(id));
        detail_open.set(true);
    });

    let on_download = Callback::new(move |id: i64| {
        let Some(token) = token() else {
            alert("No hay una sesión activa.");
            return;
        };
        spawn_local(async move {
            let result = api::fetch_attachment(&token, id)
                .await
                .and_then(|(bytes, mime)| download_bytes(&bytes, &mime, &attachment_file_name(id)));
            if let Err(e) = result {
                alert(&e);
            }
        });
    });

    let export = move |_| {
        let result = state.with_untracked(|s| {
            let rows: Vec<RequisitionExportRow> = s
                .visible_ids()
                .into_iter()
                .filter_map(|id| s.board.record(id))
                .map(|record| RequisitionExportRow {
                    record,
                    requester: Some(cached_name(&s.names, record.user_id)),
                })
                .collect();
            export_csv(&rows, &export_file_name(&export_stamp()))
        });
        if let Err(e) = result {
            alert(&e);
        }
    };

    let confirm_title = Signal::derive(move || {
        state.with(|s| {
            s.board
                .pending()
                .map(|p| format!("Confirmar cambio en RQ{}", p.requisition_id))
                .unwrap_or_default()
        })
    });
    let confirm_message = Signal::derive(move || {
        state.with(|s| {
            s.board
                .pending()
                .map(|p| {
                    format!(
                        "¿Cambiar {} de \"{}\" a \"{}\"?",
                        edit_subject(p),
                        p.current,
                        p.proposed()
                    )
                })
                .unwrap_or_default()
        })
    });

    let filter_value = move |pick: fn(&state::ReviewState) -> String| {
        move || state.with(|s| pick(s))
    };

    let title = match mode {
        ReviewMode::Manager => "Solicitudes por aprobar",
        ReviewMode::Purchasing => "Solicitudes de compra",
    };

    view! {
        <PageFrame page_id="a001_requisition--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{title}</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=export>
                        {icon("download")}
                        " Exportar"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <FilterPanel
                    is_expanded=filters_expanded
                    active_filters_count=Signal::derive(move || state.with(|s| s.filter.active_count()))
                    header_extra=view! {
                        <PaginationControls
                            current_page=Signal::derive(move || state.with(|s| s.board.page))
                            total_pages=Signal::derive(move || state.with(|s| s.board.total_pages))
                            total_count=Signal::derive(move || state.with(|s| s.board.total_elements))
                            on_page_change=Callback::new(load_page)
                        />
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| load_page(state.with_untracked(|s| s.board.page))
                            disabled=Signal::derive(move || loading.get())
                        >
                            {icon("refresh")}
                            {move || if loading.get() { " Cargando..." } else { " Actualizar" }}
                        </Button>
                    }.into_any()
                >
                    <div class="filter-panel__fields">
                        <div class="form-group">
                            <label>"Prioridad"</label>
                            <select
                                prop:value=filter_value(|s| s.filter.priority.clone())
                                on:change=move |ev| state.update(|s| s.filter.priority = event_target_value(&ev))
                            >
                                <option value="">"Todas"</option>
                                {Priority::all().into_iter().map(|p| view! {
                                    <option value=p.code()>{p.code()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form-group">
                            <label>"Tipo"</label>
                            <select
                                prop:value=filter_value(|s| s.filter.item_type.clone())
                                on:change=move |ev| state.update(|s| s.filter.item_type = event_target_value(&ev))
                            >
                                <option value="">"Todos"</option>
                                {ItemType::all().into_iter().map(|t| view! {
                                    <option value=t.code()>{t.code()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form-group">
                            <label>"Estado"</label>
                            <select
                                prop:value=filter_value(|s| s.filter.status.clone())
                                on:change=move |ev| state.update(|s| s.filter.status = event_target_value(&ev))
                            >
                                <option value="">"Todos"</option>
                                {RequisitionStatus::all().into_iter().map(|st| view! {
                                    <option value=st.code()>{st.code()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form-group">
                            <label>"Solicitante"</label>
                            <input
                                type="text"
                                placeholder="Nombre..."
                                prop:value=filter_value(|s| s.filter.requester.clone())
                                on:input=move |ev| state.update(|s| s.filter.requester = event_target_value(&ev))
                            />
                        </div>
                        <div class="form-group">
                            <label>"ID"</label>
                            <input
                                type="text"
                                placeholder="15"
                                prop:value=filter_value(|s| s.filter.id.clone())
                                on:input=move |ev| state.update(|s| s.filter.id = event_target_value(&ev))
                            />
                        </div>
                        <Button
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| state.update(|s| s.filter = Default::default())
                        >
                            "Limpiar filtros"
                        </Button>
                    </div>
                </FilterPanel>

                {move || error.get().map(|err| view! {
                    <div class="alert alert--error">{err}</div>
                })}

                <div class="table-wrapper">
                    <table class="table review-table">
                        <thead>
                            <tr>
                                <th>"Código"</th>
                                <th>"Prioridad"</th>
                                <th>"Tipo"</th>
                                <th>"Descripción"</th>
                                <th>"Cantidad"</th>
                                <th>"Precio"</th>
                                <th>"Clasificación"</th>
                                <th>"Solicitante"</th>
                                <th>"Estado"</th>
                                <th>"Orden de compra"</th>
                                <th>"Imagen"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || state.with(|s| s.visible_ids())
                                key=|id| *id
                                children=move |id| view! {
                                    <ReviewRow
                                        id=id
                                        mode=mode
                                        state=state
                                        on_propose=on_propose
                                        on_detail=on_detail
                                        on_download=on_download
                                    />
                                }
                            />
                        </tbody>
                    </table>
                    <Show when=move || state.with(|s| s.is_loaded && s.visible_ids().is_empty())>
                        <div class="table__empty">"No hay solicitudes para mostrar."</div>
                    </Show>
                </div>
            </div>

            <ConfirmDialog
                open=confirm_open
                title=confirm_title
                message=confirm_message
                on_confirm=on_confirm
                on_cancel=on_cancel
            />
            <RequisitionDetailDialog
                open=detail_open
                record=Signal::derive(move || {
                    detail_id.get().and_then(|id| state.with(|s| s.board.record(id).cloned()))
                })
                requester=Signal::derive(move || {
                    detail_id.get().map(|id| state.with(|s| s.requester_name(id))).unwrap_or_default()
                })
            />
        </PageFrame>
    }
}
