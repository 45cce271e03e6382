//! Requisitions raised by the logged-in user.

use contracts::domain::a001_requisition::export::UNASSIGNED_PURCHASE_ORDER;
use contracts::domain::a001_requisition::record::{ListScope, Requisition};
use contracts::shared::page::{Page, PageQuery};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::detail::{status_badge_class, RequisitionDetailDialog};
use crate::domain::a001_requisition::api;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_auth;

const PAGE_SIZE: usize = 10;

#[component]
pub fn MyRequisitions() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let page = RwSignal::new(Page::<Requisition>::default());
    let current_page = RwSignal::new(0usize);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let detail_open = RwSignal::new(false);
    let selected = RwSignal::new(None::<Requisition>);

    let load = move |page_no: usize| {
        let Some(session) = auth_state.get_untracked().session else {
            return;
        };
        let Some(token) = session.token().map(str::to_string) else {
            return;
        };
        let scope = ListScope::Requester(session.user_id);
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let query = PageQuery {
                page: page_no,
                size: PAGE_SIZE,
            };
            match api::fetch_page(&token, scope, query).await {
                Ok(loaded) => {
                    page.set(loaded);
                    current_page.set(page_no);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load(0));

    view! {
        <PageFrame page_id="a001_requisition_mine--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h2 class="page__title">"Mis solicitudes"</h2>
                </div>
                <div class="page__header-right">
                    <PaginationControls
                        current_page=current_page
                        total_pages=Signal::derive(move || page.with(|p| p.total_pages))
                        total_count=Signal::derive(move || page.with(|p| p.total_elements))
                        on_page_change=Callback::new(load)
                    />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load(current_page.get_untracked())
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|err| view! {
                    <div class="alert alert--error">{err}</div>
                })}

                <table class="table">
                    <thead>
                        <tr>
                            <th>"Código"</th>
                            <th>"Descripción"</th>
                            <th>"Prioridad"</th>
                            <th>"Estado"</th>
                            <th>"Orden de compra"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || page.get().content
                            key=|r| (r.id, r.status, r.purchase_order.clone())
                            children=move |r| {
                                let record = r.clone();
                                view! {
                                    <tr>
                                        <td>
                                            <a
                                                href="#"
                                                class="table__link"
                                                on:click=move |ev| {
                                                    ev.prevent_default();
                                                    selected.set(Some(record.clone()));
                                                    detail_open.set(true);
                                                }
                                            >
                                                {r.code()}
                                            </a>
                                        </td>
                                        <td class="table__cell--wrap">{r.description.clone()}</td>
                                        <td>{r.priority.clone()}</td>
                                        <td>
                                            <span class=status_badge_class(r.status)>{r.status.code()}</span>
                                        </td>
                                        <td>
                                            {r.assigned_purchase_order()
                                                .unwrap_or(UNASSIGNED_PURCHASE_ORDER)
                                                .to_string()}
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || !loading.get() && page.with(|p| p.content.is_empty())>
                    <div class="table__empty">"Aún no has registrado solicitudes."</div>
                </Show>
            </div>

            <RequisitionDetailDialog open=detail_open record=selected />
        </PageFrame>
    }
}
