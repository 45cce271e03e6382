use contracts::system::session::Role;
use leptos::prelude::*;
use thaw::*;

use crate::domain::a001_requisition::ui::form::RequisitionForm;
use crate::domain::a001_requisition::ui::my_list::MyRequisitions;
use crate::domain::a001_requisition::ui::review::{ReviewMode, ReviewTable};
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;

/// Form and personal history, for roles that raise requisitions
#[component]
fn RequesterHome() -> impl IntoView {
    let selected = RwSignal::new("form".to_string());

    view! {
        <TabList selected_value=selected>
            <Tab value="form">"Nueva solicitud"</Tab>
            <Tab value="mine">"Mis solicitudes"</Tab>
        </TabList>
        <div class="tab-content">
            {move || match selected.get().as_str() {
                "mine" => view! { <MyRequisitions /> }.into_any(),
                _ => view! { <RequisitionForm /> }.into_any(),
            }}
        </div>
    }
}

/// The single place where the role decides what is shown
#[component]
fn RoleHome() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let role = Memo::new(move |_| auth_state.with(|s| s.session.as_ref().and_then(|s| s.role)));

    view! {
        <Shell>
            {move || match role.get() {
                Some(Role::Employee) | Some(Role::RemoteSite) => view! { <RequesterHome /> }.into_any(),
                Some(Role::Purchasing) => view! { <ReviewTable mode=ReviewMode::Purchasing /> }.into_any(),
                Some(Role::AreaManager) => view! { <ReviewTable mode=ReviewMode::Manager /> }.into_any(),
                None => view! {
                    <div class="alert alert--warning">
                        "Su usuario no tiene un rol reconocido. Contacte al administrador."
                    </div>
                }.into_any(),
            }}
        </Shell>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().is_authenticated()
            fallback=|| view! { <LoginPage /> }
        >
            <RoleHome />
        </Show>
    }
}
