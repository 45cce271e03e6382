//! TopHeader: role panel title, user identity and logout.

use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();

    let panel_title = move || {
        auth_state
            .get()
            .session
            .and_then(|s| s.role)
            .map(|r| r.panel_title())
            .unwrap_or("Solicitudes de Compra")
    };
    let user_label = move || {
        auth_state
            .get()
            .session
            .map(|s| {
                let name = s.full_name();
                if name.is_empty() {
                    s.email
                } else {
                    format!("{} ({})", name, s.email)
                }
            })
            .unwrap_or_default()
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <span class="top-header__title">{panel_title}</span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">
                    {icon("user")}
                    <span>{user_label}</span>
                </div>
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| do_logout(set_auth_state)
                    title="Cerrar sesión"
                >
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}
