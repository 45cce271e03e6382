use contracts::system::session::Session;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().and_then(|s| s.token()).is_some()
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        session: storage::load_session(),
    });

    // A restored token is shown optimistically and dropped if the backend refuses it
    Effect::new(move |_| {
        let Some(token) = auth_state.get_untracked().session.map(|s| s.token) else {
            return;
        };
        spawn_local(async move {
            match api::verify_token(&token).await {
                Ok(true) => {}
                Ok(false) => {
                    log::info!("stored token rejected, clearing session");
                    storage::clear_session();
                    set_auth_state.set(AuthState::default());
                }
                Err(e) => log::warn!("token verification skipped: {}", e),
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Log in, persist the session and switch to the main view
pub async fn do_login(
    email: String,
    password: String,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), String> {
    let response = api::login(email.clone(), password).await?;
    let session = Session::from_login(&email, response);
    storage::save_session(&session);
    set_auth_state.set(AuthState {
        session: Some(session),
    });
    Ok(())
}

/// Clear the stored session and return to the login screen
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    storage::clear_session();
    set_auth_state.set(AuthState::default());
}
