use serde::{Deserialize, Serialize};
use web_sys::window;
use yew::prelude::*;

const STORAGE_KEY: &str = "ratewise.session";

/// Logged-in user state, mirrored into localStorage so a reload keeps the
/// session alive until the token expires server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: String,
    pub user_id: i32,
    pub name: String,
    pub email: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_store_owner(&self) -> bool {
        self.role == "store_owner"
    }
}

/// Read the persisted session, if any
pub fn load_session() -> Option<Session> {
    let storage = window()?.local_storage().ok()??;
    let raw = storage.get_item(STORAGE_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

/// Persist the session for later page loads
pub fn store_session(session: &Session) {
    let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) else {
        log::warn!("localStorage unavailable, session will not persist");
        return;
    };
    match serde_json::to_string(session) {
        Ok(raw) => {
            if storage.set_item(STORAGE_KEY, &raw).is_err() {
                log::warn!("Failed to persist session");
            }
        }
        Err(e) => log::error!("Failed to serialize session: {}", e),
    }
}

/// Drop the persisted session
pub fn clear_session() {
    if let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}

pub type SessionContext = UseStateHandle<Option<Session>>;

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

/// Context provider carrying the current session. Components flip it via
/// `session.set(...)` after login or logout; persistence is handled by the
/// `store_session`/`clear_session` helpers.
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let session = use_state(load_session);

    html! {
        <ContextProvider<SessionContext> context={session}>
            { props.children.clone() }
        </ContextProvider<SessionContext>>
    }
}
