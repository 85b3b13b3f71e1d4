use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client;
use crate::Route;

/// Registration form. Validation mirrors the server rules so most errors
/// surface before a round trip: name 20-60 characters, address up to 400,
/// password 8-16 with an uppercase letter and a special character.
#[function_component(Register)]
pub fn register() -> Html {
    let navigator = use_navigator().expect("Navigator missing");
    let name = use_state(String::new);
    let email = use_state(String::new);
    let address = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    fn bind(state: &UseStateHandle<String>) -> Callback<InputEvent> {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            state.set(input.value());
        })
    }

    fn local_validation(name: &str, address: &str, password: &str) -> Option<String> {
        let name_len = name.chars().count();
        if !(20..=60).contains(&name_len) {
            return Some("Name must be 20-60 characters".to_string());
        }
        if address.chars().count() > 400 {
            return Some("Address must be at most 400 characters".to_string());
        }
        let pw_len = password.chars().count();
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_special = password.chars().any(|c| "!@#$%^&*".contains(c));
        if !(8..=16).contains(&pw_len) || !has_upper || !has_special {
            return Some(
                "Password must be 8-16 chars, include uppercase and special char".to_string(),
            );
        }
        None
    }

    let onsubmit = {
        let navigator = navigator.clone();
        let name = name.clone();
        let email = email.clone();
        let address = address.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            if let Some(msg) = local_validation(&name, &address, &password) {
                error.set(Some(msg));
                return;
            }

            let navigator = navigator.clone();
            let error = error.clone();
            let busy = busy.clone();
            let body = serde_json::json!({
                "name": (*name).clone(),
                "email": (*email).clone(),
                "address": (*address).clone(),
                "password": (*password).clone(),
            });

            busy.set(true);
            spawn_local(async move {
                match api_client::post::<i32, _>("/auth/register", &body).await {
                    Ok(user_id) => {
                        log::info!("Registered user {}", user_id);
                        navigator.push(&Route::Login);
                    }
                    Err(e) => {
                        error.set(Some(e));
                    }
                }
                busy.set(false);
            });
        })
    };

    html! {
        <main class="page narrow">
            <h1>{"Register"}</h1>
            <form {onsubmit}>
                <label>{"Full name"}
                    <input type="text" value={(*name).clone()} oninput={bind(&name)} required=true />
                </label>
                <label>{"Email"}
                    <input type="email" value={(*email).clone()} oninput={bind(&email)} required=true />
                </label>
                <label>{"Address"}
                    <input type="text" value={(*address).clone()} oninput={bind(&address)} />
                </label>
                <label>{"Password"}
                    <input type="password" value={(*password).clone()} oninput={bind(&password)} required=true />
                </label>
                {
                    if let Some(msg) = &*error {
                        html! { <p class="error">{ msg.clone() }</p> }
                    } else {
                        html! {}
                    }
                }
                <button type="submit" disabled={*busy}>
                    { if *busy { "Registering..." } else { "Register" } }
                </button>
            </form>
        </main>
    }
}
