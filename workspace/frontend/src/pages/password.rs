use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api_client;

/// Password change form for the authenticated user
#[function_component(ChangePassword)]
pub fn change_password() -> Html {
    let old_password = use_state(String::new);
    let new_password = use_state(String::new);
    let message = use_state(|| None::<Result<String, String>>);
    let busy = use_state(|| false);

    let on_old = {
        let old_password = old_password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            old_password.set(input.value());
        })
    };

    let on_new = {
        let new_password = new_password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            new_password.set(input.value());
        })
    };

    let onsubmit = {
        let old_password = old_password.clone();
        let new_password = new_password.clone();
        let message = message.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let message = message.clone();
            let busy = busy.clone();
            let old_password_state = old_password.clone();
            let new_password_state = new_password.clone();
            let body = serde_json::json!({
                "oldPassword": (*old_password).clone(),
                "newPassword": (*new_password).clone(),
            });

            busy.set(true);
            spawn_local(async move {
                match api_client::put::<String, _>("/auth/update-password", &body).await {
                    Ok(_) => {
                        log::info!("Password updated");
                        message.set(Some(Ok("Password updated successfully".to_string())));
                        old_password_state.set(String::new());
                        new_password_state.set(String::new());
                    }
                    Err(e) => {
                        message.set(Some(Err(e)));
                    }
                }
                busy.set(false);
            });
        })
    };

    html! {
        <main class="page narrow">
            <h1>{"Change password"}</h1>
            <form {onsubmit}>
                <label>{"Current password"}
                    <input type="password" value={(*old_password).clone()} oninput={on_old} required=true />
                </label>
                <label>{"New password"}
                    <input type="password" value={(*new_password).clone()} oninput={on_new} required=true />
                </label>
                {
                    match &*message {
                        Some(Ok(msg)) => html! { <p class="success">{ msg.clone() }</p> },
                        Some(Err(msg)) => html! { <p class="error">{ msg.clone() }</p> },
                        None => html! {},
                    }
                }
                <button type="submit" disabled={*busy}>
                    { if *busy { "Saving..." } else { "Change password" } }
                </button>
            </form>
        </main>
    }
}
