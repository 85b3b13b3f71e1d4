use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client;
use crate::models::LoginData;
use crate::session::{store_session, Session, SessionContext};
use crate::Route;

#[function_component(Login)]
pub fn login() -> Html {
    let session = use_context::<SessionContext>().expect("SessionContext missing");
    let navigator = use_navigator().expect("Navigator missing");
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let onsubmit = {
        let session = session.clone();
        let navigator = navigator.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let session = session.clone();
            let navigator = navigator.clone();
            let error = error.clone();
            let busy = busy.clone();
            let body = serde_json::json!({
                "email": (*email).clone(),
                "password": (*password).clone(),
            });

            busy.set(true);
            spawn_local(async move {
                match api_client::post::<LoginData, _>("/auth/login", &body).await {
                    Ok(data) => {
                        log::info!("Logged in as {} ({})", data.user.email, data.role);
                        let new_session = Session {
                            token: data.token,
                            role: data.role,
                            user_id: data.user.id,
                            name: data.user.name,
                            email: data.user.email,
                        };
                        store_session(&new_session);
                        session.set(Some(new_session));
                        navigator.push(&Route::Home);
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
            <h1>{"Log in"}</h1>
            <form {onsubmit}>
                <label>{"Email"}
                    <input type="email" value={(*email).clone()} oninput={on_email} required=true />
                </label>
                <label>{"Password"}
                    <input type="password" value={(*password).clone()} oninput={on_password} required=true />
                </label>
                {
                    if let Some(msg) = &*error {
                        html! { <p class="error">{ msg.clone() }</p> }
                    } else {
                        html! {}
                    }
                }
                <button type="submit" disabled={*busy}>
                    { if *busy { "Logging in..." } else { "Log in" } }
                </button>
            </form>
            <p>
                {"No account yet? "}
                <Link<Route> to={Route::Register}>{"Register"}</Link<Route>>
            </p>
        </main>
    }
}
