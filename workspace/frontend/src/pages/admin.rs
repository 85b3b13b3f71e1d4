use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api_client;
use crate::hooks::FetchState;
use crate::models::{RatingRow, User};

/// Admin panel: user listing and creation, store creation and the full
/// rating feed. The server enforces the admin role; this page just renders
/// whatever it is allowed to fetch.
#[function_component(AdminPanel)]
pub fn admin_panel() -> Html {
    let reload = use_state(|| 0u32);
    let users = use_state(FetchState::<Vec<User>>::default);
    let ratings = use_state(FetchState::<Vec<RatingRow>>::default);

    {
        let users = users.clone();
        let ratings = ratings.clone();
        use_effect_with(*reload, move |_| {
            users.set(FetchState::Loading);
            ratings.set(FetchState::Loading);
            let users = users.clone();
            let ratings = ratings.clone();
            spawn_local(async move {
                match api_client::get::<Vec<User>>("/users").await {
                    Ok(data) => users.set(FetchState::Success(data)),
                    Err(e) => users.set(FetchState::Error(e)),
                }
                match api_client::get::<Vec<RatingRow>>("/ratings").await {
                    Ok(data) => ratings.set(FetchState::Success(data)),
                    Err(e) => ratings.set(FetchState::Error(e)),
                }
            });
            || ()
        });
    }

    let on_created = {
        let reload = reload.clone();
        Callback::from(move |_: ()| reload.set(*reload + 1))
    };

    html! {
        <main class="page">
            <h1>{"Administration"}</h1>

            <section>
                <h2>{"Users"}</h2>
                { render_users(&users) }
            </section>

            <section>
                <h2>{"Create user"}</h2>
                <CreateUserForm on_created={on_created.clone()} />
            </section>

            <section>
                <h2>{"Create store"}</h2>
                <CreateStoreForm on_created={on_created} />
            </section>

            <section>
                <h2>{"All ratings"}</h2>
                { render_ratings(&ratings) }
            </section>
        </main>
    }
}

fn render_users(users: &FetchState<Vec<User>>) -> Html {
    match users {
        FetchState::NotStarted | FetchState::Loading => html! { <p>{"Loading users..."}</p> },
        FetchState::Error(e) => html! { <p class="error">{ e.clone() }</p> },
        FetchState::Success(data) => html! {
            <table>
                <thead>
                    <tr><th>{"ID"}</th><th>{"Name"}</th><th>{"Email"}</th><th>{"Address"}</th><th>{"Role"}</th></tr>
                </thead>
                <tbody>
                    {
                        data.iter().map(|u| html! {
                            <tr key={u.id}>
                                <td>{ u.id }</td>
                                <td>{ u.name.clone() }</td>
                                <td>{ u.email.clone() }</td>
                                <td>{ u.address.clone() }</td>
                                <td>{ u.role.clone() }</td>
                            </tr>
                        }).collect::<Html>()
                    }
                </tbody>
            </table>
        },
    }
}

fn render_ratings(ratings: &FetchState<Vec<RatingRow>>) -> Html {
    match ratings {
        FetchState::NotStarted | FetchState::Loading => html! { <p>{"Loading ratings..."}</p> },
        FetchState::Error(e) => html! { <p class="error">{ e.clone() }</p> },
        FetchState::Success(data) => html! {
            <table>
                <thead>
                    <tr><th>{"Store"}</th><th>{"User"}</th><th>{"Email"}</th><th>{"Rating"}</th></tr>
                </thead>
                <tbody>
                    {
                        data.iter().map(|r| html! {
                            <tr key={r.id}>
                                <td>{ r.store_name.clone() }</td>
                                <td>{ r.user_name.clone() }</td>
                                <td>{ r.user_email.clone() }</td>
                                <td>{ r.rating }</td>
                            </tr>
                        }).collect::<Html>()
                    }
                </tbody>
            </table>
        },
    }
}

#[derive(Properties, PartialEq)]
struct FormProps {
    on_created: Callback<()>,
}

#[function_component(CreateUserForm)]
fn create_user_form(props: &FormProps) -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);
    let address = use_state(String::new);
    let password = use_state(String::new);
    let role = use_state(|| "user".to_string());
    let error = use_state(|| None::<String>);

    fn bind(state: &UseStateHandle<String>) -> Callback<InputEvent> {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            state.set(input.value());
        })
    }

    let on_role = {
        let role = role.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            role.set(select.value());
        })
    };

    let onsubmit = {
        let name = name.clone();
        let email = email.clone();
        let address = address.clone();
        let password = password.clone();
        let role = role.clone();
        let error = error.clone();
        let on_created = props.on_created.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let error = error.clone();
            let on_created = on_created.clone();
            let body = serde_json::json!({
                "name": (*name).clone(),
                "email": (*email).clone(),
                "address": (*address).clone(),
                "password": (*password).clone(),
                "role": (*role).clone(),
            });
            spawn_local(async move {
                match api_client::post::<serde_json::Value, _>("/users", &body).await {
                    Ok(_) => {
                        log::info!("User created");
                        error.set(None);
                        on_created.emit(());
                    }
                    Err(e) => error.set(Some(e)),
                }
            });
        })
    };

    html! {
        <form {onsubmit} class="inline-form">
            <input type="text" placeholder="Name" value={(*name).clone()} oninput={bind(&name)} required=true />
            <input type="email" placeholder="Email" value={(*email).clone()} oninput={bind(&email)} required=true />
            <input type="text" placeholder="Address" value={(*address).clone()} oninput={bind(&address)} />
            <input type="password" placeholder="Password" value={(*password).clone()} oninput={bind(&password)} required=true />
            <select onchange={on_role} value={(*role).clone()}>
                <option value="user">{"User"}</option>
                <option value="store_owner">{"Store owner"}</option>
                <option value="admin">{"Admin"}</option>
            </select>
            {
                if let Some(msg) = &*error {
                    html! { <p class="error">{ msg.clone() }</p> }
                } else {
                    html! {}
                }
            }
            <button type="submit">{"Create user"}</button>
        </form>
    }
}

#[function_component(CreateStoreForm)]
fn create_store_form(props: &FormProps) -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);
    let address = use_state(String::new);
    let owner_id = use_state(String::new);
    let error = use_state(|| None::<String>);

    fn bind(state: &UseStateHandle<String>) -> Callback<InputEvent> {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            state.set(input.value());
        })
    }

    let onsubmit = {
        let name = name.clone();
        let email = email.clone();
        let address = address.clone();
        let owner_id = owner_id.clone();
        let error = error.clone();
        let on_created = props.on_created.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let error = error.clone();
            let on_created = on_created.clone();
            let parsed_owner = owner_id.trim().parse::<i32>().ok();
            let store_email = if email.is_empty() {
                None
            } else {
                Some((*email).clone())
            };
            let body = serde_json::json!({
                "name": (*name).clone(),
                "email": store_email,
                "address": (*address).clone(),
                "owner_id": parsed_owner,
            });
            spawn_local(async move {
                match api_client::post::<serde_json::Value, _>("/stores", &body).await {
                    Ok(_) => {
                        log::info!("Store created");
                        error.set(None);
                        on_created.emit(());
                    }
                    Err(e) => error.set(Some(e)),
                }
            });
        })
    };

    html! {
        <form {onsubmit} class="inline-form">
            <input type="text" placeholder="Name" value={(*name).clone()} oninput={bind(&name)} required=true />
            <input type="email" placeholder="Email (optional)" value={(*email).clone()} oninput={bind(&email)} />
            <input type="text" placeholder="Address" value={(*address).clone()} oninput={bind(&address)} required=true />
            <input type="number" placeholder="Owner user ID (optional)" value={(*owner_id).clone()} oninput={bind(&owner_id)} />
            {
                if let Some(msg) = &*error {
                    html! { <p class="error">{ msg.clone() }</p> }
                } else {
                    html! {}
                }
            }
            <button type="submit">{"Create store"}</button>
        </form>
    }
}
