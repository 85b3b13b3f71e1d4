use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api_client;
use crate::components::star_rating::StarRating;
use crate::hooks::FetchState;
use crate::models::{RatingSubmitted, Store};
use crate::session::SessionContext;

/// Public store listing with search and, for logged-in users, star
/// controls to rate each store.
#[function_component(Home)]
pub fn home() -> Html {
    let session = use_context::<SessionContext>().expect("SessionContext missing");
    let stores = use_state(FetchState::<Vec<Store>>::default);
    let search = use_state(String::new);
    let reload = use_state(|| 0u32);

    {
        let stores = stores.clone();
        use_effect_with(*reload, move |_| {
            stores.set(FetchState::Loading);
            let stores = stores.clone();
            spawn_local(async move {
                match api_client::get::<Vec<Store>>("/stores").await {
                    Ok(data) => {
                        log::debug!("Loaded {} stores", data.len());
                        stores.set(FetchState::Success(data));
                    }
                    Err(e) => stores.set(FetchState::Error(e)),
                }
            });
            || ()
        });
    }

    let on_search = {
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
        })
    };

    let rate_store = {
        let reload = reload.clone();
        Callback::from(move |(store_id, rating): (i32, i32)| {
            log::debug!("Submitting rating {} for store {}", rating, store_id);
            let reload = reload.clone();
            spawn_local(async move {
                let body = serde_json::json!({ "store_id": store_id, "rating": rating });
                match api_client::post::<RatingSubmitted, _>("/ratings", &body).await {
                    Ok(submitted) => {
                        log::info!("Rating {} saved", submitted.rating_id);
                        reload.set(*reload + 1);
                    }
                    Err(e) => log::error!("Failed to submit rating: {}", e),
                }
            });
        })
    };

    let body = match &*stores {
        FetchState::NotStarted | FetchState::Loading => html! { <p>{"Loading stores..."}</p> },
        FetchState::Error(e) => html! { <p class="error">{ e.clone() }</p> },
        FetchState::Success(data) => {
            let needle = search.to_lowercase();
            let visible: Vec<&Store> = data
                .iter()
                .filter(|s| {
                    needle.is_empty()
                        || s.name.to_lowercase().contains(&needle)
                        || s.address.to_lowercase().contains(&needle)
                })
                .collect();

            html! {
                <table class="store-table">
                    <thead>
                        <tr>
                            <th>{"Name"}</th>
                            <th>{"Address"}</th>
                            <th>{"Overall rating"}</th>
                            { if session.is_some() { html!{ <th>{"Your rating"}</th> } } else { html!{} } }
                        </tr>
                    </thead>
                    <tbody>
                        {
                            visible.into_iter().map(|store| {
                                let store_id = store.id;
                                let rate_store = rate_store.clone();
                                let on_select = Callback::from(move |value: i32| {
                                    rate_store.emit((store_id, value));
                                });
                                html! {
                                    <tr key={store.id}>
                                        <td>{ store.name.clone() }</td>
                                        <td>{ store.address.clone() }</td>
                                        <td>{ format!("{:.1}", store.overall_rating) }</td>
                                        {
                                            if session.is_some() {
                                                html! { <td><StarRating on_select={on_select} /></td> }
                                            } else {
                                                html! {}
                                            }
                                        }
                                    </tr>
                                }
                            }).collect::<Html>()
                        }
                    </tbody>
                </table>
            }
        }
    };

    html! {
        <main class="page">
            <h1>{"Stores"}</h1>
            <input
                class="search"
                type="text"
                placeholder="Search by name or address"
                value={(*search).clone()}
                oninput={on_search}
            />
            { body }
        </main>
    }
}
