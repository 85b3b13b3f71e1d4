use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api_client;
use crate::hooks::FetchState;
use crate::models::{Store, StoreRating};
use crate::session::SessionContext;

/// Store owner dashboard: each owned store with its average rating and the
/// list of customers who rated it.
#[function_component(OwnerDashboard)]
pub fn owner_dashboard() -> Html {
    let session = use_context::<SessionContext>().expect("SessionContext missing");
    let dashboard = use_state(FetchState::<Vec<(Store, Vec<StoreRating>)>>::default);

    let user_id = session.as_ref().map(|s| s.user_id);

    {
        let dashboard = dashboard.clone();
        use_effect_with(user_id, move |user_id| {
            let Some(user_id) = *user_id else {
                dashboard.set(FetchState::Error("Not logged in".to_string()));
                return;
            };

            dashboard.set(FetchState::Loading);
            let dashboard = dashboard.clone();
            spawn_local(async move {
                let stores = match api_client::get::<Vec<Store>>("/stores").await {
                    Ok(stores) => stores,
                    Err(e) => {
                        dashboard.set(FetchState::Error(e));
                        return;
                    }
                };

                let mut owned = Vec::new();
                for store in stores
                    .into_iter()
                    .filter(|s| s.owner_id == Some(user_id))
                {
                    let endpoint = format!("/stores/{}/ratings", store.id);
                    match api_client::get::<Vec<StoreRating>>(&endpoint).await {
                        Ok(ratings) => owned.push((store, ratings)),
                        Err(e) => {
                            log::error!("Failed to load ratings for store {}: {}", store.id, e);
                            dashboard.set(FetchState::Error(e));
                            return;
                        }
                    }
                }

                log::debug!("Loaded {} owned stores", owned.len());
                dashboard.set(FetchState::Success(owned));
            });
        });
    }

    let body = match &*dashboard {
        FetchState::NotStarted | FetchState::Loading => html! { <p>{"Loading your stores..."}</p> },
        FetchState::Error(e) => html! { <p class="error">{ e.clone() }</p> },
        FetchState::Success(owned) if owned.is_empty() => {
            html! { <p>{"No stores are assigned to your account yet."}</p> }
        }
        FetchState::Success(owned) => owned
            .iter()
            .map(|(store, ratings)| {
                html! {
                    <section key={store.id} class="store-card">
                        <h2>{ store.name.clone() }</h2>
                        <p>{ format!("Average rating: {:.1}", store.overall_rating) }</p>
                        {
                            if ratings.is_empty() {
                                html! { <p>{"No ratings yet."}</p> }
                            } else {
                                html! {
                                    <table>
                                        <thead>
                                            <tr><th>{"Customer"}</th><th>{"Email"}</th><th>{"Rating"}</th></tr>
                                        </thead>
                                        <tbody>
                                            {
                                                ratings.iter().enumerate().map(|(i, r)| html! {
                                                    <tr key={i}>
                                                        <td>{ r.name.clone() }</td>
                                                        <td>{ r.email.clone() }</td>
                                                        <td>{ r.rating }</td>
                                                    </tr>
                                                }).collect::<Html>()
                                            }
                                        </tbody>
                                    </table>
                                }
                            }
                        }
                    </section>
                }
            })
            .collect::<Html>(),
    };

    html! {
        <main class="page">
            <h1>{"My stores"}</h1>
            { body }
        </main>
    }
}
