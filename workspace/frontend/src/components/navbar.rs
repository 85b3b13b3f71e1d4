use yew::prelude::*;
use yew_router::prelude::*;

use crate::session::{clear_session, SessionContext};
use crate::Route;

/// Top navigation bar. Links depend on the session role: admins get the
/// admin panel, store owners their dashboard, everyone logged in the
/// password page.
#[function_component(Navbar)]
pub fn navbar() -> Html {
    let session = use_context::<SessionContext>().expect("SessionContext missing");
    let navigator = use_navigator().expect("Navigator missing");

    let on_logout = {
        let session = session.clone();
        let navigator = navigator.clone();
        Callback::from(move |_| {
            log::info!("Logging out");
            clear_session();
            session.set(None);
            navigator.push(&Route::Home);
        })
    };

    let role_links = match session.as_ref() {
        Some(s) if s.is_admin() => html! {
            <Link<Route> to={Route::Admin} classes="nav-link">{"Admin"}</Link<Route>>
        },
        Some(s) if s.is_store_owner() => html! {
            <Link<Route> to={Route::Owner} classes="nav-link">{"My Stores"}</Link<Route>>
        },
        _ => html! {},
    };

    html! {
        <nav class="navbar">
            <Link<Route> to={Route::Home} classes="brand">{"Ratewise"}</Link<Route>>
            <div class="nav-links">
                { role_links }
                {
                    match session.as_ref() {
                        Some(s) => html! {
                            <>
                                <Link<Route> to={Route::Password} classes="nav-link">{"Password"}</Link<Route>>
                                <span class="nav-user">{ s.name.clone() }</span>
                                <button class="nav-link" onclick={on_logout}>{"Log out"}</button>
                            </>
                        },
                        None => html! {
                            <>
                                <Link<Route> to={Route::Login} classes="nav-link">{"Log in"}</Link<Route>>
                                <Link<Route> to={Route::Register} classes="nav-link">{"Register"}</Link<Route>>
                            </>
                        },
                    }
                }
            </div>
        </nav>
    }
}
