use yew::prelude::*;
use yew_router::prelude::*;

mod components;
pub mod api_client;
pub mod hooks;
pub mod models;
pub mod session;
pub mod settings;

mod pages;

use components::navbar::Navbar;
use pages::admin::AdminPanel;
use pages::home::Home;
use pages::login::Login;
use pages::owner::OwnerDashboard;
use pages::password::ChangePassword;
use pages::register::Register;
use session::SessionProvider;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/password")]
    Password,
    #[at("/admin")]
    Admin,
    #[at("/owner")]
    Owner,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    log::debug!("Routing to: {:?}", routes);
    match routes {
        Route::Home => {
            log::trace!("Rendering store listing page");
            html! { <Home /> }
        }
        Route::Login => {
            log::trace!("Rendering login page");
            html! { <Login /> }
        }
        Route::Register => {
            log::trace!("Rendering registration page");
            html! { <Register /> }
        }
        Route::Password => {
            log::trace!("Rendering password change page");
            html! { <ChangePassword /> }
        }
        Route::Admin => {
            log::trace!("Rendering admin panel");
            html! { <AdminPanel /> }
        }
        Route::Owner => {
            log::trace!("Rendering owner dashboard");
            html! { <OwnerDashboard /> }
        }
        Route::NotFound => {
            log::warn!("404 - Route not found");
            html! { <main class="page"><h1>{"404 Not Found"}</h1></main> }
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <SessionProvider>
            <BrowserRouter>
                <Navbar />
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </SessionProvider>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    // Initialize settings first
    settings::init_settings();

    // Initialize logger with settings
    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== Ratewise Frontend Application Starting ===");
    log::debug!("API base URL: {}", settings.api_base_url());
    log::debug!("Debug mode: {}", settings.debug_mode);

    log::trace!("Initializing Yew renderer");
    yew::Renderer::<App>::new().render();
    log::info!("Application initialized successfully");
}
