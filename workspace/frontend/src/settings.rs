use log::Level;
use web_sys::window;

/// Global application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Backend API host (e.g., "localhost" or "api.example.com")
    pub api_host: String,

    /// Backend API port (e.g., 3000)
    pub api_port: u16,

    /// API path prefix (e.g., "/api")
    pub api_path: String,

    /// Use HTTPS for API requests
    pub api_use_https: bool,

    /// Default log level for the application
    pub log_level: Level,

    /// Enable debug mode
    pub debug_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_host: "localhost".to_string(),
            api_port: 3000,
            api_path: "/api".to_string(),
            api_use_https: false,
            log_level: Level::Info,
            debug_mode: false,
        }
    }
}

impl AppSettings {
    /// Create settings from the window location
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        if let Some(window) = window() {
            if let Ok(hostname) = window.location().hostname() {
                settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
                if !hostname.is_empty() {
                    settings.api_host = hostname;
                }
            }
            if let Ok(protocol) = window.location().protocol() {
                settings.api_use_https = protocol == "https:";
            }
        }

        if settings.debug_mode {
            settings.log_level = Level::Debug;
        }

        settings
    }

    /// Full base URL for API requests
    pub fn api_base_url(&self) -> String {
        let scheme = if self.api_use_https { "https" } else { "http" };
        format!(
            "{}://{}:{}{}",
            scheme, self.api_host, self.api_port, self.api_path
        )
    }
}

thread_local! {
    static SETTINGS: std::cell::RefCell<Option<AppSettings>> = const { std::cell::RefCell::new(None) };
}

/// Initialize global settings once at startup
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = Some(AppSettings::from_environment());
    });
}

/// Get a copy of the global settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone().unwrap_or_default())
}
