pub mod contact_dialog;
pub mod contact_table;
pub mod login;
pub mod main_window;
pub mod register;

use adw::Application;
use log::{error, warn};

use crate::api::ApiClient;
use crate::app::{Settings, DEFAULT_API_URL};
use crate::session::Session;

pub fn build_ui(app: &Application) {
    let settings = Settings::load();
    let session = match Settings::path() {
        Some(path) => Session::persistent(path),
        None => Session::in_memory(),
    };

    let client = ApiClient::new(&settings.base_url, session.clone()).or_else(|e| {
        warn!("Bad server URL {:?} ({e}), falling back to {DEFAULT_API_URL}", settings.base_url);
        ApiClient::new(DEFAULT_API_URL, session)
    });
    let client = match client {
        Ok(client) => client,
        Err(e) => {
            error!("Cannot create HTTP client: {e}");
            return;
        }
    };

    if client.session().is_signed_in() {
        main_window::show_main_window(app, client, settings.rows_per_page);
    } else {
        login::show_login_window(app, client);
    }
}
