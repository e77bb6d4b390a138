use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use log::{error, info};
use std::rc::Rc;

use crate::api::models::Credentials;
use crate::api::ApiClient;
use crate::app::Settings;
use crate::auth;
use crate::utils::run_async_to_main;

pub fn show_login_window(app: &Application, client: ApiClient) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Sign In")
        .default_width(420)
        .default_height(320)
        .resizable(false)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Sign in to your contacts"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let server_entry = gtk::Entry::new();
    server_entry.set_placeholder_text(Some("Server URL (e.g. http://localhost:8000)"));
    server_entry.set_text(client.base_api());
    server_entry.set_hexpand(true);

    let email_entry = gtk::Entry::new();
    email_entry.set_placeholder_text(Some("Email"));
    email_entry.set_hexpand(true);

    let pass_entry = gtk::PasswordEntry::new();
    pass_entry.set_placeholder_text(Some("Password"));
    pass_entry.set_show_peek_icon(true);
    pass_entry.set_hexpand(true);

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&server_entry);
    form.append(&email_entry);
    form.append(&pass_entry);
    root.append(&form);

    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    root.append(&status);

    let actions = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    actions.set_halign(gtk::Align::End);
    let register_btn = gtk::Button::with_label("Create an account");
    register_btn.add_css_class("flat");
    let login_btn = gtk::Button::with_label("Sign In");
    login_btn.add_css_class("suggested-action");
    actions.append(&register_btn);
    actions.append(&login_btn);
    root.append(&actions);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let header_title = gtk::Label::new(Some("Contact Book"));
    header.set_title_widget(Some(&header_title));
    container.append(&header);
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    // Rebuilds the client when the server URL was edited.
    let client_for = {
        let client = client.clone();
        move |url: &str| -> Result<ApiClient, String> {
            if crate::utils::base_api(url) == client.base_api() {
                return Ok(client.clone());
            }
            let updated = ApiClient::new(url, client.session().clone()).map_err(|e| e.to_string())?;
            let base = updated.base_api().to_string();
            if let Err(e) = Settings::update(|s| s.base_url = base) {
                error!("Failed to save server URL: {e}");
            }
            Ok(updated)
        }
    };

    let on_connect = {
        let app = app.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let server_entry = server_entry.clone();
        let email_entry = email_entry.clone();
        let pass_entry = pass_entry.clone();
        let login_btn = login_btn.clone();
        move || {
            let credentials = Credentials {
                email: email_entry.text().to_string(),
                password: pass_entry.text().to_string(),
            };
            if credentials.email.trim().is_empty() || credentials.password.is_empty() {
                overlay.add_toast(adw::Toast::new("Please enter email and password."));
                return;
            }
            let client = match client_for(&server_entry.text()) {
                Ok(client) => client,
                Err(e) => {
                    overlay.add_toast(adw::Toast::new(&format!("Invalid server URL: {e}")));
                    return;
                }
            };

            status.set_label("Signing in…");
            login_btn.set_sensitive(false);

            let status_label = status.clone();
            let login_btn = login_btn.clone();
            let app = app.clone();
            let window = window.clone();
            let overlay = overlay.clone();
            let client_for_async = client.clone();
            run_async_to_main(
                async move { auth::sign_in(&client_for_async, &credentials).await },
                move |res| {
                    login_btn.set_sensitive(true);
                    match res {
                        Ok(()) => {
                            info!("Signed in against {}", client.base_api());
                            let rows = Settings::load().rows_per_page;
                            crate::ui::main_window::show_main_window(&app, client, rows);
                            window.close();
                        }
                        Err(err) => {
                            status_label.set_label("");
                            overlay.add_toast(adw::Toast::new(&err.to_string()));
                        }
                    }
                },
            );
        }
    };

    let on_connect: Rc<dyn Fn()> = Rc::new(on_connect);
    {
        let on_connect = on_connect.clone();
        login_btn.connect_clicked(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        email_entry.connect_activate(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        pass_entry.connect_activate(move |_| (on_connect)());
    }
    {
        let app = app.clone();
        let window = window.clone();
        register_btn.connect_clicked(move |_| {
            crate::ui::register::show_register_window(&app, client.clone());
            window.close();
        });
    }

    window.present();
}
