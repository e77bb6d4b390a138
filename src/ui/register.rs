use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use std::rc::Rc;

use crate::api::models::Credentials;
use crate::api::ApiClient;
use crate::auth;
use crate::contacts::Field;
use crate::utils::run_async_to_main;

fn field_error_label() -> gtk::Label {
    let label = gtk::Label::new(None);
    label.add_css_class("error");
    label.add_css_class("caption");
    label.set_xalign(0.0);
    label.set_wrap(true);
    label.set_visible(false);
    label
}

fn show_field_error(label: &gtk::Label, message: Option<&str>) {
    match message {
        Some(message) => {
            label.set_label(message);
            label.set_visible(true);
        }
        None => label.set_visible(false),
    }
}

pub fn show_register_window(app: &Application, client: ApiClient) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Register")
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

    let title = gtk::Label::new(Some("Create an account"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let email_entry = gtk::Entry::new();
    email_entry.set_placeholder_text(Some("Email"));
    email_entry.set_hexpand(true);
    let email_error = field_error_label();

    let pass_entry = gtk::PasswordEntry::new();
    pass_entry.set_placeholder_text(Some("Password"));
    pass_entry.set_show_peek_icon(true);
    pass_entry.set_hexpand(true);
    let pass_error = field_error_label();

    let form = gtk::Box::new(gtk::Orientation::Vertical, 6);
    form.append(&email_entry);
    form.append(&email_error);
    form.append(&pass_entry);
    form.append(&pass_error);
    root.append(&form);

    let actions = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    actions.set_halign(gtk::Align::End);
    let back_btn = gtk::Button::with_label("Back to sign in");
    back_btn.add_css_class("flat");
    let register_btn = gtk::Button::with_label("Register");
    register_btn.add_css_class("suggested-action");
    actions.append(&back_btn);
    actions.append(&register_btn);
    root.append(&actions);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let header_title = gtk::Label::new(Some("Contact Book"));
    header.set_title_widget(Some(&header_title));
    container.append(&header);
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    {
        let email_error = email_error.clone();
        email_entry.connect_changed(move |_| email_error.set_visible(false));
    }
    {
        let pass_error = pass_error.clone();
        pass_entry.connect_changed(move |_| pass_error.set_visible(false));
    }

    let on_register = {
        let app = app.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let email_entry = email_entry.clone();
        let pass_entry = pass_entry.clone();
        let register_btn = register_btn.clone();
        let client = client.clone();
        move || {
            let credentials = Credentials {
                email: email_entry.text().to_string(),
                password: pass_entry.text().to_string(),
            };
            let errors = auth::validate_registration(&credentials);
            show_field_error(&email_error, errors.get(Field::Email));
            show_field_error(&pass_error, errors.get(Field::Password));
            if !errors.is_empty() {
                return;
            }

            register_btn.set_sensitive(false);
            let register_btn = register_btn.clone();
            let app = app.clone();
            let window = window.clone();
            let overlay = overlay.clone();
            let client = client.clone();
            let client_for_async = client.clone();
            run_async_to_main(
                async move { auth::register(&client_for_async, &credentials).await },
                move |res| {
                    register_btn.set_sensitive(true);
                    match res {
                        Ok(_) => {
                            crate::ui::login::show_login_window(&app, client);
                            window.close();
                        }
                        Err(err) => overlay.add_toast(adw::Toast::new(&err.to_string())),
                    }
                },
            );
        }
    };

    let on_register: Rc<dyn Fn()> = Rc::new(on_register);
    {
        let on_register = on_register.clone();
        register_btn.connect_clicked(move |_| (on_register)());
    }
    {
        let on_register = on_register.clone();
        pass_entry.connect_activate(move |_| (on_register)());
    }
    {
        let app = app.clone();
        let window = window.clone();
        back_btn.connect_clicked(move |_| {
            crate::ui::login::show_login_window(&app, client.clone());
            window.close();
        });
    }

    window.present();
}
