use gtk4::prelude::*;
use gtk4 as gtk;
use std::rc::Rc;

use crate::contacts::{Field, FormState};

struct FieldRow {
    field: Field,
    entry: gtk::Entry,
    error: gtk::Label,
}

/// Modal add/edit window. It only renders a [`FormState`]; the owner wires
/// the callbacks to the controller.
pub struct ContactDialog {
    window: gtk::Window,
    alert: gtk::Label,
    rows: Vec<FieldRow>,
    save_btn: gtk::Button,
    cancel_btn: gtk::Button,
}

impl ContactDialog {
    pub fn new(parent: &impl IsA<gtk::Window>, form: &FormState) -> Rc<Self> {
        let title = if form.is_editing() { "Edit Contact" } else { "Add New Contact" };
        let window = gtk::Window::builder()
            .title(title)
            .transient_for(parent)
            .modal(true)
            .default_width(420)
            .resizable(false)
            .build();

        let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
        content.set_margin_top(16);
        content.set_margin_bottom(16);
        content.set_margin_start(16);
        content.set_margin_end(16);

        let heading = gtk::Label::new(Some(title));
        heading.add_css_class("title-3");
        heading.set_halign(gtk::Align::Start);
        content.append(&heading);

        let alert = gtk::Label::new(None);
        alert.add_css_class("error");
        alert.set_wrap(true);
        alert.set_xalign(0.0);
        alert.set_visible(false);
        content.append(&alert);

        let mut rows = Vec::new();
        for field in Field::CONTACT {
            let entry = gtk::Entry::new();
            entry.set_placeholder_text(Some(field.label()));
            entry.set_hexpand(true);
            entry.set_text(form.draft().get(field).unwrap_or_default());

            let error = gtk::Label::new(None);
            error.add_css_class("error");
            error.add_css_class("caption");
            error.set_xalign(0.0);
            error.set_visible(false);

            content.append(&entry);
            content.append(&error);
            rows.push(FieldRow { field, entry, error });
        }

        let actions = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        actions.set_halign(gtk::Align::End);
        actions.set_margin_top(8);
        let cancel_btn = gtk::Button::with_label("Cancel");
        let save_label = if form.is_editing() { "Update" } else { "Add" };
        let save_btn = gtk::Button::with_label(save_label);
        save_btn.add_css_class("suggested-action");
        actions.append(&cancel_btn);
        actions.append(&save_btn);
        content.append(&actions);

        window.set_child(Some(&content));

        let dialog = Rc::new(Self {
            window,
            alert,
            rows,
            save_btn,
            cancel_btn,
        });
        dialog.show_state(form);
        dialog
    }

    pub fn present(&self) {
        self.window.present();
    }

    pub fn close(&self) {
        self.window.close();
    }

    /// Shows field errors and the whole-form message, and disables Save
    /// while a request is in flight.
    pub fn show_state(&self, form: &FormState) {
        for row in &self.rows {
            match form.errors().get(row.field) {
                Some(message) => {
                    row.error.set_label(message);
                    row.error.set_visible(true);
                    row.entry.add_css_class("error");
                }
                None => {
                    row.error.set_visible(false);
                    row.entry.remove_css_class("error");
                }
            }
        }
        match form.duplicate_error() {
            Some(message) => {
                self.alert.set_label(message);
                self.alert.set_visible(true);
            }
            None => self.alert.set_visible(false),
        }
        let busy = form.is_submitting();
        self.save_btn.set_sensitive(!busy);
        self.save_btn.set_label(match (busy, form.is_editing()) {
            (true, _) => "Saving…",
            (false, true) => "Update",
            (false, false) => "Add",
        });
    }

    pub fn connect_field_changed<F: Fn(Field, String) + 'static>(&self, f: F) {
        let f = Rc::new(f);
        for row in &self.rows {
            let f = f.clone();
            let field = row.field;
            row.entry
                .connect_changed(move |entry| (f)(field, entry.text().to_string()));
        }
    }

    pub fn connect_save<F: Fn() + 'static>(&self, f: F) {
        let f: Rc<dyn Fn()> = Rc::new(f);
        {
            let f = f.clone();
            self.save_btn.connect_clicked(move |_| (f)());
        }
        for row in &self.rows {
            let f = f.clone();
            row.entry.connect_activate(move |_| (f)());
        }
    }

    /// Runs `f` whenever the window goes away, whether through Cancel, the
    /// window controls, or [`ContactDialog::close`].
    pub fn connect_closed<F: Fn() + 'static>(&self, f: F) {
        {
            let window = self.window.clone();
            self.cancel_btn.connect_clicked(move |_| window.close());
        }
        self.window.connect_close_request(move |_| {
            f();
            glib::Propagation::Proceed
        });
    }
}
