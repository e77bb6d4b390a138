use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use log::{error, warn};
use std::cell::RefCell;
use std::rc::Rc;

use crate::api::ApiClient;
use crate::app::Settings;
use crate::contacts::pagination::ROWS_PER_PAGE_OPTIONS;
use crate::contacts::{ContactsController, SubmitBlocked, SubmitOutcome};
use crate::storage::ContactCache;
use crate::ui::contact_dialog::ContactDialog;
use crate::ui::contact_table::ContactTable;
use crate::utils::run_async_to_main;

struct ContactsView {
    app: Application,
    window: adw::ApplicationWindow,
    overlay: adw::ToastOverlay,
    notice: gtk::Label,
    table: ContactTable,
    page_label: gtk::Label,
    prev_btn: gtk::Button,
    next_btn: gtk::Button,
    controller: RefCell<ContactsController<ApiClient>>,
    dialog: RefCell<Option<Rc<ContactDialog>>>,
    cache: Option<RefCell<ContactCache>>,
}

impl ContactsView {
    fn toast(&self, message: &str) {
        self.overlay.add_toast(adw::Toast::new(message));
    }

    fn render(self: &Rc<Self>) {
        let controller = self.controller.borrow();
        let on_edit = {
            let view = Rc::downgrade(self);
            Rc::new(move |id: i64| {
                if let Some(view) = view.upgrade() {
                    view.open_dialog(Some(id));
                }
            })
        };
        let on_delete = {
            let view = Rc::downgrade(self);
            Rc::new(move |id: i64| {
                if let Some(view) = view.upgrade() {
                    view.delete(id);
                }
            })
        };
        self.table
            .set_items(controller.page_items(), on_edit, on_delete);

        let page = controller.pagination().page();
        let total = controller.total_pages().max(1);
        self.page_label.set_label(&format!("Page {page} of {total}"));
        self.prev_btn.set_sensitive(page > 1);
        self.next_btn.set_sensitive(page < total);

        match controller.notice() {
            Some(message) => {
                self.notice.set_label(message);
                self.notice.set_visible(true);
            }
            None => self.notice.set_visible(false),
        }
    }

    fn refresh(self: &Rc<Self>) {
        let api = self.controller.borrow().api().clone();
        let view = self.clone();
        run_async_to_main(async move { api.list_contacts().await }, move |res| {
            let fetched = view.controller.borrow_mut().finish_refresh(res);
            if fetched.is_ok() {
                if let Some(cache) = &view.cache {
                    let controller = view.controller.borrow();
                    if let Err(e) = cache.borrow_mut().replace_all(controller.contacts()) {
                        warn!("Failed to update contact cache: {e}");
                    }
                }
            }
            view.render();
        });
    }

    fn delete(self: &Rc<Self>, id: i64) {
        if !self.controller.borrow_mut().begin_delete(id) {
            return;
        }
        let api = self.controller.borrow().api().clone();
        let view = self.clone();
        run_async_to_main(async move { api.delete_contact(id).await }, move |res| {
            let refetch = view.controller.borrow_mut().finish_delete(&res);
            if refetch {
                view.refresh();
            } else {
                view.render();
            }
        });
    }

    fn open_dialog(self: &Rc<Self>, id: Option<i64>) {
        {
            let mut controller = self.controller.borrow_mut();
            match id {
                Some(id) => {
                    if !controller.open_edit(id) {
                        return;
                    }
                }
                None => controller.open_new(),
            }
        }
        let dialog = {
            let controller = self.controller.borrow();
            let Some(form) = controller.form() else { return };
            ContactDialog::new(&self.window, form)
        };

        {
            let view = Rc::downgrade(self);
            let dlg = Rc::downgrade(&dialog);
            dialog.connect_field_changed(move |field, value| {
                let (Some(view), Some(dlg)) = (view.upgrade(), dlg.upgrade()) else { return };
                let mut controller = view.controller.borrow_mut();
                if let Some(form) = controller.form_mut() {
                    form.set_field(field, value);
                    dlg.show_state(form);
                }
            });
        }
        {
            let view = Rc::downgrade(self);
            let dlg = Rc::downgrade(&dialog);
            dialog.connect_save(move || {
                if let (Some(view), Some(dlg)) = (view.upgrade(), dlg.upgrade()) {
                    view.submit(&dlg);
                }
            });
        }
        {
            let view = Rc::downgrade(self);
            dialog.connect_closed(move || {
                if let Some(view) = view.upgrade() {
                    view.controller.borrow_mut().close_form();
                    view.dialog.borrow_mut().take();
                }
            });
        }
        dialog.present();
        self.dialog.replace(Some(dialog));
    }

    fn submit(self: &Rc<Self>, dialog: &Rc<ContactDialog>) {
        let pending = self.controller.borrow_mut().begin_submit();
        if let Some(form) = self.controller.borrow().form() {
            dialog.show_state(form);
        }
        let pending = match pending {
            Ok(pending) => pending,
            Err(SubmitBlocked::InFlight) => {
                self.toast("Still saving…");
                return;
            }
            Err(_) => return,
        };

        let api = self.controller.borrow().api().clone();
        let view = Rc::downgrade(self);
        let dialog = Rc::downgrade(dialog);
        let ticket = pending.ticket;
        let request = pending.request;
        run_async_to_main(async move { request.send(&api).await }, move |res| {
            let Some(view) = view.upgrade() else { return };
            let current = view.controller.borrow().is_current(ticket);
            let outcome = view.controller.borrow_mut().finish_submit(ticket, res);
            // the dialog that sent this may already be gone
            let dialog = dialog.upgrade().filter(|_| current);
            match outcome {
                SubmitOutcome::Saved(_) => {
                    if let Some(dialog) = dialog {
                        dialog.close();
                    }
                    view.refresh();
                }
                _ => {
                    if let (Some(dialog), Some(form)) = (dialog, view.controller.borrow().form()) {
                        dialog.show_state(form);
                    }
                }
            }
        });
    }

    fn set_rows_per_page(self: &Rc<Self>, rows: usize) {
        if !self.controller.borrow_mut().set_rows_per_page(rows) {
            return;
        }
        if let Err(e) = Settings::update(|s| s.rows_per_page = rows) {
            warn!("Failed to save page size: {e}");
        }
        self.render();
    }

    fn step_page(self: &Rc<Self>, forward: bool) {
        {
            let mut controller = self.controller.borrow_mut();
            let page = controller.pagination().page();
            let target = if forward { page + 1 } else { page.saturating_sub(1) };
            controller.set_page(target);
        }
        self.render();
    }

    fn log_out(self: &Rc<Self>) {
        let client = self.controller.borrow().api().clone();
        if let Err(e) = client.session().sign_out() {
            error!("Failed to remove stored token: {e}");
            self.toast("Could not log out cleanly.");
        }
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.borrow().clear() {
                warn!("Failed to clear contact cache: {e}");
            }
        }
        crate::ui::login::show_login_window(&self.app, client);
        self.window.close();
    }
}

pub fn show_main_window(app: &Application, client: ApiClient, rows_per_page: usize) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Contacts")
        .default_width(1024)
        .default_height(640)
        .build();

    let overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
    root.set_margin_top(12);
    root.set_margin_bottom(12);
    root.set_margin_start(12);
    root.set_margin_end(12);

    let notice = gtk::Label::new(None);
    notice.add_css_class("error");
    notice.set_halign(gtk::Align::Start);
    notice.set_visible(false);
    root.append(&notice);

    let table = ContactTable::new();
    root.append(&table.widget());

    let pager = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    pager.set_halign(gtk::Align::Center);
    let prev_btn = gtk::Button::with_label("Previous");
    let page_label = gtk::Label::new(Some("Page 1 of 1"));
    let next_btn = gtk::Button::with_label("Next");
    let rows_label = gtk::Label::new(Some("Rows per page"));
    rows_label.add_css_class("dim-label");
    let options: Vec<String> = ROWS_PER_PAGE_OPTIONS.iter().map(|n| n.to_string()).collect();
    let rows_dropdown = gtk::DropDown::from_strings(&options.iter().map(String::as_str).collect::<Vec<_>>());
    pager.append(&prev_btn);
    pager.append(&page_label);
    pager.append(&next_btn);
    pager.append(&rows_label);
    pager.append(&rows_dropdown);
    root.append(&pager);

    overlay.set_child(Some(&root));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some("Contacts"));
    header.set_title_widget(Some(&title));
    let add_btn = gtk::Button::with_label("Add New Contact");
    add_btn.add_css_class("suggested-action");
    header.pack_end(&add_btn);
    let logout_btn = gtk::Button::with_label("Log out");
    header.pack_start(&logout_btn);
    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));

    let cache = match ContactCache::open_default() {
        Ok(cache) => Some(RefCell::new(cache)),
        Err(e) => {
            warn!("Contact cache unavailable: {e}");
            None
        }
    };

    let mut controller = ContactsController::new(client, rows_per_page);
    if let Some(cache) = &cache {
        match cache.borrow().load_all() {
            Ok(cached) if !cached.is_empty() => controller.replace_contacts(cached),
            Ok(_) => {}
            Err(e) => warn!("Failed to read contact cache: {e}"),
        }
    }
    let selected = ROWS_PER_PAGE_OPTIONS
        .iter()
        .position(|n| *n == controller.pagination().rows_per_page())
        .unwrap_or(0);
    rows_dropdown.set_selected(selected as u32);

    let view = Rc::new(ContactsView {
        app: app.clone(),
        window: window.clone(),
        overlay,
        notice,
        table,
        page_label,
        prev_btn: prev_btn.clone(),
        next_btn: next_btn.clone(),
        controller: RefCell::new(controller),
        dialog: RefCell::new(None),
        cache,
    });

    {
        let view = Rc::downgrade(&view);
        add_btn.connect_clicked(move |_| {
            if let Some(view) = view.upgrade() {
                view.open_dialog(None);
            }
        });
    }
    {
        let view = Rc::downgrade(&view);
        logout_btn.connect_clicked(move |_| {
            if let Some(view) = view.upgrade() {
                view.log_out();
            }
        });
    }
    {
        let view = Rc::downgrade(&view);
        prev_btn.connect_clicked(move |_| {
            if let Some(view) = view.upgrade() {
                view.step_page(false);
            }
        });
    }
    {
        let view = Rc::downgrade(&view);
        next_btn.connect_clicked(move |_| {
            if let Some(view) = view.upgrade() {
                view.step_page(true);
            }
        });
    }
    {
        let view = Rc::downgrade(&view);
        rows_dropdown.connect_selected_notify(move |dd| {
            let Some(view) = view.upgrade() else { return };
            if let Some(rows) = ROWS_PER_PAGE_OPTIONS.get(dd.selected() as usize) {
                view.set_rows_per_page(*rows);
            }
        });
    }
    // The window is the only strong owner of the view.
    {
        let view = RefCell::new(Some(view.clone()));
        window.connect_destroy(move |_| {
            view.borrow_mut().take();
        });
    }

    view.render();
    window.present();
    view.refresh();
}
