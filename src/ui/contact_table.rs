use gtk4::prelude::*;
use gtk4 as gtk;
use std::rc::Rc;

use crate::api::models::Contact;

pub type RowAction = Rc<dyn Fn(i64)>;

pub struct ContactTable {
    root: gtk::Box,
    list: gtk::ListBox,
    empty: gtk::Label,
}

impl ContactTable {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let header = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        for (title, width) in [("", 4), ("Name", 18), ("Email", 24), ("Phone", 14), ("Address", 24), ("", 12)] {
            let label = gtk::Label::new(Some(title));
            label.add_css_class("heading");
            label.set_width_chars(width);
            label.set_xalign(0.0);
            header.append(&label);
        }
        root.append(&header);

        let list = gtk::ListBox::new();
        list.set_selection_mode(gtk::SelectionMode::None);
        list.add_css_class("boxed-list");

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        scroller.set_child(Some(&list));
        root.append(&scroller);

        let empty = gtk::Label::new(Some("No contacts yet."));
        empty.add_css_class("dim-label");
        root.append(&empty);

        Self { root, list, empty }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn set_items(&self, items: &[Contact], on_edit: RowAction, on_delete: RowAction) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        self.empty.set_visible(items.is_empty());

        for contact in items {
            let Some(id) = contact.id else { continue };
            let row = gtk::ListBoxRow::new();
            let line = gtk::Box::new(gtk::Orientation::Horizontal, 12);
            line.set_margin_top(8);
            line.set_margin_bottom(8);
            line.set_margin_start(8);
            line.set_margin_end(8);

            let avatar = gtk::Label::new(Some(&contact.initials()));
            avatar.add_css_class("title-4");
            avatar.set_width_chars(4);
            line.append(&avatar);

            for (text, width) in [
                (contact.full_name(), 18),
                (contact.email.clone(), 24),
                (contact.phone.clone(), 14),
                (contact.address.clone(), 24),
            ] {
                let label = gtk::Label::new(Some(&text));
                label.set_width_chars(width);
                label.set_max_width_chars(width);
                label.set_ellipsize(gtk::pango::EllipsizeMode::End);
                label.set_xalign(0.0);
                line.append(&label);
            }

            let edit_btn = gtk::Button::with_label("Edit");
            edit_btn.add_css_class("flat");
            {
                let on_edit = on_edit.clone();
                edit_btn.connect_clicked(move |_| (on_edit)(id));
            }
            let delete_btn = gtk::Button::with_label("Delete");
            delete_btn.add_css_class("destructive-action");
            {
                let on_delete = on_delete.clone();
                delete_btn.connect_clicked(move |_| (on_delete)(id));
            }
            line.append(&edit_btn);
            line.append(&delete_btn);

            row.set_child(Some(&line));
            self.list.append(&row);
        }
    }
}
