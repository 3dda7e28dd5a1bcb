use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;

use adw::prelude::*;

use super::app::{apply_mode_change, restart_game};
use super::state::AppState;
use crate::game::config::Mode;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Instructions"),
        Some(
            "Flip two cards at a time and find the matching pairs.\n\
Mismatched cards turn back face-down after a moment.\n\
In Challenge mode you only get a few attempts, so choose carefully.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Flipmatch")
        .application_icon("io.github.flipmatch.Flipmatch")
        .version("0.1.0")
        .comments("A pair-matching memory game.")
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(app.active_window().as_ref());
    dialog
}

/// One-shot loss alert. Reset stays external: the dialog only offers it, the
/// banner and board are cleared by the restart itself.
pub(super) fn show_loss_alert(state: &Rc<RefCell<AppState>>) {
    let parent = {
        let st = state.borrow();
        st.window.clone()
    };
    let dialog = adw::AlertDialog::new(
        Some("Out of Attempts"),
        Some("No attempts left. Start a new game to try again."),
    );
    dialog.add_response("close", "Close");
    dialog.add_response("restart", "New Game");
    dialog.set_response_appearance("restart", adw::ResponseAppearance::Suggested);
    dialog.set_default_response(Some("restart"));
    dialog.set_close_response("close");
    dialog.connect_response(Some("restart"), {
        let state = state.clone();
        move |_, _| {
            restart_game(&state);
        }
    });
    dialog.present(parent.as_ref());
}

fn add_mode_row(
    content: &gtk::Box,
    mode: Mode,
    state: &Rc<RefCell<AppState>>,
    dialog: &adw::Dialog,
) {
    let button = gtk::Button::new();
    button.set_hexpand(true);
    button.set_size_request(-1, 52);
    button.add_css_class("mode-dialog-button");

    let label_box = gtk::Box::new(gtk::Orientation::Vertical, 2);
    label_box.set_halign(gtk::Align::Center);
    let name = gtk::Label::new(Some(mode.name()));
    let detail = gtk::Label::new(Some(mode.description()));
    detail.add_css_class("caption");
    detail.add_css_class("dim-label");
    label_box.append(&name);
    label_box.append(&detail);
    button.set_child(Some(&label_box));

    button.connect_clicked({
        let state = state.clone();
        let dialog = dialog.clone();
        move |_| {
            apply_mode_change(&state, mode);
            dialog.close();
        }
    });
    content.append(&button);
}

pub fn show_mode_dialog(state: &Rc<RefCell<AppState>>, app: &adw::Application) {
    let parent_window = app.active_window();
    let dialog = adw::Dialog::new();
    dialog.set_can_close(true);

    let title = gtk::Label::new(Some("Choose mode"));
    title.add_css_class("dialog-header-title");
    title.set_halign(gtk::Align::Center);

    let header = adw::HeaderBar::new();
    header.set_title_widget(Some(&title));
    header.set_show_end_title_buttons(true);
    header.add_css_class("flat");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 10);
    content.add_css_class("mode-dialog-content");
    content.set_hexpand(true);
    content.set_margin_top(16);
    content.set_margin_bottom(16);
    content.set_margin_start(16);
    content.set_margin_end(16);

    for mode in Mode::ALL {
        add_mode_row(&content, mode, state, &dialog);
    }

    let toolbar = adw::ToolbarView::new();
    toolbar.add_top_bar(&header);
    toolbar.set_content(Some(&content));

    dialog.set_child(Some(&toolbar));
    dialog.present(parent_window.as_ref());
}
