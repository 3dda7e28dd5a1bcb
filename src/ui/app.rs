use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;

use super::board::{build_board_grid, CONTENT_MARGIN};
use super::dialogs::{
    show_about_dialog,
    show_instructions_dialog,
    show_loss_alert,
    show_mode_dialog,
};
use super::hud::update_subtitle;
use super::state::AppState;
use crate::game::config::Mode;
use crate::game::session::{CardStatus, FlipOutcome, PairOutcome};

const APP_ID: &str = "io.github.flipmatch.Flipmatch";

pub(super) fn redraw_button_child(button: &gtk::Button) {
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}

/// Sync one card button's CSS classes with its card status.
fn refresh_card_button(st: &AppState, index: usize) {
    let Some(button) = st.grid_buttons.get(index) else {
        return;
    };
    let Some(card) = st.session.cards().get(index) else {
        return;
    };
    button.remove_css_class("revealed");
    button.remove_css_class("matched");
    match card.status {
        CardStatus::Revealed => button.add_css_class("revealed"),
        CardStatus::Matched => button.add_css_class("matched"),
        CardStatus::Hidden => (),
    }
    redraw_button_child(button);
}

pub fn handle_card_click(state: &Rc<RefCell<AppState>>, index: usize) {
    let mut st = state.borrow_mut();
    let generation = st.session.generation();

    match st.session.flip(index) {
        FlipOutcome::Ignored => {}
        FlipOutcome::Revealed => {
            refresh_card_button(&st, index);
        }
        FlipOutcome::Pair(result) => {
            for idx in result.indices {
                refresh_card_button(&st, idx);
            }
            update_subtitle(&st);
            let config = *st.session.config();
            drop(st);

            if result.outcome == PairOutcome::Mismatched {
                schedule_mismatch_reset(
                    state,
                    result.indices,
                    generation,
                    config.reveal_delay_ms,
                );
            }
            if result.won {
                show_win_banner(state);
            }
            if result.lost {
                schedule_loss_alert(state, generation, config.loss_delay_ms);
            }
        }
    }
}

/// Flip a mismatched pair back once the player has seen both faces. The
/// callback is dropped if the board was rebuilt in the meantime.
fn schedule_mismatch_reset(
    state: &Rc<RefCell<AppState>>,
    pair: [usize; 2],
    generation: u64,
    reveal_delay_ms: u64,
) {
    let state_reset = state.clone();
    glib::timeout_add_local(
        std::time::Duration::from_millis(reveal_delay_ms),
        move || {
            let mut st = state_reset.borrow_mut();
            if st.session.generation() != generation {
                return glib::ControlFlow::Break;
            }
            st.session.resolve_mismatch(pair);
            for idx in pair {
                refresh_card_button(&st, idx);
            }
            glib::ControlFlow::Break
        },
    );
}

/// Loss alert, delayed so the final pair's faces are visible first.
fn schedule_loss_alert(state: &Rc<RefCell<AppState>>, generation: u64, loss_delay_ms: u64) {
    let state_alert = state.clone();
    glib::timeout_add_local(
        std::time::Duration::from_millis(loss_delay_ms),
        move || {
            {
                let st = state_alert.borrow();
                if st.session.generation() != generation || !st.session.is_lost() {
                    return glib::ControlFlow::Break;
                }
            }
            show_loss_alert(&state_alert);
            glib::ControlFlow::Break
        },
    );
}

fn show_win_banner(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let Some(banner) = &st.win_banner {
        banner.set_revealed(true);
    }
}

/// Full reset: fresh deal, fresh grid, banner cleared, counters back to zero.
pub(super) fn restart_game(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        st.session.rebuild();
        if let Some(banner) = &st.win_banner {
            banner.set_revealed(false);
        }
        update_subtitle(&st);
    }
    rebuild_board(state);
}

pub(super) fn apply_mode_change(state: &Rc<RefCell<AppState>>, mode: Mode) {
    {
        let mut st = state.borrow_mut();
        st.set_mode(mode);
        if let Some(banner) = &st.win_banner {
            banner.set_revealed(false);
        }
        update_subtitle(&st);
    }
    rebuild_board(state);
}

fn rebuild_board(state: &Rc<RefCell<AppState>>) {
    let (board_container, grid_cols, grid_rows) = {
        let st = state.borrow();
        (
            st.board_container.clone(),
            st.session.config().grid_cols(),
            st.session.config().grid_rows(),
        )
    };
    let Some(board_container) = board_container else {
        return;
    };

    while let Some(child) = board_container.first_child() {
        board_container.remove(&child);
    }
    let grid = build_board_grid(state);
    let grid_ratio = if grid_rows > 0 {
        grid_cols as f32 / grid_rows as f32
    } else {
        1.0
    };
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&grid));
    board_container.append(&grid_frame);
}

pub fn run() {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let state = Rc::new(RefCell::new(AppState::new()));

        let mode_action = SimpleAction::new("mode", None);
        mode_action.connect_activate({
            let app = app.clone();
            let state = state.clone();
            move |_, _| {
                show_mode_dialog(&state, &app);
            }
        });
        app.add_action(&mode_action);

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);

        let dynamic_css_provider = gtk::CssProvider::new();
        if let Some(display) = gtk::gdk::Display::default() {
            gtk::style_context_add_provider_for_display(
                &display,
                &dynamic_css_provider,
                gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }

        let title_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_box.set_valign(gtk::Align::Center);
        title_box.set_halign(gtk::Align::Center);
        title_box.set_hexpand(true);

        let title_label = gtk::Label::builder()
            .label("Flipmatch")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let subtitle_label = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_box.append(&title_label);
        title_box.append(&subtitle_label);

        let header = adw::HeaderBar::builder().title_widget(&title_box).build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let menu_model = gio::Menu::new();
        menu_model.append(Some("Mode"), Some("app.mode"));
        menu_model.append(Some("Instructions"), Some("app.instructions"));
        menu_model.append(Some("About Flipmatch"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        restart_button.set_tooltip_text(Some("New Game"));
        restart_button.connect_clicked({
            let state = state.clone();
            move |_| {
                restart_game(&state);
            }
        });
        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let game_view = build_game_view(&state);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Flipmatch")
            .icon_name("io.github.flipmatch.Flipmatch")
            .default_width(640)
            .default_height(560)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 420);
        win.add_css_class("app-window");

        let style_manager = adw::StyleManager::default();
        if style_manager.is_dark() {
            win.add_css_class("theme-dark");
        } else {
            win.add_css_class("theme-light");
        }
        style_manager.connect_notify_local(Some("dark"), {
            let win = win.clone();
            move |manager, _| {
                if manager.is_dark() {
                    win.remove_css_class("theme-light");
                    win.add_css_class("theme-dark");
                } else {
                    win.remove_css_class("theme-dark");
                    win.add_css_class("theme-light");
                }
            }
        });

        {
            let mut st = state.borrow_mut();
            st.window = Some(win.clone());
            st.subtitle_label = Some(subtitle_label);
            st.dynamic_css_provider = Some(dynamic_css_provider);
            update_subtitle(&st);
        }

        win.present();
    });

    app.run();
}

fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_data(include_str!("../../data/style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let win_banner = adw::Banner::new("🎉 You won!");
    win_banner.add_css_class("win-banner");
    root.append(&win_banner);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Fill);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
    board_frame.set_halign(gtk::Align::Fill);
    board_frame.set_valign(gtk::Align::Fill);
    board_frame.set_hexpand(true);
    board_frame.set_vexpand(true);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("flipmatch-card-container");

    board_card.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |card: gtk::Box, _: glib::ParamSpec| {
            if card.width() < 500 {
                card.add_css_class("compact");
            } else {
                card.remove_css_class("compact");
            }
        }),
    );

    board_frame.set_child(Some(&board_card));
    content.append(&board_frame);
    root.append(&content);

    {
        let mut st = state.borrow_mut();
        st.board_container = Some(board_card.clone());
        st.win_banner = Some(win_banner.clone());
    }
    rebuild_board(state);

    root
}
