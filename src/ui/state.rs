use gtk4 as gtk;
use libadwaita as adw;

use crate::game::config::Mode;
use crate::game::session::GameSession;

pub struct AppState {
    pub window: Option<adw::ApplicationWindow>,
    pub subtitle_label: Option<gtk::Label>,
    pub win_banner: Option<adw::Banner>,
    pub board_container: Option<gtk::Box>,
    pub dynamic_css_provider: Option<gtk::CssProvider>,
    pub grid_buttons: Vec<gtk::Button>,

    // Game state
    pub mode: Mode,
    pub session: GameSession,
}

impl Default for AppState {
    fn default() -> Self {
        let mode = Mode::default();
        AppState {
            window: None,
            subtitle_label: None,
            win_banner: None,
            board_container: None,
            dynamic_css_provider: None,
            grid_buttons: Vec::new(),
            mode,
            session: GameSession::new(mode.config()),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.session.set_config(mode.config());
    }
}
