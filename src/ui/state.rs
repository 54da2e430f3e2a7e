use gtk4 as gtk;
use libadwaita as adw;

use crate::game::Session;

pub const VIEW_MENU: &str = "menu";
pub const VIEW_GAME: &str = "game";

pub struct AppState {
    pub window: Option<adw::ApplicationWindow>,
    pub view_stack: Option<gtk::Stack>,
    pub header: Option<adw::HeaderBar>,
    pub back_button: Option<gtk::Button>,
    pub title_menu: Option<gtk::Label>,
    pub title_game: Option<gtk::Widget>,
    pub title_game_subtitle: Option<gtk::Label>,
    pub board_container: Option<gtk::Box>,
    pub timer_label: Option<gtk::Label>,
    pub dynamic_css_provider: Option<gtk::CssProvider>,

    // Game state
    pub session: Option<Session>,
    pub grid_buttons: Vec<gtk::Button>,
    /// Bumped whenever the board is replaced or abandoned; delayed callbacks
    /// compare against it and drop themselves when it moved on.
    pub game_id: u64,
    pub timer_handle: Option<glib::SourceId>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            window: None,
            view_stack: None,
            header: None,
            back_button: None,
            title_menu: None,
            title_game: None,
            title_game_subtitle: None,
            board_container: None,
            timer_label: None,
            dynamic_css_provider: None,
            session: None,
            grid_buttons: Vec::new(),
            game_id: 0,
            timer_handle: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_game_id(&mut self) -> u64 {
        self.game_id = self.game_id.wrapping_add(1);
        self.game_id
    }

    pub fn in_game_view(&self) -> bool {
        self.view_stack
            .as_ref()
            .and_then(|stack| stack.visible_child_name())
            .as_deref()
            == Some(VIEW_GAME)
    }
}
