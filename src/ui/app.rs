use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use std::time::Instant;

use gettextrs::{gettext, LocaleCategory};
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::board::{sync_cell_button, CONTENT_MARGIN};
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{set_header_menu, start_timer, stop_timer};
use super::scene::{rebuild_board, show_game, show_menu, show_stage_won};
use super::state::{AppState, VIEW_GAME, VIEW_MENU};
use crate::game::{Difficulty, MatchOutcome, Phase, RevealOutcome, Session, MATCH_CHECK_DELAY};

pub const APP_ID: &str = "io.github.MemoryPuzzle";
const GETTEXT_PACKAGE: &str = "memory-puzzle";
const LOCALEDIR: &str = "/usr/share/locale";
const WINDOW_WIDTH: i32 = 800;
const WINDOW_HEIGHT: i32 = 600;

static GLIB_LOGGER: glib::GlibLogger = glib::GlibLogger::new(
    glib::GlibLoggerFormat::Plain,
    glib::GlibLoggerDomain::CrateTarget,
);

fn init_logging() {
    // Verbosity is left to GLib (`G_MESSAGES_DEBUG`).
    if log::set_logger(&GLIB_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

fn init_i18n() {
    gettextrs::setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = gettextrs::bindtextdomain(GETTEXT_PACKAGE, LOCALEDIR) {
        log::warn!("Unable to bind the text domain: {err}");
    }
    if let Err(err) = gettextrs::bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        log::warn!("Unable to set the text domain encoding: {err}");
    }
    if let Err(err) = gettextrs::textdomain(GETTEXT_PACKAGE) {
        log::warn!("Unable to switch to the text domain: {err}");
    }
}

pub(super) fn start_game(state: &Rc<RefCell<AppState>>, difficulty: Difficulty) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        let game_id = st.next_game_id();
        st.session = Some(Session::new(difficulty, game_id, Instant::now()));
    }
    log::info!("Starting a {difficulty} game");
    rebuild_board(state);
    show_game(state);
    start_timer(state);
}

/// Deals a fresh board at the same difficulty once the win notice is acknowledged.
pub(super) fn start_next_stage(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let stage = {
        let mut st = state.borrow_mut();
        if st.game_id != game_id {
            log::debug!("Ignoring stale next-stage request for game {game_id}");
            return;
        }
        if !st.session.as_ref().is_some_and(Session::is_won) {
            return;
        }
        stop_timer(&mut st);
        let next_id = st.next_game_id();
        let Some(next) = st
            .session
            .as_ref()
            .map(|session| session.next_stage(next_id, Instant::now()))
        else {
            return;
        };
        let stage = next.stage();
        st.session = Some(next);
        stage
    };
    log::info!("Starting stage {stage}");
    rebuild_board(state);
    show_game(state);
    start_timer(state);
}

pub fn handle_cell_click(state: &Rc<RefCell<AppState>>, row: usize, col: usize) {
    let mut st = state.borrow_mut();
    let game_id = st.game_id;
    let Some(session) = st.session.as_mut() else {
        return;
    };

    match session.reveal(row, col) {
        RevealOutcome::Ignored => {}
        RevealOutcome::Revealed { value } => {
            log::debug!("Revealed {value} at ({row}, {col})");
            sync_cell_button(&st, row, col);
        }
        RevealOutcome::PairPending { value } => {
            log::debug!("Revealed {value} at ({row}, {col}); checking pair");
            sync_cell_button(&st, row, col);
            drop(st);
            schedule_match_check(state, game_id);
        }
    }
}

fn schedule_match_check(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let state = state.clone();
    glib::timeout_add_local_once(MATCH_CHECK_DELAY, move || {
        resolve_pending_pair(&state, game_id);
    });
}

fn resolve_pending_pair(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let mut st = state.borrow_mut();
    let Some(session) = st.session.as_mut() else {
        log::debug!("Dropping match check for abandoned game {game_id}");
        return;
    };

    let outcome = session.check_match(game_id);
    match outcome {
        MatchOutcome::Stale => {
            log::debug!("Dropping match check for replaced game {game_id}");
            return;
        }
        MatchOutcome::Idle => return,
        MatchOutcome::Matched { cells, .. } | MatchOutcome::Mismatched { cells } => {
            log::debug!("Pair {:?} resolved: {:?}", cells, outcome);
            for (row, col) in cells {
                sync_cell_button(&st, row, col);
            }
        }
    }

    if let MatchOutcome::Matched {
        stage_won: true, ..
    } = outcome
    {
        log::info!("Stage cleared");
        stop_timer(&mut st);
        drop(st);
        show_stage_won(state, game_id);
    }
}

pub fn run() -> glib::ExitCode {
    init_logging();
    init_i18n();
    glib::set_prgname(Some(APP_ID));
    glib::set_application_name(&gettext("Memory Puzzle Game"));

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        // A second launch just raises the existing window.
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }

        load_css();

        let state = Rc::new(RefCell::new(AppState::new()));

        let new_game_action = SimpleAction::new("new-game", Some(glib::VariantTy::STRING));
        new_game_action.connect_activate({
            let state = state.clone();
            move |_, parameter| {
                let Some(level) = parameter.and_then(|value| value.get::<String>()) else {
                    return;
                };
                match level.parse::<Difficulty>() {
                    Ok(difficulty) => start_game(&state, difficulty),
                    Err(err) => log::warn!("{err}"),
                }
            }
        });
        app.add_action(&new_game_action);

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
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        let dynamic_css_provider = gtk::CssProvider::new();
        if let Some(display) = gdk::Display::default() {
            gtk::style_context_add_provider_for_display(
                &display,
                &dynamic_css_provider,
                gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }

        let title_menu = gtk::Label::new(None);
        title_menu.set_markup(&format!("<b>{}</b>", gettext("Memory Puzzle Game")));
        title_menu.set_halign(gtk::Align::Center);

        let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_game_box.set_valign(gtk::Align::Center);
        title_game_box.set_halign(gtk::Align::Center);
        title_game_box.set_hexpand(true);

        let title_game_main = gtk::Label::builder()
            .label(gettext("Memory Puzzle Game"))
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let title_game_subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_game_box.append(&title_game_main);
        title_game_box.append(&title_game_subtitle);

        let header = adw::HeaderBar::builder()
            .title_widget(&title_menu)
            .build();
        header.add_css_class("flat");

        let back_button = gtk::Button::builder()
            .icon_name("go-previous-symbolic")
            .build();
        back_button.set_tooltip_text(Some(&gettext("Back")));
        back_button.connect_clicked({
            let state = state.clone();
            move |_| {
                show_menu(&state);
            }
        });
        header.pack_start(&back_button);

        let menu_model = gio::Menu::new();
        menu_model.append(Some(&gettext("Instructions")), Some("app.instructions"));
        menu_model.append(Some(&gettext("About Memory Puzzle")), Some("app.about"));
        menu_model.append(Some(&gettext("Quit")), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();
        header.pack_end(&menu_button);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
        view_stack.set_transition_duration(300);

        let menu_view = build_menu_view();
        view_stack.add_named(&menu_view, Some(VIEW_MENU));

        let game_view = build_game_view(&state);
        view_stack.add_named(&game_view, Some(VIEW_GAME));

        view_stack.set_visible_child_name(VIEW_MENU);
        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&view_stack));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title(gettext("Memory Puzzle Game"))
            .default_width(WINDOW_WIDTH)
            .default_height(WINDOW_HEIGHT)
            .content(&toolbar)
            .build();

        {
            let mut st = state.borrow_mut();
            st.window = Some(win.clone());
            st.view_stack = Some(view_stack);
            st.header = Some(header);
            st.back_button = Some(back_button);
            st.title_menu = Some(title_menu);
            st.title_game = Some(title_game_box.upcast::<gtk::Widget>());
            st.title_game_subtitle = Some(title_game_subtitle);
            st.dynamic_css_provider = Some(dynamic_css_provider);
        }

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, _| {
                // Dialogs own Escape once the board is won or lost.
                let playing = {
                    let st = state.borrow();
                    st.in_game_view()
                        && st
                            .session
                            .as_ref()
                            .is_some_and(|session| session.phase() == Phase::Playing)
                };
                if key == gdk::Key::Escape && playing {
                    show_menu(&state);
                    return glib::Propagation::Stop;
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                let mut st = state.borrow_mut();
                stop_timer(&mut st);
                st.next_game_id();
                glib::Propagation::Proceed
            }
        });

        set_header_menu(&state);
        win.present();
    });

    app.run()
}

fn load_css() {
    static STYLE_INIT: Once = Once::new();

    let Some(display) = gdk::Display::default() else {
        return;
    };

    STYLE_INIT.call_once(|| {
        let provider = gtk::CssProvider::new();
        provider.load_from_data(include_str!("../../data/style.css"));
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    });
}

fn build_menu_view() -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("main-menu-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 10);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);

    let prompt = gtk::Label::new(Some(&gettext("Select Difficulty Level:")));
    prompt.add_css_class("difficulty-prompt");

    let buttons_box = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    buttons_box.set_halign(gtk::Align::Center);

    for difficulty in Difficulty::ALL {
        let button = gtk::Button::builder()
            .label(gettext(difficulty.name()))
            .action_name("app.new-game")
            .action_target(&difficulty.code().to_variant())
            .css_classes(vec!["difficulty-button"])
            .build();
        buttons_box.append(&button);
    }

    content.append(&prompt);
    content.append(&buttons_box);

    center.set_center_widget(Some(&content));
    root.append(&center);

    root
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);
    root.add_css_class("game-root");

    let board_container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_container.set_halign(gtk::Align::Fill);
    board_container.set_valign(gtk::Align::Fill);
    board_container.set_hexpand(true);
    board_container.set_vexpand(true);
    board_container.add_css_class("memory-board-container");

    let timer_label = gtk::Label::new(None);
    timer_label.add_css_class("timer-label");
    timer_label.set_halign(gtk::Align::Center);

    root.append(&board_container);
    root.append(&timer_label);

    {
        let mut st = state.borrow_mut();
        st.board_container = Some(board_container);
        st.timer_label = Some(timer_label);
    }

    root
}
