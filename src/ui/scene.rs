use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::app::start_next_stage;
use super::board::build_board_grid;
use super::dialogs::show_notice_dialog;
use super::hud::{set_header_game, set_header_menu, stop_timer, update_subtitle, update_timer_label};
use super::state::{AppState, VIEW_GAME, VIEW_MENU};

pub(super) fn rebuild_board(state: &Rc<RefCell<AppState>>) {
    let (board_container, rows, cols) = {
        let st = state.borrow();
        let (rows, cols) = st
            .session
            .as_ref()
            .map(|session| (session.board().rows(), session.board().cols()))
            .unwrap_or((0, 0));
        (st.board_container.clone(), rows, cols)
    };
    let Some(board_container) = board_container else {
        return;
    };

    while let Some(child) = board_container.first_child() {
        board_container.remove(&child);
    }
    let grid = build_board_grid(state);
    let grid_ratio = if rows > 0 {
        cols as f32 / rows as f32
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

pub(super) fn show_game(state: &Rc<RefCell<AppState>>) {
    {
        let st = state.borrow();
        if let Some(session) = &st.session {
            update_timer_label(&st, session.remaining_secs(Instant::now()));
        }
        update_subtitle(&st);
    }
    set_header_game(state);
    let st = state.borrow();
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
        stack.set_visible_child_name(VIEW_GAME);
    }
}

pub(super) fn show_menu(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        // Invalidates any match check still in flight for the old board.
        st.next_game_id();
        st.session = None;
    }
    set_header_menu(state);
    let st = state.borrow();
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideRight);
        stack.set_visible_child_name(VIEW_MENU);
    }
}

pub(super) fn show_stage_won(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let window = state.borrow().window.clone();
    let dialog = show_notice_dialog(
        window.as_ref(),
        "Congratulations!",
        "You won the game! Starting next stage...",
    );
    let state = state.clone();
    dialog.connect_response(None, move |_, _| {
        start_next_stage(&state, game_id);
    });
}

pub(super) fn show_time_up(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let window = state.borrow().window.clone();
    let dialog = show_notice_dialog(window.as_ref(), "Game Over", "Time's up! You lost!");
    let state = state.clone();
    dialog.connect_response(None, move |_, _| {
        if state.borrow().game_id == game_id {
            show_menu(&state);
        }
    });
}
