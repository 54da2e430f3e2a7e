use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use gettextrs::gettext;
use gtk4::glib;
use gtk4::prelude::*;

use super::board::disable_all_cells;
use super::scene::show_time_up;
use super::state::AppState;
use crate::game::{TickOutcome, TICK_INTERVAL};

pub(super) fn set_header_menu(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_menu) {
        header.set_title_widget(Some(title));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(false);
    }
}

pub(super) fn set_header_game(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title_box)) = (&st.header, &st.title_game) {
        update_subtitle(&st);
        header.set_title_widget(Some(title_box));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(true);
    }
}

pub(super) fn update_subtitle(st: &AppState) {
    let (Some(subtitle), Some(session)) = (&st.title_game_subtitle, &st.session) else {
        return;
    };
    subtitle.set_text(&format!(
        "{} · {}",
        gettext(session.difficulty().name()),
        gettext("Stage {}").replace("{}", &session.stage().to_string())
    ));
}

pub(super) fn update_timer_label(st: &AppState, remaining: u64) {
    if let Some(label) = &st.timer_label {
        label.set_text(&gettext("Time Remaining: {}s").replace("{}", &remaining.to_string()));
    }
}

pub(super) fn stop_timer(st: &mut AppState) {
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

pub(super) fn start_timer(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_timer(&mut st);
    let game_id = st.game_id;

    let state_clone = state.clone();
    let handle = glib::timeout_add_local(TICK_INTERVAL, move || tick(&state_clone, game_id));
    st.timer_handle = Some(handle);
}

fn tick(state: &Rc<RefCell<AppState>>, game_id: u64) -> glib::ControlFlow {
    let mut st = state.borrow_mut();
    if st.game_id != game_id {
        return glib::ControlFlow::Break;
    }
    let Some(session) = st.session.as_mut() else {
        st.timer_handle = None;
        return glib::ControlFlow::Break;
    };

    match session.tick(Instant::now()) {
        TickOutcome::Running { remaining } => {
            update_timer_label(&st, remaining);
            glib::ControlFlow::Continue
        }
        TickOutcome::TimedOut => {
            log::info!("Time is up on {}", session.difficulty());
            update_timer_label(&st, 0);
            disable_all_cells(&st);
            // The source ends by returning Break; removing it here would double-free it.
            st.timer_handle = None;
            drop(st);
            show_time_up(state, game_id);
            glib::ControlFlow::Break
        }
    }
}
