use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::app::handle_cell_click;
use super::state::AppState;
use crate::game::CellState;

pub const CONTENT_MARGIN: i32 = 12;
pub const CELL_GAP: i32 = 6;

fn draw_card_face(area: &gtk::DrawingArea, cr: &cairo::Context, width: i32, height: i32, text: &str) {
    if text.is_empty() {
        return;
    }

    let min_dim = width.min(height) as f64;
    let font_size = min_dim * 0.40;

    cr.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Cantarell, Noto Sans, sans");
    font_desc.set_weight(pango::Weight::Bold);
    font_desc.set_size((font_size * pango::SCALE as f64) as i32);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    let fg = area.style_context().color();
    cr.set_source_rgba(
        fg.red() as f64,
        fg.green() as f64,
        fg.blue() as f64,
        fg.alpha() as f64,
    );

    let (text_width, text_height) = layout.pixel_size();
    cr.move_to(
        (width as f64 - text_width as f64) / 2.0,
        (height as f64 - text_height as f64) / 2.0,
    );

    pangocairo::functions::show_layout(cr, &layout);
}

/// Applies the cell's logical state to its button. Never reads the widget back.
pub(super) fn sync_cell_button(st: &AppState, row: usize, col: usize) {
    let Some(session) = &st.session else {
        return;
    };
    let index = match session.board().index_of(row, col) {
        Ok(index) => index,
        Err(err) => {
            log::debug!("Skipping cell refresh: {err}");
            return;
        }
    };
    let (Some(button), Some(cell)) = (st.grid_buttons.get(index), session.board().cell_at(index))
    else {
        return;
    };

    button.remove_css_class("active");
    button.remove_css_class("matched");
    match cell.state {
        CellState::Revealed => button.add_css_class("active"),
        CellState::Matched => button.add_css_class("matched"),
        CellState::Hidden => {}
    }
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}

pub(super) fn disable_all_cells(st: &AppState) {
    for button in &st.grid_buttons {
        button.set_sensitive(false);
    }
}

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("memory-board");
    grid.set_row_spacing(CELL_GAP as u32);
    grid.set_column_spacing(CELL_GAP as u32);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let (css_provider, rows, cols) = {
        let st = state.borrow();
        let (rows, cols) = st
            .session
            .as_ref()
            .map(|session| (session.board().rows(), session.board().cols()))
            .unwrap_or((0, 0));
        (st.dynamic_css_provider.clone(), rows as i32, cols as i32)
    };

    let update_styles = move |grid: &gtk::Grid| {
        let width = grid.width();
        let height = grid.height();
        if width > 0 && height > 0 && rows > 0 && cols > 0 {
            let cell_width = (width - (cols - 1) * CELL_GAP) / cols;
            let cell_height = (height - (rows - 1) * CELL_GAP) / rows;
            let min_dim = cell_width.min(cell_height);
            let card_radius = (min_dim as f64 * 0.15) as i32;

            if let Some(provider) = &css_provider {
                provider.load_from_data(&format!(
                    ".memory-card {{ border-radius: {card_radius}px; }}"
                ));
            }
        }
    };

    let update_styles_clone = update_styles.clone();
    grid.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles_clone(&grid);
        }),
    );
    grid.connect_closure(
        "notify::height",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles(&grid);
        }),
    );

    let mut buttons = Vec::new();

    for i in 0..(rows * cols) {
        let index = i as usize;
        let row = (i / cols) as usize;
        let col = (i % cols) as usize;

        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["memory-card"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("memory-card-label");

        let state_draw = state.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let text = {
                let st = state_draw.borrow();
                match st.session.as_ref().and_then(|s| s.board().cell_at(index)) {
                    Some(cell) if cell.is_face_up() => cell.value.to_string(),
                    _ => String::new(),
                }
            };
            draw_card_face(area, cr, width, height, &text);
        });

        button.set_child(Some(&drawing_area));

        let state_clone = state.clone();
        button.connect_clicked(move |_| {
            handle_cell_click(&state_clone, row, col);
        });

        aspect_frame.set_child(Some(&button));
        grid.attach(&aspect_frame, i % cols, i / cols, 1, 1);
        buttons.push(button);
    }

    state.borrow_mut().grid_buttons = buttons;

    grid
}
