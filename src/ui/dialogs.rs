use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

/// Single-button modal; the caller hooks `response` to continue the game flow.
pub fn show_notice_dialog(
    parent: Option<&adw::ApplicationWindow>,
    heading: &str,
    body: &str,
) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(Some(&gettext(heading)), Some(&gettext(body)));
    dialog.add_response("ok", &gettext("OK"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(parent);
    dialog
}

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some(&gettext("Instructions")),
        Some(&gettext(
            "Pick a difficulty, then flip two cards at a time to find matching numbers.\n\
Matched pairs stay face up. Clear the board before the 60 second timer runs out.",
        )),
    );
    dialog.add_response("ok", &gettext("Got it"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name(gettext("Memory Puzzle Game"))
        .application_icon(super::app::APP_ID)
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("Find every pair before the clock runs out."))
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(app.active_window().as_ref());
    dialog
}
