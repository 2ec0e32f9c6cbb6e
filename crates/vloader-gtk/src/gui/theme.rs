use gtk::gdk;
use gtk4 as gtk;

const CSS: &str = "
.vloader-window, .vloader-canvas {
    background: none;
    background-color: transparent;
}
";

/// Makes the window see-through so only the circles show.
pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);

    match gdk::Display::default() {
        Some(display) => gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => log::warn!("No display available, skipping stylesheet"),
    }
}
