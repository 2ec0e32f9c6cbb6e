use crate::config::WindowConfig;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

/// Pins the window to the right screen edge, vertically centred. Falls back to
/// a regular toplevel when the compositor has no layer-shell support.
pub fn init_overlay(window: &gtk::ApplicationWindow, config: &WindowConfig) {
    if !gtk4_layer_shell::is_supported() {
        log::warn!("Layer shell is not supported here, using a regular window");
        return;
    }

    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("vloader"));
    window.set_exclusive_zone(0);
    window.set_anchor(Edge::Right, true);
    window.set_margin(Edge::Right, config.margin);
    window.set_keyboard_mode(KeyboardMode::None);
}
