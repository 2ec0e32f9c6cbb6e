use relm4::prelude::*;
use vloader_gtk::config;
use vloader_gtk::gui::app::AppModel;
use vloader_gtk::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.vloader.VerticalLoader");

    app.run::<AppModel>((config, rx));
}
