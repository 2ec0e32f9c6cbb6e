use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::canvas::{self, CanvasContainer};
use crate::gui::{theme, window};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};
use vloader::VerticalLoader;
use vloader::animator::{Phase, Step, StepToken};
use vloader::command::Command;
use vloader::transition::Timeline;

const WATCHDOG_INTERVAL: Duration = Duration::from_millis(500);
/// Frame clock counts as paused (window hidden or occluded) after this long
/// without a tick.
const CLOCK_PAUSED_AFTER: Duration = Duration::from_secs(1);

type Loader = VerticalLoader<CanvasContainer>;

pub struct AppModel {
    pub loader: Rc<RefCell<Loader>>,
    pub timeline: Rc<RefCell<Timeline>>,
    pub drawing_area: gtk::DrawingArea,
    last_tick: Rc<Cell<Option<Instant>>>,
}

#[derive(Debug)]
pub enum AppMsg {
    Command(Command),
    Status(async_channel::Sender<Phase>),
    StepFinished(StepToken),
    Resized(i32, i32),
    Watchdog,
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Command(c) => AppMsg::Command(c),
            AppEvent::Status(reply) => AppMsg::Status(reply),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn key_message(key: gdk::Key) -> Option<AppMsg> {
    if key == gdk::Key::space {
        Some(AppMsg::Command(Command::Toggle))
    } else if key == gdk::Key::plus || key == gdk::Key::equal || key == gdk::Key::KP_Add {
        Some(AppMsg::Command(Command::Faster))
    } else if key == gdk::Key::minus || key == gdk::Key::KP_Subtract {
        Some(AppMsg::Command(Command::Slower))
    } else if key == gdk::Key::Escape {
        Some(AppMsg::Quit)
    } else {
        None
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("vloader"),
            set_default_width: config.window.width,
            set_default_height: config.window.height,
            set_decorated: false,
            add_css_class: "vloader-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key_message(key) {
                        Some(msg) => {
                            sender.input(msg);
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "vloader-canvas",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resized(width, height));
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        if config.window.overlay {
            window::init_overlay(&root, &config.window);
        }

        let container = CanvasContainer::new(config.window.width, config.window.height);
        let loader = match VerticalLoader::new(config.loader.clone(), container.clone()) {
            Ok(loader) => loader,
            Err(e) => {
                log::error!("{}; falling back to defaults", e);
                VerticalLoader::with_default_config(container)
            }
        };

        let model = AppModel {
            loader: Rc::new(RefCell::new(loader)),
            timeline: Rc::new(RefCell::new(Timeline::new())),
            drawing_area: gtk::DrawingArea::default(),
            last_tick: Rc::new(Cell::new(None)),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let loader_draw = model.loader.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, _, _| {
                if let Err(e) = canvas::draw(cr, &loader_draw.borrow()) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let loader_tick = model.loader.clone();
        let timeline_tick = model.timeline.clone();
        let sender_tick = sender.clone();
        let last_tick = model.last_tick.clone();
        let last_frame = Cell::new(None::<i64>);
        widgets.drawing_area.add_tick_callback(move |area, clock| {
            last_tick.set(Some(Instant::now()));
            let now = clock.frame_time();
            let dt = last_frame
                .replace(Some(now))
                .map(|prev| Duration::from_micros((now - prev).max(0) as u64))
                .unwrap_or_default();

            let mut timeline = timeline_tick.borrow_mut();
            if timeline.is_idle() {
                return glib::ControlFlow::Continue;
            }

            let frame = timeline.advance(dt);
            {
                let mut loader = loader_tick.borrow_mut();
                for (slot, y) in frame.samples {
                    loader.place(slot, y);
                }
            }
            for token in frame.finished {
                sender_tick.input(AppMsg::StepFinished(token));
            }
            area.queue_draw();
            glib::ControlFlow::Continue
        });

        let sender_watchdog = sender.clone();
        glib::timeout_add_local(WATCHDOG_INTERVAL, move || {
            sender_watchdog.input(AppMsg::Watchdog);
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        if config.window.autostart {
            sender.input(AppMsg::Command(Command::Start));
        }

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Command(command) => self.run_command(command, &sender),
            AppMsg::Status(reply) => {
                let phase = self.loader.borrow().animator().phase();
                if reply.try_send(phase).is_err() {
                    log::warn!("Status requester went away");
                }
            }
            AppMsg::StepFinished(token) => {
                let next = self.loader.borrow_mut().finish_step(token);
                if let Some(step) = next {
                    self.begin(step, &sender);
                }
            }
            AppMsg::Resized(width, height) => {
                let resized = {
                    let mut loader = self.loader.borrow_mut();
                    let resized = loader.container_mut().resize(width, height);
                    if resized {
                        loader.invalidate_layout();
                    }
                    resized
                };
                if resized {
                    self.retarget_timeline();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Watchdog => {
                if !self.clock_running() {
                    return;
                }
                let stalled = self.loader.borrow().check_stalled(Instant::now());
                if let Err(e) = stalled {
                    log::error!("{}; reissuing step", e);
                    let next = self.loader.borrow_mut().reissue_step();
                    if let Some(step) = next {
                        self.begin(step, &sender);
                    }
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    let applied = self
                        .loader
                        .borrow_mut()
                        .set_configuration(new_config.loader);
                    match applied {
                        Ok(()) => {
                            self.drop_removed_slots(&sender);
                            self.retarget_timeline();
                            self.drawing_area.queue_draw();
                            log::info!("Configuration reloaded");
                        }
                        Err(e) => log::error!("Rejected reloaded config: {}", e),
                    }
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }
}

impl AppModel {
    fn run_command(&mut self, command: Command, sender: &ComponentSender<Self>) {
        let first = {
            let mut loader = self.loader.borrow_mut();
            match command {
                Command::Start => loader.start_animating(),
                Command::Stop => {
                    loader.stop_animating();
                    None
                }
                Command::Toggle if loader.is_animating() => {
                    loader.stop_animating();
                    None
                }
                Command::Toggle => loader.start_animating(),
                Command::Slower => {
                    loader.slow_down();
                    None
                }
                Command::Faster => {
                    loader.speed_up();
                    None
                }
                Command::Status => {
                    log::info!("Loader is {}", loader.animator().phase());
                    None
                }
            }
        };

        if let Some(step) = first {
            self.begin(step, sender);
        }
    }

    /// Hands a step to the timeline, starting from wherever the circle is now.
    fn begin(&self, step: Step, sender: &ComponentSender<Self>) {
        let from = self
            .loader
            .borrow()
            .circles()
            .get(step.slot)
            .map(|c| c.center.y)
            .unwrap_or(step.target_y);

        if let Some(superseded) = self.timeline.borrow_mut().begin(&step, from) {
            sender.input(AppMsg::StepFinished(superseded));
        }
    }

    /// Points running transitions at the positions the last layout pass
    /// produced.
    fn retarget_timeline(&self) {
        let loader = self.loader.borrow();
        self.timeline
            .borrow_mut()
            .retarget(|slot| loader.circles().get(slot).map(|c| c.center.y));
    }

    /// Transitions only advance on frame clock ticks, so a stall only counts
    /// while the clock is ticking.
    fn clock_running(&self) -> bool {
        self.last_tick
            .get()
            .is_some_and(|tick| tick.elapsed() < CLOCK_PAUSED_AFTER)
    }

    fn drop_removed_slots(&self, sender: &ComponentSender<Self>) {
        let count = self.loader.borrow().circles().len();
        for token in self.timeline.borrow_mut().retain_slots(count) {
            sender.input(AppMsg::StepFinished(token));
        }
    }
}
