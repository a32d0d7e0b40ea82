use crate::icon;
use crate::scroll::{SmoothScroll, WHEEL_STEP};
use crate::theme::ThemeColors;
use crate::view;
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use parking_lot::Mutex;
use relm4::prelude::*;
use ringstep::driver::{DriverClock, SharedStepper};
use ringstep::scroll::SharedScroll;
use ringstep::{Point, StepperEvent, StepperInput, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub type HostStepper = SharedStepper<SharedScroll<SmoothScroll>>;

pub struct AppInit {
    pub stepper: HostStepper,
    pub scroll: Arc<Mutex<SmoothScroll>>,
    pub inputs: async_channel::Sender<StepperInput>,
    pub events: async_channel::Receiver<StepperEvent>,
    pub clock: DriverClock,
}

pub struct AppModel {
    stepper: HostStepper,
    scroll: Arc<Mutex<SmoothScroll>>,
    inputs: async_channel::Sender<StepperInput>,
    clock: DriverClock,
    icons: Rc<RefCell<Vec<Option<Pixbuf>>>>,
    size: (f64, f64),
    title: String,
    description: String,
    drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Scroll(f64),
    Click(Point),
    Next,
    Prev,
    Resize(i32, i32),
    Frame,
    Stepper(StepperEvent),
    Quit,
}

impl From<StepperEvent> for AppMsg {
    fn from(event: StepperEvent) -> Self {
        AppMsg::Stepper(event)
    }
}

fn key_message(key: gtk::gdk::Key) -> Option<AppMsg> {
    if key == gtk::gdk::Key::Right || key == gtk::gdk::Key::Down {
        Some(AppMsg::Next)
    } else if key == gtk::gdk::Key::Left || key == gtk::gdk::Key::Up {
        Some(AppMsg::Prev)
    } else if key == gtk::gdk::Key::Escape {
        Some(AppMsg::Quit)
    } else {
        None
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("ringstep"),
            set_default_size: (1280, 800),

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

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 8,

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,

                    connect_resize[sender] => move |_, w, h| {
                        sender.input(AppMsg::Resize(w, h));
                    },

                    add_controller = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL) {
                        connect_scroll[sender] => move |_, _, dy| {
                            sender.input(AppMsg::Scroll(dy));
                            glib::Propagation::Stop
                        }
                    },

                    add_controller = gtk::GestureClick {
                        connect_pressed[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Click(Point::new(x, y)));
                        }
                    },
                },

                gtk::Label {
                    add_css_class: "title-2",
                    #[watch]
                    set_label: &model.title,
                },

                gtk::Label {
                    set_margin_bottom: 16,
                    set_wrap: true,
                    #[watch]
                    set_label: &model.description,
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            stepper,
            scroll,
            inputs,
            events,
            clock,
        } = init;

        let icons = icon::load_icons(stepper.lock().steps());

        let model = AppModel {
            stepper,
            scroll,
            inputs,
            clock,
            icons: Rc::new(RefCell::new(icons)),
            size: (0.0, 0.0),
            title: String::new(),
            description: String::new(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.refresh_caption();

        let (stepper_draw, icons_draw) = (model.stepper.clone(), model.icons.clone());
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, w, h| {
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let center = Point::new(w as f64 / 2.0, h as f64 / 2.0);
                let (frame, steps) = {
                    let stepper = stepper_draw.lock();
                    (stepper.frame(clock.now()), stepper.steps().clone())
                };
                if let Err(e) = view::draw(cr, &frame, &steps, &icons_draw.borrow(), center, &colors)
                {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_tick = sender.clone();
        widgets.drawing_area.add_tick_callback(move |_, _| {
            sender_tick.input(AppMsg::Frame);
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Scroll(dy) => {
                let offset = self.scroll.lock().scroll_by(dy * WHEEL_STEP);
                self.send(StepperInput::Scroll(offset));
            }
            AppMsg::Click(cursor) => {
                let frame = self.stepper.lock().frame(self.clock.now());
                if let Some(index) = view::hit_test(&frame, self.center(), cursor) {
                    self.send(StepperInput::JumpTo(index));
                }
            }
            AppMsg::Next => self.send(StepperInput::Next),
            AppMsg::Prev => self.send(StepperInput::Prev),
            AppMsg::Resize(w, h) => {
                self.size = (w as f64, h as f64);
                self.send_viewport();
            }
            AppMsg::Frame => {
                let now = self.clock.now();
                let step = self.scroll.lock().advance(now);
                if let Some(step) = step {
                    self.send(StepperInput::Scroll(step.offset));
                    if step.finished {
                        self.send(StepperInput::ScrollEnd);
                    }
                }
                if step.is_some() || self.stepper.lock().is_animating(now) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Stepper(event) => {
                match event {
                    StepperEvent::Ready => log::debug!("stepper ready"),
                    StepperEvent::ActiveIndexChanged(index) => {
                        log::debug!("active step {} ({})", index, self.stepper.lock().nav_state());
                        self.refresh_caption();
                    }
                    StepperEvent::Remounted { step_count } => {
                        log::info!("Stepper remounted with {} steps", step_count);
                        *self.icons.borrow_mut() = icon::load_icons(self.stepper.lock().steps());
                        self.send_viewport();
                        self.refresh_caption();
                    }
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.send(StepperInput::Unmount);
    }
}

impl AppModel {
    fn send(&self, input: StepperInput) {
        if let Err(e) = self.inputs.try_send(input) {
            log::error!("Stepper driver is gone: {}", e);
        }
    }

    fn center(&self) -> Point {
        Point::new(self.size.0 / 2.0, self.size.1 / 2.0)
    }

    /// The pinned region is one viewport height per step.
    fn send_viewport(&self) {
        let (w, h) = self.size;
        let step_count = self.stepper.lock().steps().len();
        let scroll_length = h * step_count as f64;
        self.scroll.lock().set_max(scroll_length);
        self.send(StepperInput::Resize(Viewport::new(w, h, scroll_length)));
    }

    fn refresh_caption(&mut self) {
        let stepper = self.stepper.lock();
        if let Some(step) = stepper.steps().get(stepper.active_index()) {
            self.title = step.title.to_string();
            self.description = step.description.clone();
        }
    }
}
