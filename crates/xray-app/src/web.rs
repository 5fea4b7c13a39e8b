//! WebAssembly entry point and DOM bindings.
//!
//! [`mount_xray`] turns an existing element into an XRay widget. Element
//! listeners dispatch straight into the widget; host-originated events
//! (window resize, image load) go through a shared queue drained by the
//! animation frame loop, so the host never needs a handle to the widget.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent};
use web_time::Instant;
use xray_core::config::{ClickHandler, ConfigError, XRayConfig};
use xray_core::host::{Host, ListenerId};
use xray_core::input::{TouchPoint, WidgetEvent};
use xray_core::widget::XRay;
use xray_render::svg::WRAPPER_STYLE;
use xray_render::{ComposeStyle, SvgRenderer, compose_with};

use crate::app::{AppConfig, AppError};
use crate::demos;

/// Errors raised while binding a widget to the DOM.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("No window available")]
    NoWindow,
    #[error("No document available")]
    NoDocument,
    #[error("Element #{0} not found")]
    ElementNotFound(String),
    #[error("JavaScript error: {0}")]
    Js(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(format!("{value:?}"))
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

type WebResult<T> = Result<T, WebError>;

/// Events produced by host listeners, waiting for the next frame.
type EventQueue = Rc<RefCell<VecDeque<WidgetEvent>>>;

type Listener = Closure<dyn FnMut(Event)>;

enum Registration {
    Resize(Listener),
    Image {
        image: HtmlImageElement,
        _onload: Closure<dyn FnMut()>,
        _onerror: Closure<dyn FnMut()>,
    },
}

/// [`Host`] backed by a DOM element.
pub struct DomHost {
    element: HtmlElement,
    queue: EventQueue,
    listeners: HashMap<ListenerId, Registration>,
    next_id: u64,
}

impl DomHost {
    fn new(element: HtmlElement, queue: EventQueue) -> Self {
        Self {
            element,
            queue,
            listeners: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    fn push(&self, event: WidgetEvent) {
        self.queue.borrow_mut().push_back(event);
    }
}

impl Host for DomHost {
    fn client_size(&self) -> Option<Size> {
        Some(Size::new(
            self.element.client_width() as f64,
            self.element.client_height() as f64,
        ))
    }

    fn bounding_rect(&self) -> Option<Rect> {
        Some(dom_rect(&self.element))
    }

    fn hover_state(&self) -> Option<bool> {
        self.element.matches(":hover").ok()
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        let id = self.next_id();
        let queue = self.queue.clone();
        let listener = Listener::new(move |_event: Event| {
            queue.borrow_mut().push_back(WidgetEvent::resize());
        });
        match web_sys::window() {
            Some(window) => {
                if let Err(err) = window
                    .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
                {
                    log::warn!("Failed to add resize listener: {err:?}");
                }
            }
            None => log::warn!("No window; resize events will not be delivered"),
        }
        self.listeners.insert(id, Registration::Resize(listener));
        id
    }

    fn request_image(&mut self, url: &str) -> ListenerId {
        let id = self.next_id();
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                self.push(WidgetEvent::ImageFailed {
                    reason: format!("cannot create image element: {err:?}"),
                });
                return id;
            }
        };

        let queue = self.queue.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            queue.borrow_mut().push_back(WidgetEvent::ImageLoaded);
        });
        let queue = self.queue.clone();
        let failed_url = url.to_string();
        let onerror = Closure::<dyn FnMut()>::new(move || {
            queue.borrow_mut().push_back(WidgetEvent::ImageFailed {
                reason: format!("failed to load {failed_url}"),
            });
        });

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        image.set_src(url);

        self.listeners.insert(
            id,
            Registration::Image {
                image,
                _onload: onload,
                _onerror: onerror,
            },
        );
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        match self.listeners.remove(&id) {
            Some(Registration::Resize(listener)) => {
                if let Some(window) = web_sys::window() {
                    let _ = window.remove_event_listener_with_callback(
                        "resize",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
            Some(Registration::Image { image, .. }) => {
                image.set_onload(None);
                image.set_onerror(None);
            }
            None => {}
        }
    }
}

fn dom_rect(element: &HtmlElement) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
}

fn touches(event: &TouchEvent) -> Vec<TouchPoint> {
    let list = event.touches();
    (0..list.length())
        .filter_map(|index| list.get(index))
        .map(|touch| TouchPoint::new(touch.client_x() as f64, touch.client_y() as f64))
        .collect()
}

/// Position of a mouse event relative to the element origin.
fn local_position(element: &HtmlElement, event: &MouseEvent) -> Point {
    let rect = dom_rect(element);
    Point::new(
        event.client_x() as f64 - rect.x0,
        event.client_y() as f64 - rect.y0,
    )
}

/// A mounted widget with the state its callbacks share.
struct Shared {
    widget: RefCell<XRay<DomHost>>,
    queue: EventQueue,
    element: HtmlElement,
    renderer: SvgRenderer,
    style: ComposeStyle,
    dirty: Cell<bool>,
}

impl Shared {
    /// Deliver an event now, or queue it if the widget is busy.
    fn dispatch(&self, event: WidgetEvent) -> bool {
        let Ok(mut widget) = self.widget.try_borrow_mut() else {
            self.queue.borrow_mut().push_back(event);
            return false;
        };
        let response = widget.handle_event(event);
        if response.redraw {
            self.dirty.set(true);
        }
        response.consumed
    }

    /// Drain queued host events, advance the animation and repaint.
    fn frame(&self, dt: std::time::Duration) {
        let events: Vec<WidgetEvent> = self.queue.borrow_mut().drain(..).collect();
        for event in events {
            self.dispatch(event);
        }

        let stepped = match self.widget.try_borrow_mut() {
            Ok(mut widget) => widget.tick(dt).is_some(),
            Err(_) => false,
        };
        if stepped || self.dirty.get() {
            self.paint();
        }
    }

    fn paint(&self) {
        let Ok(widget) = self.widget.try_borrow() else {
            return;
        };
        let scene = compose_with(&widget.view(), widget.config(), &self.style);
        match self.renderer.render_contents(&scene) {
            Ok(markup) => {
                self.element.set_inner_html(&markup);
                self.dirty.set(false);
            }
            Err(err) => log::error!("Failed to render XRay {}: {err}", widget.id()),
        }
    }
}

/// Element listeners owned by a mounted widget.
struct ElementListeners {
    element: HtmlElement,
    listeners: Vec<(&'static str, Listener)>,
}

impl ElementListeners {
    fn attach(shared: &Rc<Shared>) -> WebResult<Self> {
        let mut this = Self {
            element: shared.element.clone(),
            listeners: Vec::new(),
        };

        this.on(shared, "mouseenter", |_, _| Some(WidgetEvent::PointerEnter))?;
        this.on(shared, "mousemove", |element, event| {
            let event = event.dyn_ref::<MouseEvent>()?;
            Some(WidgetEvent::PointerMove {
                position: local_position(element, event),
            })
        })?;
        this.on(shared, "mouseleave", |_, _| Some(WidgetEvent::PointerLeave))?;
        this.on(shared, "touchstart", |_, event| {
            let event = event.dyn_ref::<TouchEvent>()?;
            Some(WidgetEvent::TouchStart {
                touches: touches(event),
            })
        })?;
        this.on(shared, "touchmove", |_, event| {
            let event = event.dyn_ref::<TouchEvent>()?;
            Some(WidgetEvent::TouchMove {
                touches: touches(event),
            })
        })?;
        this.on(shared, "touchend", |_, _| Some(WidgetEvent::TouchEnd))?;
        this.on(shared, "focus", |_, _| Some(WidgetEvent::Focus))?;
        this.on(shared, "blur", |_, _| Some(WidgetEvent::Blur))?;
        this.on(shared, "keydown", |_, event| {
            let event = event.dyn_ref::<KeyboardEvent>()?;
            Some(WidgetEvent::key(event.key()))
        })?;
        this.on(shared, "click", |element, event| {
            let event = event.dyn_ref::<MouseEvent>()?;
            Some(WidgetEvent::Click {
                position: local_position(element, event),
            })
        })?;

        Ok(this)
    }

    fn on(
        &mut self,
        shared: &Rc<Shared>,
        name: &'static str,
        translate: impl Fn(&HtmlElement, &Event) -> Option<WidgetEvent> + 'static,
    ) -> WebResult<()> {
        let shared = Rc::clone(shared);
        let listener = Listener::new(move |event: Event| {
            if let Some(widget_event) = translate(&shared.element, &event) {
                if shared.dispatch(widget_event) {
                    event.prevent_default();
                }
            }
        });
        self.element
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        self.listeners.push((name, listener));
        Ok(())
    }

    fn detach(&mut self) {
        for (name, listener) in self.listeners.drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` loop driving the widget.
struct FrameLoop {
    callback: Rc<RefCell<Option<FrameCallback>>>,
    request: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(shared: &Rc<Shared>) -> WebResult<Self> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let request = Rc::new(Cell::new(None));

        let next = Rc::clone(&callback);
        let pending = Rc::clone(&request);
        let shared = Rc::clone(shared);
        let frame_window = window.clone();
        let mut last = Instant::now();
        *callback.borrow_mut() = Some(FrameCallback::new(move |_timestamp: f64| {
            let now = Instant::now();
            shared.frame(now.duration_since(last));
            last = now;

            pending.set(None);
            if let Some(callback) = next.borrow().as_ref() {
                match frame_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => pending.set(Some(id)),
                    Err(err) => log::warn!("Animation frame request failed: {err:?}"),
                }
            }
        }));

        if let Some(first) = callback.borrow().as_ref() {
            request.set(Some(window.request_animation_frame(first.as_ref().unchecked_ref())?));
        }
        Ok(Self { callback, request })
    }

    fn stop(&mut self) {
        if let (Some(id), Some(window)) = (self.request.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the callback's reference to itself.
        self.callback.borrow_mut().take();
    }
}

struct Mounted {
    shared: Rc<Shared>,
    listeners: ElementListeners,
    frames: FrameLoop,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.frames.stop();
        self.listeners.detach();
        let mut widget = self.shared.widget.borrow_mut();
        let id = widget.id();
        widget.unmount();
        self.shared.queue.borrow_mut().clear();
        log::debug!("Released DOM bindings of XRay {id}");
    }
}

/// Handle to a widget mounted on a DOM element.
///
/// Unmounting (or dropping the handle) removes every listener, cancels the
/// pending animation frame and releases the image request.
#[wasm_bindgen]
pub struct XRayHandle {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl XRayHandle {
    /// Release the widget. Calling this twice is harmless.
    pub fn unmount(&mut self) {
        self.mounted.take();
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Whether the sharp image currently covers the whole widget.
    #[wasm_bindgen(getter, js_name = isRevealed)]
    pub fn is_revealed(&self) -> bool {
        self.mounted
            .as_ref()
            .and_then(|mounted| mounted.shared.widget.try_borrow().ok().map(|w| w.state().is_revealed))
            .unwrap_or(false)
    }
}

fn element_by_id(id: &str) -> WebResult<HtmlElement> {
    let document = web_sys::window()
        .ok_or(WebError::NoWindow)?
        .document()
        .ok_or(WebError::NoDocument)?;
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| WebError::ElementNotFound(id.to_string()))
}

fn mount(element: HtmlElement, config: XRayConfig, focus: bool) -> WebResult<XRayHandle> {
    let app = AppConfig::default();
    element.set_class_name("xray");
    element.set_attribute("role", "img")?;
    element.set_attribute("aria-label", &config.alt)?;
    element.set_tab_index(0);
    element.set_attribute("style", WRAPPER_STYLE)?;

    let queue: EventQueue = Rc::new(RefCell::new(VecDeque::new()));
    let mut widget = XRay::new(config);
    widget.mount(DomHost::new(element.clone(), Rc::clone(&queue)));

    let shared = Rc::new(Shared {
        widget: RefCell::new(widget),
        queue,
        element: element.clone(),
        renderer: SvgRenderer::new().with_inline_styles(true),
        style: app.compose_style(),
        dirty: Cell::new(true),
    });
    shared.paint();

    let listeners = ElementListeners::attach(&shared)?;
    let frames = FrameLoop::start(&shared)?;

    if focus {
        element.focus()?;
    }

    Ok(XRayHandle {
        mounted: Some(Mounted {
            shared,
            listeners,
            frames,
        }),
    })
}

/// Wrap a JS `onClick(x, y)` callback.
fn js_click_handler(callback: js_sys::Function) -> ClickHandler {
    ClickHandler::new(move |position: Point| {
        let (x, y) = (JsValue::from_f64(position.x), JsValue::from_f64(position.y));
        if let Err(err) = callback.call2(&JsValue::NULL, &x, &y) {
            log::error!("XRay onClick callback failed: {err:?}");
        }
    })
}

/// Mount a widget on the element with id `element_id`.
///
/// `config_json` uses the same keys as the component props (`href`/`src`,
/// `alt`, `blur`, `radiusScale`, ...). `on_click`, when given, is called with
/// the click position relative to the widget.
#[wasm_bindgen(js_name = mountXRay)]
pub fn mount_xray(
    element_id: &str,
    config_json: &str,
    on_click: Option<js_sys::Function>,
) -> Result<XRayHandle, JsValue> {
    let mut config = XRayConfig::from_json(config_json).map_err(WebError::from)?;
    config.on_click = on_click.map(js_click_handler);
    let element = element_by_id(element_id)?;
    Ok(mount(element, config, false)?)
}

/// Mount the first widget of a named demo preset.
#[wasm_bindgen(js_name = mountDemo)]
pub fn mount_demo(element_id: &str, name: &str) -> Result<XRayHandle, JsValue> {
    let demo = demos::demo(name).map_err(WebError::from)?;
    let config = demo
        .widgets
        .into_iter()
        .next()
        .ok_or_else(|| WebError::App(AppError::UnknownDemo(name.to_string())))?;
    let element = element_by_id(element_id)?;
    Ok(mount(element, config, demo.focus_on_mount)?)
}

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"XRay: logger already initialized".into());
    }

    log::info!("XRay (WASM) ready");
}
