//! The XRay interaction state machine.

use super::state::{InteractionState, Regime, RevealCause, WidgetId, WidgetView};
use crate::config::XRayConfig;
use crate::host::{Host, ListenerId};
use crate::image_ready::{ImageReady, ImageStatus};
use crate::input::{TouchPoint, WidgetEvent, is_activation_key};
use crate::radius::RadiusMode;
use crate::tween::{Tween, TweenHandle, TweenStep};
use kurbo::{Point, Rect, Size};
use std::time::Duration;

/// Values the responsive radius depends on besides the image load.
#[derive(Debug, Clone, PartialEq)]
struct RadiusDeps {
    mounted: bool,
    mode: RadiusMode,
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventResponse {
    /// Visible state changed; the widget should be re-rendered.
    pub redraw: bool,
    /// The event was acted on and its default host action should be
    /// suppressed (e.g. page scrolling on the activation key).
    pub consumed: bool,
    /// Circle animation started by this event.
    pub animation: Option<TweenHandle>,
}

/// One XRay widget instance.
///
/// Owns its configuration, interaction state and circle tween. The host is
/// received on [`mount`](Self::mount) and returned on
/// [`unmount`](Self::unmount); dropping a mounted widget unmounts it.
pub struct XRay<H: Host> {
    id: WidgetId,
    config: XRayConfig,
    state: InteractionState,
    radius: Tween,
    image: ImageReady<RadiusDeps>,
    host: Option<H>,
    resize_listener: Option<ListenerId>,
    image_listener: Option<ListenerId>,
}

impl<H: Host> XRay<H> {
    /// Create an unmounted widget.
    pub fn new(config: XRayConfig) -> Self {
        let deps = RadiusDeps {
            mounted: false,
            mode: config.radius_mode(),
        };
        let state = InteractionState {
            responsive_radius: config.fixed_radius,
            ..InteractionState::default()
        };
        Self {
            id: WidgetId::new(),
            image: ImageReady::new(config.href.clone(), deps),
            config,
            state,
            radius: Tween::new(0.0),
            host: None,
            resize_listener: None,
            image_listener: None,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn config(&self) -> &XRayConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    pub fn is_mounted(&self) -> bool {
        self.host.is_some()
    }

    pub fn image_status(&self) -> &ImageStatus {
        self.image.status()
    }

    /// Current circle radius.
    pub fn circle_radius(&self) -> f64 {
        self.radius.value()
    }

    /// The circle tween, for inspection.
    pub fn tween(&self) -> &Tween {
        &self.radius
    }

    /// Whether a circle animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.radius.is_animating()
    }

    /// Attach the widget to its host.
    ///
    /// Registers one resize listener, starts loading the image and takes the
    /// initial measurements. Mounting an already mounted widget first
    /// unmounts it; the previous host is returned.
    pub fn mount(&mut self, host: H) -> Option<H> {
        let previous = if self.is_mounted() {
            log::warn!("XRay {} mounted twice; releasing previous host", self.id);
            self.unmount()
        } else {
            None
        };

        let host = self.host.insert(host);
        self.resize_listener = Some(host.add_resize_listener());
        if !self.image.is_loaded() {
            self.image_listener = Some(host.request_image(&self.config.href));
        }

        self.state.last_measured_bounds = host.bounding_rect();
        if let Some(hovered) = host.hover_state() {
            self.state.is_pointer_over = hovered;
        }
        log::info!("XRay {} mounted ({})", self.id, self.config.href);

        self.refresh_radius_deps();
        previous
    }

    /// Detach the widget from its host.
    ///
    /// Releases every listener and cancels the circle animation. Returns the
    /// host, or `None` if the widget was not mounted.
    pub fn unmount(&mut self) -> Option<H> {
        let mut host = self.host.take()?;
        if let Some(id) = self.resize_listener.take() {
            host.remove_listener(id);
        }
        if let Some(id) = self.image_listener.take() {
            host.remove_listener(id);
        }
        self.radius.cancel();
        self.refresh_radius_deps();
        log::info!("XRay {} unmounted", self.id);
        Some(host)
    }

    /// Replace the configuration.
    ///
    /// Interaction state is kept. A new image reference restarts loading; a
    /// changed radius setting re-runs the radius calculation once the image
    /// has loaded.
    pub fn set_config(&mut self, config: XRayConfig) {
        let href_changed = config.href != self.config.href;
        let was_responsive = self.config.radius_mode().is_responsive();
        self.config = config;

        match self.config.fixed_radius {
            Some(radius) => self.state.responsive_radius = Some(radius),
            // The fixed value no longer applies; wait for a measurement.
            None if !was_responsive => self.state.responsive_radius = None,
            None => {}
        }

        if href_changed {
            self.image.reset(self.config.href.clone());
            if let Some(host) = self.host.as_mut() {
                if let Some(id) = self.image_listener.take() {
                    host.remove_listener(id);
                }
                self.image_listener = Some(host.request_image(&self.config.href));
            }
        }

        self.refresh_radius_deps();
    }

    /// Whether the "press to reveal" affordance holds.
    ///
    /// Recomputed on every call. When the host cannot report hover state,
    /// the widget assumes the pointer is not hovering.
    pub fn can_reveal(&self) -> bool {
        if !self.config.can_reveal
            || self.config.auto_reveal
            || !self.state.is_focused
            || self.state.is_pointer_over
        {
            return false;
        }

        match self.host.as_ref().and_then(|host| host.hover_state()) {
            Some(hovered) => !hovered,
            None => true,
        }
    }

    /// The named regime the widget is in.
    pub fn regime(&self) -> Regime {
        if self.state.is_revealed {
            Regime::Revealed
        } else if self.state.is_pointer_over {
            Regime::Hovering
        } else if self.can_reveal() {
            Regime::PeekEligible
        } else if self.state.is_focused {
            Regime::Focused
        } else {
            Regime::Idle
        }
    }

    /// Snapshot for the render layer.
    pub fn view(&self) -> WidgetView {
        let zoom = if self.state.is_revealed {
            1.0
        } else {
            self.config.effective_zoom()
        };
        WidgetView {
            id: self.id,
            is_focused: self.state.is_focused,
            is_revealed: self.state.is_revealed,
            is_pointer_over: self.state.is_pointer_over,
            pointer: self.state.pointer,
            circle_radius: self.radius.value(),
            can_reveal: self.can_reveal(),
            zoom,
        }
    }

    /// Advance the circle animation by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Option<TweenStep> {
        self.radius.tick(dt)
    }

    /// Handle one event from the host.
    pub fn handle_event(&mut self, event: WidgetEvent) -> EventResponse {
        log::trace!("XRay {} <- {}", self.id, event.name());
        let before = self.state.clone();
        let mut response = EventResponse::default();

        match event {
            WidgetEvent::PointerEnter => {
                if let Some(radius) = self.state.responsive_radius {
                    response.animation = Some(self.grow_circle(radius));
                    self.state.is_pointer_over = true;
                    self.clear_reveal_from_pointer();
                } else {
                    log::debug!("XRay {}: pointer entered before radius was known", self.id);
                }
            }
            WidgetEvent::PointerMove { position } => {
                self.state.pointer = position;
                self.state.is_pointer_over = true;
                self.clear_reveal_from_pointer();
            }
            WidgetEvent::PointerLeave | WidgetEvent::TouchEnd => {
                response.animation = Some(self.shrink_circle());
                self.state.is_pointer_over = false;
            }
            WidgetEvent::TouchStart { touches } => {
                let radius = self.state.responsive_radius;
                if let (Some(position), Some(radius)) = (self.touch_position(&touches), radius) {
                    response.animation = Some(self.grow_circle(radius));
                    self.state.pointer = position;
                    self.state.is_pointer_over = true;
                    self.clear_reveal_from_pointer();
                }
            }
            WidgetEvent::TouchMove { touches } => {
                if let Some(position) = self.touch_position(&touches) {
                    self.state.pointer = position;
                    self.state.is_pointer_over = true;
                    self.clear_reveal_from_pointer();
                }
            }
            WidgetEvent::Focus => {
                self.state.is_focused = true;
                if self.config.auto_reveal {
                    self.set_revealed(true, RevealCause::Implicit);
                }
            }
            WidgetEvent::Blur => {
                self.state.is_focused = false;
                self.set_revealed(false, RevealCause::Implicit);
            }
            WidgetEvent::KeyDown { key } => {
                if is_activation_key(&key) && self.state.is_focused && self.can_reveal() {
                    let revealed = !self.state.is_revealed;
                    self.set_revealed(revealed, RevealCause::Explicit);
                    response.consumed = true;
                }
            }
            WidgetEvent::Click { position } => {
                if let Some(handler) = &self.config.on_click {
                    handler.call(position);
                    response.consumed = true;
                }
            }
            WidgetEvent::Resize { size, bounds } => {
                self.recompute_radius(size);
                let bounds = bounds.or_else(|| self.host.as_ref().and_then(|h| h.bounding_rect()));
                if bounds.is_some() {
                    self.state.last_measured_bounds = bounds;
                }
            }
            WidgetEvent::ImageLoaded => {
                self.release_image_listener();
                if self.image.mark_loaded() {
                    self.recompute_radius(None);
                }
            }
            WidgetEvent::ImageFailed { reason } => {
                self.release_image_listener();
                self.image.mark_failed(reason);
            }
        }

        response.redraw = self.state != before || response.animation.is_some();
        if self.state.is_revealed != before.is_revealed {
            log::debug!("XRay {} revealed: {}", self.id, self.state.is_revealed);
        }
        response
    }

    fn grow_circle(&mut self, radius: f64) -> TweenHandle {
        self.radius.animate_to(radius, self.config.circle_in)
    }

    fn shrink_circle(&mut self) -> TweenHandle {
        self.radius.animate_to(0.0, self.config.circle_out)
    }

    /// Pointer and touch paths clear the reveal unless auto-reveal is on.
    fn clear_reveal_from_pointer(&mut self) {
        if !self.config.auto_reveal {
            self.set_revealed(false, RevealCause::Implicit);
        }
    }

    /// Persisted reveals are only cleared by an explicit toggle.
    fn set_revealed(&mut self, revealed: bool, cause: RevealCause) {
        if !revealed && self.config.persist_reveal && cause == RevealCause::Implicit {
            return;
        }
        self.state.is_revealed = revealed;
    }

    /// First touch relative to the cached bounding rectangle.
    fn touch_position(&self, touches: &[TouchPoint]) -> Option<Point> {
        let touch = touches.first()?;
        let bounds = self.state.last_measured_bounds?;
        Some(relative_to(touch.client, bounds))
    }

    fn recompute_radius(&mut self, size: Option<Size>) {
        let size = size
            .or_else(|| self.host.as_ref().and_then(|h| h.client_size()))
            .unwrap_or(Size::ZERO);
        match self.config.radius_mode().resolve(size) {
            Some(radius) => {
                log::debug!("XRay {} radius {:.1}", self.id, radius);
                self.state.responsive_radius = Some(radius);
            }
            None => log::debug!("XRay {}: container not measured yet", self.id),
        }
    }

    fn refresh_radius_deps(&mut self) {
        let deps = RadiusDeps {
            mounted: self.host.is_some(),
            mode: self.config.radius_mode(),
        };
        if self.image.update_dependencies(deps) {
            self.recompute_radius(None);
        }
    }

    fn release_image_listener(&mut self) {
        if let (Some(id), Some(host)) = (self.image_listener.take(), self.host.as_mut()) {
            host.remove_listener(id);
        }
    }
}

impl<H: Host> Drop for XRay<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn relative_to(client: Point, bounds: Rect) -> Point {
    Point::new(client.x - bounds.x0, client.y - bounds.y0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::XRayConfigBuilder;
    use crate::host::{ListenerKind, StaticHost};
    use crate::tween::Transition;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 400x300 widget placed at (100, 50) in the viewport.
    fn host() -> StaticHost {
        StaticHost::new(Rect::new(100.0, 50.0, 500.0, 350.0))
    }

    fn builder() -> XRayConfigBuilder {
        XRayConfig::builder("photo.jpg", "A photo")
    }

    fn mounted(builder: XRayConfigBuilder) -> XRay<StaticHost> {
        let mut xray = XRay::new(builder.build().unwrap());
        xray.mount(host());
        xray.handle_event(WidgetEvent::ImageLoaded);
        xray
    }

    fn finish_animation(xray: &mut XRay<StaticHost>) {
        while xray.tick(Duration::from_millis(16)).is_some() {}
    }

    fn touch(x: f64, y: f64) -> Vec<TouchPoint> {
        vec![TouchPoint::new(x, y)]
    }

    #[test]
    fn test_mount_registers_listeners_once() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().build().unwrap());
        xray.mount(host());

        let host = xray.host().unwrap();
        assert_eq!(host.count(&ListenerKind::Resize), 1);
        assert_eq!(host.count(&ListenerKind::ImageLoad("photo.jpg".into())), 1);

        // The image listener is released once the image has loaded.
        xray.handle_event(WidgetEvent::ImageLoaded);
        assert_eq!(xray.host().unwrap().live_listeners(), 1);
    }

    #[test]
    fn test_unmount_releases_everything() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::PointerEnter);
        assert!(xray.is_animating());

        let host = xray.unmount().unwrap();
        assert_eq!(host.live_listeners(), 0);
        assert!(!xray.is_animating());
        assert!(xray.tick(Duration::from_millis(16)).is_none());
        assert!(xray.unmount().is_none());
    }

    #[test]
    fn test_remount_does_not_leak_listeners() {
        let mut xray = mounted(builder());
        for _ in 0..3 {
            let host = xray.unmount().unwrap();
            assert_eq!(host.live_listeners(), 0);
            xray.mount(host);
            assert_eq!(xray.host().unwrap().count(&ListenerKind::Resize), 1);
        }
    }

    #[test]
    fn test_mount_twice_returns_previous_host() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().build().unwrap());
        assert!(xray.mount(host()).is_none());
        let previous = xray.mount(host()).unwrap();
        assert_eq!(previous.live_listeners(), 0);
        assert_eq!(xray.host().unwrap().count(&ListenerKind::Resize), 1);
    }

    #[test]
    fn test_radius_resolves_after_image_load() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().build().unwrap());
        xray.mount(host());
        assert_eq!(xray.state().responsive_radius, None);

        // No radius yet: entering does nothing.
        let response = xray.handle_event(WidgetEvent::PointerEnter);
        assert!(!response.redraw);
        assert!(!xray.state().is_pointer_over);

        xray.handle_event(WidgetEvent::ImageLoaded);
        assert_eq!(xray.state().responsive_radius, Some(75.0));
    }

    #[test]
    fn test_image_failure_is_reported() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().build().unwrap());
        xray.mount(host());
        xray.handle_event(WidgetEvent::ImageFailed {
            reason: "404".into(),
        });

        assert!(xray.image_status().is_failed());
        assert_eq!(xray.state().responsive_radius, None);
        assert_eq!(xray.host().unwrap().live_listeners(), 1);
        assert!(xray.handle_event(WidgetEvent::PointerEnter).animation.is_none());
    }

    #[test]
    fn test_fixed_radius_scenario() {
        let mut xray = mounted(builder().fixed_radius(Some(15.0)));

        let response = xray.handle_event(WidgetEvent::PointerEnter);
        assert!(response.animation.is_some());
        assert_eq!(xray.tween().target(), Some(15.0));
        assert_eq!(xray.config().circle_in, Transition::circle_in());

        finish_animation(&mut xray);
        assert!((xray.circle_radius() - 15.0).abs() < f64::EPSILON);

        xray.handle_event(WidgetEvent::PointerLeave);
        xray.tick(Duration::from_millis(200));
        assert!(xray.circle_radius().abs() < f64::EPSILON);
        assert!(!xray.is_animating());
    }

    #[test]
    fn test_fixed_radius_never_consults_container() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().fixed_radius(Some(15.0)).build().unwrap());
        xray.mount(host());
        assert_eq!(xray.state().responsive_radius, Some(15.0));

        xray.host_mut().unwrap().size = Some(Size::new(1000.0, 1000.0));
        xray.handle_event(WidgetEvent::resize());
        xray.handle_event(WidgetEvent::ImageLoaded);
        assert_eq!(xray.state().responsive_radius, Some(15.0));
    }

    #[test]
    fn test_leave_cancels_enter_animation() {
        let mut xray = mounted(builder());
        let enter = xray.handle_event(WidgetEvent::PointerEnter).animation.unwrap();
        xray.tick(Duration::from_millis(100));

        let leave = xray.handle_event(WidgetEvent::PointerLeave).animation.unwrap();
        assert_ne!(enter, leave);
        while let Some(step) = xray.tick(Duration::from_millis(16)) {
            assert_eq!(step.handle, leave);
        }
        assert!(xray.circle_radius().abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_move_records_position() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::pointer_move(40.0, 60.0));
        assert_eq!(xray.state().pointer, Point::new(40.0, 60.0));
        assert!(xray.state().is_pointer_over);
    }

    #[test]
    fn test_repeated_pointer_move_is_idempotent() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::PointerEnter);
        finish_animation(&mut xray);

        let first = xray.handle_event(WidgetEvent::pointer_move(40.0, 60.0));
        assert!(first.redraw);
        let state = xray.state().clone();

        let second = xray.handle_event(WidgetEvent::pointer_move(40.0, 60.0));
        assert_eq!(xray.state(), &state);
        assert!(!second.redraw);
        assert!(second.animation.is_none());
        assert!(!xray.is_animating());
    }

    #[test]
    fn test_keyboard_reveal_toggle() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::Focus);
        assert!(xray.can_reveal());
        assert_eq!(xray.regime(), Regime::PeekEligible);
        assert!(xray.view().shows_hint());

        let response = xray.handle_event(WidgetEvent::key(" "));
        assert!(response.consumed);
        assert!(xray.state().is_revealed);
        assert_eq!(xray.regime(), Regime::Revealed);
        assert!(!xray.view().shows_hint());

        xray.handle_event(WidgetEvent::key("Space"));
        assert!(!xray.state().is_revealed);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::Focus);
        let response = xray.handle_event(WidgetEvent::key("Enter"));
        assert!(!response.consumed);
        assert!(!xray.state().is_revealed);
    }

    #[test]
    fn test_keyboard_requires_focus() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::key(" "));
        assert!(!xray.state().is_revealed);
        assert_eq!(xray.regime(), Regime::Idle);
    }

    #[test]
    fn test_pointer_clears_reveal() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::Focus);
        xray.handle_event(WidgetEvent::key(" "));
        assert!(xray.state().is_revealed);

        xray.handle_event(WidgetEvent::pointer_move(10.0, 10.0));
        assert!(!xray.state().is_revealed);
        assert_eq!(xray.regime(), Regime::Hovering);
    }

    #[test]
    fn test_blur_clears_reveal() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::Focus);
        xray.handle_event(WidgetEvent::key(" "));
        xray.handle_event(WidgetEvent::Blur);
        assert!(!xray.state().is_revealed);
        assert!(!xray.state().is_focused);
    }

    #[test]
    fn test_persisted_reveal_survives_implicit_events() {
        let mut xray = mounted(builder().persist_reveal(true));
        xray.handle_event(WidgetEvent::Focus);
        xray.handle_event(WidgetEvent::key(" "));
        assert!(xray.state().is_revealed);

        let implicit = [
            WidgetEvent::PointerEnter,
            WidgetEvent::pointer_move(5.0, 5.0),
            WidgetEvent::PointerLeave,
            WidgetEvent::TouchStart { touches: touch(150.0, 100.0) },
            WidgetEvent::TouchMove { touches: touch(160.0, 110.0) },
            WidgetEvent::TouchEnd,
            WidgetEvent::Blur,
        ];
        for event in implicit {
            xray.handle_event(event);
            assert!(xray.state().is_revealed);
        }

        // An explicit toggle still hides it.
        xray.handle_event(WidgetEvent::Focus);
        xray.handle_event(WidgetEvent::key(" "));
        assert!(!xray.state().is_revealed);
    }

    #[test]
    fn test_auto_reveal_on_focus() {
        let mut xray = mounted(builder().auto_reveal(true));
        xray.handle_event(WidgetEvent::Focus);
        assert!(xray.state().is_revealed);
        assert!(!xray.can_reveal());

        let pointer_events = [
            WidgetEvent::PointerEnter,
            WidgetEvent::pointer_move(5.0, 5.0),
            WidgetEvent::PointerLeave,
            WidgetEvent::TouchStart { touches: touch(150.0, 100.0) },
            WidgetEvent::TouchMove { touches: touch(160.0, 110.0) },
            WidgetEvent::TouchEnd,
        ];
        for event in pointer_events {
            xray.handle_event(event);
            assert!(xray.state().is_revealed);
        }

        xray.handle_event(WidgetEvent::Blur);
        assert!(!xray.state().is_revealed);
    }

    #[test]
    fn test_auto_reveal_with_persist_survives_blur() {
        let mut xray = mounted(builder().auto_reveal(true).persist_reveal(true));
        xray.handle_event(WidgetEvent::Focus);
        xray.handle_event(WidgetEvent::Blur);
        assert!(xray.state().is_revealed);
    }

    #[test]
    fn test_reveal_disabled() {
        let mut xray = mounted(builder().can_reveal(false));
        xray.handle_event(WidgetEvent::Focus);
        assert!(!xray.can_reveal());
        assert!(!xray.view().shows_hint());
        assert_eq!(xray.regime(), Regime::Focused);

        let response = xray.handle_event(WidgetEvent::key(" "));
        assert!(!response.consumed);
        assert!(!xray.state().is_revealed);
        assert!(!xray.view().shows_hint());
    }

    #[test]
    fn test_can_reveal_respects_host_hover() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().build().unwrap());
        xray.mount(host().with_hover(Some(false)));
        xray.handle_event(WidgetEvent::Focus);
        assert!(xray.can_reveal());

        xray.host_mut().unwrap().hovered = Some(true);
        assert!(!xray.can_reveal());
    }

    #[test]
    fn test_mount_reads_initial_hover() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().build().unwrap());
        xray.mount(host().with_hover(Some(true)));
        assert!(xray.state().is_pointer_over);
    }

    #[test]
    fn test_can_reveal_false_while_pointer_over() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::Focus);
        xray.handle_event(WidgetEvent::PointerEnter);
        assert!(!xray.can_reveal());
        xray.handle_event(WidgetEvent::PointerLeave);
        assert!(xray.can_reveal());
    }

    #[test]
    fn test_touch_position_is_relative_to_bounds() {
        let mut xray = mounted(builder());
        let response = xray.handle_event(WidgetEvent::TouchStart {
            touches: touch(150.0, 80.0),
        });
        assert!(response.animation.is_some());
        assert_eq!(xray.state().pointer, Point::new(50.0, 30.0));
        assert!(xray.state().is_pointer_over);

        xray.handle_event(WidgetEvent::TouchMove {
            touches: vec![TouchPoint::new(200.0, 150.0), TouchPoint::new(0.0, 0.0)],
        });
        assert_eq!(xray.state().pointer, Point::new(100.0, 100.0));

        xray.handle_event(WidgetEvent::TouchEnd);
        assert!(!xray.state().is_pointer_over);
        assert_eq!(xray.tween().target(), Some(0.0));
    }

    #[test]
    fn test_touch_without_bounds_is_noop() {
        let mut xray: XRay<StaticHost> =
            XRay::new(builder().fixed_radius(Some(15.0)).build().unwrap());
        xray.mount(StaticHost::unmeasured());
        let before = xray.state().clone();

        let response = xray.handle_event(WidgetEvent::TouchStart {
            touches: touch(10.0, 10.0),
        });
        assert_eq!(xray.state(), &before);
        assert!(!response.redraw);
        assert!(!xray.is_animating());
    }

    #[test]
    fn test_touch_without_points_is_noop() {
        let mut xray = mounted(builder());
        let before = xray.state().clone();
        xray.handle_event(WidgetEvent::TouchStart { touches: vec![] });
        xray.handle_event(WidgetEvent::TouchMove { touches: vec![] });
        assert_eq!(xray.state(), &before);
    }

    #[test]
    fn test_resize_remeasures() {
        let mut xray = mounted(builder().radius_scale(2.0));
        assert_eq!(xray.state().responsive_radius, Some(150.0));

        let host = xray.host_mut().unwrap();
        host.size = Some(Size::new(200.0, 800.0));
        host.bounds = Some(Rect::new(0.0, 0.0, 200.0, 800.0));
        xray.handle_event(WidgetEvent::resize());

        assert_eq!(xray.state().responsive_radius, Some(100.0));
        assert_eq!(xray.state().last_measured_bounds, Some(Rect::new(0.0, 0.0, 200.0, 800.0)));
    }

    #[test]
    fn test_resize_to_zero_keeps_previous_radius() {
        let mut xray = mounted(builder());
        xray.handle_event(WidgetEvent::Resize {
            size: Some(Size::ZERO),
            bounds: None,
        });
        assert_eq!(xray.state().responsive_radius, Some(75.0));
    }

    #[test]
    fn test_scale_change_recomputes_radius() {
        let mut xray = mounted(builder());
        xray.set_config(builder().radius_scale(0.5).build().unwrap());
        assert_eq!(xray.state().responsive_radius, Some(37.5));
    }

    #[test]
    fn test_dropping_fixed_radius_forgets_it() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().fixed_radius(Some(15.0)).build().unwrap());
        xray.mount(StaticHost::unmeasured());
        xray.handle_event(WidgetEvent::ImageLoaded);
        assert_eq!(xray.state().responsive_radius, Some(15.0));

        xray.set_config(builder().build().unwrap());
        assert_eq!(xray.state().responsive_radius, None);
        assert!(xray.handle_event(WidgetEvent::PointerEnter).animation.is_none());
    }

    #[test]
    fn test_dropping_fixed_radius_remeasures() {
        let mut xray = mounted(builder().fixed_radius(Some(15.0)));
        xray.set_config(builder().build().unwrap());
        assert_eq!(xray.state().responsive_radius, Some(75.0));
    }

    #[test]
    fn test_dropping_fixed_radius_before_load_waits_for_image() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().fixed_radius(Some(15.0)).build().unwrap());
        xray.mount(host());
        xray.set_config(builder().build().unwrap());
        assert_eq!(xray.state().responsive_radius, None);

        xray.handle_event(WidgetEvent::ImageLoaded);
        assert_eq!(xray.state().responsive_radius, Some(75.0));
    }

    #[test]
    fn test_new_image_restarts_loading() {
        let mut xray = mounted(builder());
        xray.set_config(XRayConfig::builder("other.jpg", "Other").build().unwrap());

        assert_eq!(xray.image_status(), &ImageStatus::Pending);
        let host = xray.host().unwrap();
        assert_eq!(host.count(&ListenerKind::ImageLoad("other.jpg".into())), 1);
        assert_eq!(host.live_listeners(), 2);
    }

    #[test]
    fn test_zoom_is_clamped_and_reset_on_reveal() {
        let xray = mounted(builder().zoom(0.3));
        assert!((xray.view().zoom - 1.0).abs() < f64::EPSILON);

        let mut xray = mounted(builder().zoom(2.5));
        assert!((xray.view().zoom - 2.5).abs() < f64::EPSILON);
        xray.handle_event(WidgetEvent::Focus);
        xray.handle_event(WidgetEvent::key(" "));
        assert!((xray.view().zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_handler_called() {
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let mut xray = mounted(builder().on_click(move |position| {
            assert_eq!(position, Point::new(3.0, 4.0));
            counter.set(counter.get() + 1);
        }));

        let response = xray.handle_event(WidgetEvent::Click {
            position: Point::new(3.0, 4.0),
        });
        assert!(response.consumed);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_unmounted_widget_assumes_no_hover() {
        let mut xray: XRay<StaticHost> = XRay::new(builder().build().unwrap());
        xray.handle_event(WidgetEvent::Focus);
        assert!(xray.can_reveal());
        assert!(xray.host().map(|h| h.client_size()).is_none());
    }
}
