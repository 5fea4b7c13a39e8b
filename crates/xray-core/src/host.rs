//! The seam between the widget and the environment that displays it.
//!
//! The widget receives a [`Host`] on mount and hands it back on unmount.
//! Everything it needs from the outside world (element geometry, hover
//! probing, resize notifications, image loading) goes through this trait.

use kurbo::{Rect, Size};
use std::collections::HashMap;

/// Identifies a listener registered with a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// What a registered listener observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerKind {
    /// Viewport resize; delivered back as `WidgetEvent::Resize`.
    Resize,
    /// Image load for a URL; delivered back as `WidgetEvent::ImageLoaded`
    /// or `WidgetEvent::ImageFailed`.
    ImageLoad(String),
}

/// Environment hosting one widget instance.
pub trait Host {
    /// Inner size of the widget's root element, if it has been laid out.
    fn client_size(&self) -> Option<Size>;

    /// Bounding rectangle of the root element in client coordinates.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Whether the pointer currently hovers the root element.
    ///
    /// `None` when the host cannot report hover state.
    fn hover_state(&self) -> Option<bool> {
        None
    }

    /// Start delivering resize notifications.
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Start loading `url` out of band and report the outcome.
    fn request_image(&mut self, url: &str) -> ListenerId;

    /// Stop a listener. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);
}

/// An in-memory host with fixed geometry.
///
/// Records listener registrations so that their lifecycle can be checked;
/// events are delivered by whoever drives the widget.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    pub size: Option<Size>,
    pub bounds: Option<Rect>,
    pub hovered: Option<bool>,
    listeners: HashMap<ListenerId, ListenerKind>,
    next_id: u64,
    registrations: usize,
}

impl StaticHost {
    /// A host laid out at `bounds`, reporting the matching client size.
    pub fn new(bounds: Rect) -> Self {
        Self {
            size: Some(bounds.size()),
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    /// A host that has not been laid out yet.
    pub fn unmeasured() -> Self {
        Self::default()
    }

    pub fn with_hover(mut self, hovered: Option<bool>) -> Self {
        self.hovered = hovered;
        self
    }

    /// Currently registered listeners.
    pub fn listeners(&self) -> impl Iterator<Item = (&ListenerId, &ListenerKind)> {
        self.listeners.iter()
    }

    /// Number of live listeners of the given kind.
    pub fn count(&self, kind: &ListenerKind) -> usize {
        self.listeners.values().filter(|k| *k == kind).count()
    }

    /// Number of live listeners.
    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Total registrations ever made.
    pub fn registrations(&self) -> usize {
        self.registrations
    }

    fn register(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        self.registrations += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, kind);
        id
    }
}

impl Host for StaticHost {
    fn client_size(&self) -> Option<Size> {
        self.size
    }

    fn bounding_rect(&self) -> Option<Rect> {
        self.bounds
    }

    fn hover_state(&self) -> Option<bool> {
        self.hovered
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        self.register(ListenerKind::Resize)
    }

    fn request_image(&mut self, url: &str) -> ListenerId {
        self.register(ListenerKind::ImageLoad(url.to_string()))
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_host_geometry() {
        let host = StaticHost::new(Rect::new(10.0, 20.0, 410.0, 320.0));
        assert_eq!(host.client_size(), Some(Size::new(400.0, 300.0)));
        assert_eq!(host.bounding_rect().map(|r| r.origin().x), Some(10.0));
        assert_eq!(host.hover_state(), None);
        assert_eq!(StaticHost::unmeasured().client_size(), None);
    }

    #[test]
    fn test_static_host_listeners() {
        let mut host = StaticHost::unmeasured();
        let resize = host.add_resize_listener();
        let image = host.request_image("a.png");
        assert_ne!(resize, image);
        assert_eq!(host.count(&ListenerKind::Resize), 1);
        assert_eq!(host.count(&ListenerKind::ImageLoad("a.png".into())), 1);

        host.remove_listener(resize);
        host.remove_listener(resize);
        assert_eq!(host.live_listeners(), 1);
        assert_eq!(host.registrations(), 2);
    }
}
