//! Headless sessions.
//!
//! A [`Session`] mounts the widgets of a demo on in-memory hosts, replays an
//! event script against them and renders frames at a fixed interval. It
//! plays the part of the browser event loop: image loads complete as soon
//! as they are requested and time only moves when the script says so.

use crate::app::{AppConfig, AppError, AppResult};
use crate::demos::Demo;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use xray_core::host::{ListenerKind, StaticHost};
use xray_core::input::{ACTIVATION_KEY, WidgetEvent};
use xray_core::widget::{EventResponse, XRay};
use xray_render::{ComposeStyle, SvgRenderer, compose_with};

/// Upper bound on how long [`Session::settle`] lets animations run.
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

/// One scripted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Time to let pass before the event is delivered, in milliseconds.
    #[serde(default)]
    pub wait_ms: u64,
    /// Index of the receiving widget.
    #[serde(default)]
    pub target: usize,
    pub event: WidgetEvent,
}

impl ScriptStep {
    pub fn new(event: WidgetEvent) -> Self {
        Self {
            wait_ms: 0,
            target: 0,
            event,
        }
    }

    pub fn after(mut self, wait_ms: u64) -> Self {
        self.wait_ms = wait_ms;
        self
    }
}

/// Parse an event script from JSON (an array of steps).
pub fn parse_script(json: &str) -> AppResult<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

/// Hover across the first widget, leave, then reveal it from the keyboard.
pub fn default_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::new(WidgetEvent::PointerEnter),
        ScriptStep::new(WidgetEvent::pointer_move(120.0, 80.0)).after(100),
        ScriptStep::new(WidgetEvent::pointer_move(180.0, 120.0)).after(400),
        ScriptStep::new(WidgetEvent::PointerLeave).after(200),
        ScriptStep::new(WidgetEvent::Focus).after(300),
        ScriptStep::new(WidgetEvent::key(ACTIVATION_KEY)).after(100),
    ]
}

/// A set of widgets driven without a browser.
pub struct Session {
    widgets: Vec<XRay<StaticHost>>,
    renderer: SvgRenderer,
    style: ComposeStyle,
    frame_interval: Duration,
    elapsed: Duration,
    frames: usize,
    last_frame: Vec<String>,
}

impl Session {
    /// Mount every widget of `demo`, laid out in a row.
    pub fn new(demo: &Demo, config: &AppConfig) -> Self {
        let widgets = demo
            .widgets
            .iter()
            .enumerate()
            .map(|(index, widget_config)| {
                let x = index as f64 * (config.width + config.gap);
                let bounds = Rect::from_origin_size(Point::new(x, 0.0), (config.width, config.height));
                let mut widget = XRay::new(widget_config.clone());
                widget.mount(StaticHost::new(bounds));
                widget
            })
            .collect();

        let mut session = Self {
            widgets,
            renderer: SvgRenderer::new().with_inline_styles(config.inline_styles),
            style: config.compose_style(),
            frame_interval: config.frame_interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            frames: 0,
            last_frame: Vec::new(),
        };

        let loaded = session.load_images();
        log::info!(
            "Session '{}': {} widget(s) mounted, {} image(s) loaded",
            demo.name,
            session.widgets.len(),
            loaded
        );

        if demo.focus_on_mount {
            if let Some(first) = session.widgets.first_mut() {
                first.handle_event(WidgetEvent::Focus);
            }
        }
        session
    }

    pub fn widgets(&self) -> &[XRay<StaticHost>] {
        &self.widgets
    }

    /// Simulated time since the session started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Markup of the most recently rendered frame, one entry per widget.
    pub fn last_frame(&self) -> &[String] {
        &self.last_frame
    }

    /// Complete every pending image request. Returns how many completed.
    pub fn load_images(&mut self) -> usize {
        let mut loaded = 0;
        for widget in &mut self.widgets {
            let pending = widget.host().is_some_and(|host| {
                host.listeners()
                    .any(|(_, kind)| matches!(kind, ListenerKind::ImageLoad(_)))
            });
            if pending {
                widget.handle_event(WidgetEvent::ImageLoaded);
                loaded += 1;
            }
        }
        loaded
    }

    /// Deliver one event to widget `target`.
    pub fn dispatch(&mut self, target: usize, event: WidgetEvent) -> AppResult<EventResponse> {
        let count = self.widgets.len();
        let widget = self
            .widgets
            .get_mut(target)
            .ok_or(AppError::NoSuchWidget { target, count })?;
        let response = widget.handle_event(event);
        if response.redraw {
            self.render_frame()?;
        }
        Ok(response)
    }

    /// Let `duration` pass, ticking animations once per frame interval.
    ///
    /// A frame is rendered for every interval in which an animation moved.
    /// Returns the number of frames rendered.
    pub fn advance(&mut self, duration: Duration) -> AppResult<usize> {
        let before = self.frames;
        let mut remaining = duration;
        while !remaining.is_zero() {
            let dt = remaining.min(self.frame_interval);
            remaining -= dt;
            self.elapsed += dt;

            let mut moved = false;
            for widget in &mut self.widgets {
                moved |= widget.tick(dt).is_some();
            }
            if moved {
                self.render_frame()?;
            }
        }
        Ok(self.frames - before)
    }

    /// Run until no widget is animating.
    pub fn settle(&mut self) -> AppResult<usize> {
        let mut frames = 0;
        let mut waited = Duration::ZERO;
        while self.widgets.iter().any(|widget| widget.is_animating()) && waited < SETTLE_LIMIT {
            frames += self.advance(self.frame_interval)?;
            waited += self.frame_interval;
        }
        Ok(frames)
    }

    /// Replay `script`, then let animations finish.
    pub fn run(&mut self, script: &[ScriptStep]) -> AppResult<()> {
        for step in script {
            self.advance(Duration::from_millis(step.wait_ms))?;
            log::debug!(
                "t={:?} widget {} <- {}",
                self.elapsed,
                step.target,
                step.event.name()
            );
            self.dispatch(step.target, step.event.clone())?;
        }
        self.settle()?;
        Ok(())
    }

    /// Render the current state of every widget.
    pub fn render(&self) -> AppResult<Vec<String>> {
        let mut documents = Vec::with_capacity(self.widgets.len());
        for widget in &self.widgets {
            let scene = compose_with(&widget.view(), widget.config(), &self.style);
            documents.push(self.renderer.render_document(&scene)?);
        }
        Ok(documents)
    }

    fn render_frame(&mut self) -> AppResult<()> {
        self.last_frame = self.render()?;
        self.frames += 1;
        Ok(())
    }
}
