//! XRay Application
//!
//! Shells around the widget: a headless session runner used by the native
//! binary, and DOM bindings for the browser.

mod app;
pub mod demos;
mod session;

pub use app::{AppConfig, AppError, AppResult};
pub use demos::{DEMO_NAMES, Demo};
pub use session::{ScriptStep, Session, default_script, parse_script};
pub use xray_core::XRayConfig;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{DomHost, WebError, XRayHandle, mount_demo, mount_xray, run_wasm};
