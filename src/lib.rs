//! multibg
//!
//! Composes one background image spanning a multi-monitor desktop, with a
//! separate picture on each monitor. Every picture is scaled to cover its
//! monitor and center-cropped, then placed at the monitor's offset on a
//! canvas the size of the whole layout.
//!
//! Pick the matching layout backend feature (`x11` or `wayland`) on
//! Linux/BSD; Windows works with defaults.

#[cfg(all(
    not(feature = "wayland"),
    not(feature = "x11"),
    not(target_os = "windows")
))]
compile_error!("On non-Windows platforms, either the 'wayland' or 'x11' feature must be enabled.");

pub mod apply;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod fit;
pub mod layout;
pub mod screen;

#[cfg(feature = "wayland")]
pub mod wayland;

#[cfg(feature = "x11")]
pub mod x11;

#[cfg(target_os = "windows")]
pub mod windows_backend;

pub use canvas::{Canvas, CanvasComposer, load_images};
pub use color::BackgroundColor;
pub use config::Config;
pub use error::{Error, Result};
pub use fit::{FitPlan, ImageFitter, ResizeFilter};
pub use layout::{ScreenLayoutProvider, StaticLayout, default_provider};
pub use screen::ScreenInfo;

#[cfg(feature = "wayland")]
pub use wayland::WaylandLayout;

#[cfg(feature = "x11")]
pub use x11::XineramaLayout;

#[cfg(target_os = "windows")]
pub use windows_backend::WindowsLayout;
