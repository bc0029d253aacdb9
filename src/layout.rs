use tracing::info;

use crate::{error::Result, screen::ScreenInfo};

/// Source of the monitor layout.
///
/// Implementations return screens in the order the windowing system reports
/// them; that order decides which image lands on which monitor.
pub trait ScreenLayoutProvider {
    fn name(&self) -> &'static str;

    /// `None` and `Some("")` both mean the default display.
    fn query_screens(&self, display_name: Option<&str>) -> Result<Vec<ScreenInfo>>;
}

/// A fixed layout, e.g. from `--screen` on the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticLayout(Vec<ScreenInfo>);

impl StaticLayout {
    /// Renumbers the screens by position.
    pub fn new(screens: impl IntoIterator<Item = ScreenInfo>) -> Self {
        Self(
            screens
                .into_iter()
                .enumerate()
                .map(|(index, screen)| ScreenInfo { index, ..screen })
                .collect(),
        )
    }
}

impl ScreenLayoutProvider for StaticLayout {
    fn name(&self) -> &'static str {
        "static"
    }

    fn query_screens(&self, _display_name: Option<&str>) -> Result<Vec<ScreenInfo>> {
        Ok(self.0.clone())
    }
}

/// Picks the backend for the current platform and session.
pub fn default_provider() -> Box<dyn ScreenLayoutProvider> {
    platform_provider()
}

#[cfg(target_os = "windows")]
fn platform_provider() -> Box<dyn ScreenLayoutProvider> {
    Box::new(crate::windows_backend::WindowsLayout)
}

#[cfg(all(not(target_os = "windows"), feature = "x11"))]
fn platform_provider() -> Box<dyn ScreenLayoutProvider> {
    #[cfg(feature = "wayland")]
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        return Box::new(crate::wayland::WaylandLayout);
    }
    Box::new(crate::x11::XineramaLayout)
}

#[cfg(all(not(target_os = "windows"), not(feature = "x11"), feature = "wayland"))]
fn platform_provider() -> Box<dyn ScreenLayoutProvider> {
    Box::new(crate::wayland::WaylandLayout)
}

/// Maps an empty display name to `None`, the session default.
pub(crate) fn default_display(display_name: Option<&str>) -> Option<&str> {
    display_name.filter(|name| !name.is_empty())
}

/// Queries `provider`, logging what it found.
pub fn query_screens(
    provider: &dyn ScreenLayoutProvider,
    display_name: Option<&str>,
) -> Result<Vec<ScreenInfo>> {
    let display_name = default_display(display_name);
    let screens = provider.query_screens(display_name)?;
    info!(
        "Found {} screen(s) via {}: {}",
        screens.len(),
        provider.name(),
        screens
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(screens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_layout_renumbers_in_order() {
        let layout = StaticLayout::new([
            "1920x1080+1920+0".parse().unwrap(),
            "1920x1080+0+0".parse().unwrap(),
        ]);
        let screens = query_screens(&layout, Some("")).unwrap();
        assert_eq!(screens.len(), 2);
        assert_eq!((screens[0].index, screens[0].x_origin), (0, 1920));
        assert_eq!((screens[1].index, screens[1].x_origin), (1, 0));
    }

    #[test]
    fn empty_display_name_means_default() {
        assert_eq!(default_display(Some("")), None);
        assert_eq!(default_display(None), None);
        assert_eq!(default_display(Some(":1")), Some(":1"));
    }
}
