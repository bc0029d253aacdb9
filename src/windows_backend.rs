use tracing::{debug, warn};
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO,
};
use windows::core::BOOL;

use crate::{
    error::{Error, Result},
    layout::{ScreenLayoutProvider, default_display},
    screen::{ScreenInfo, normalize_origins},
};

/// Enumerates monitors through GDI. Windows has a single desktop per session,
/// so the display name is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowsLayout;

impl ScreenLayoutProvider for WindowsLayout {
    fn name(&self) -> &'static str {
        "windows/gdi"
    }

    fn query_screens(&self, display_name: Option<&str>) -> Result<Vec<ScreenInfo>> {
        if let Some(name) = default_display(display_name) {
            debug!("Ignoring display name {name:?} on Windows");
        }

        let mut rects: Vec<RECT> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(collect_monitor),
                LPARAM(&mut rects as *mut Vec<RECT> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(Error::display_unavailable(
                display_name,
                "EnumDisplayMonitors failed",
            ));
        }

        let mut screens = rects
            .iter()
            .filter_map(|rect| {
                let width = u32::try_from(rect.right - rect.left).ok()?;
                let height = u32::try_from(rect.bottom - rect.top).ok()?;
                ScreenInfo::new(0, rect.left, rect.top, width, height)
                    .inspect_err(|err| warn!("Skipping monitor: {err}"))
                    .ok()
            })
            .enumerate()
            .map(|(index, screen)| ScreenInfo { index, ..screen })
            .collect::<Vec<_>>();
        normalize_origins(&mut screens);
        Ok(screens)
    }
}

unsafe extern "system" fn collect_monitor(
    monitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    data: LPARAM,
) -> BOOL {
    let rects = unsafe { &mut *(data.0 as *mut Vec<RECT>) };
    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    if unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
        rects.push(info.rcMonitor);
    }
    BOOL::from(true)
}
