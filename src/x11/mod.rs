use tracing::{debug, warn};
use x11rb::{
    connection::RequestConnection,
    errors::ReplyError,
    protocol::xinerama::{self, ConnectionExt as _},
};

use crate::{
    error::{Error, Result},
    layout::{ScreenLayoutProvider, default_display},
    screen::ScreenInfo,
};

const XINERAMA: &str = "Xinerama";

/// Reads the monitor layout from the X server's Xinerama extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct XineramaLayout;

impl ScreenLayoutProvider for XineramaLayout {
    fn name(&self) -> &'static str {
        "x11/xinerama"
    }

    fn query_screens(&self, display_name: Option<&str>) -> Result<Vec<ScreenInfo>> {
        let display_name = default_display(display_name);
        let (connection, screen_index) = x11rb::connect(display_name)
            .map_err(|err| Error::display_unavailable(display_name, err))?;
        debug!("Connected to X11 display (default screen {screen_index})");

        ensure_xinerama_active(&connection)?;

        let reply = connection
            .xinerama_query_screens()
            .map_err(ReplyError::from)
            .and_then(|cookie| cookie.reply())
            .map_err(|err| extension_unavailable(format!("XineramaQueryScreens failed: {err}")))?;

        // The connection goes away with this scope; nothing else is asked of
        // the server.
        Ok(screens_from_records(
            reply
                .screen_info
                .iter()
                .map(|info| (info.x_org, info.y_org, info.width, info.height)),
        ))
    }
}

fn ensure_xinerama_active(connection: &impl RequestConnection) -> Result<()> {
    let present = connection
        .extension_information(xinerama::X11_EXTENSION_NAME)
        .map_err(|err| extension_unavailable(format!("extension query failed: {err}")))?
        .is_some();
    if !present {
        return Err(extension_unavailable("extension missing on this server".into()));
    }

    let state = connection
        .xinerama_is_active()
        .map_err(ReplyError::from)
        .and_then(|cookie| cookie.reply())
        .map_err(|err| extension_unavailable(format!("XineramaIsActive failed: {err}")))?
        .state;
    if state == 0 {
        return Err(extension_unavailable("extension reports itself inactive".into()));
    }
    Ok(())
}

fn extension_unavailable(reason: String) -> Error {
    Error::ExtensionUnavailable {
        extension: XINERAMA,
        reason,
    }
}

/// Converts Xinerama records, in reply order, into screens. Records with an
/// empty size carry no pixels and are dropped.
fn screens_from_records(records: impl IntoIterator<Item = (i16, i16, u16, u16)>) -> Vec<ScreenInfo> {
    records
        .into_iter()
        .filter_map(|(x, y, width, height)| {
            let screen = ScreenInfo::new(
                0,
                i32::from(x),
                i32::from(y),
                u32::from(width),
                u32::from(height),
            );
            if screen.is_err() {
                warn!("Skipping empty Xinerama screen {width}x{height}+{x}+{y}");
            }
            screen.ok()
        })
        .enumerate()
        .map(|(index, screen)| ScreenInfo { index, ..screen })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_reply_order() {
        let screens = screens_from_records([(1920, 0, 1920, 1080), (0, 0, 1920, 1080)]);
        assert_eq!(screens.len(), 2);
        assert_eq!((screens[0].index, screens[0].x_origin), (0, 1920));
        assert_eq!((screens[1].index, screens[1].x_origin), (1, 0));
    }

    #[test]
    fn empty_records_are_skipped() {
        let screens = screens_from_records([(0, 0, 0, 0), (0, 0, 1280, 1024)]);
        assert_eq!(screens.len(), 1);
        assert_eq!(screens[0].index, 0);
        assert_eq!(screens[0].size(), (1280, 1024));
    }

    #[test]
    fn unparsable_display_is_unavailable() {
        let err = XineramaLayout.query_screens(Some("not a display")).unwrap_err();
        match err {
            Error::DisplayUnavailable { display, .. } => assert_eq!(display, "not a display"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_display_name_behaves_like_default() {
        let describe = |result: Result<Vec<ScreenInfo>>| match result {
            Ok(screens) => format!("{} screen(s)", screens.len()),
            Err(err) => err.to_string(),
        };
        assert_eq!(
            describe(XineramaLayout.query_screens(Some(""))),
            describe(XineramaLayout.query_screens(None))
        );
    }
}
