use std::{collections::HashMap, os::unix::net::UnixStream, path::PathBuf};

use tracing::{debug, info, trace_span, warn};
use wayland_client::{
    Connection, Dispatch, Proxy, QueueHandle, WEnum,
    protocol::{wl_output, wl_registry},
};
use wayland_protocols::xdg::xdg_output::zv1::client::{zxdg_output_manager_v1, zxdg_output_v1};

use crate::{
    error::{Error, Result},
    layout::{ScreenLayoutProvider, default_display},
    screen::{ScreenInfo, normalize_origins},
};

const XDG_OUTPUT: &str = "zxdg_output_manager_v1";

/// Reads the output layout from a Wayland compositor through xdg-output.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaylandLayout;

impl ScreenLayoutProvider for WaylandLayout {
    fn name(&self) -> &'static str {
        "wayland/xdg-output"
    }

    fn query_screens(&self, display_name: Option<&str>) -> Result<Vec<ScreenInfo>> {
        let display_name = default_display(display_name);
        let conn = connect(display_name)?;
        let mut event_queue = conn.new_event_queue();
        let qh = event_queue.handle();
        conn.display().get_registry(&qh, ());

        let dispatch_failed =
            |err: wayland_client::DispatchError| Error::display_unavailable(display_name, err);

        let mut state = OutputState::default();
        debug!("Waiting for globals...");
        event_queue.roundtrip(&mut state).map_err(dispatch_failed)?;

        let Some(manager) = state.xdg_output_manager.take() else {
            return Err(Error::ExtensionUnavailable {
                extension: XDG_OUTPUT,
                reason: "compositor does not advertise it".into(),
            });
        };

        let xdg_outputs = state
            .output_order
            .iter()
            .filter_map(|name| {
                let output = state.outputs.get(name)?;
                Some(manager.get_xdg_output(output, &qh, *name))
            })
            .collect::<Vec<_>>();

        // Delivers wl_output and xdg_output geometry for every bound output.
        event_queue.roundtrip(&mut state).map_err(dispatch_failed)?;

        for xdg_output in xdg_outputs {
            xdg_output.destroy();
        }
        manager.destroy();
        // wl_output.release only exists from version 3 on.
        for output in state.outputs.values() {
            if output.version() >= 3 {
                output.release();
            }
        }

        let mut screens = screens_from_outputs(&state.output_order, &state.output_info);
        normalize_origins(&mut screens);
        Ok(screens)
    }
}

fn connect(display_name: Option<&str>) -> Result<Connection> {
    let Some(name) = display_name else {
        return Connection::connect_to_env().map_err(|err| Error::display_unavailable(None, err));
    };

    let mut path = PathBuf::from(name);
    if path.is_relative() {
        let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR").ok_or_else(|| {
            Error::display_unavailable(display_name, "XDG_RUNTIME_DIR is not set")
        })?;
        path = PathBuf::from(runtime_dir).join(path);
    }

    let stream = UnixStream::connect(&path).map_err(|err| {
        Error::display_unavailable(display_name, format!("{}: {err}", path.display()))
    })?;
    Connection::from_socket(stream).map_err(|err| Error::display_unavailable(display_name, err))
}

#[derive(Default)]
struct OutputState {
    outputs: HashMap<u32, wl_output::WlOutput>,
    output_info: HashMap<u32, OutputInfo>,
    /// Registry names in announcement order.
    output_order: Vec<u32>,
    xdg_output_manager: Option<zxdg_output_manager_v1::ZxdgOutputManagerV1>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct OutputInfo {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

fn screens_from_outputs(order: &[u32], info: &HashMap<u32, OutputInfo>) -> Vec<ScreenInfo> {
    order
        .iter()
        .filter_map(|name| {
            let info = info.get(name).copied().unwrap_or_default();
            let size = u32::try_from(info.width).ok().zip(u32::try_from(info.height).ok());
            let screen = size.and_then(|(width, height)| {
                ScreenInfo::new(0, info.x, info.y, width, height).ok()
            });
            if screen.is_none() {
                warn!("Skipping output {name} without a usable size: {info:?}");
            }
            screen
        })
        .enumerate()
        .map(|(index, screen)| ScreenInfo { index, ..screen })
        .collect()
}

impl Dispatch<wl_registry::WlRegistry, ()> for OutputState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _data: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global {
                name,
                interface,
                version,
            } => {
                let _span_guard =
                    trace_span!("wl_registry::Event::Global", name, interface, version).entered();
                match interface.as_str() {
                    "wl_output" => {
                        info!("Output found: {} (version {})", name, version);
                        let output = registry.bind::<wl_output::WlOutput, _, _>(
                            name,
                            version.min(4),
                            qh,
                            name,
                        );
                        state.outputs.insert(name, output);
                        state.output_order.push(name);
                    }
                    XDG_OUTPUT => {
                        info!("xdg_output_manager found: {} (version {})", name, version);
                        state.xdg_output_manager =
                            Some(registry.bind(name, version.min(3), qh, ()));
                    }
                    _ => {}
                }
            }
            wl_registry::Event::GlobalRemove { name } => {
                if state.outputs.remove(&name).is_some() {
                    warn!("Output {} removed", name);
                    state.output_order.retain(|n| *n != name);
                    state.output_info.remove(&name);
                }
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_output::WlOutput, u32> for OutputState {
    fn event(
        state: &mut Self,
        _output: &wl_output::WlOutput,
        event: wl_output::Event,
        output_name: &u32,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        // Physical values; xdg-output's logical ones arrive later and win.
        match event {
            wl_output::Event::Geometry { x, y, .. } => {
                let info = state.output_info.entry(*output_name).or_default();
                info.x = x;
                info.y = y;
            }
            wl_output::Event::Mode {
                flags,
                width,
                height,
                ..
            } => {
                if let WEnum::Value(flags) = flags
                    && flags.contains(wl_output::Mode::Current)
                {
                    let info = state.output_info.entry(*output_name).or_default();
                    info.width = width;
                    info.height = height;
                }
            }
            _ => {}
        }
    }
}

impl Dispatch<zxdg_output_manager_v1::ZxdgOutputManagerV1, ()> for OutputState {
    fn event(
        _state: &mut Self,
        _object: &zxdg_output_manager_v1::ZxdgOutputManagerV1,
        _event: zxdg_output_manager_v1::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        // manager has no events
    }
}

impl Dispatch<zxdg_output_v1::ZxdgOutputV1, u32> for OutputState {
    fn event(
        state: &mut Self,
        _output: &zxdg_output_v1::ZxdgOutputV1,
        event: zxdg_output_v1::Event,
        output_name: &u32,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            zxdg_output_v1::Event::LogicalPosition { x, y } => {
                let info = state.output_info.entry(*output_name).or_default();
                info.x = x;
                info.y = y;
            }
            zxdg_output_v1::Event::LogicalSize { width, height } => {
                let info = state.output_info.entry(*output_name).or_default();
                info.width = width;
                info.height = height;
            }
            _ => {}
        }
    }
}
