use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// One monitor rectangle in the combined virtual desktop.
///
/// `index` is the position in the list the windowing system returned. That
/// order pairs each screen with an input image, so it is never re-sorted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenInfo {
    pub index: usize,
    pub x_origin: i32,
    pub y_origin: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenInfo {
    pub fn new(index: usize, x_origin: i32, y_origin: i32, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry(format!(
                "{width}x{height}{x_origin:+}{y_origin:+}"
            )));
        }
        Ok(Self {
            index,
            x_origin,
            y_origin,
            width,
            height,
        })
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        i64::from(self.x_origin) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        i64::from(self.y_origin) + i64::from(self.height)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn overlaps(&self, other: &ScreenInfo) -> bool {
        i64::from(self.x_origin) < other.right()
            && i64::from(other.x_origin) < self.right()
            && i64::from(self.y_origin) < other.bottom()
            && i64::from(other.y_origin) < self.bottom()
    }
}

/// Size of the smallest canvas anchored at the origin that covers every
/// screen: the maximum right and bottom edges.
pub fn bounding_size(screens: &[ScreenInfo]) -> (u32, u32) {
    let (width, height) = screens.iter().fold((0i64, 0i64), |(w, h), screen| {
        (w.max(screen.right()), h.max(screen.bottom()))
    });
    (clamp_u32(width), clamp_u32(height))
}

/// Returns `true` when any two screens share pixels.
pub fn any_overlap(screens: &[ScreenInfo]) -> bool {
    screens
        .iter()
        .enumerate()
        .any(|(i, a)| screens[i + 1..].iter().any(|b| a.overlaps(b)))
}

/// Shifts every origin so the top-left-most edges sit at zero.
///
/// Some platforms place monitors left of or above the primary one at negative
/// coordinates; the canvas only has non-negative pixel positions.
pub fn normalize_origins(screens: &mut [ScreenInfo]) {
    let Some((min_x, min_y)) = screens
        .iter()
        .map(|s| (s.x_origin, s.y_origin))
        .reduce(|(x0, y0), (x1, y1)| (x0.min(x1), y0.min(y1)))
    else {
        return;
    };

    for screen in screens {
        screen.x_origin -= min_x;
        screen.y_origin -= min_y;
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

impl fmt::Display for ScreenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}{:+}{:+}",
            self.width, self.height, self.x_origin, self.y_origin
        )
    }
}

/// Parses X geometry syntax, `WIDTHxHEIGHT+X+Y`. The offsets may be omitted
/// and default to zero. The resulting index is 0; callers renumber.
impl FromStr for ScreenInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidGeometry(s.to_owned());
        let s = s.trim();

        let offsets_at = s.find(['+', '-']).unwrap_or(s.len());
        let (size, offsets) = s.split_at(offsets_at);

        let (width, height) = size.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = width.parse::<u32>().map_err(|_| invalid())?;
        let height = height.parse::<u32>().map_err(|_| invalid())?;

        let (x, y) = if offsets.is_empty() {
            (0, 0)
        } else {
            let split = offsets[1..]
                .find(['+', '-'])
                .map(|i| i + 1)
                .ok_or_else(invalid)?;
            let (x, y) = offsets.split_at(split);
            (
                x.parse::<i32>().map_err(|_| invalid())?,
                y.parse::<i32>().map_err(|_| invalid())?,
            )
        };

        ScreenInfo::new(0, x, y, width, height).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(index: usize, x: i32, y: i32, w: u32, h: u32) -> ScreenInfo {
        ScreenInfo::new(index, x, y, w, h).unwrap()
    }

    #[test]
    fn rejects_zero_size() {
        assert!(matches!(
            ScreenInfo::new(0, 0, 0, 0, 1080),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(ScreenInfo::new(0, 0, 0, 1920, 0).is_err());
    }

    #[test]
    fn bounding_size_of_side_by_side() {
        let screens = [screen(0, 0, 0, 1920, 1080), screen(1, 1920, 0, 1920, 1080)];
        assert_eq!(bounding_size(&screens), (3840, 1080));
    }

    #[test]
    fn bounding_size_of_staggered_layout() {
        let screens = [screen(0, 0, 312, 1280, 1024), screen(1, 1280, 0, 2560, 1440)];
        assert_eq!(bounding_size(&screens), (3840, 1440));
    }

    #[test]
    fn bounding_size_includes_offset_from_origin() {
        let screens = [screen(0, 100, 50, 800, 600)];
        assert_eq!(bounding_size(&screens), (900, 650));
    }

    #[test]
    fn bounding_size_of_nothing_is_empty() {
        assert_eq!(bounding_size(&[]), (0, 0));
    }

    #[test]
    fn overlap_detection() {
        let a = screen(0, 0, 0, 1920, 1080);
        let b = screen(1, 1920, 0, 1920, 1080);
        let mirrored = screen(2, 0, 0, 1280, 720);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&mirrored));
        assert!(!any_overlap(&[a, b]));
        assert!(any_overlap(&[a, b, mirrored]));
    }

    #[test]
    fn normalize_moves_negative_origins_to_zero() {
        let mut screens = [screen(0, 0, 0, 1920, 1080), screen(1, -1280, -200, 1280, 1024)];
        normalize_origins(&mut screens);
        assert_eq!((screens[0].x_origin, screens[0].y_origin), (1280, 200));
        assert_eq!((screens[1].x_origin, screens[1].y_origin), (0, 0));
    }

    #[test]
    fn parses_geometry() {
        let parsed: ScreenInfo = "1920x1080+1920+0".parse().unwrap();
        assert_eq!(parsed, screen(0, 1920, 0, 1920, 1080));

        let parsed: ScreenInfo = "800X600".parse().unwrap();
        assert_eq!(parsed, screen(0, 0, 0, 800, 600));

        let parsed: ScreenInfo = "1280x1024-1280+10".parse().unwrap();
        assert_eq!((parsed.x_origin, parsed.y_origin), (-1280, 10));
    }

    #[test]
    fn rejects_bad_geometry() {
        for bad in ["", "1920", "1920x", "x1080", "0x1080+0+0", "1920x1080+5", "axb+0+0"] {
            assert!(bad.parse::<ScreenInfo>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let original = screen(0, 1920, 0, 2560, 1440);
        assert_eq!(original.to_string(), "2560x1440+1920+0");
        assert_eq!(original.to_string().parse::<ScreenInfo>().unwrap(), original);
    }
}
