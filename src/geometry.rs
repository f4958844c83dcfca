//! Rotation tables and logical-frame rectangle math.
//!
//! Drawing is always expressed in the logical frame selected by the active
//! rotation; the protocol sequencer adds the column/row start offsets when
//! it turns a [`Rect`] into a window-address command.

use crate::Error;

/// One orientation of the panel: the MADCTL byte that selects it plus the
/// logical dimensions and window offsets that apply while it is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotation {
    /// Memory data access control byte (without the color-order bit)
    pub madctl: u8,
    /// Logical width while this rotation is active
    pub width: u16,
    /// Logical height while this rotation is active
    pub height: u16,
    /// Column address offset of the panel window
    pub colstart: u16,
    /// Row address offset of the panel window
    pub rowstart: u16,
}

/// Caller-supplied ordered list of rotations, selected by index.
#[derive(Clone, Copy, Debug)]
pub struct RotationTable {
    entries: &'static [Rotation],
}

impl RotationTable {
    /// Wrap an ordered rotation list.
    pub const fn new(entries: &'static [Rotation]) -> Self {
        RotationTable { entries }
    }

    /// Number of selectable rotations.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no rotations.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bounds-checked lookup. Out-of-range indices are rejected, never wrapped.
    pub fn get(&self, index: u8) -> Result<Rotation, Error> {
        self.entries
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidRotation)
    }
}

/// An axis-aligned rectangle in the logical frame. Always non-empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Left edge (inclusive)
    pub x: u16,
    /// Top edge (inclusive)
    pub y: u16,
    /// Width in pixels, at least one
    pub w: u16,
    /// Height in pixels, at least one
    pub h: u16,
}

impl Rect {
    /// Clip a signed rectangle against a `bounds_w` × `bounds_h` frame.
    ///
    /// Returns `None` when nothing remains, which draw calls treat as a
    /// silent no-op rather than an error.
    pub fn clip(x: i32, y: i32, w: u32, h: u32, bounds_w: u16, bounds_h: u16) -> Option<Rect> {
        if w == 0 || h == 0 {
            return None;
        }
        let x0 = (x.max(0)) as i64;
        let y0 = (y.max(0)) as i64;
        let x1 = (x as i64 + w as i64).min(bounds_w as i64);
        let y1 = (y as i64 + h as i64).min(bounds_h as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            w: (x1 - x0) as u16,
            h: (y1 - y0) as u16,
        })
    }

    /// Right edge, exclusive.
    pub const fn max_x(&self) -> u16 {
        self.x + self.w
    }

    /// Bottom edge, exclusive.
    pub const fn max_y(&self) -> u16 {
        self.y + self.h
    }

    /// Number of pixels covered.
    pub const fn pixels(&self) -> u32 {
        self.w as u32 * self.h as u32
    }
}

/// A point in the logical frame, used for polygon outlines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[Rotation] = &[
        Rotation { madctl: 0x00, width: 240, height: 320, colstart: 0, rowstart: 0 },
        Rotation { madctl: 0x60, width: 320, height: 240, colstart: 0, rowstart: 0 },
        Rotation { madctl: 0xC0, width: 240, height: 320, colstart: 0, rowstart: 0 },
        Rotation { madctl: 0xA0, width: 320, height: 240, colstart: 0, rowstart: 0 },
    ];

    #[test]
    fn rotation_lookup_is_bounds_checked() {
        let table = RotationTable::new(TABLE);
        assert_eq!(table.len(), 4);
        let r = table.get(1).unwrap();
        assert_eq!((r.width, r.height, r.madctl), (320, 240, 0x60));
        assert_eq!(table.get(4), Err(Error::InvalidRotation));
        assert_eq!(table.get(5), Err(Error::InvalidRotation));
    }

    #[test]
    fn clip_keeps_inner_rects_untouched() {
        let r = Rect::clip(10, 20, 30, 40, 240, 320).unwrap();
        assert_eq!(r, Rect { x: 10, y: 20, w: 30, h: 40 });
    }

    #[test]
    fn clip_trims_partial_overlap() {
        let r = Rect::clip(-5, -5, 20, 20, 240, 320).unwrap();
        assert_eq!(r, Rect { x: 0, y: 0, w: 15, h: 15 });
        let r = Rect::clip(230, 310, 50, 50, 240, 320).unwrap();
        assert_eq!(r, Rect { x: 230, y: 310, w: 10, h: 10 });
    }

    #[test]
    fn clip_drops_fully_outside_rects() {
        assert_eq!(Rect::clip(240, 0, 10, 10, 240, 320), None);
        assert_eq!(Rect::clip(-10, -10, 10, 10, 240, 320), None);
        assert_eq!(Rect::clip(0, 0, 0, 10, 240, 320), None);
    }
}
