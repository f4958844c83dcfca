//! Dirty-region tracking.
//!
//! Every draw call unions its clipped rectangle into one bounding box so a
//! batch of draws can be scoped by a single window-set command on links
//! where each window set carries fixed overhead.

use crate::geometry::Rect;

/// Union bounding box of everything drawn since the last flush.
///
/// While active, `min <= max` on both axes and the box lies inside the
/// logical frame; both are guaranteed because only already-clipped
/// rectangles are marked.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirtyRegion {
    active: bool,
    min_x: u16,
    min_y: u16,
    // exclusive
    max_x: u16,
    max_y: u16,
}

impl DirtyRegion {
    /// An inactive tracker.
    pub const fn new() -> Self {
        DirtyRegion {
            active: false,
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
        }
    }

    /// True when at least one rectangle was marked since the last flush.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Widen the box to cover `rect`. The box only ever grows until flushed.
    pub fn mark(&mut self, rect: Rect) {
        if self.active {
            self.min_x = self.min_x.min(rect.x);
            self.min_y = self.min_y.min(rect.y);
            self.max_x = self.max_x.max(rect.max_x());
            self.max_y = self.max_y.max(rect.max_y());
        } else {
            self.active = true;
            self.min_x = rect.x;
            self.min_y = rect.y;
            self.max_x = rect.max_x();
            self.max_y = rect.max_y();
        }
    }

    /// Return the accumulated box and reset to inactive.
    ///
    /// `None` means nothing was drawn since the last flush.
    pub fn flush(&mut self) -> Option<Rect> {
        let result = self.peek();
        self.active = false;
        result
    }

    /// The accumulated box without resetting.
    pub fn peek(&self) -> Option<Rect> {
        if !self.active {
            return None;
        }
        Some(Rect {
            x: self.min_x,
            y: self.min_y,
            w: self.max_x - self.min_x,
            h: self.max_y - self.min_y,
        })
    }

    /// Drop any accumulated state, e.g. after the logical frame changed.
    pub fn clear(&mut self) {
        self.active = false;
    }
}
