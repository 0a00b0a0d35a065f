//! Integer axis-aligned rectangles
//!
//! Screen coordinates: x grows to the right, y grows downward. A rect covers
//! `[x, x + w]` horizontally and `[y, y + h]` vertically.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner
    #[inline]
    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Move by a whole-pixel offset
    #[inline]
    pub fn translate(&mut self, delta: IVec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Place the top-left corner
    #[inline]
    pub fn set_pos(&mut self, pos: IVec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Whether the closed vertical spans `[top, bottom]` of both rects share a point
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top() <= other.bottom() && other.top() <= self.bottom()
    }
}
