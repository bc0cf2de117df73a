//! Shared primitive types.

use serde::Serialize;

/// Internal engine parameter identifier, produced by the engine's remap function.
pub type ParameterId = u32;

/// Normalized parameter value (0.0 to 1.0).
pub type ParameterValue = f32;

/// Fixed number of samples the engine renders per `process()` call.
///
/// Host callbacks may be any size; the renderer slices them against this
/// block size and carries the position across callbacks.
pub const BLOCK_SIZE: usize = 32;

const _: () = assert!(BLOCK_SIZE.is_power_of_two(), "BLOCK_SIZE must be a power of two");

/// Size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Editor rectangle as reported by the engine's editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Size of the editor window.
    ///
    /// The host is handed `right`/`bottom` as width/height, so an editor that
    /// anchors at a non-zero origin still gets enough room. Negative extents
    /// collapse to zero.
    pub fn size(&self) -> Size {
        Size::new(self.right.max(0) as u32, self.bottom.max(0) as u32)
    }
}

/// Opaque native window identifier supplied by the host.
///
/// Captured once when the UI object is built and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(usize);

impl WindowHandle {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw native handle value (`HWND`, `NSView*`, X11 window id...).
    pub const fn raw(&self) -> usize {
        self.0
    }

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}
