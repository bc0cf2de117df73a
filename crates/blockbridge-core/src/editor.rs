//! Editor (GUI) interface.

use crate::types::{ParameterValue, Rect, WindowHandle};

/// Trait for the engine's graphical editor.
///
/// The editor's drawing and layout are its own business; the bridge only
/// drives its lifecycle from the host's UI thread.
pub trait Editor {
    /// Embed the editor into the host-provided parent window.
    ///
    /// Returns `false` if the editor could not attach.
    fn open(&mut self, parent: WindowHandle) -> bool;

    /// Detach from the parent window.
    fn close(&mut self);

    /// Periodic tick issued by the host at its own cadence.
    fn idle(&mut self);

    /// Preferred editor rectangle, if the editor knows it yet.
    fn rect(&self) -> Option<Rect>;

    /// Called when the host changes a parameter so the editor can redraw it.
    ///
    /// Default implementation does nothing.
    fn parameter_changed(&mut self, _index: u32, _value: ParameterValue) {}
}
