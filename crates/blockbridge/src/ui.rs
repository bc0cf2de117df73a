//! Editor lifecycle on the host's UI thread.
//!
//! [`EditorBridge`] is a two-state machine (`Closed` ↔ `Open`) driven by host
//! visibility changes. The parent window is captured once at construction.
//! The editor only ever sees a [`ParameterHandle`](blockbridge_core::ParameterHandle),
//! so nothing here touches audio state.

use blockbridge_core::{Editor, ParameterValue, Size, WindowHandle};

/// Whether the editor is currently embedded in the host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Closed,
    Open,
}

/// Host-facing wrapper around an optional [`Editor`].
pub struct EditorBridge<Ed: Editor> {
    window: WindowHandle,
    editor: Option<Ed>,
    state: EditorState,
    size: Option<Size>,
}

impl<Ed: Editor> EditorBridge<Ed> {
    /// Wrap `editor` for the parent `window`.
    ///
    /// The UI size is taken from the editor's rect; it stays unset when the
    /// editor is missing or does not report one.
    pub fn new(window: WindowHandle, editor: Option<Ed>) -> Self {
        let size = editor.as_ref().and_then(Editor::rect).map(|rect| rect.size());
        if editor.is_none() {
            log::warn!("UI created without an editor");
        }

        Self {
            window,
            editor,
            state: EditorState::Closed,
            size,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == EditorState::Open
    }

    pub fn has_editor(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&Ed> {
        self.editor.as_ref()
    }

    /// Preferred UI size, if the editor reported one.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Parent window captured at construction.
    pub fn window(&self) -> WindowHandle {
        self.window
    }

    /// Open or close the editor to follow host visibility.
    ///
    /// Repeating the current state is a no-op.
    pub fn set_visible(&mut self, visible: bool) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        match (visible, self.state) {
            (true, EditorState::Closed) => {
                if editor.open(self.window) {
                    log::debug!("Editor opened in window {:#x}", self.window.raw());
                    self.state = EditorState::Open;
                } else {
                    log::warn!("Editor failed to open in window {:#x}", self.window.raw());
                }
            }
            (false, EditorState::Open) => {
                editor.close();
                log::debug!("Editor closed");
                self.state = EditorState::Closed;
            }
            _ => {}
        }
    }

    /// Periodic host tick.
    pub fn idle(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.idle();
        }
    }

    /// Host-side parameter change notification.
    pub fn parameter_changed(&mut self, index: u32, value: ParameterValue) {
        if let Some(editor) = self.editor.as_mut() {
            editor.parameter_changed(index, value);
        }
    }
}

impl<Ed: Editor> Drop for EditorBridge<Ed> {
    fn drop(&mut self) {
        if self.state == EditorState::Open {
            if let Some(editor) = self.editor.as_mut() {
                editor.close();
            }
        }
    }
}
