//! Plugin and UI construction.
//!
//! The host calls these once per instance. There is no process-wide
//! registry: each call returns an owned object the format glue keeps.

use blockbridge_core::{
    BridgeError, BridgeResult, Config, Editor, ParameterHandle, SynthEngine, WindowHandle,
};

use crate::plugin::SynthPlugin;
use crate::ui::EditorBridge;

/// Create a plugin instance, building its engine with `engine_factory`.
///
/// Never fails: a factory error is logged and yields an inert plugin.
pub fn create_plugin<E, F>(
    config: &'static Config,
    sample_rate: f64,
    engine_factory: F,
) -> SynthPlugin<E>
where
    E: SynthEngine,
    F: FnOnce(f64) -> BridgeResult<E>,
{
    log::debug!(
        "Creating plugin: {} {} ({} / {})",
        config.label,
        config.version,
        config.maker_code,
        config.plugin_code
    );
    SynthPlugin::new(config, sample_rate, engine_factory)
}

/// Create the UI for `plugin`, embedding into `window`.
///
/// The editor factory only receives the plugin's parameter handle. An inert
/// plugin or a failing factory yields a UI without an editor.
pub fn create_ui<E, Ed, F>(
    plugin: &SynthPlugin<E>,
    window: WindowHandle,
    editor_factory: F,
) -> EditorBridge<Ed>
where
    E: SynthEngine,
    Ed: Editor,
    F: FnOnce(ParameterHandle) -> BridgeResult<Ed>,
{
    let editor = plugin
        .parameter_handle()
        .ok_or(BridgeError::EngineUnavailable)
        .and_then(editor_factory);

    match editor {
        Ok(editor) => EditorBridge::new(window, Some(editor)),
        Err(e) => {
            log::error!("{}: {}", plugin.info().label, e);
            EditorBridge::new(window, None)
        }
    }
}
