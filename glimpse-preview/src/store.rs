//! Multi-surface session registry.
//!
//! One host process can drive several independent preview surfaces (editor
//! tabs); each gets its own engine task. Key = session id chosen by the
//! host.

use crate::diagnostics::FixRequest;
use crate::engine::{EngineCommand, EngineConfig, EngineEvent, PreviewEngine};
use crate::error::{PreviewError, PreviewResult};
use dashmap::DashMap;
use glimpse_compose::FileMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub struct PreviewSession {
    cmd_tx: mpsc::Sender<EngineCommand>,
    task: JoinHandle<()>,
}

/// Global storage for preview sessions.
pub type SessionStore = DashMap<String, PreviewSession>;

pub fn new_session_store() -> SessionStore {
    DashMap::new()
}

/// Creates a session and spawns its engine task. The returned receiver is
/// the host UI's event stream for this surface.
pub fn create_session(
    store: &SessionStore,
    id: impl Into<String>,
    files: FileMap,
    cfg: EngineConfig,
) -> mpsc::UnboundedReceiver<EngineEvent> {
    let (engine, cmd_tx, event_rx) = PreviewEngine::new(files, cfg);
    let task = tokio::spawn(engine.run());
    store.insert(id.into(), PreviewSession { cmd_tx, task });
    event_rx
}

/// Shuts the engine down and removes the session.
pub async fn close_session(store: &SessionStore, id: &str) -> PreviewResult<()> {
    let Some((_, session)) = store.remove(id) else {
        return Err(PreviewError::SessionNotFound { id: id.to_string() });
    };
    let _ = session.cmd_tx.send(EngineCommand::Shutdown).await;
    let _ = session.task.await;
    Ok(())
}

async fn command(store: &SessionStore, id: &str, cmd: EngineCommand) -> PreviewResult<()> {
    // Clone the sender out so no map guard is held across the await.
    let cmd_tx = match store.get(id) {
        Some(session) => session.cmd_tx.clone(),
        None => return Err(PreviewError::SessionNotFound { id: id.to_string() }),
    };
    cmd_tx
        .send(cmd)
        .await
        .map_err(|_| PreviewError::EngineClosed)
}

pub async fn update_files(store: &SessionStore, id: &str, files: FileMap) -> PreviewResult<()> {
    command(store, id, EngineCommand::UpdateFiles(files)).await
}

pub async fn manual_refresh(store: &SessionStore, id: &str) -> PreviewResult<()> {
    command(store, id, EngineCommand::ManualRefresh).await
}

pub async fn set_auto_refresh(store: &SessionStore, id: &str, enabled: bool) -> PreviewResult<()> {
    command(store, id, EngineCommand::SetAutoRefresh(enabled)).await
}

pub async fn set_select_mode(store: &SessionStore, id: &str, enabled: bool) -> PreviewResult<()> {
    command(store, id, EngineCommand::SetSelectMode(enabled)).await
}

pub async fn set_device_preset(store: &SessionStore, id: &str, preset: &str) -> PreviewResult<()> {
    command(store, id, EngineCommand::SetDevicePreset(preset.to_string())).await
}

pub async fn flip_orientation(store: &SessionStore, id: &str) -> PreviewResult<()> {
    command(store, id, EngineCommand::FlipOrientation).await
}

pub async fn set_scale(store: &SessionStore, id: &str, scale: f32) -> PreviewResult<()> {
    command(store, id, EngineCommand::SetScale(scale)).await
}

pub async fn clear_diagnostics(store: &SessionStore, id: &str) -> PreviewResult<()> {
    command(store, id, EngineCommand::ClearDiagnostics).await
}

/// "Open externally": the current standalone document for download or a
/// full-page view. `None` before the first render completes.
pub async fn export_document(store: &SessionStore, id: &str) -> PreviewResult<Option<String>> {
    let (reply, rx) = oneshot::channel();
    command(store, id, EngineCommand::Export { reply }).await?;
    rx.await.map_err(|_| PreviewError::ReplyDropped)
}

/// Fix hand-off for the external collaborator. `None` when the session has
/// no error entries.
pub async fn request_fix(store: &SessionStore, id: &str) -> PreviewResult<Option<FixRequest>> {
    let (reply, rx) = oneshot::channel();
    command(store, id, EngineCommand::RequestFix { reply }).await?;
    rx.await.map_err(|_| PreviewError::ReplyDropped)
}
