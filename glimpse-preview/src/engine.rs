//! Preview engine: one serial event loop per preview surface.
//!
//! Drives the debounced recompose+reload cycle and dispatches inbound
//! bridge messages. Everything runs on a single task, so the diagnostic
//! buffer and selection state have exactly one writer and no locking
//! discipline. The debounce timer is the only timed suspension; a pending
//! debounce is cancelled outright by a manual refresh or an
//! immediate-refresh trigger.

use crate::diagnostics::{DiagnosticBuffer, FixRequest, LogEntry};
use crate::protocol::{self, BridgeMessage, HoverInfo, SelectionInfo};
use crate::sandbox::{InboundEnvelope, SandboxHandle, SandboxHost};
use crate::viewport::{DevicePreset, ViewportState};
use chrono::{DateTime, Utc};
use glimpse_compose::{compose, install_bridges, DocumentKind, FileMap};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use uuid::Uuid;

/// Quiet period coalescing rapid edits into one refresh.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Selection snippet cap, enforced host-side in addition to the bridge.
pub const SNIPPET_LIMIT: usize = 100;

const COMMAND_QUEUE: usize = 32;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub debounce: Duration,
    pub log_capacity: usize,
    pub snippet_limit: usize,
    pub auto_refresh: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_WINDOW,
            log_capacity: crate::diagnostics::LOG_CAPACITY,
            snippet_limit: SNIPPET_LIMIT,
            auto_refresh: true,
        }
    }
}

/// Commands from the host editing surface.
#[derive(Debug)]
pub enum EngineCommand {
    /// Replace the file map. Debounced when auto-refresh is on; held as a
    /// dirty flag when it is off.
    UpdateFiles(FileMap),
    /// Immediate refresh; cancels any pending debounce and clears the
    /// diagnostic buffer and selection.
    ManualRefresh,
    SetAutoRefresh(bool),
    /// Toggling select mode recomposes immediately since the composed
    /// content depends on the instrumentation flag.
    SetSelectMode(bool),
    /// Preset changes force an immediate refresh cycle.
    SetDevicePreset(String),
    FlipOrientation,
    SetScale(f32),
    ClearDiagnostics,
    /// "Open externally": the current standalone document, if any.
    Export { reply: oneshot::Sender<Option<String>> },
    /// Fix hand-off payload; `None` when there are no error entries.
    RequestFix { reply: oneshot::Sender<Option<FixRequest>> },
    Shutdown,
}

/// Events for the host UI.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A fresh sandbox instance mounted this document. The handle is what
    /// the embedding layer posts bridge messages through.
    Rendered {
        instance: Uuid,
        document: String,
        kind: DocumentKind,
        handle: SandboxHandle,
    },
    RefreshState(RefreshState),
    Log(LogEntry),
    DiagnosticsCleared,
    Hover(Option<HoverInfo>),
    Selection(Option<SelectionInfo>),
    Viewport(ViewportState),
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshState {
    pub auto_refresh_enabled: bool,
    pub is_refreshing: bool,
    pub last_updated_at: Option<DateTime<Utc>>,
}

pub struct PreviewEngine {
    cfg: EngineConfig,
    files: FileMap,
    select_mode: bool,
    auto_refresh: bool,
    viewport: ViewportState,
    /// Edits arrived that have not been rendered yet.
    dirty: bool,
    /// Debounce deadline; `Some` only while in the Debouncing state.
    deadline: Option<Instant>,
    diagnostics: DiagnosticBuffer,
    hover: Option<HoverInfo>,
    selection: Option<SelectionInfo>,
    last_updated_at: Option<DateTime<Utc>>,
    sandbox: SandboxHost,
    inbound_rx: mpsc::Receiver<InboundEnvelope>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
}

impl PreviewEngine {
    pub fn new(
        files: FileMap,
        cfg: EngineConfig,
    ) -> (
        PreviewEngine,
        mpsc::Sender<EngineCommand>,
        mpsc::UnboundedReceiver<EngineEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (sandbox, inbound_rx) = SandboxHost::new();
        let engine = PreviewEngine {
            auto_refresh: cfg.auto_refresh,
            diagnostics: DiagnosticBuffer::new(cfg.log_capacity),
            cfg,
            files,
            select_mode: false,
            viewport: ViewportState::default(),
            dirty: false,
            deadline: None,
            hover: None,
            selection: None,
            last_updated_at: None,
            sandbox,
            inbound_rx,
            cmd_rx,
            event_tx,
        };
        (engine, cmd_tx, event_rx)
    }

    /// Runs until `Shutdown` or until every command sender drops. Mounts an
    /// initial render first so the surface is never blank.
    pub async fn run(mut self) {
        self.refresh();
        loop {
            let deadline = self.deadline;
            tokio::select! {
                _ = debounce_sleep(deadline) => {
                    self.deadline = None;
                    self.refresh();
                }
                cmd = self.cmd_rx.recv() => match cmd {
                    None | Some(EngineCommand::Shutdown) => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                envelope = self.inbound_rx.recv() => {
                    if let Some(envelope) = envelope {
                        self.handle_envelope(envelope);
                    }
                }
            }
        }
        self.sandbox.teardown();
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::UpdateFiles(files) => self.update_files(files),
            EngineCommand::ManualRefresh => {
                self.deadline = None;
                self.diagnostics.clear();
                self.emit(EngineEvent::DiagnosticsCleared);
                self.clear_selection();
                self.refresh();
            }
            EngineCommand::SetAutoRefresh(enabled) => {
                self.auto_refresh = enabled;
                if !enabled {
                    // Suspend a pending Debouncing→Refreshing transition.
                    self.deadline = None;
                } else if self.dirty {
                    self.arm_debounce();
                }
                self.emit(EngineEvent::RefreshState(self.refresh_state(false)));
            }
            EngineCommand::SetSelectMode(enabled) => {
                if enabled == self.select_mode {
                    return;
                }
                self.select_mode = enabled;
                if !enabled {
                    self.clear_selection();
                    if self.hover.take().is_some() {
                        self.emit(EngineEvent::Hover(None));
                    }
                }
                self.deadline = None;
                self.refresh();
            }
            EngineCommand::SetDevicePreset(name) => match DevicePreset::by_name(&name) {
                Some(preset) => {
                    self.viewport.set_preset(*preset);
                    self.emit(EngineEvent::Viewport(self.viewport));
                    self.deadline = None;
                    self.refresh();
                }
                None => tracing::warn!(preset = %name, "ignoring unknown device preset"),
            },
            EngineCommand::FlipOrientation => {
                self.viewport.flip();
                self.emit(EngineEvent::Viewport(self.viewport));
            }
            EngineCommand::SetScale(scale) => {
                self.viewport.set_scale(scale);
                self.emit(EngineEvent::Viewport(self.viewport));
            }
            EngineCommand::ClearDiagnostics => {
                self.diagnostics.clear();
                self.emit(EngineEvent::DiagnosticsCleared);
            }
            EngineCommand::Export { reply } => {
                let _ = reply.send(self.sandbox.live().map(|live| live.document.clone()));
            }
            EngineCommand::RequestFix { reply } => {
                let _ = reply.send(self.diagnostics.handoff(&self.files));
            }
            EngineCommand::Shutdown => unreachable!("handled by the run loop"),
        }
    }

    fn update_files(&mut self, files: FileMap) {
        // A selection pointing at a file that just changed (or vanished) is
        // stale; drop it rather than report a line that may not exist.
        if let Some(selection) = &self.selection {
            if self.files.get(&selection.source_file) != files.get(&selection.source_file) {
                self.clear_selection();
            }
        }
        self.files = files;
        self.dirty = true;
        if self.auto_refresh {
            self.arm_debounce();
        }
    }

    /// (Re)starts the quiet-period timer; each edit inside the window
    /// pushes the refresh out again.
    fn arm_debounce(&mut self) {
        self.deadline = Some(Instant::now() + self.cfg.debounce);
    }

    /// One full Refreshing cycle: recompose, install bridges, destroy and
    /// recreate the sandbox instance.
    fn refresh(&mut self) {
        self.emit(EngineEvent::RefreshState(self.refresh_state(true)));
        let composed = compose(&self.files, self.select_mode);
        let document = install_bridges(&composed, self.select_mode);
        let handle = self.sandbox.render(document.clone());
        // Hover never survives an instance swap.
        if self.hover.take().is_some() {
            self.emit(EngineEvent::Hover(None));
        }
        self.dirty = false;
        self.last_updated_at = Some(Utc::now());
        let instance = handle.instance();
        tracing::info!(%instance, kind = ?composed.kind, "preview refreshed");
        self.emit(EngineEvent::Rendered {
            instance,
            document,
            kind: composed.kind,
            handle,
        });
        self.emit(EngineEvent::RefreshState(self.refresh_state(false)));
    }

    fn handle_envelope(&mut self, envelope: InboundEnvelope) {
        if !self.sandbox.accepts(envelope.instance) {
            tracing::debug!(instance = %envelope.instance, "dropping message from torn-down instance");
            return;
        }
        let message = match protocol::decode(envelope.payload) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(%err, "dropping unrecognized bridge message");
                return;
            }
        };
        match message {
            BridgeMessage::Console { log_kind, message } => {
                let entry = LogEntry::now(log_kind, message);
                self.diagnostics.append(entry.clone());
                self.emit(EngineEvent::Log(entry));
            }
            BridgeMessage::ElementHover {
                source_file,
                source_line,
                tag_name,
            } => {
                self.hover = match (source_file, source_line, tag_name) {
                    (Some(source_file), Some(source_line), Some(tag_name)) => Some(HoverInfo {
                        source_file,
                        source_line,
                        tag_name,
                    }),
                    _ => None,
                };
                self.emit(EngineEvent::Hover(self.hover.clone()));
            }
            BridgeMessage::ElementSelect {
                source_file,
                source_line,
                tag_name,
                element_path,
                snippet_preview,
            } => {
                self.selection = Some(SelectionInfo {
                    source_file,
                    source_line,
                    tag_name,
                    element_path,
                    snippet_preview: truncate_chars(&snippet_preview, self.cfg.snippet_limit),
                });
                self.emit(EngineEvent::Selection(self.selection.clone()));
            }
        }
    }

    fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.emit(EngineEvent::Selection(None));
        }
    }

    fn refresh_state(&self, is_refreshing: bool) -> RefreshState {
        RefreshState {
            auto_refresh_enabled: self.auto_refresh,
            is_refreshing,
            last_updated_at: self.last_updated_at,
        }
    }

    fn emit(&self, event: EngineEvent) {
        // The host dropping its receiver just means nobody is listening;
        // the loop still exits via the command channel.
        let _ = self.event_tx.send(event);
    }
}

async fn debounce_sleep(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Char-boundary-safe prefix of at most `limit` characters.
fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}
