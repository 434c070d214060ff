use std::path::PathBuf;

use gtk4::glib;
use gtk4::prelude::*;

use crate::config::Config;
use crate::job::JobResult;
use crate::model::ModelSize;
use crate::ui::window::WindowWidgets;

/// Events sent from background tasks to the GTK main thread.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// Status line from the running job. Presentational only.
    JobProgress(String),
    /// The single terminal message of a job.
    JobFinished(JobResult),
    ModelDownloadProgress(u64, u64),
}

/// Application status. `Idle` is the only state from which a job may start.
#[derive(Debug, Clone, PartialEq)]
pub enum AppStatus {
    Idle,
    ModelDownloading,
    Running,
}

/// Central application state. Lives on the GTK main thread inside Rc<RefCell<>>.
pub struct AppState {
    pub status: AppStatus,
    pub config: Config,
    pub selected_file: Option<PathBuf>,
    pub selected_model: ModelSize,
    pub transcript: String,
    pub tokio_rt: tokio::runtime::Runtime,
    pub backend_sender: async_channel::Sender<BackendEvent>,

    /// Pulse timer for the indeterminate progress bar while a job runs.
    pub pulse_source: Option<glib::SourceId>,

    // UI handles
    pub window: Option<WindowWidgets>,
}

impl AppState {
    pub fn new(sender: async_channel::Sender<BackendEvent>) -> Self {
        let config = Config::load();
        let selected_model = config.default_model;
        let tokio_rt = tokio::runtime::Runtime::new()
            .expect("Failed to create tokio runtime");

        Self {
            status: AppStatus::Idle,
            config,
            selected_file: None,
            selected_model,
            transcript: String::new(),
            tokio_rt,
            backend_sender: sender,
            pulse_source: None,
            window: None,
        }
    }
}

/// Helper to update status label and state.
pub fn update_status(
    state: &std::rc::Rc<std::cell::RefCell<AppState>>,
    status: AppStatus,
    label_text: &str,
) {
    let mut s = state.borrow_mut();
    s.status = status;
    if let Some(ref win) = s.window {
        win.status_label.set_text(label_text);
    }
}

/// Enable or disable the input widgets while a job is in flight.
pub fn set_controls_busy(state: &std::rc::Rc<std::cell::RefCell<AppState>>, busy: bool) {
    let s = state.borrow();
    if let Some(ref win) = s.window {
        win.browse_button.set_sensitive(!busy);
        win.model_row.set_sensitive(!busy);
        win.start_button.set_sensitive(!busy);
        win.start_button
            .set_label(if busy { "Processing..." } else { "Start Transcription" });
    }
}
