use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use super::state::{set_controls_busy, update_status, AppState, AppStatus, BackendEvent};
use crate::job::JobResult;

/// Handle a backend event. This is the core state machine.
pub fn handle_backend_event(state: &Rc<RefCell<AppState>>, event: BackendEvent) {
    match event {
        BackendEvent::JobProgress(message) => {
            let mut s = state.borrow_mut();
            // The download phase, if any, is over once the worker speaks up.
            let download_finished = s.status == AppStatus::ModelDownloading;
            if download_finished {
                s.status = AppStatus::Running;
            }
            if let Some(ref win) = s.window {
                if download_finished {
                    // Pulsing doesn't reset the bar text on its own.
                    win.progress_bar.set_text(Some("Working..."));
                }
                win.status_label.set_text(&message);
            }
        }
        BackendEvent::ModelDownloadProgress(downloaded, total) => {
            let mut s = state.borrow_mut();
            s.status = AppStatus::ModelDownloading;
            if let Some(ref win) = s.window {
                if total > 0 {
                    win.progress_bar
                        .set_fraction(downloaded as f64 / total as f64);
                    let mb_done = downloaded as f64 / 1_048_576.0;
                    let mb_total = total as f64 / 1_048_576.0;
                    win.progress_bar.set_text(Some(&format!(
                        "Downloading model: {mb_done:.1} / {mb_total:.1} MB"
                    )));
                } else {
                    win.progress_bar.pulse();
                }
            }
        }
        BackendEvent::JobFinished(result) => on_job_finished(state, result),
    }
}

/// The single point where a job's lifecycle ends.
fn on_job_finished(state: &Rc<RefCell<AppState>>, result: JobResult) {
    {
        let mut s = state.borrow_mut();
        if let Some(source) = s.pulse_source.take() {
            source.remove();
        }
        if let Some(ref win) = s.window {
            win.progress_bar.set_visible(false);
        }
    }
    set_controls_busy(state, false);

    match result {
        JobResult::Success {
            transcript,
            output_path,
            elapsed,
        } => {
            {
                let mut s = state.borrow_mut();
                s.transcript = transcript;
                if let Some(ref win) = s.window {
                    win.transcript_view.buffer().set_text(&s.transcript);
                }
            }
            update_status(
                state,
                AppStatus::Idle,
                &format!(
                    "Transcription finished in {:.2}s — saved to {}",
                    elapsed.as_secs_f64(),
                    output_path.display()
                ),
            );
        }
        JobResult::Failure { message } => {
            log::error!("Job failed: {message}");
            // Transcript view keeps whatever the previous run produced.
            update_status(state, AppStatus::Idle, &format!("Error: {message}"));
        }
    }
}
