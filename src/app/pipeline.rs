use std::cell::RefCell;
use std::rc::Rc;

use super::state::{AppState, BackendEvent};
use crate::job::{Job, JobResult};

/// Dispatch a job on the tokio runtime: fetch the model file if needed, then
/// run the blocking worker. Exactly one `JobFinished` comes back per call,
/// whatever happens in between.
pub fn dispatch_job(state: &Rc<RefCell<AppState>>, job: Job) {
    log::info!(
        "Dispatching job: {} with model {}",
        job.file_path.display(),
        job.model
    );
    let sender = state.borrow().backend_sender.clone();

    state.borrow().tokio_rt.spawn(async move {
        // Download first so the blocking worker never touches the network.
        if !crate::transcriber::model_exists(job.model) {
            let progress_sender = sender.clone();
            let download = crate::transcriber::download_model(job.model, move |done, total| {
                let _ = progress_sender
                    .try_send(BackendEvent::ModelDownloadProgress(done, total));
            })
            .await;

            if let Err(e) = download {
                let _ = sender
                    .send(BackendEvent::JobFinished(JobResult::Failure {
                        message: format!("Model download failed: {e}"),
                    }))
                    .await;
                return;
            }
        }

        let progress_sender = sender.clone();
        let result = tokio::task::spawn_blocking(move || {
            crate::worker::run(job, move |message| {
                let _ = progress_sender.try_send(BackendEvent::JobProgress(message));
            })
        })
        .await;

        let terminal = match result {
            Ok(result) => result,
            Err(e) => JobResult::Failure {
                message: format!("Transcription task panicked: {e}"),
            },
        };
        let _ = sender.send(BackendEvent::JobFinished(terminal)).await;
    });
}
