use std::time::Instant;

use crate::job::{output_path_for, write_transcript, Job, JobResult};

/// Run a job to completion on the blocking pool. Every internal error is
/// converted into a `JobResult::Failure` here; nothing past this boundary
/// may panic the worker or leave the controller waiting forever.
///
/// `progress` carries human-readable status lines back to the UI.
pub fn run<F>(job: Job, progress: F) -> JobResult
where
    F: Fn(String),
{
    match run_inner(&job, &progress) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Job for {} failed: {e}", job.file_path.display());
            JobResult::Failure {
                message: e.to_string(),
            }
        }
    }
}

fn run_inner<F>(
    job: &Job,
    progress: &F,
) -> Result<JobResult, Box<dyn std::error::Error + Send + Sync>>
where
    F: Fn(String),
{
    // Re-checked here: the file may have vanished between selection and start.
    if !job.file_path.is_file() {
        return Err(format!("File not found: {}", job.file_path.display()).into());
    }

    progress(format!("Loading whisper model: {}...", job.model));
    let ctx = crate::model::cached_context(job.model)?;

    progress(format!("Decoding {}...", job.file_path.display()));
    let samples = crate::decoder::decode_samples(&job.file_path)?;

    progress("Transcribing... this can take a while for long files".to_string());
    let start = Instant::now();
    let transcript = crate::transcriber::transcribe(&ctx, &samples)?;
    let elapsed = start.elapsed();

    let output_path = output_path_for(&job.file_path);
    write_transcript(&output_path, &transcript)?;
    log::info!(
        "Transcribed {} in {:.2}s, saved to {}",
        job.file_path.display(),
        elapsed.as_secs_f64(),
        output_path.display()
    );

    Ok(JobResult::Success {
        transcript,
        output_path,
        elapsed,
    })
}
