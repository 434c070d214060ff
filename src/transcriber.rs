use std::path::PathBuf;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::model::ModelSize;

/// Directory for model storage: ~/.local/share/whisper-desk/models/
fn models_dir() -> PathBuf {
    let mut p = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("whisper-desk");
    p.push("models");
    p
}

pub fn model_path(size: ModelSize) -> PathBuf {
    models_dir().join(size.filename())
}

/// Check whether the model file for `size` has already been downloaded.
pub fn model_exists(size: ModelSize) -> bool {
    model_path(size).exists()
}

/// Download the GGML model for `size`, sending progress events via the
/// provided callback. `on_progress(bytes_downloaded, total_bytes)` — total
/// may be 0 if unknown.
pub async fn download_model<F>(
    size: ModelSize,
    on_progress: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Fn(u64, u64) + Send + 'static,
{
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let dir = models_dir();
    tokio::fs::create_dir_all(&dir).await?;

    let response = reqwest::get(size.download_url()).await?.error_for_status()?;
    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let path = model_path(size);
    let mut file = tokio::fs::File::create(&path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        on_progress(downloaded, total);
    }

    file.flush().await?;
    log::info!("Model {size} downloaded to {}", path.display());
    Ok(())
}

/// Load the whisper model for `size` from disk. This is CPU-heavy; call from
/// a blocking context.
pub fn load_model(
    size: ModelSize,
) -> Result<WhisperContext, Box<dyn std::error::Error + Send + Sync>> {
    let path = model_path(size);
    let ctx = WhisperContext::new_with_params(
        path.to_str().ok_or("Invalid model path")?,
        WhisperContextParameters::default(),
    )
    .map_err(|e| format!("Failed to load whisper model {size}: {e}"))?;
    log::info!("Whisper model {size} loaded");
    Ok(ctx)
}

/// Transcribe audio samples (16kHz mono f32). CPU-heavy — call from
/// `spawn_blocking`. Language is auto-detected by the model.
pub fn transcribe(
    ctx: &WhisperContext,
    samples: &[f32],
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let mut state = ctx
        .create_state()
        .map_err(|e| format!("State error: {e}"))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some("auto"));
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    let cpus = std::thread::available_parallelism()
        .map(|n| n.get() as i32)
        .unwrap_or(4);
    params.set_n_threads(cpus);

    state
        .full(params, samples)
        .map_err(|e| format!("Transcription failed: {e}"))?;

    let mut text = String::new();
    for segment in state.as_iter() {
        // WhisperSegment implements Display
        let seg_text = format!("{segment}");
        text.push_str(&seg_text);
        text.push(' ');
    }

    Ok(text.trim().to_string())
}
