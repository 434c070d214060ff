use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use whisper_rs::WhisperContext;

/// Whisper model-size preset. Bigger is slower and more accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelSize {
    Base,
    Small,
    Medium,
    LargeV2,
}

impl ModelSize {
    /// All presets, in the order the dropdown shows them.
    pub const ALL: [ModelSize; 4] = [
        ModelSize::Base,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::LargeV2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::LargeV2 => "large-v2",
        }
    }

    /// GGML model file name as published by the whisper.cpp project.
    pub fn filename(&self) -> &'static str {
        match self {
            ModelSize::Base => "ggml-base.bin",
            ModelSize::Small => "ggml-small.bin",
            ModelSize::Medium => "ggml-medium.bin",
            ModelSize::LargeV2 => "ggml-large-v2.bin",
        }
    }

    pub fn download_url(&self) -> String {
        format!(
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
            self.filename()
        )
    }
}

impl Default for ModelSize {
    // The best accuracy/speed trade-off on CPU.
    fn default() -> Self {
        ModelSize::Medium
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large-v2" => Ok(ModelSize::LargeV2),
            other => Err(format!("unknown model size: {other}")),
        }
    }
}

/// Process-wide whisper context, keyed by the size it was loaded for.
/// Loading a multi-hundred-MB model takes seconds, so the context is kept
/// across jobs and only replaced when the user picks a different preset.
static MODEL_CACHE: Mutex<Option<(ModelSize, Arc<WhisperContext>)>> = Mutex::new(None);

/// Fetch the whisper context for `size`, loading it from disk on a cache miss.
/// CPU-heavy on a miss; call from a blocking context.
pub fn cached_context(
    size: ModelSize,
) -> Result<Arc<WhisperContext>, Box<dyn std::error::Error + Send + Sync>> {
    let mut cache = MODEL_CACHE
        .lock()
        .map_err(|_| "model cache poisoned by an earlier panic")?;

    if let Some((cached_size, ctx)) = cache.as_ref() {
        if *cached_size == size {
            return Ok(ctx.clone());
        }
        log::info!("Evicting cached {cached_size} model for {size}");
    }

    let ctx = Arc::new(crate::transcriber::load_model(size)?);
    *cache = Some((size, ctx.clone()));
    Ok(ctx)
}
