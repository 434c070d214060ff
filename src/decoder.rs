use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Decode a media file into the 16kHz mono f32 samples whisper expects.
///
/// WAV files already in that shape are read directly with hound; everything
/// else goes through an `ffmpeg` subprocess into a temporary WAV first.
pub fn decode_samples(
    input: &Path,
) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(samples) = try_read_wav(input)? {
        return Ok(samples);
    }

    let tmp = temp_wav_path();
    let result = run_ffmpeg(input, &tmp).and_then(|()| read_wav(&tmp));
    if tmp.exists() {
        if let Err(e) = std::fs::remove_file(&tmp) {
            log::warn!("Failed to remove temp file {}: {e}", tmp.display());
        }
    }
    result
}

/// Fast path: a WAV file that is already 16kHz mono needs no ffmpeg.
/// Returns Ok(None) when the file is not such a WAV.
fn try_read_wav(
    input: &Path,
) -> Result<Option<Vec<f32>>, Box<dyn std::error::Error + Send + Sync>> {
    let is_wav = input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);
    if !is_wav {
        return Ok(None);
    }

    let reader = match hound::WavReader::open(input) {
        Ok(r) => r,
        // Could be a mislabeled or exotic WAV; let ffmpeg have a go at it.
        Err(e) => {
            log::warn!("hound could not open {}: {e}", input.display());
            return Ok(None);
        }
    };

    let spec = reader.spec();
    if spec.sample_rate != 16_000 || spec.channels != 1 {
        return Ok(None);
    }

    // Only 16-bit int and 32-bit float read straight into f32 here; wider
    // (and narrower) int formats go through ffmpeg like any other media file.
    let readable = match spec.sample_format {
        hound::SampleFormat::Int => spec.bits_per_sample == 16,
        hound::SampleFormat::Float => spec.bits_per_sample == 32,
    };
    if !readable {
        return Ok(None);
    }

    read_decoded(reader).map(Some)
}

/// Read a WAV that is known to be 16kHz mono (the ffmpeg output).
fn read_wav(path: &Path) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| format!("Failed to read decoded audio: {e}"))?;
    read_decoded(reader)
}

fn read_decoded<R: std::io::Read>(
    mut reader: hound::WavReader<R>,
) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Bad audio sample: {e}"))?,
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Bad audio sample: {e}"))?,
    };

    if samples.is_empty() {
        return Err("Decoded audio contains no samples".into());
    }
    Ok(samples)
}

fn temp_wav_path() -> PathBuf {
    std::env::temp_dir().join(format!("whisper-desk-{}.wav", std::process::id()))
}

/// Convert `input` to 16kHz mono s16 WAV at `output` via ffmpeg.
fn run_ffmpeg(
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    log::info!("Decoding {} via ffmpeg", input.display());

    let result = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
        .arg(input)
        .args(["-ac", "1", "-ar", "16000", "-c:a", "pcm_s16le"])
        .arg(output)
        .output();

    let out = match result {
        Ok(out) => out,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(
                "ffmpeg not found — install FFmpeg and make sure it is on PATH".into(),
            );
        }
        Err(e) => return Err(format!("Failed to run ffmpeg: {e}").into()),
    };

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        let tail = stderr.lines().last().unwrap_or("no error output");
        return Err(format!("ffmpeg failed ({}): {tail}", out.status).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn conforming_wav_skips_ffmpeg() {
        let path = std::env::temp_dir().join("whisper-desk-test-16k.wav");
        write_test_wav(&path, 16_000, 1, &[0, i16::MAX, i16::MIN, 1234]);

        let samples = try_read_wav(&path).unwrap().expect("fast path should apply");
        assert_eq!(samples.len(), 4);
        assert!((samples[1] - 1.0).abs() < 1e-6);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn non_conforming_wav_falls_through() {
        let path = std::env::temp_dir().join("whisper-desk-test-44k.wav");
        write_test_wav(&path, 44_100, 2, &[0, 0, 0, 0]);

        assert!(try_read_wav(&path).unwrap().is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn wide_int_wav_falls_through() {
        let path = std::env::temp_dir().join("whisper-desk-test-24bit.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 24,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [0i32, 1 << 20, -(1 << 20)] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        // 16kHz mono, but 24-bit: not an error, just not the fast path.
        assert!(try_read_wav(&path).unwrap().is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn non_wav_extension_falls_through() {
        assert!(try_read_wav(Path::new("talk.mp3")).unwrap().is_none());
    }
}
