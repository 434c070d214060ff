use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::ModelSize;

/// One transcription request: a media file plus the model preset to run it
/// through. Immutable once dispatched to the worker.
#[derive(Debug, Clone)]
pub struct Job {
    pub file_path: PathBuf,
    pub model: ModelSize,
}

impl Job {
    /// Validate user input into a dispatchable job. Fails if no file was
    /// selected or the selection no longer exists on disk.
    pub fn new(file_path: Option<PathBuf>, model: ModelSize) -> Result<Self, String> {
        let file_path = file_path.ok_or("Select an audio or video file first")?;
        if !file_path.is_file() {
            return Err(format!("File not found: {}", file_path.display()));
        }
        Ok(Self { file_path, model })
    }
}

/// Terminal outcome of a job. Produced exactly once by the worker and
/// consumed exactly once by the controller.
#[derive(Debug, Clone)]
pub enum JobResult {
    Success {
        transcript: String,
        output_path: PathBuf,
        elapsed: Duration,
    },
    Failure {
        message: String,
    },
}

/// Transcript destination: the input's base name with a `.txt` extension,
/// in the same directory.
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension("txt")
}

/// Write the transcript, silently overwriting any previous one.
pub fn write_transcript(
    path: &Path,
    text: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    fs::write(path, text)
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_lands_next_to_input() {
        assert_eq!(
            output_path_for(Path::new("/tmp/talks/sample.mp3")),
            PathBuf::from("/tmp/talks/sample.txt")
        );
        assert_eq!(
            output_path_for(Path::new("meeting.recording.m4a")),
            PathBuf::from("meeting.recording.txt")
        );
        assert_eq!(
            output_path_for(Path::new("/tmp/noext")),
            PathBuf::from("/tmp/noext.txt")
        );
    }

    #[test]
    fn transcript_round_trips_utf8() {
        let path = std::env::temp_dir().join("whisper-desk-test-transcript.txt");
        let text = "hello world — καλημέρα, 日本語もOK";

        write_transcript(&path, text).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), text);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn existing_transcript_is_overwritten() {
        let path = std::env::temp_dir().join("whisper-desk-test-overwrite.txt");
        write_transcript(&path, "old").unwrap();
        write_transcript(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn job_requires_a_selection() {
        let err = Job::new(None, ModelSize::Base).unwrap_err();
        assert!(err.contains("Select"));
    }

    #[test]
    fn job_requires_an_existing_file() {
        let missing = PathBuf::from("/definitely/not/here.mp3");
        let err = Job::new(Some(missing), ModelSize::Base).unwrap_err();
        assert!(err.contains("not found"));
    }
}
