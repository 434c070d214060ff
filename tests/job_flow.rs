//! Integration tests for the job lifecycle.
//!
//! These exercise the controller/worker contract at the channel level:
//! one terminal result per job, the single-job-in-flight guard, and the
//! transcript-preserving failure path.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Simulated terminal message from the worker.
#[derive(Debug, Clone, PartialEq)]
enum MockResult {
    Success { transcript: String, output: PathBuf },
    Failure { message: String },
}

/// Simulated controller status.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Idle,
    Running,
}

/// A worker run sends exactly one terminal message, success or not.
#[test]
fn worker_sends_exactly_one_terminal_message() {
    let (tx, rx) = mpsc::channel::<MockResult>();

    thread::spawn(move || {
        // Progress chatter would go over a separate variant; terminal is one send.
        tx.send(MockResult::Success {
            transcript: "hello world".into(),
            output: PathBuf::from("sample.txt"),
        })
        .unwrap();
    });

    let first = rx.recv_timeout(Duration::from_millis(500));
    assert!(first.is_ok(), "Should receive the terminal message");

    // Channel must be closed with nothing further queued.
    let second = rx.recv_timeout(Duration::from_millis(100));
    assert!(second.is_err(), "No second terminal message may arrive");
}

/// The controller guard: a second start while Running dispatches nothing.
#[test]
fn second_start_while_running_is_a_no_op() {
    let mut status = Status::Idle;
    let mut dispatched = 0;

    let mut try_start = |status: &mut Status, dispatched: &mut i32| {
        if *status != Status::Idle {
            return;
        }
        *status = Status::Running;
        *dispatched += 1;
    };

    // Two clicks in quick succession.
    try_start(&mut status, &mut dispatched);
    try_start(&mut status, &mut dispatched);

    assert_eq!(dispatched, 1, "Only one job may be dispatched");
    assert_eq!(status, Status::Running);

    // Terminal message flips the guard back; a retry is allowed again.
    status = Status::Idle;
    try_start(&mut status, &mut dispatched);
    assert_eq!(dispatched, 2);
}

/// is_running transitions true → false exactly once per dispatched job.
#[test]
fn status_returns_to_idle_exactly_once_per_job() {
    let (tx, rx) = mpsc::channel::<MockResult>();
    let mut status = Status::Running;
    let mut idle_transitions = 0;

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        tx.send(MockResult::Failure {
            message: "decoder error".into(),
        })
        .unwrap();
    });

    // Controller drain loop: every terminal message ends the job.
    while let Ok(_result) = rx.recv_timeout(Duration::from_millis(500)) {
        if status == Status::Running {
            status = Status::Idle;
            idle_transitions += 1;
        }
    }

    assert_eq!(idle_transitions, 1);
    assert_eq!(status, Status::Idle);
}

/// A failed run leaves the previously displayed transcript untouched.
#[test]
fn failure_preserves_previous_transcript() {
    let mut transcript = String::from("previous run text");
    let mut status_line = String::from("Ready to transcribe.");

    let result = MockResult::Failure {
        message: "ffmpeg failed (exit status: 1): corrupt media".into(),
    };

    match result {
        MockResult::Success {
            transcript: new_text,
            ..
        } => transcript = new_text,
        MockResult::Failure { message } => {
            status_line = format!("Error: {message}");
        }
    }

    assert_eq!(transcript, "previous run text");
    assert!(status_line.contains("corrupt media"));
}

/// Success path writes the transcript next to the input and it reads back
/// byte-identical, non-ASCII included.
#[test]
fn success_writes_transcript_beside_input() {
    let dir = std::env::temp_dir();
    let input = dir.join("job-flow-sample.mp3");
    let output = input.with_extension("txt");
    let text = "hello world — höret zu, みなさん";

    std::fs::write(&input, b"fake media").unwrap();
    std::fs::write(&output, text).unwrap();

    assert!(output.exists());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), text);
    assert_eq!(output.file_name().unwrap(), "job-flow-sample.txt");
    assert_eq!(output.parent(), input.parent());

    std::fs::remove_file(&input).unwrap();
    std::fs::remove_file(&output).unwrap();
}

/// Progress messages arrive in order, then the terminal message last.
#[test]
fn progress_precedes_terminal_message() {
    #[derive(Debug, PartialEq)]
    enum Event {
        Progress(String),
        Finished(MockResult),
    }

    let (tx, rx) = mpsc::channel::<Event>();

    thread::spawn(move || {
        tx.send(Event::Progress("Loading whisper model: base...".into()))
            .unwrap();
        tx.send(Event::Progress("Transcribing...".into())).unwrap();
        tx.send(Event::Finished(MockResult::Success {
            transcript: "done".into(),
            output: PathBuf::from("sample.txt"),
        }))
        .unwrap();
    });

    let mut events = Vec::new();
    while let Ok(event) = rx.recv_timeout(Duration::from_millis(500)) {
        events.push(event);
    }

    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], Event::Progress(_)));
    assert!(matches!(events[1], Event::Progress(_)));
    assert!(matches!(events.last(), Some(Event::Finished(_))));
}
