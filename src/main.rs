mod app;
mod config;
mod decoder;
mod job;
mod model;
mod transcriber;
mod ui;
mod worker;

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;
use libadwaita::prelude::*;

use app::{AppState, AppStatus, BackendEvent};
use job::Job;
use model::ModelSize;

fn main() {
    env_logger::init();
    log::info!("Whisper Desk starting");

    let application = libadwaita::Application::builder()
        .application_id("com.github.whisper-desk")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

fn on_activate(app: &libadwaita::Application) {
    // Async channel for backend → UI communication
    let (backend_tx, backend_rx) = async_channel::unbounded::<BackendEvent>();

    let state = Rc::new(RefCell::new(AppState::new(backend_tx)));

    let window = ui::window::build_window(app, state.borrow().selected_model);
    register_app_actions(app, &window.window);

    // Wire up the file picker
    {
        let state_clone = state.clone();
        let parent = window.window.clone();
        let file_row = window.file_row.clone();
        window.browse_button.connect_clicked(move |_| {
            let state_inner = state_clone.clone();
            let file_row = file_row.clone();
            ui::window::media_file_dialog().open(
                Some(&parent),
                gtk4::gio::Cancellable::NONE,
                move |result| match result {
                    Ok(file) => {
                        if let Some(path) = file.path() {
                            log::info!("Selected {}", path.display());
                            file_row.set_subtitle(&path.display().to_string());
                            state_inner.borrow_mut().selected_file = Some(path);
                        }
                    }
                    // Cancelled dialogs land here too; nothing to do.
                    Err(e) => log::debug!("File dialog closed without selection: {e}"),
                },
            );
        });
    }

    // Wire up model size selection
    {
        let state_clone = state.clone();
        window.model_row.connect_selected_notify(move |row| {
            let Some(size) = ModelSize::ALL.get(row.selected() as usize).copied() else {
                return;
            };
            let mut s = state_clone.borrow_mut();
            s.selected_model = size;
            s.config.default_model = size;
            if let Err(e) = s.config.save() {
                log::warn!("Failed to save config: {e}");
            }
        });
    }

    // Wire up the start button
    {
        let state_clone = state.clone();
        window.start_button.connect_clicked(move |_| {
            on_start_transcription(&state_clone);
        });
    }

    // Store UI handles in state and show the window
    state.borrow_mut().window = Some(window);
    state.borrow().window.as_ref().unwrap().window.present();

    // Attach backend event handler
    {
        let state_clone = state.clone();
        glib::spawn_future_local(async move {
            while let Ok(event) = backend_rx.recv().await {
                app::handle_backend_event(&state_clone, event);
            }
        });
    }
}

/// Validate the current selection and dispatch a job. Returns immediately;
/// everything slow happens off the GTK thread.
fn on_start_transcription(state: &Rc<RefCell<AppState>>) {
    if state.borrow().status != AppStatus::Idle {
        log::info!("Ignoring start while a job is already in flight");
        return;
    }

    let (selected_file, selected_model) = {
        let s = state.borrow();
        (s.selected_file.clone(), s.selected_model)
    };

    let job = match Job::new(selected_file, selected_model) {
        Ok(job) => job,
        Err(message) => {
            app::update_status(state, AppStatus::Idle, &message);
            return;
        }
    };

    // Clear the previous run's output and switch the window into busy mode.
    {
        let mut s = state.borrow_mut();
        s.transcript.clear();
        if let Some(ref win) = s.window {
            win.transcript_view.buffer().set_text("");
            win.progress_bar.set_visible(true);
            win.progress_bar.set_fraction(0.0);
            win.progress_bar.set_text(Some("Working..."));
        }
    }
    app::set_controls_busy(state, true);
    app::update_status(state, AppStatus::Running, "Starting transcription...");
    start_progress_pulse(state);

    app::dispatch_job(state, job);
}

/// Pulse the progress bar while the job runs. The model-download phase drives
/// the bar with real fractions instead, so only pulse in `Running`.
fn start_progress_pulse(state: &Rc<RefCell<AppState>>) {
    let state_clone = state.clone();
    let source = glib::timeout_add_local(std::time::Duration::from_millis(120), move || {
        let s = state_clone.borrow();
        if s.status == AppStatus::Running {
            if let Some(ref win) = s.window {
                win.progress_bar.pulse();
            }
        }
        glib::ControlFlow::Continue
    });
    state.borrow_mut().pulse_source = Some(source);
}

fn register_app_actions(app: &libadwaita::Application, window: &libadwaita::ApplicationWindow) {
    let quit = gtk4::gio::SimpleAction::new("quit", None);
    {
        let app_clone = app.clone();
        quit.connect_activate(move |_, _| app_clone.quit());
    }
    app.add_action(&quit);

    let about = gtk4::gio::SimpleAction::new("about", None);
    {
        let window = window.clone();
        about.connect_activate(move |_, _| {
            let dialog = libadwaita::AboutDialog::builder()
                .application_name("Whisper Desk")
                .version(env!("CARGO_PKG_VERSION"))
                .comments("Transcribe audio and video files locally with Whisper")
                .license_type(gtk4::License::MitX11)
                .build();
            dialog.present(Some(&window));
        });
    }
    app.add_action(&about);
}
