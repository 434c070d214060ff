mod event_handler;
mod pipeline;
mod state;

pub use event_handler::handle_backend_event;
pub use pipeline::dispatch_job;
pub use state::{set_controls_busy, update_status, AppState, AppStatus, BackendEvent};
