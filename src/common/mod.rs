pub mod dates;
pub mod envelope;
pub mod extract;
pub mod patch;
mod state;

pub use envelope::{Envelope, EnvelopeSchema, Status};
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use state::AppState;
