//! Medicare Max HTTP client: performs the router's API effects off the UI
//! thread and reports completions back over a channel.
mod client;
mod codec;
mod handle;
mod persist;
mod settings;

pub use client::{ApiClient, ReqwestApiClient};
pub use codec::{decode_response, encode_body};
pub use handle::{ApiHandle, Completion, StartError};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use settings::ClientSettings;
