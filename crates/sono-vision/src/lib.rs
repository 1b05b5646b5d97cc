//! SonoVision — image normalization and vision-model dispatch for ultrasound scans.

pub mod dispatcher;
pub mod normalize;
pub mod prompts;
pub mod provider;
pub mod query;
pub mod stage;
pub mod types;

pub use dispatcher::{parse_identification, FailurePolicy, VisionDispatcher};
pub use normalize::{decode, decode_base64, decode_bytes, encode_jpeg, to_data_url, ImageSource};
pub use provider::{ChatCompletionsProvider, ProviderConfig, VisionProvider};
pub use query::VisionQuery;
pub use stage::{Stage, StageEvent};
pub use types::*;
