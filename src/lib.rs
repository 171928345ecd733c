pub mod autofill;
pub mod cameo;
pub mod config;
pub mod error;
pub mod images;
pub mod project;
pub mod prompt;
pub mod storage;

pub use cameo::{CameoRegistry, SavedCameo};
pub use config::Config;
pub use error::ArchitectError as PromptArchitectError;
pub use prompt::{compose, Character, CharacterKind, PromptData, TimelineSegment};
pub use storage::LocalStore;
