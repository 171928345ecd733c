pub mod compose;
pub mod model;
pub mod presets;

pub use compose::{compose, part_count, part_title, BEAT_LABELS, PART_SECONDS};
pub use model::{Character, CharacterKind, Genre, PromptData, ReferenceImage, TimelineSegment};
