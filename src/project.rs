//! Project files and the validated edits the form layer applies to them.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use crate::cameo::CameoRegistry;
use crate::error::ArchitectError;
use crate::prompt::model::{Character, CharacterKind, Genre, PromptData, TimelineSegment};
use crate::prompt::presets::{CAMERA_ANGLES, DURATIONS, LIGHTING_STYLES};

/// Read a project file.
pub fn load(path: &Path) -> Result<PromptData> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse project file: {:?}", path))
}

/// Write a project file as pretty JSON.
pub fn save(path: &Path, data: &PromptData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(data).context("Failed to serialize project")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write project file: {:?}", path))?;
    debug!(path = %path.display(), "Saved project");
    Ok(())
}

/// Field of a character that can be edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterField {
    Name,
    Description,
    Gender,
    Age,
}

/// A single form mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Title(String),
    Location(String),
    Camera(String),
    Lighting(String),
    Style(String),
    Genre(String),
    Duration(u32),
    AddCharacter,
    RemoveCharacter(u64),
    UpdateCharacter {
        id: u64,
        field: CharacterField,
        value: String,
    },
    ToggleCameo {
        id: u64,
        cameo: bool,
    },
    /// Point a cameo character at a saved registry entry.
    SelectCameo {
        id: u64,
        cameo_id: String,
    },
    /// Set the text of a 1-based beat anywhere on the timeline.
    Beat {
        part: u32,
        text: String,
    },
}

/// Apply `edit` to `data`. On error `data` is left untouched.
pub fn apply_edit(
    data: &mut PromptData,
    edit: Edit,
    registry: &CameoRegistry,
) -> Result<(), ArchitectError> {
    match edit {
        Edit::Title(title) => data.title = title,
        Edit::Location(location) => data.location = location,
        Edit::Camera(camera) => {
            if !CAMERA_ANGLES.contains(&camera.as_str()) {
                warn!(camera = %camera, "Camera angle is not one of the presets");
            }
            data.camera = camera;
        }
        Edit::Lighting(lighting) => {
            if !LIGHTING_STYLES.contains(&lighting.as_str()) {
                warn!(lighting = %lighting, "Lighting style is not one of the presets");
            }
            data.lighting = lighting;
        }
        Edit::Style(style) => data.style = style,
        Edit::Genre(genre) => data.genre = genre.parse::<Genre>()?,
        Edit::Duration(duration) => {
            if !DURATIONS.contains(&duration) {
                return Err(ArchitectError::InvalidDuration(duration));
            }
            data.duration = duration;
        }
        Edit::AddCharacter => {
            let id = data.next_character_id();
            let name = format!("ตัวละคร {}", data.characters.len() + 1);
            data.characters.push(Character::regular(id, name, ""));
        }
        Edit::RemoveCharacter(id) => {
            if !data.characters.iter().any(|c| c.id == id) {
                return Err(ArchitectError::CharacterNotFound(id));
            }
            if data.characters.len() <= 1 {
                return Err(ArchitectError::LastCharacter);
            }
            data.characters.retain(|c| c.id != id);
        }
        Edit::UpdateCharacter { id, field, value } => {
            let character = data
                .character_mut(id)
                .ok_or(ArchitectError::CharacterNotFound(id))?;
            match field {
                CharacterField::Name => character.name = value,
                CharacterField::Gender => character.gender = value,
                CharacterField::Age => character.age = value,
                CharacterField::Description => match &mut character.kind {
                    CharacterKind::Cameo { key } => *key = value,
                    CharacterKind::Regular { description } => *description = value,
                },
            }
        }
        Edit::ToggleCameo { id, cameo } => {
            let character = data
                .character_mut(id)
                .ok_or(ArchitectError::CharacterNotFound(id))?;
            // Either direction drops the old description/key.
            if cameo {
                character.kind = CharacterKind::Cameo { key: String::new() };
            } else {
                character.kind = CharacterKind::Regular {
                    description: String::new(),
                };
                character.gender.clear();
                character.age.clear();
            }
        }
        Edit::SelectCameo { id, cameo_id } => {
            let saved = registry
                .find(cameo_id.trim())
                .ok_or_else(|| ArchitectError::CameoNotFound(cameo_id.clone()))?;
            let character = data
                .character_mut(id)
                .ok_or(ArchitectError::CharacterNotFound(id))?;
            character.kind = CharacterKind::Cameo {
                key: saved.id.clone(),
            };
            character.name = saved.name.clone();
            character.gender = saved.gender.clone();
            character.age = saved.age.clone();
        }
        Edit::Beat { part, text } => set_beat(data, part, text)?,
    }
    Ok(())
}

fn set_beat(data: &mut PromptData, part: u32, text: String) -> Result<(), ArchitectError> {
    if part == 0 {
        return Err(ArchitectError::InvalidBeat(part));
    }
    if let Some(segment) = data.timeline.iter_mut().find(|s| s.part == part) {
        segment.description = text;
        return Ok(());
    }

    // Fill any gap so positions keep lining up with part numbers.
    for missing in 1..part {
        if !data.timeline.iter().any(|s| s.part == missing) {
            data.timeline.push(TimelineSegment::new(missing, ""));
        }
    }
    data.timeline.push(TimelineSegment::new(part, text));
    data.timeline.sort_by_key(|s| s.part);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cameo::SavedCameo;

    fn registry() -> CameoRegistry {
        let mut registry = CameoRegistry::new();
        registry.add(SavedCameo::new("@pheem.tha", "Pheem", "ชาย", "25"));
        registry
    }

    #[test]
    fn duration_must_be_a_preset() {
        let mut data = PromptData::default();
        assert!(matches!(
            apply_edit(&mut data, Edit::Duration(20), &registry()),
            Err(ArchitectError::InvalidDuration(20))
        ));
        apply_edit(&mut data, Edit::Duration(45), &registry()).unwrap();
        assert_eq!(data.duration, 45);
    }

    #[test]
    fn genre_must_be_known() {
        let mut data = PromptData::default();
        assert!(apply_edit(&mut data, Edit::Genre("western".into()), &registry()).is_err());
        apply_edit(&mut data, Edit::Genre("รีวิว".into()), &registry()).unwrap();
        assert_eq!(data.genre, Genre::Review);
    }

    #[test]
    fn added_characters_get_numbered_names() {
        let mut data = PromptData::default();
        apply_edit(&mut data, Edit::AddCharacter, &registry()).unwrap();
        let added = data.characters.last().unwrap();
        assert_eq!(added.id, 2);
        assert_eq!(added.name, "ตัวละคร 2");
    }

    #[test]
    fn last_character_cannot_be_removed() {
        let mut data = PromptData::default();
        assert!(matches!(
            apply_edit(&mut data, Edit::RemoveCharacter(1), &registry()),
            Err(ArchitectError::LastCharacter)
        ));
        assert!(matches!(
            apply_edit(&mut data, Edit::RemoveCharacter(99), &registry()),
            Err(ArchitectError::CharacterNotFound(99))
        ));
    }

    #[test]
    fn toggling_off_cameo_clears_details() {
        let mut data = PromptData::default();
        apply_edit(
            &mut data,
            Edit::SelectCameo {
                id: 1,
                cameo_id: "@pheem.tha".into(),
            },
            &registry(),
        )
        .unwrap();
        assert_eq!(data.characters[0].name, "Pheem");
        assert!(data.characters[0].is_cameo());

        apply_edit(&mut data, Edit::ToggleCameo { id: 1, cameo: false }, &registry()).unwrap();
        let character = &data.characters[0];
        assert!(!character.is_cameo());
        assert!(character.description().is_empty());
        assert!(character.gender.is_empty() && character.age.is_empty());
    }

    #[test]
    fn selecting_unknown_cameo_fails() {
        let mut data = PromptData::default();
        let before = data.clone();
        assert!(apply_edit(
            &mut data,
            Edit::SelectCameo {
                id: 1,
                cameo_id: "@ghost".into()
            },
            &registry()
        )
        .is_err());
        assert_eq!(data, before);
    }

    #[test]
    fn beat_beyond_timeline_extends_it() {
        let mut data = PromptData::default();
        apply_edit(
            &mut data,
            Edit::Beat {
                part: 6,
                text: "second hook".into(),
            },
            &registry(),
        )
        .unwrap();
        let parts: Vec<_> = data.timeline.iter().map(|s| s.part).collect();
        assert_eq!(parts, [1, 2, 3, 4, 5, 6]);
        assert_eq!(data.timeline[5].description, "second hook");
        assert!(data.timeline[4].description.is_empty());
    }

    #[test]
    fn beat_fills_internal_gaps() {
        let mut data = PromptData {
            timeline: vec![
                TimelineSegment::new(1, "a"),
                TimelineSegment::new(2, "b"),
                TimelineSegment::new(5, "e"),
            ],
            ..PromptData::default()
        };
        apply_edit(
            &mut data,
            Edit::Beat {
                part: 4,
                text: "d".into(),
            },
            &registry(),
        )
        .unwrap();
        let parts: Vec<_> = data.timeline.iter().map(|s| s.part).collect();
        assert_eq!(parts, [1, 2, 3, 4, 5]);
        assert_eq!(data.timeline[3].description, "d");
        assert_eq!(data.timeline[4].description, "e");
    }

    #[test]
    fn beat_zero_is_invalid() {
        let mut data = PromptData::default();
        assert!(apply_edit(
            &mut data,
            Edit::Beat {
                part: 0,
                text: "x".into()
            },
            &registry()
        )
        .is_err());
    }

    #[test]
    fn project_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.json");
        let data = PromptData::default();
        save(&path, &data).unwrap();
        assert_eq!(load(&path).unwrap(), data);
    }
}
