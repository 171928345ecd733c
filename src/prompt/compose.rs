//! Renders a [`PromptData`] snapshot into one prompt per 15-second part.

use regex::Regex;
use std::sync::LazyLock;

use super::model::{Character, CharacterKind, PromptData};
use crate::cameo::CameoRegistry;

/// Length of one part, in seconds
pub const PART_SECONDS: u32 = 15;

/// Timeline segments per part
pub const BEATS_PER_PART: usize = 4;

pub const BEAT_LABELS: [&str; BEATS_PER_PART] = [
    "Hook (0-3s)",
    "Build-up (3-8s)",
    "Payoff (8-13s)",
    "Final Impact (13-15s)",
];

static THAI_PART_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-\s*ตอนที่\s*[0-9]+").expect("valid regex"));
static LATIN_PART_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-\s*Part\s*[0-9]+").expect("valid regex"));

/// Number of prompts a duration produces. Durations that are not a multiple
/// of 15 round down.
pub fn part_count(duration: u32) -> usize {
    (duration / PART_SECONDS) as usize
}

/// Render every part of `data`, in order.
pub fn compose(data: &PromptData, registry: &CameoRegistry) -> Vec<String> {
    let characters = character_section(&data.characters, registry);
    let style = style_section(&data.camera, &data.style);
    let base_title = strip_part_suffix(&data.title);

    (1..=part_count(data.duration))
        .map(|part| {
            let text = format!(
                "TITLE: \"{title}\"\n\n\
                 Cinematic continuous shot. {lighting}. Fixed location: {location}. \
                 No scene changes. Face consistency for all characters. {continuity}\n\n\
                 CHARACTERS:\n{characters}\n\n\
                 TIMELINE 15s:\n{timeline}\n\n\
                 {style}",
                title = format_part_title(&base_title, part),
                lighting = data.lighting,
                location = data.location,
                continuity = continuity_instruction(part),
                timeline = timeline_section(data, part),
            );
            text.trim().to_string()
        })
        .collect()
}

/// Remove the first `- ตอนที่ N` and the first `- Part N` marker, then trim.
pub fn strip_part_suffix(title: &str) -> String {
    let stripped = THAI_PART_SUFFIX.replace(title, "");
    LATIN_PART_SUFFIX.replace(&stripped, "").trim().to_string()
}

/// Title for a 1-based part number, derived from the stripped base title.
pub fn part_title(title: &str, part: usize) -> String {
    format_part_title(&strip_part_suffix(title), part)
}

fn format_part_title(base: &str, part: usize) -> String {
    format!("{} - ตอนที่ {}", base, part)
}

/// Instruction tying part `part` to the end of the previous one. Empty for
/// the first part.
pub fn continuity_instruction(part: usize) -> String {
    if part <= 1 {
        return String::new();
    }
    format!(
        "This is Part {part}. This shot MUST continue SEAMLESSLY from the final frame of Part {prev}. \
         Maintain character appearances, lighting, and environment exactly.",
        part = part,
        prev = part - 1
    )
}

/// One `- ...` line per character, in order.
pub fn character_section(characters: &[Character], registry: &CameoRegistry) -> String {
    characters
        .iter()
        .map(|c| character_line(c, registry))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn character_line(character: &Character, registry: &CameoRegistry) -> String {
    if let CharacterKind::Cameo { key } = &character.kind {
        let key = key.trim();
        if !key.is_empty() {
            return match registry.find(key) {
                Some(saved) => format!(
                    "- {} ({}, {}): Cameo appearance of {}",
                    saved.name, saved.gender, saved.age, saved.identifier
                ),
                None => format!("- {}: Cameo appearance of {}", character.name, key),
            };
        }
    }

    let details = if !character.gender.is_empty() && !character.age.is_empty() {
        format!(" ({}, {})", character.gender, character.age)
    } else {
        String::new()
    };
    format!(
        "- {}{}: {}",
        character.name,
        details,
        character.description()
    )
}

/// The four labelled beats of a 1-based part. Missing segments render empty.
pub fn timeline_section(data: &PromptData, part: usize) -> String {
    let start = part.saturating_sub(1) * BEATS_PER_PART;
    BEAT_LABELS
        .iter()
        .enumerate()
        .map(|(offset, label)| {
            let beat = data
                .timeline
                .get(start + offset)
                .map(|segment| segment.description.as_str())
                .unwrap_or_default();
            format!("{}:\n{}", label, beat)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn style_section(camera: &str, notes: &str) -> String {
    format!("STYLE:\n- {}\n{}", camera, notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::model::TimelineSegment;

    #[test]
    fn part_count_floors() {
        assert_eq!(part_count(15), 1);
        assert_eq!(part_count(45), 3);
        assert_eq!(part_count(20), 1);
        assert_eq!(part_count(10), 0);
    }

    #[test]
    fn strips_thai_and_latin_markers() {
        assert_eq!(strip_part_suffix("เงามรณะ - ตอนที่ 3"), "เงามรณะ");
        assert_eq!(strip_part_suffix("Shadow -part12 "), "Shadow");
        assert_eq!(strip_part_suffix("  Plain title  "), "Plain title");
    }

    #[test]
    fn thai_digit_markers_are_kept() {
        assert_eq!(strip_part_suffix("เงามรณะ - ตอนที่ ๓"), "เงามรณะ - ตอนที่ ๓");
        assert_eq!(strip_part_suffix("Shadow - Part ๒"), "Shadow - Part ๒");
    }

    #[test]
    fn part_title_is_idempotent() {
        let once = part_title("เงามรณะ", 2);
        assert_eq!(once, "เงามรณะ - ตอนที่ 2");
        assert_eq!(part_title(&once, 2), once);
    }

    #[test]
    fn continuity_mentions_previous_part() {
        assert!(continuity_instruction(1).is_empty());
        let text = continuity_instruction(3);
        assert!(text.starts_with("This is Part 3."));
        assert!(text.contains("final frame of Part 2."));
    }

    #[test]
    fn short_timeline_renders_empty_beats() {
        let mut data = PromptData::default();
        data.timeline = vec![TimelineSegment::new(1, "open")];
        let section = timeline_section(&data, 1);
        assert_eq!(
            section,
            "Hook (0-3s):\nopen\n\nBuild-up (3-8s):\n\n\nPayoff (8-13s):\n\n\nFinal Impact (13-15s):\n"
        );
    }

    #[test]
    fn style_keeps_notes_verbatim() {
        assert_eq!(
            style_section("มุมต่ำ", "line one\n  line two"),
            "STYLE:\n- มุมต่ำ\nline one\n  line two"
        );
    }
}
