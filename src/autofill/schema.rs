use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::prompt::model::{Character, PromptData, TimelineSegment};

/// Field values proposed by the model. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiGeneratedDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<CharacterProposal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineSegment>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProposal {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_cameo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

impl AiGeneratedDetails {
    /// Copy proposed values into `data`. Absent or empty proposals leave the
    /// existing field alone.
    pub fn merge_into(self, data: &mut PromptData) {
        if let Some(title) = self.title.filter(|t| !t.trim().is_empty()) {
            data.title = title;
        }
        if let Some(location) = self.location.filter(|l| !l.trim().is_empty()) {
            data.location = location;
        }
        if let Some(characters) = self.characters.filter(|c| !c.is_empty()) {
            let first_id = data.next_character_id();
            data.characters = characters
                .into_iter()
                .zip(first_id..)
                .map(|(proposal, id)| proposal.into_character(id))
                .collect();
        }
        if let Some(timeline) = self.timeline.filter(|t| !t.is_empty()) {
            // Beats are positional; the model's own numbering is not trusted.
            data.timeline = timeline
                .into_iter()
                .zip(1..)
                .map(|(segment, part)| TimelineSegment::new(part, segment.description))
                .collect();
        }
    }

    /// Names of the fields this proposal would change.
    pub fn provided_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            fields.push("title");
        }
        if self.location.as_deref().is_some_and(|l| !l.trim().is_empty()) {
            fields.push("location");
        }
        if self.characters.as_ref().is_some_and(|c| !c.is_empty()) {
            fields.push("characters");
        }
        if self.timeline.as_ref().is_some_and(|t| !t.is_empty()) {
            fields.push("timeline");
        }
        fields
    }
}

impl CharacterProposal {
    fn into_character(self, id: u64) -> Character {
        let gender = self.gender.unwrap_or_default();
        let age = self.age.unwrap_or_default();
        let character = if self.is_cameo.unwrap_or(false) {
            Character::cameo(id, self.name, self.description)
        } else {
            Character::regular(id, self.name, self.description)
        };
        character.with_gender_age(gender, age)
    }
}

/// JSON schema handed to providers that support structured output.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "location": { "type": "STRING" },
            "characters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "isCameo": { "type": "BOOLEAN" },
                        "gender": { "type": "STRING" },
                        "age": { "type": "STRING" }
                    },
                    "required": ["name", "description"]
                }
            },
            "timeline": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "part": { "type": "INTEGER" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["part", "description"]
                }
            }
        }
    })
}
