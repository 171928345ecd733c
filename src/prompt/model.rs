use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArchitectError;

/// Video genre, serialized with the Thai labels shown in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Genre {
    #[default]
    #[serde(rename = "สยองขวัญ")]
    Horror,
    #[serde(rename = "โฆษณาสินค้า")]
    ProductAd,
    #[serde(rename = "รีวิว")]
    Review,
    #[serde(rename = "ตลก")]
    Comedy,
    #[serde(rename = "ภาพยนตร์")]
    Film,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Horror,
        Genre::ProductAd,
        Genre::Review,
        Genre::Comedy,
        Genre::Film,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Genre::Horror => "สยองขวัญ",
            Genre::ProductAd => "โฆษณาสินค้า",
            Genre::Review => "รีวิว",
            Genre::Comedy => "ตลก",
            Genre::Film => "ภาพยนตร์",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = ArchitectError;

    /// Accepts the Thai label or the English variant name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Genre::ALL
            .into_iter()
            .find(|g| g.label() == s || format!("{:?}", g).eq_ignore_ascii_case(s))
            .ok_or_else(|| ArchitectError::UnknownGenre(s.to_string()))
    }
}

/// What a character line is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterKind {
    /// Recurring character; `key` is looked up in the cameo registry.
    Cameo { key: String },
    /// Described inline.
    Regular { description: String },
}

/// A character in the scene.
///
/// On disk this is the flat record the form has always used (`isCameo` plus a
/// `description` that doubles as the cameo key); in memory the two cases are
/// split into [`CharacterKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CharacterRecord", into = "CharacterRecord")]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub gender: String,
    pub age: String,
    pub kind: CharacterKind,
}

impl Character {
    pub fn regular(id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: String::new(),
            age: String::new(),
            kind: CharacterKind::Regular {
                description: description.into(),
            },
        }
    }

    pub fn cameo(id: u64, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: String::new(),
            age: String::new(),
            kind: CharacterKind::Cameo { key: key.into() },
        }
    }

    pub fn with_gender_age(mut self, gender: impl Into<String>, age: impl Into<String>) -> Self {
        self.gender = gender.into();
        self.age = age.into();
        self
    }

    pub fn is_cameo(&self) -> bool {
        matches!(self.kind, CharacterKind::Cameo { .. })
    }

    /// The free-text field as the form shows it: description or cameo key.
    pub fn description(&self) -> &str {
        match &self.kind {
            CharacterKind::Cameo { key } => key,
            CharacterKind::Regular { description } => description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterRecord {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_cameo: bool,
    #[serde(default)]
    gender: String,
    #[serde(default)]
    age: String,
}

impl From<CharacterRecord> for Character {
    fn from(record: CharacterRecord) -> Self {
        let kind = if record.is_cameo {
            CharacterKind::Cameo {
                key: record.description,
            }
        } else {
            CharacterKind::Regular {
                description: record.description,
            }
        };
        Self {
            id: record.id,
            name: record.name,
            gender: record.gender,
            age: record.age,
            kind,
        }
    }
}

impl From<Character> for CharacterRecord {
    fn from(character: Character) -> Self {
        let (is_cameo, description) = match character.kind {
            CharacterKind::Cameo { key } => (true, key),
            CharacterKind::Regular { description } => (false, description),
        };
        Self {
            id: character.id,
            name: character.name,
            description,
            is_cameo,
            gender: character.gender,
            age: character.age,
        }
    }
}

/// One beat of the timeline. `part` is 1-based across the whole timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSegment {
    #[serde(default)]
    pub part: u32,
    #[serde(default)]
    pub description: String,
}

impl TimelineSegment {
    pub fn new(part: u32, description: impl Into<String>) -> Self {
        Self {
            part,
            description: description.into(),
        }
    }
}

/// Reference image attached to the project. Never rendered into prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImage {
    pub id: u64,
    /// Base64 payload without a `data:` prefix
    pub base64: String,
    pub mime_type: String,
}

/// Snapshot of every form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptData {
    #[serde(default)]
    pub genre: Genre,
    pub duration: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub timeline: Vec<TimelineSegment>,
    #[serde(default)]
    pub camera: String,
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub reference_images: Vec<ReferenceImage>,
}

impl PromptData {
    /// Smallest id not used by any character
    pub fn next_character_id(&self) -> u64 {
        self.characters.iter().map(|c| c.id).max().map_or(1, |id| id + 1)
    }

    /// Smallest id not used by any reference image
    pub fn next_image_id(&self) -> u64 {
        self.reference_images
            .iter()
            .map(|img| img.id)
            .max()
            .map_or(1, |id| id + 1)
    }

    pub fn character_mut(&mut self, id: u64) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }
}

impl Default for PromptData {
    /// The sample horror short the form opens with.
    fn default() -> Self {
        Self {
            genre: Genre::Horror,
            duration: 15,
            title: "15วิ ไวรัลสยองขวัญ - เงามรณะ - ตอนที่ 1".to_string(),
            location: "โถงทางเดินแคบๆ แสงสลัวตอนกลางคืน มีหลอดไฟกระพริบอยู่เหนือศีรษะ วอลล์เปเปอร์ลอก"
                .to_string(),
            characters: vec![Character::regular(
                1,
                "ตัวละคร A",
                "ผิวซีด, ผมยาวสีเข้ม, สวมเสื้อยืดสีขาวเรียบๆ ดูวิตกกังวล",
            )
            .with_gender_age("หญิง", "20")],
            timeline: vec![
                TimelineSegment::new(
                    1,
                    "มุมมอง POV ตัวละครหายใจหอบ มองไปตามโถงทางเดินมืดๆ ได้ยินเสียงขีดข่วนเบาๆ จากที่ไกลๆ (Hook)",
                ),
                TimelineSegment::new(
                    2,
                    "ตัวละครก้าวไปข้างหน้าอย่างลังเล กล้องค่อยๆ ดอลลี่เข้าไปยังสุดทางเดิน เสียงขีดข่วนหยุดลง (Build-up)",
                ),
                TimelineSegment::new(
                    3,
                    "เงาร่างสูงเพรียวของร่างที่มีแขนขายาวผิดธรรมชาติปรากฏขึ้นอย่างรวดเร็วที่ปลายสุดของโถงทางเดิน แล้วหายไปเมื่อแสงไฟกระพริบอย่างรุนแรง (Payoff)",
                ),
                TimelineSegment::new(
                    4,
                    "ความเงียบเข้าปกคลุมทันที โคลสอัพที่ดวงตาหวาดกลัวของตัวละคร ภาพนิ่ง (Freeze-frame) (Final Impact)",
                ),
            ],
            camera: "มุมมองบุคคลที่หนึ่ง (POV)".to_string(),
            lighting: "แสงสไตล์ Netflix".to_string(),
            style: "กล้องสั่นเล็กน้อยในช่วงเวลาที่แสดงอารมณ์\nภาพชัดลึกแบบภาพยนตร์\nรักษาความต่อเนื่องของแสง ใบหน้าตัวละคร และสภาพแวดล้อมในห้อง"
                .to_string(),
            reference_images: Vec::new(),
        }
    }
}
