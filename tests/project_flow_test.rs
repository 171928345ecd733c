use prompt_architect::autofill::AutofillClient;
use prompt_architect::project::{self, CharacterField, Edit};
use prompt_architect::{compose, LocalStore, PromptData, SavedCameo};

#[test]
fn edit_save_reload_and_render() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("store"));
    let path = dir.path().join("short.json");

    let mut registry = store.load_cameos();
    assert!(registry.add(SavedCameo::new("@pheem.tha", "Pheem", "ชาย", "25")));
    store.save_cameos(&registry).unwrap();

    project::save(&path, &PromptData::default()).unwrap();
    let mut data = project::load(&path).unwrap();

    let registry = store.load_cameos();
    for edit in [
        Edit::Duration(30),
        Edit::AddCharacter,
        Edit::ToggleCameo { id: 2, cameo: true },
        Edit::SelectCameo {
            id: 2,
            cameo_id: "@pheem.tha".into(),
        },
        Edit::Beat {
            part: 5,
            text: "ประตูเปิดออกเอง".into(),
        },
        Edit::UpdateCharacter {
            id: 1,
            field: CharacterField::Name,
            value: "มายด์".into(),
        },
    ] {
        project::apply_edit(&mut data, edit, &registry).unwrap();
    }
    project::save(&path, &data).unwrap();

    let reloaded = project::load(&path).unwrap();
    assert_eq!(reloaded, data);

    let prompts = compose(&reloaded, &registry);
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("- มายด์ (หญิง, 20):"));
    assert!(prompts[0].contains("- Pheem (ชาย, 25): Cameo appearance of @pheem.tha"));
    assert!(prompts[1].starts_with("TITLE: \"15วิ ไวรัลสยองขวัญ - เงามรณะ - ตอนที่ 2\""));
    assert!(prompts[1].contains("Hook (0-3s):\nประตูเปิดออกเอง"));
}

#[test]
fn project_file_uses_flat_character_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.json");
    project::save(&path, &PromptData::default()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let character = &raw["characters"][0];
    assert_eq!(character["isCameo"], false);
    assert_eq!(character["gender"], "หญิง");
    assert!(character.get("kind").is_none());
}

#[test]
fn autofill_reply_merges_without_clobbering() {
    let reply = r#"```json
{
  "title": "กล้องปริศนา - ตอนที่ 1",
  "timeline": [
    {"part": 1, "description": "a"},
    {"part": 2, "description": "b"},
    {"part": 3, "description": "c"},
    {"part": 4, "description": "d"}
  ]
}
```"#;
    let details = AutofillClient::parse_details(reply).unwrap();

    let mut data = PromptData::default();
    let characters = data.characters.clone();
    let location = data.location.clone();
    details.merge_into(&mut data);

    assert_eq!(data.title, "กล้องปริศนา - ตอนที่ 1");
    assert_eq!(data.location, location);
    assert_eq!(data.characters, characters);

    let prompt = &compose(&data, &Default::default())[0];
    assert!(prompt.starts_with("TITLE: \"กล้องปริศนา - ตอนที่ 1\""));
    assert!(prompt.contains("Final Impact (13-15s):\nd"));
}

#[test]
fn missing_project_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = project::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read project file"));
}

#[test]
fn autofill_reply_without_beat_numbers_is_usable() {
    let reply = r#"{"title":"x","location":"ห้องใต้ดิน","timeline":[{"description":"a"},{"description":"b"}]}"#;
    let details = AutofillClient::parse_details(reply).unwrap();

    let mut data = PromptData::default();
    details.merge_into(&mut data);

    assert_eq!(data.title, "x");
    assert_eq!(data.location, "ห้องใต้ดิน");
    let parts: Vec<_> = data.timeline.iter().map(|s| s.part).collect();
    assert_eq!(parts, [1, 2]);

    project::apply_edit(
        &mut data,
        Edit::Beat {
            part: 2,
            text: "b2".into(),
        },
        &Default::default(),
    )
    .unwrap();
    assert_eq!(data.timeline[1].description, "b2");
}
