use crate::prompt::compose::{part_count, BEATS_PER_PART, BEAT_LABELS};
use crate::prompt::model::Genre;

/// Instructions sent ahead of every auto-fill request
pub const SYSTEM_PROMPT: &str = r#"You are a screenwriter who turns a one-line idea into the fields of a short cinematic video prompt for a text-to-video model.

## Rules
- Write every field in Thai unless the idea is clearly in another language.
- The video is ONE continuous shot in ONE fixed location. No scene changes, no cuts.
- Keep the cast small (1-3 characters). Describe each character physically: face, hair, clothing, mood.
- Only set `isCameo` to true when the idea explicitly names a cameo handle such as "@someone"; the description is then that handle and nothing else.
- The title should be short and catchy, ending with " - ตอนที่ 1".
- If reference images are attached, draw character looks, wardrobe and location details from them.

## Output Format
Return ONLY valid JSON. No markdown, no explanation, just the JSON object.

{
  "title": "<title>",
  "location": "<one detailed sentence describing the single location>",
  "characters": [
    { "name": "<name>", "description": "<appearance>", "isCameo": false, "gender": "<gender>", "age": "<age>" }
  ],
  "timeline": [
    { "part": 1, "description": "<what happens in this beat>" }
  ]
}"#;

/// What the user asked for.
#[derive(Debug, Clone)]
pub struct AutofillRequest {
    pub idea: String,
    pub genre: Genre,
    pub duration: u32,
}

/// Describe the expected timeline shape for `duration`
pub fn format_timeline_shape(duration: u32) -> String {
    let parts = part_count(duration).max(1);
    let mut lines = vec![format!(
        "The video is {} seconds long: {} part(s) of 15 seconds, {} beats per part, {} timeline entries in total numbered 1..{}.",
        duration,
        parts,
        BEATS_PER_PART,
        parts * BEATS_PER_PART,
        parts * BEATS_PER_PART
    )];
    lines.push("Within each part the beats are, in order:".to_string());
    lines.extend(BEAT_LABELS.iter().map(|label| format!("- {}", label)));
    if parts > 1 {
        lines.push(
            "Each part must continue seamlessly from the final moment of the previous part."
                .to_string(),
        );
    }
    lines.join("\n")
}

/// Build the full prompt with the timeline shape and the user's idea
pub fn build_prompt(request: &AutofillRequest) -> String {
    format!(
        "{}\n\n## Genre\n{}\n\n## Timeline\n{}\n\n## Idea\n{}",
        SYSTEM_PROMPT,
        request.genre,
        format_timeline_shape(request.duration),
        request.idea.trim()
    )
}
