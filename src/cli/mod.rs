pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use prompt_architect::project::CharacterField;

#[derive(Parser)]
#[command(name = "prompt-architect")]
#[command(about = "Compose multi-part cinematic prompts for text-to-video models")]
#[command(version)]
pub struct Cli {
    /// Use alternate config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Human-readable output instead of JSON
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check config, credential and cameo registry
    Doctor,

    /// Write a new project file with the sample horror short
    Init(InitArgs),

    /// Render the project into one prompt per 15-second part
    Compose(ComposeArgs),

    /// Set a top-level field of the project
    Set(SetArgs),

    /// Edit the text of one timeline beat (1-based across the whole timeline)
    Beat(BeatArgs),

    /// Character operations
    Character {
        #[command(subcommand)]
        command: CharacterCommands,
    },

    /// Reference image operations
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Let the AI fill in title, location, characters and timeline from an idea
    Autofill(AutofillArgs),

    /// Saved cameo operations
    Cameo {
        #[command(subcommand)]
        command: CameoCommands,
    },

    /// API credential operations
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Switch the auto-fill provider
    Provider(ProviderArgs),

    /// List genres, durations, camera angles and lighting styles
    Presets,
}

/// Project file plus the re-render switch shared by every edit
#[derive(Args)]
pub struct EditTarget {
    /// Project file
    pub project: PathBuf,

    /// Print the composed prompts after the edit
    #[arg(long)]
    pub show: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the project file
    pub project: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ComposeArgs {
    /// Project file
    pub project: PathBuf,

    /// Only print this part (1-based)
    #[arg(long)]
    pub part: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProjectField {
    Title,
    Location,
    Camera,
    Lighting,
    Style,
    Genre,
    Duration,
}

#[derive(Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: EditTarget,

    /// Field to change
    #[arg(value_enum)]
    pub field: ProjectField,

    /// New value (style notes may span several lines)
    pub value: String,
}

#[derive(Args)]
pub struct BeatArgs {
    #[command(flatten)]
    pub target: EditTarget,

    /// Beat position (1-4 is part one, 5-8 part two, ...)
    pub part: u32,

    /// What happens in this beat
    pub text: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CharacterFieldArg {
    Name,
    Description,
    Gender,
    Age,
}

impl From<CharacterFieldArg> for CharacterField {
    fn from(arg: CharacterFieldArg) -> Self {
        match arg {
            CharacterFieldArg::Name => CharacterField::Name,
            CharacterFieldArg::Description => CharacterField::Description,
            CharacterFieldArg::Gender => CharacterField::Gender,
            CharacterFieldArg::Age => CharacterField::Age,
        }
    }
}

#[derive(Subcommand)]
pub enum CharacterCommands {
    /// Add a blank character
    Add(EditTarget),
    /// Remove a character (the last one stays)
    Remove(CharacterIdArgs),
    /// Change one field of a character
    Update(CharacterUpdateArgs),
    /// Turn cameo mode on or off
    Cameo(CharacterCameoArgs),
    /// Use a saved cameo for a character
    Select(CharacterSelectArgs),
}

#[derive(Args)]
pub struct CharacterIdArgs {
    #[command(flatten)]
    pub target: EditTarget,
    /// Character id
    pub id: u64,
}

#[derive(Args)]
pub struct CharacterUpdateArgs {
    #[command(flatten)]
    pub target: EditTarget,
    /// Character id
    pub id: u64,
    /// Field to change
    #[arg(value_enum)]
    pub field: CharacterFieldArg,
    /// New value
    pub value: String,
}

#[derive(Args)]
pub struct CharacterCameoArgs {
    #[command(flatten)]
    pub target: EditTarget,
    /// Character id
    pub id: u64,
    /// Switch back to a described character
    #[arg(long)]
    pub off: bool,
}

#[derive(Args)]
pub struct CharacterSelectArgs {
    #[command(flatten)]
    pub target: EditTarget,
    /// Character id
    pub id: u64,
    /// Saved cameo identifier (ex: @pheem.tha)
    pub cameo: String,
}

#[derive(Subcommand)]
pub enum ImageCommands {
    /// Attach up to three reference images
    Add(ImageAddArgs),
    /// Detach a reference image
    Remove(ImageRemoveArgs),
}

#[derive(Args)]
pub struct ImageAddArgs {
    /// Project file
    pub project: PathBuf,
    /// Image files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ImageRemoveArgs {
    /// Project file
    pub project: PathBuf,
    /// Image id
    pub id: u64,
}

#[derive(Args)]
pub struct AutofillArgs {
    #[command(flatten)]
    pub target: EditTarget,

    /// The story idea (ex: "ชายคนหนึ่งเจอกล้องเก่าปริศนา")
    #[arg(long)]
    pub idea: String,

    /// Print the proposal without touching the project file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum CameoCommands {
    /// List saved cameos
    List,
    /// Save a new cameo
    Add(CameoAddArgs),
    /// Show one saved cameo
    Show {
        /// Cameo identifier
        id: String,
    },
}

#[derive(Args)]
pub struct CameoAddArgs {
    /// Cameo identifier (ex: @pheem.tha)
    pub identifier: String,
    /// Display name
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long, default_value = "")]
    pub age: String,
}

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Save the API key to the local store
    Set {
        /// API key
        key: String,
    },
}

#[derive(Args)]
pub struct ProviderArgs {
    /// gemini, openai, anthropic, openrouter, lmstudio or custom
    pub name: String,
}
