use anyhow::{Context, Result};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use prompt_architect::autofill::{AutofillClient, AutofillRequest};
use prompt_architect::cameo::{CameoRegistry, SavedCameo};
use prompt_architect::config::Config;
use prompt_architect::error::ArchitectError;
use prompt_architect::images;
use prompt_architect::project::{self, Edit};
use prompt_architect::prompt::model::Genre;
use prompt_architect::prompt::presets::{CAMERA_ANGLES, DURATIONS, LIGHTING_STYLES};
use prompt_architect::prompt::{compose as compose_prompts, PromptData, PART_SECONDS};
use prompt_architect::storage::LocalStore;

use super::{
    CameoCommands, CharacterCommands, Commands, ComposeArgs, EditTarget, ImageCommands,
    InitArgs, KeyCommands, ProjectField,
};

/// Config plus everything loaded once at startup
pub struct Session {
    config: Config,
    config_path: PathBuf,
    store: LocalStore,
    registry: CameoRegistry,
}

impl Session {
    pub fn open(config: Config, config_path: Option<&Path>) -> Self {
        let store = LocalStore::new(config.data_dir());
        let registry = store.load_cameos();
        info!(cameos = registry.len(), dir = %store.dir().display(), "Loaded local store");
        Self {
            config,
            config_path: config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path),
            store,
            registry,
        }
    }

    /// Credential from config/env, falling back to the one saved with `key set`
    fn api_key(&self) -> Result<String, ArchitectError> {
        self.config
            .api_key()
            .or_else(|err| self.store.load_api_key().ok_or(err))
    }
}

pub async fn dispatch(session: &mut Session, command: Commands, pretty: bool) -> Result<()> {
    match command {
        Commands::Doctor => doctor(session, pretty),
        Commands::Init(args) => init(args, pretty),
        Commands::Compose(args) => compose(session, args, pretty),
        Commands::Set(args) => {
            let edit = match args.field {
                ProjectField::Title => Edit::Title(args.value),
                ProjectField::Location => Edit::Location(args.value),
                ProjectField::Camera => Edit::Camera(args.value),
                ProjectField::Lighting => Edit::Lighting(args.value),
                ProjectField::Style => Edit::Style(args.value),
                ProjectField::Genre => Edit::Genre(args.value),
                ProjectField::Duration => {
                    let seconds: u32 = args.value.trim().parse().map_err(|_| {
                        anyhow::anyhow!("Duration must be a number of seconds: {}", args.value)
                    })?;
                    Edit::Duration(seconds)
                }
            };
            edit_project(session, &args.target, edit, pretty)
        }
        Commands::Beat(args) => edit_project(
            session,
            &args.target,
            Edit::Beat {
                part: args.part,
                text: args.text,
            },
            pretty,
        ),
        Commands::Character { command } => match command {
            CharacterCommands::Add(target) => {
                edit_project(session, &target, Edit::AddCharacter, pretty)
            }
            CharacterCommands::Remove(args) => {
                edit_project(session, &args.target, Edit::RemoveCharacter(args.id), pretty)
            }
            CharacterCommands::Update(args) => edit_project(
                session,
                &args.target,
                Edit::UpdateCharacter {
                    id: args.id,
                    field: args.field.into(),
                    value: args.value,
                },
                pretty,
            ),
            CharacterCommands::Cameo(args) => edit_project(
                session,
                &args.target,
                Edit::ToggleCameo {
                    id: args.id,
                    cameo: !args.off,
                },
                pretty,
            ),
            CharacterCommands::Select(args) => edit_project(
                session,
                &args.target,
                Edit::SelectCameo {
                    id: args.id,
                    cameo_id: args.cameo,
                },
                pretty,
            ),
        },
        Commands::Image { command } => match command {
            ImageCommands::Add(args) => {
                let mut data = project::load(&args.project)?;
                let ids = images::attach_images(&mut data, &args.paths)?;
                project::save(&args.project, &data)?;
                if pretty {
                    println!(
                        "\u{2714} Attached {} image(s) ({}/{})",
                        ids.len(),
                        data.reference_images.len(),
                        images::MAX_REFERENCE_IMAGES
                    );
                } else {
                    println!(
                        "{}",
                        json!({ "status": "ok", "added": ids, "total": data.reference_images.len() })
                    );
                }
                Ok(())
            }
            ImageCommands::Remove(args) => {
                let mut data = project::load(&args.project)?;
                images::remove_image(&mut data, args.id)?;
                project::save(&args.project, &data)?;
                print_ok(pretty, &format!("Removed image {}", args.id));
                Ok(())
            }
        },
        Commands::Autofill(args) => {
            autofill(session, &args.target, &args.idea, args.dry_run, pretty).await
        }
        Commands::Cameo { command } => match command {
            CameoCommands::List => cameo_list(session, pretty),
            CameoCommands::Add(args) => cameo_add(
                session,
                SavedCameo::new(args.identifier, args.name, args.gender, args.age),
                pretty,
            ),
            CameoCommands::Show { id } => {
                let cameo = session
                    .registry
                    .find(id.trim())
                    .ok_or_else(|| ArchitectError::CameoNotFound(id.clone()))?;
                if pretty {
                    println!("{} ({})", cameo.name, cameo.identifier);
                    println!("  Gender: {}", cameo.gender);
                    println!("  Age: {}", cameo.age);
                } else {
                    println!("{}", serde_json::to_string(cameo)?);
                }
                Ok(())
            }
        },
        Commands::Key { command } => match command {
            KeyCommands::Set { key } => {
                if !session.store.save_api_key(&key)? {
                    anyhow::bail!("API key is blank");
                }
                print_ok(pretty, "API key saved");
                Ok(())
            }
        },
        Commands::Provider(args) => {
            session.config.set_provider(args.name.trim())?;
            session.config.write_to(&session.config_path)?;
            if pretty {
                println!("\u{2714} Provider set to: {}", session.config.llm.provider);
                println!("\n\u{1F4DD} Configuration saved to:");
                println!("   {}", session.config_path.display());
                if session.config.llm.requires_api_key() && session.api_key().is_err() {
                    println!(
                        "\n\u{26A0}\u{FE0F}  No API key yet. Run `prompt-architect key set <KEY>` or export {}",
                        session.config.llm.env_var()
                    );
                }
            } else {
                println!(
                    "{}",
                    json!({
                        "status": "ok",
                        "provider": session.config.llm.provider,
                        "model": session.config.llm.model(),
                        "config_path": session.config_path.to_string_lossy()
                    })
                );
            }
            Ok(())
        }
        Commands::Presets => presets(pretty),
    }
}

/// Print a failure the way the output mode expects
pub fn report_error(err: &anyhow::Error, pretty: bool) {
    if pretty {
        eprintln!("\u{2718} {:#}", err);
        return;
    }
    let code = err
        .downcast_ref::<ArchitectError>()
        .map(ArchitectError::code)
        .unwrap_or("ERROR");
    println!(
        "{}",
        json!({ "status": "error", "code": code, "error": format!("{:#}", err) })
    );
}

fn print_ok(pretty: bool, message: &str) {
    if pretty {
        println!("\u{2714} {}", message);
    } else {
        println!("{}", json!({ "status": "ok", "message": message }));
    }
}

/// Doctor command - check config, credential and local store
fn doctor(session: &Session, pretty: bool) -> Result<()> {
    let mut checks = vec![];

    checks.push(if session.config_path.exists() {
        json!({
            "name": "config",
            "status": "ok",
            "message": "Found",
            "path": session.config_path
        })
    } else {
        json!({
            "name": "config",
            "status": "warning",
            "message": "Not found, using defaults",
            "path": session.config_path
        })
    });

    checks.push(match session.api_key() {
        Ok(_) => json!({
            "name": "api_key",
            "status": "ok",
            "message": format!("Configured for {}", session.config.llm.provider)
        }),
        Err(e) => json!({
            "name": "api_key",
            "status": "warning",
            "message": format!(
                "{}. Run `prompt-architect key set <KEY>` or export {}",
                e,
                session.config.llm.env_var()
            )
        }),
    });

    checks.push(json!({
        "name": "cameos",
        "status": "ok",
        "message": format!("{} saved", session.registry.len()),
        "path": session.store.dir()
    }));

    if pretty {
        println!("Prompt Architect Doctor\n");
        for check in &checks {
            let icon = match check["status"].as_str().unwrap_or("unknown") {
                "ok" => "\u{2714}",
                "warning" => "\u{26A0}",
                "error" => "\u{2718}",
                _ => "?",
            };
            println!(
                "{} {}: {}",
                icon,
                check["name"].as_str().unwrap_or(""),
                check["message"].as_str().unwrap_or("")
            );
            if let Some(path) = check["path"].as_str() {
                println!("    Path: {}", path);
            }
        }
    } else {
        println!("{}", json!({ "checks": checks }));
    }

    Ok(())
}

fn init(args: InitArgs, pretty: bool) -> Result<()> {
    if args.project.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.project.display()
        );
    }
    project::save(&args.project, &PromptData::default())?;
    print_ok(pretty, &format!("Created {}", args.project.display()));
    Ok(())
}

/// Compose command - render every part, or just one
fn compose(session: &Session, args: ComposeArgs, pretty: bool) -> Result<()> {
    let data = project::load(&args.project)?;
    print_prompts(&data, &session.registry, args.part, pretty)
}

fn print_prompts(
    data: &PromptData,
    registry: &CameoRegistry,
    only: Option<usize>,
    pretty: bool,
) -> Result<()> {
    let prompts = compose_prompts(data, registry);
    let selected: Vec<(usize, &String)> = match only {
        Some(part) => {
            let text = part
                .checked_sub(1)
                .and_then(|index| prompts.get(index))
                .with_context(|| {
                    format!("Part {} does not exist ({} part(s))", part, prompts.len())
                })?;
            vec![(part, text)]
        }
        None => prompts.iter().enumerate().map(|(i, p)| (i + 1, p)).collect(),
    };

    if pretty {
        for (part, text) in &selected {
            let start = (*part as u32 - 1) * PART_SECONDS;
            println!(
                "Prompt {} ({}-{}วิ)\n",
                part,
                start,
                start + PART_SECONDS
            );
            println!("{}\n", text);
        }
    } else {
        let parts: Vec<_> = selected
            .iter()
            .map(|(part, text)| {
                let start = (*part as u32 - 1) * PART_SECONDS;
                json!({ "part": part, "start": start, "end": start + PART_SECONDS, "prompt": text })
            })
            .collect();
        println!("{}", json!({ "parts": prompts.len(), "prompts": parts }));
    }
    Ok(())
}

/// Load, apply one validated edit, save, then optionally re-render
fn edit_project(session: &Session, target: &EditTarget, edit: Edit, pretty: bool) -> Result<()> {
    let mut data = project::load(&target.project)?;
    project::apply_edit(&mut data, edit, &session.registry)?;
    project::save(&target.project, &data)?;

    if target.show {
        print_prompts(&data, &session.registry, None, pretty)
    } else {
        print_ok(pretty, &format!("Updated {}", target.project.display()));
        Ok(())
    }
}

/// Autofill command - ask the AI for field values and merge them in
async fn autofill(
    session: &Session,
    target: &EditTarget,
    idea: &str,
    dry_run: bool,
    pretty: bool,
) -> Result<()> {
    if idea.trim().is_empty() {
        anyhow::bail!("Idea must not be empty");
    }

    let mut data = project::load(&target.project)?;
    let api_key = session.api_key()?;
    let client = AutofillClient::new(&session.config, api_key);

    let request = AutofillRequest {
        idea: idea.to_string(),
        genre: data.genre,
        duration: data.duration,
    };

    if pretty {
        println!("\u{1F3AC} AI กำลังสร้างสรรค์จินตนาการภาพยนตร์ของคุณ...\n");
    }

    // The project file is only written after a successful, parsed response.
    let details = client
        .generate_details(&request, &data.reference_images)
        .await?;
    let fields = details.provided_fields();
    if fields.is_empty() {
        warn!("Auto-fill returned no usable fields");
    }

    if dry_run {
        if pretty {
            println!("{}", serde_json::to_string_pretty(&details)?);
        } else {
            println!("{}", json!({ "dry_run": true, "details": details }));
        }
        return Ok(());
    }

    details.merge_into(&mut data);
    project::save(&target.project, &data)?;
    info!(fields = ?fields, "Merged auto-fill proposal");

    if target.show {
        return print_prompts(&data, &session.registry, None, pretty);
    }
    if pretty {
        println!("\u{2714} Updated: {}", fields.join(", "));
    } else {
        println!("{}", json!({ "status": "ok", "updated": fields }));
    }
    Ok(())
}

fn cameo_list(session: &Session, pretty: bool) -> Result<()> {
    if pretty {
        if session.registry.is_empty() {
            println!("No saved cameos.");
        }
        for cameo in session.registry.iter() {
            println!(
                "  {} - {} ({}, {})",
                cameo.identifier, cameo.name, cameo.gender, cameo.age
            );
        }
    } else {
        println!("{}", serde_json::to_string(&session.registry)?);
    }
    Ok(())
}

fn cameo_add(session: &mut Session, cameo: SavedCameo, pretty: bool) -> Result<()> {
    if cameo.name.trim().is_empty() {
        anyhow::bail!("Cameo name must not be empty");
    }
    let id = cameo.id.clone();
    if !session.registry.add(cameo) {
        return Err(ArchitectError::CameoRejected(id).into());
    }
    if let Err(e) = session.store.save_cameos(&session.registry) {
        warn!(error = %e, "Failed to save cameos to local store");
    }
    print_ok(pretty, &format!("Saved cameo {}", id));
    Ok(())
}

fn presets(pretty: bool) -> Result<()> {
    let genres: Vec<&str> = Genre::ALL.iter().map(Genre::label).collect();
    if pretty {
        println!("Genres: {}", genres.join(", "));
        println!(
            "Durations: {}",
            DURATIONS.map(|d| format!("{}s", d)).join(", ")
        );
        println!("\nCamera angles:");
        for angle in CAMERA_ANGLES {
            println!("  - {}", angle);
        }
        println!("\nLighting styles:");
        for style in LIGHTING_STYLES {
            println!("  - {}", style);
        }
    } else {
        println!(
            "{}",
            json!({
                "genres": genres,
                "durations": DURATIONS,
                "camera_angles": CAMERA_ANGLES,
                "lighting_styles": LIGHTING_STYLES
            })
        );
    }
    Ok(())
}
