use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pointclick_engine::{
    Chapter, ChapterCommand, ChapterEvent, EventBus, EventKind, InteractableId, ItemDefId,
    ItemUpdate, LocationId, SubscriptionId, Vec2,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Companion file to a chapter: what happens on interaction events, the
/// cutscene frame lists and the scripted pointer session of the demo.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BehaviorDef {
    #[serde(default)]
    pub(crate) reactions: Vec<ReactionDef>,
    #[serde(default)]
    pub(crate) cutscenes: BTreeMap<String, CutsceneDef>,
    #[serde(default)]
    pub(crate) session: Vec<SessionStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReactionDef {
    pub(crate) on: EventKind,
    /// `location/interactable`.
    #[serde(default)]
    pub(crate) target: Option<String>,
    #[serde(default)]
    pub(crate) item: Option<String>,
    #[serde(default)]
    pub(crate) cutscene: Option<String>,
    #[serde(default)]
    pub(crate) once: bool,
    #[serde(rename = "do")]
    pub(crate) actions: Vec<ActionDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub(crate) enum ActionDef {
    JumpTo {
        location: String,
        #[serde(default)]
        fade_seconds: f32,
    },
    AddItem(String),
    RemoveItem(String),
    DropCarriedItem,
    SetInteractableActive {
        target: String,
        active: bool,
    },
    ShowDescription(String),
    ShakeLocation {
        location: String,
        vertical: u32,
        horizontal: u32,
        duration_seconds: f32,
    },
    ChangeBackground {
        location: String,
        background: String,
    },
    UpdateItem {
        item: String,
        #[serde(default)]
        display_name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        icon: Option<String>,
    },
    PlayCutscene(String),
    EndCutscene,
    SetReceivingInputs(bool),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CutsceneDef {
    pub(crate) frames: Vec<String>,
    pub(crate) frame_seconds: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ClickButton {
    Primary,
    Secondary,
}

/// One step of the scripted session; positions are stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SessionStep {
    Wait(f32),
    MoveTo(Vec2),
    Click(ClickButton),
    Hint,
    Quit,
}

#[derive(Debug, Error)]
pub(crate) enum BehaviorError {
    #[error("failed to read behavior file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("behavior parse error at {field_path}: {message}")]
    Parse { field_path: String, message: String },
    #[error("target '{value}' must be written as location/interactable")]
    MalformedTarget { value: String },
    #[error("unknown location '{name}'")]
    UnknownLocation { name: String },
    #[error("unknown interactable '{value}'")]
    UnknownInteractable { value: String },
    #[error("unknown item '{name}'")]
    UnknownItem { name: String },
}

pub(crate) fn load_behavior_def(path: &Path) -> Result<BehaviorDef, BehaviorError> {
    let raw = fs::read_to_string(path).map_err(|source| BehaviorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let def = parse_behavior_def(&raw)?;
    info!(
        path = %path.display(),
        reactions = def.reactions.len(),
        cutscenes = def.cutscenes.len(),
        session_steps = def.session.len(),
        "behavior_def_loaded"
    );
    Ok(def)
}

pub(crate) fn parse_behavior_def(raw: &str) -> Result<BehaviorDef, BehaviorError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let field_path = error.path().to_string();
        BehaviorError::Parse {
            field_path,
            message: error.into_inner().to_string(),
        }
    })
}

/// A reaction with every name resolved against the loaded chapter.
#[derive(Debug, Clone)]
struct Reaction {
    on: EventKind,
    target: Option<InteractableId>,
    item: Option<ItemDefId>,
    cutscene: Option<String>,
    once: bool,
    fired: bool,
    commands: Vec<ChapterCommand>,
}

impl Reaction {
    fn matches(&self, event: &ChapterEvent) -> bool {
        if event.kind() != self.on || (self.once && self.fired) {
            return false;
        }
        let target_matches =
            |target: &InteractableId| self.target.map_or(true, |wanted| wanted == *target);
        match event {
            ChapterEvent::Initialized { target }
            | ChapterEvent::PrimaryInteract { target }
            | ChapterEvent::LocationEntered { target, .. }
            | ChapterEvent::LocationLeft { target, .. } => target_matches(target),
            ChapterEvent::UseCarriedItemOnTarget { target, item, .. } => {
                target_matches(target) && self.item.map_or(true, |wanted| wanted == *item)
            }
            ChapterEvent::LoadCutscene { cutscene }
            | ChapterEvent::CutsceneLoaded { cutscene }
            | ChapterEvent::EndCutscene { cutscene } => self
                .cutscene
                .as_ref()
                .map_or(true, |wanted| wanted == cutscene),
            ChapterEvent::LoadingProgress { .. } | ChapterEvent::ChapterReady { .. } => true,
        }
    }
}

/// The demo's stand-in behavior layer: a flat table of event patterns and
/// the commands each one queues.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReactionTable {
    reactions: Vec<Reaction>,
}

impl ReactionTable {
    pub(crate) fn compile(defs: &[ReactionDef], chapter: &Chapter) -> Result<Self, BehaviorError> {
        let reactions = defs
            .iter()
            .map(|def| -> Result<Reaction, BehaviorError> {
                Ok(Reaction {
                    on: def.on,
                    target: def
                        .target
                        .as_deref()
                        .map(|value| resolve_interactable(chapter, value))
                        .transpose()?,
                    item: def
                        .item
                        .as_deref()
                        .map(|name| resolve_item(chapter, name))
                        .transpose()?,
                    cutscene: def.cutscene.clone(),
                    once: def.once,
                    fired: false,
                    commands: def
                        .actions
                        .iter()
                        .map(|action| compile_action(chapter, action))
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { reactions })
    }

    pub(crate) fn len(&self) -> usize {
        self.reactions.len()
    }

    /// Queues the commands of every matching reaction, in table order.
    pub(crate) fn react(&mut self, event: &ChapterEvent) -> Vec<ChapterCommand> {
        let mut commands = Vec::new();
        for (index, reaction) in self.reactions.iter_mut().enumerate() {
            if !reaction.matches(event) {
                continue;
            }
            reaction.fired = true;
            debug!(reaction = index, event = %event.kind(), "reaction_fired");
            commands.extend(reaction.commands.iter().cloned());
        }
        commands
    }

    pub(crate) fn install(mut self, events: &mut EventBus) -> SubscriptionId {
        events.subscribe_all(move |event, queue| {
            for command in self.react(event) {
                queue.push(command);
            }
        })
    }
}

fn compile_action(chapter: &Chapter, action: &ActionDef) -> Result<ChapterCommand, BehaviorError> {
    let command = match action {
        ActionDef::JumpTo {
            location,
            fade_seconds,
        } => ChapterCommand::JumpTo {
            destination: resolve_location(chapter, location)?,
            fade_seconds: *fade_seconds,
        },
        ActionDef::AddItem(item) => ChapterCommand::AddItem {
            item: resolve_item(chapter, item)?,
        },
        ActionDef::RemoveItem(item) => ChapterCommand::RemoveItem {
            item: resolve_item(chapter, item)?,
        },
        ActionDef::DropCarriedItem => ChapterCommand::DropCarriedItem,
        ActionDef::SetInteractableActive { target, active } => {
            ChapterCommand::SetInteractableActive {
                target: resolve_interactable(chapter, target)?,
                active: *active,
            }
        }
        ActionDef::ShowDescription(text) => ChapterCommand::ShowDescription { text: text.clone() },
        ActionDef::ShakeLocation {
            location,
            vertical,
            horizontal,
            duration_seconds,
        } => ChapterCommand::ShakeLocation {
            location: resolve_location(chapter, location)?,
            vertical: *vertical,
            horizontal: *horizontal,
            duration_seconds: *duration_seconds,
        },
        ActionDef::ChangeBackground {
            location,
            background,
        } => ChapterCommand::ChangeBackground {
            location: resolve_location(chapter, location)?,
            background: background.clone(),
        },
        ActionDef::UpdateItem {
            item,
            display_name,
            description,
            icon,
        } => ChapterCommand::UpdateItem {
            item: resolve_item(chapter, item)?,
            update: ItemUpdate {
                display_name: display_name.clone(),
                description: description.clone(),
                icon: icon.clone(),
            },
        },
        ActionDef::PlayCutscene(cutscene) => ChapterCommand::PlayCutscene {
            cutscene: cutscene.clone(),
        },
        ActionDef::EndCutscene => ChapterCommand::EndCutscene,
        ActionDef::SetReceivingInputs(receive) => ChapterCommand::SetReceivingInputs {
            receive: *receive,
        },
    };
    Ok(command)
}

fn resolve_location(chapter: &Chapter, name: &str) -> Result<LocationId, BehaviorError> {
    chapter
        .location_by_name(name)
        .map(|location| location.id())
        .ok_or_else(|| BehaviorError::UnknownLocation {
            name: name.to_string(),
        })
}

fn resolve_interactable(chapter: &Chapter, value: &str) -> Result<InteractableId, BehaviorError> {
    let (location, name) =
        value
            .split_once('/')
            .ok_or_else(|| BehaviorError::MalformedTarget {
                value: value.to_string(),
            })?;
    resolve_location(chapter, location)?;
    chapter
        .interactable_by_name(location, name)
        .map(|interactable| interactable.id())
        .ok_or_else(|| BehaviorError::UnknownInteractable {
            value: value.to_string(),
        })
}

fn resolve_item(chapter: &Chapter, name: &str) -> Result<ItemDefId, BehaviorError> {
    chapter
        .items()
        .item_def_id_by_name(name)
        .ok_or_else(|| BehaviorError::UnknownItem {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointclick_engine::parse_chapter_def;

    const CHAPTER: &str = r#"{
        "name": "test",
        "locations": [
            {
                "name": "yard",
                "start": true,
                "interactables": [
                    {
                        "name": "well",
                        "tooltip": "Well",
                        "bounds": { "center": { "x": 0, "y": 0 }, "width": 100, "height": 100 }
                    }
                ]
            },
            { "name": "barn" }
        ],
        "items": [
            { "name": "bucket", "display_name": "Bucket" }
        ]
    }"#;

    fn chapter() -> Chapter {
        Chapter::new(&parse_chapter_def(CHAPTER).expect("chapter def")).expect("chapter")
    }

    #[test]
    fn behavior_file_parses_every_step_and_action_shape() {
        let raw = r#"{
            "reactions": [
                {
                    "on": "primary-interact",
                    "target": "yard/well",
                    "once": true,
                    "do": [
                        { "add_item": "bucket" },
                        { "jump_to": { "location": "barn", "fade_seconds": 0.5 } },
                        "drop_carried_item",
                        { "set_receiving_inputs": false }
                    ]
                }
            ],
            "cutscenes": { "intro": { "frames": ["a", "b"], "frame_seconds": 0.25 } },
            "session": [
                { "wait": 1.0 },
                { "move_to": { "x": 10, "y": -20 } },
                { "click": "secondary" },
                "hint",
                "quit"
            ]
        }"#;

        let def = parse_behavior_def(raw).expect("behavior");
        assert_eq!(def.reactions.len(), 1);
        assert_eq!(def.reactions[0].on, EventKind::PrimaryInteract);
        assert_eq!(def.reactions[0].actions.len(), 4);
        assert_eq!(def.cutscenes["intro"].frames, vec!["a", "b"]);
        assert_eq!(
            def.session,
            vec![
                SessionStep::Wait(1.0),
                SessionStep::MoveTo(Vec2::new(10.0, -20.0)),
                SessionStep::Click(ClickButton::Secondary),
                SessionStep::Hint,
                SessionStep::Quit,
            ]
        );
    }

    #[test]
    fn parse_error_names_the_field_path() {
        let raw = r#"{
            "reactions": [ { "on": "primary-interact", "do": [ { "teleport": 1 } ] } ]
        }"#;
        let error = parse_behavior_def(raw).expect_err("unknown action");
        match error {
            BehaviorError::Parse { field_path, .. } => {
                assert!(field_path.starts_with("reactions[0].do"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn compile_rejects_unknown_names() {
        let chapter = chapter();
        let def = parse_behavior_def(
            r#"{ "reactions": [ { "on": "primary-interact", "target": "yard/gate", "do": [] } ] }"#,
        )
        .expect("behavior");
        assert!(matches!(
            ReactionTable::compile(&def.reactions, &chapter),
            Err(BehaviorError::UnknownInteractable { .. })
        ));

        let def = parse_behavior_def(
            r#"{ "reactions": [ { "on": "chapter-ready", "do": [ { "add_item": "ladder" } ] } ] }"#,
        )
        .expect("behavior");
        assert!(matches!(
            ReactionTable::compile(&def.reactions, &chapter),
            Err(BehaviorError::UnknownItem { .. })
        ));

        let def = parse_behavior_def(
            r#"{ "reactions": [ { "on": "primary-interact", "target": "well", "do": [] } ] }"#,
        )
        .expect("behavior");
        assert!(matches!(
            ReactionTable::compile(&def.reactions, &chapter),
            Err(BehaviorError::MalformedTarget { .. })
        ));
    }

    #[test]
    fn once_reactions_fire_a_single_time_and_filters_apply() {
        let chapter = chapter();
        let well = chapter
            .interactable_by_name("yard", "well")
            .expect("well")
            .id();
        let bucket = chapter.items().item_def_id_by_name("bucket").expect("bucket");
        let def = parse_behavior_def(
            r#"{ "reactions": [
                { "on": "primary-interact", "target": "yard/well", "once": true,
                  "do": [ { "add_item": "bucket" } ] },
                { "on": "end-cutscene", "cutscene": "intro",
                  "do": [ { "show_description": "Morning." } ] }
            ] }"#,
        )
        .expect("behavior");
        let mut table = ReactionTable::compile(&def.reactions, &chapter).expect("compile");
        assert_eq!(table.len(), 2);

        let click = ChapterEvent::PrimaryInteract { target: well };
        assert_eq!(
            table.react(&click),
            vec![ChapterCommand::AddItem { item: bucket }]
        );
        assert!(table.react(&click).is_empty());

        let other = ChapterEvent::EndCutscene {
            cutscene: "outro".to_string(),
        };
        assert!(table.react(&other).is_empty());
        let intro = ChapterEvent::EndCutscene {
            cutscene: "intro".to_string(),
        };
        assert_eq!(table.react(&intro).len(), 1);
    }

    #[test]
    fn update_item_action_carries_a_new_icon() {
        let chapter = chapter();
        let bucket = chapter.items().item_def_id_by_name("bucket").expect("bucket");
        let def = parse_behavior_def(
            r#"{ "reactions": [
                { "on": "primary-interact", "target": "yard/well",
                  "do": [ { "update_item": { "item": "bucket", "icon": "bucket_full.png" } } ] }
            ] }"#,
        )
        .expect("behavior");
        let mut table = ReactionTable::compile(&def.reactions, &chapter).expect("compile");
        let well = chapter
            .interactable_by_name("yard", "well")
            .expect("well")
            .id();

        assert_eq!(
            table.react(&ChapterEvent::PrimaryInteract { target: well }),
            vec![ChapterCommand::UpdateItem {
                item: bucket,
                update: ItemUpdate {
                    icon: Some("bucket_full.png".to_string()),
                    ..ItemUpdate::default()
                },
            }]
        );
    }
}
