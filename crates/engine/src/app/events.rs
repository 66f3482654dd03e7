use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::interactable::InteractableId;
use super::inventory::{BoxId, ItemUpdate};
use super::location::LocationId;
use crate::content::ItemDefId;

/// Named signals emitted to the behavior layer. The core never inspects what
/// subscribers do with them.
#[derive(Debug, Clone, PartialEq)]
pub enum ChapterEvent {
    Initialized {
        target: InteractableId,
    },
    PrimaryInteract {
        target: InteractableId,
    },
    UseCarriedItemOnTarget {
        target: InteractableId,
        item: ItemDefId,
        source_box: BoxId,
    },
    LocationEntered {
        target: InteractableId,
        was_active: bool,
    },
    LocationLeft {
        target: InteractableId,
        was_active: bool,
    },
    LoadCutscene {
        cutscene: String,
    },
    CutsceneLoaded {
        cutscene: String,
    },
    EndCutscene {
        cutscene: String,
    },
    LoadingProgress {
        fraction: f32,
    },
    ChapterReady {
        start: LocationId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Initialized,
    PrimaryInteract,
    UseCarriedItemOnTarget,
    LocationEntered,
    LocationLeft,
    LoadCutscene,
    CutsceneLoaded,
    EndCutscene,
    LoadingProgress,
    ChapterReady,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::Initialized,
        EventKind::PrimaryInteract,
        EventKind::UseCarriedItemOnTarget,
        EventKind::LocationEntered,
        EventKind::LocationLeft,
        EventKind::LoadCutscene,
        EventKind::CutsceneLoaded,
        EventKind::EndCutscene,
        EventKind::LoadingProgress,
        EventKind::ChapterReady,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Initialized => "initialized",
            EventKind::PrimaryInteract => "primary-interact",
            EventKind::UseCarriedItemOnTarget => "use-carried-item-on-target",
            EventKind::LocationEntered => "location-entered",
            EventKind::LocationLeft => "location-left",
            EventKind::LoadCutscene => "load-cutscene",
            EventKind::CutsceneLoaded => "cutscene-loaded",
            EventKind::EndCutscene => "end-cutscene",
            EventKind::LoadingProgress => "loading-progress",
            EventKind::ChapterReady => "chapter-ready",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ChapterEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChapterEvent::Initialized { .. } => EventKind::Initialized,
            ChapterEvent::PrimaryInteract { .. } => EventKind::PrimaryInteract,
            ChapterEvent::UseCarriedItemOnTarget { .. } => EventKind::UseCarriedItemOnTarget,
            ChapterEvent::LocationEntered { .. } => EventKind::LocationEntered,
            ChapterEvent::LocationLeft { .. } => EventKind::LocationLeft,
            ChapterEvent::LoadCutscene { .. } => EventKind::LoadCutscene,
            ChapterEvent::CutsceneLoaded { .. } => EventKind::CutsceneLoaded,
            ChapterEvent::EndCutscene { .. } => EventKind::EndCutscene,
            ChapterEvent::LoadingProgress { .. } => EventKind::LoadingProgress,
            ChapterEvent::ChapterReady { .. } => EventKind::ChapterReady,
        }
    }
}

/// Requests the behavior layer may queue back into the core. Applied by the
/// chapter at the end of the tick in which they were queued.
#[derive(Debug, Clone, PartialEq)]
pub enum ChapterCommand {
    JumpTo {
        destination: LocationId,
        fade_seconds: f32,
    },
    AddItem {
        item: ItemDefId,
    },
    RemoveItem {
        item: ItemDefId,
    },
    DropCarriedItem,
    SetInteractableActive {
        target: InteractableId,
        active: bool,
    },
    ShowDescription {
        text: String,
    },
    ShakeLocation {
        location: LocationId,
        vertical: u32,
        horizontal: u32,
        duration_seconds: f32,
    },
    ChangeBackground {
        location: LocationId,
        background: String,
    },
    UpdateItem {
        item: ItemDefId,
        update: ItemUpdate,
    },
    PlayCutscene {
        cutscene: String,
    },
    CutsceneLoaded,
    EndCutscene,
    SetReceivingInputs {
        receive: bool,
    },
}

impl ChapterCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ChapterCommand::JumpTo { .. } => "jump_to",
            ChapterCommand::AddItem { .. } => "add_item",
            ChapterCommand::RemoveItem { .. } => "remove_item",
            ChapterCommand::DropCarriedItem => "drop_carried_item",
            ChapterCommand::SetInteractableActive { .. } => "set_interactable_active",
            ChapterCommand::ShowDescription { .. } => "show_description",
            ChapterCommand::ShakeLocation { .. } => "shake_location",
            ChapterCommand::ChangeBackground { .. } => "change_background",
            ChapterCommand::UpdateItem { .. } => "update_item",
            ChapterCommand::PlayCutscene { .. } => "play_cutscene",
            ChapterCommand::CutsceneLoaded => "cutscene_loaded",
            ChapterCommand::EndCutscene => "end_cutscene",
            ChapterCommand::SetReceivingInputs { .. } => "set_receiving_inputs",
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<ChapterCommand>,
}

impl CommandQueue {
    pub fn push(&mut self, command: ChapterCommand) {
        self.pending.push_back(command);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn take(&mut self) -> VecDeque<ChapterCommand> {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type EventHandler = Box<dyn FnMut(&ChapterEvent, &mut CommandQueue)>;

struct Subscriber {
    id: SubscriptionId,
    kinds: Vec<EventKind>,
    handler: EventHandler,
}

/// Owned publish/subscribe hub. Handlers run synchronously inside `publish`
/// and can only talk back through the command queue.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    commands: CommandQueue,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending_commands", &self.commands.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe<F>(&mut self, kinds: &[EventKind], handler: F) -> SubscriptionId
    where
        F: FnMut(&ChapterEvent, &mut CommandQueue) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.subscribers.push(Subscriber {
            id,
            kinds: kinds.to_vec(),
            handler: Box::new(handler),
        });
        id
    }

    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&ChapterEvent, &mut CommandQueue) + 'static,
    {
        self.subscribe(&EventKind::ALL, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        before != self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Delivers `event` to every subscriber of its kind, returning how many ran.
    pub fn publish(&mut self, event: ChapterEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for subscriber in &mut self.subscribers {
            if subscriber.kinds.contains(&kind) {
                (subscriber.handler)(&event, &mut self.commands);
                delivered += 1;
            }
        }
        trace!(event = %kind, delivered, "event_published");
        delivered
    }

    pub fn queue_command(&mut self, command: ChapterCommand) {
        self.commands.push(command);
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub(crate) fn take_commands(&mut self) -> VecDeque<ChapterCommand> {
        self.commands.take()
    }
}
