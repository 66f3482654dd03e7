use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::events::{ChapterEvent, EventBus};
use super::geometry::Vec2;
use super::interactable::{Interactable, InteractableId};
use super::schedule::StepOutcome;
use crate::content::LocationDef;

pub const FRONT_DEPTH: i32 = 1;
pub const BACK_DEPTH: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u32);

/// Opaque offscreen render target handle, allocated by the chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffscreenTarget(pub u32);

/// What the presentation layer needs to know about a location's camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraHandle {
    pub enabled: bool,
    pub depth: i32,
    /// Set while this camera renders into an offscreen buffer for a crossfade.
    pub offscreen: Option<OffscreenTarget>,
    pub shake_offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossfade {
    pub source: LocationId,
    pub fade_seconds: f32,
    pub alpha: f32,
    pub target: OffscreenTarget,
}

impl Crossfade {
    pub(crate) fn new(source: LocationId, fade_seconds: f32, target: OffscreenTarget) -> Self {
        Self {
            source,
            fade_seconds,
            alpha: 1.0,
            target,
        }
    }

    /// Linear decay independent of frame rate, floored at zero.
    pub(crate) fn step(&mut self, dt_seconds: f32) -> StepOutcome {
        self.alpha = (self.alpha - dt_seconds.max(0.0) / self.fade_seconds).max(0.0);
        if self.alpha <= 0.0 {
            StepOutcome::Finished
        } else {
            StepOutcome::Running
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Transition {
    #[default]
    Idle,
    /// Destination side; owns the crossfade process.
    FadingIn(Crossfade),
    /// Source side, rendered offscreen until the destination finishes.
    FadingOut { destination: LocationId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    vertical: i32,
    horizontal: i32,
    remaining_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct Location {
    id: LocationId,
    name: String,
    is_start: bool,
    enabled: bool,
    background: String,
    camera: CameraHandle,
    interactables: Vec<Interactable>,
    initialized: bool,
    active: bool,
    transition: Transition,
    shake: Option<Shake>,
    rng: StdRng,
}

impl Location {
    /// Builds a location and its interactables, drawing ids from `next_interactable`.
    pub fn from_def(id: LocationId, def: &LocationDef, next_interactable: &mut u32) -> Self {
        let interactables = def
            .interactables
            .iter()
            .map(|interactable| {
                let interactable_id = InteractableId(*next_interactable);
                *next_interactable = next_interactable.saturating_add(1);
                Interactable::from_def(interactable_id, id, interactable)
            })
            .collect();
        Self {
            id,
            name: def.name.clone(),
            is_start: def.start,
            enabled: def.enabled,
            background: def.background.clone(),
            camera: CameraHandle::default(),
            interactables,
            initialized: false,
            active: false,
            transition: Transition::Idle,
            shake: None,
            rng: StdRng::seed_from_u64(u64::from(id.0)),
        }
    }

    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn camera(&self) -> &CameraHandle {
        &self.camera
    }

    pub(crate) fn camera_mut(&mut self) -> &mut CameraHandle {
        &mut self.camera
    }

    pub fn interactables(&self) -> &[Interactable] {
        &self.interactables
    }

    pub fn interactable(&self, id: InteractableId) -> Option<&Interactable> {
        self.interactables.iter().find(|entry| entry.id() == id)
    }

    pub(crate) fn interactable_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.interactables.iter_mut().find(|entry| entry.id() == id)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub(crate) fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
    }

    pub(crate) fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    pub fn is_transitioning(&self) -> bool {
        !matches!(self.transition, Transition::Idle)
    }

    /// Brings the location online. Disabled locations are force-enabled:
    /// disabling is an editing convenience, not an exclusion mechanism.
    /// The location ends up inactive without going through `set_active`, so
    /// boot emits no `LocationLeft`; only the start location's
    /// `LocationEntered` follows once boot finishes.
    pub(crate) fn initialize(&mut self, events: &mut EventBus) {
        if self.initialized {
            debug!(location = %self.name, "location_already_initialized");
            return;
        }
        if !self.enabled {
            info!(location = %self.name, "location_force_enabled");
            self.enabled = true;
        }
        for interactable in &mut self.interactables {
            interactable.initialize(events);
        }
        self.initialized = true;
        self.active = false;
        self.camera.enabled = false;
        info!(
            location = %self.name,
            interactables = self.interactables.len(),
            "location_initialized"
        );
    }

    /// Enables or disables the location and its camera, notifying every
    /// interactable with its active flag at the moment of the change.
    pub(crate) fn set_active(&mut self, active: bool, events: &mut EventBus) {
        if self.active == active {
            return;
        }
        self.active = active;
        self.camera.enabled = active;
        for interactable in &self.interactables {
            let target = interactable.id();
            let was_active = interactable.is_active();
            let event = if active {
                ChapterEvent::LocationEntered { target, was_active }
            } else {
                ChapterEvent::LocationLeft { target, was_active }
            };
            events.publish(event);
        }
    }

    /// Topmost active interactable under `point`; later authoring order draws on top.
    pub fn interactable_at(&self, point: Vec2) -> Option<InteractableId> {
        self.interactables
            .iter()
            .rev()
            .find(|entry| entry.hit(point))
            .map(Interactable::id)
    }

    /// Tooltip text and anchor for every interactable the hint overlay should label.
    pub fn hint_candidates(&self) -> impl Iterator<Item = (&str, Vec2)> + '_ {
        self.interactables
            .iter()
            .filter(|entry| entry.is_initialized() && entry.is_active())
            .map(|entry| (entry.tooltip_text(), entry.bounds().center))
    }

    pub fn change_background(&mut self, background: impl Into<String>) {
        self.background = background.into();
        debug!(location = %self.name, background = %self.background, "background_changed");
    }

    /// Jitters the camera within the given pixel amounts for `duration_seconds`.
    /// A running shake is stopped and replaced.
    pub fn shake(&mut self, vertical: u32, horizontal: u32, duration_seconds: f32) {
        if self.shake.is_some() {
            debug!(location = %self.name, "shake_restarted");
            self.camera.shake_offset = Vec2::ZERO;
        }
        self.shake = Some(Shake {
            vertical: i32::try_from(vertical).unwrap_or(i32::MAX),
            horizontal: i32::try_from(horizontal).unwrap_or(i32::MAX),
            remaining_seconds: duration_seconds.max(0.0),
        });
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    pub(crate) fn step_shake(&mut self, dt_seconds: f32) {
        let Some(shake) = self.shake.as_mut() else {
            return;
        };
        shake.remaining_seconds -= dt_seconds.max(0.0);
        if shake.remaining_seconds <= 0.0 {
            self.shake = None;
            self.camera.shake_offset = Vec2::ZERO;
            return;
        }
        let x = self.rng.random_range(-shake.horizontal..=shake.horizontal);
        let y = self.rng.random_range(-shake.vertical..=shake.vertical);
        self.camera.shake_offset = Vec2::new(x as f32, y as f32);
    }
}
