use tracing::{info, warn};

use super::{Chapter, ChapterError};
use crate::app::gate::GateHold;
use crate::app::location::{
    Crossfade, Location, LocationId, OffscreenTarget, Transition, BACK_DEPTH, FRONT_DEPTH,
};

/// Longer fades are almost certainly authoring mistakes and get clamped.
pub const MAX_FADE_SECONDS: f32 = 10.0;

impl Chapter {
    /// Moves from the current location to `destination`. The current location
    /// switches immediately; a non-positive fade snaps within this call,
    /// otherwise a crossfade runs and the gate stays closed until it ends.
    pub fn jump_to(
        &mut self,
        destination: LocationId,
        fade_seconds: f32,
    ) -> Result<(), ChapterError> {
        if !self.initialized {
            return Err(ChapterError::NotInitialized);
        }
        let destination_index = self.location_index(destination)?;
        let source = self.current;
        let source_index = self.location_index(source)?;
        if destination == source {
            return Err(ChapterError::JumpToSelf(destination));
        }
        if self.locations.iter().any(Location::is_transitioning) {
            return Err(ChapterError::TransitionInFlight { current: source });
        }

        self.gate.close(GateHold::Navigation);
        self.current = destination;

        if fade_seconds.is_nan() || fade_seconds <= 0.0 {
            self.snap(source_index, destination_index);
            return Ok(());
        }

        let fade_seconds = if fade_seconds > MAX_FADE_SECONDS {
            warn!(
                requested = fade_seconds,
                clamped = MAX_FADE_SECONDS,
                "crossfade_duration_clamped"
            );
            MAX_FADE_SECONDS
        } else {
            fade_seconds
        };
        let target = self.allocate_offscreen();

        let incoming = &mut self.locations[destination_index];
        incoming.set_active(true, &mut self.events);
        incoming.camera_mut().depth = FRONT_DEPTH;
        incoming.set_transition(Transition::FadingIn(Crossfade::new(
            source,
            fade_seconds,
            target,
        )));

        let outgoing = &mut self.locations[source_index];
        outgoing.camera_mut().depth = BACK_DEPTH;
        outgoing.camera_mut().offscreen = Some(target);
        outgoing.set_transition(Transition::FadingOut { destination });

        info!(
            from = %self.locations[source_index].name(),
            to = %self.locations[destination_index].name(),
            fade_seconds,
            "crossfade_started"
        );
        Ok(())
    }

    fn snap(&mut self, source_index: usize, destination_index: usize) {
        let incoming = &mut self.locations[destination_index];
        incoming.set_active(true, &mut self.events);
        incoming.camera_mut().depth = FRONT_DEPTH;

        let outgoing = &mut self.locations[source_index];
        outgoing.camera_mut().depth = BACK_DEPTH;
        outgoing.set_active(false, &mut self.events);

        self.gate.release(GateHold::Navigation);
        info!(
            from = %self.locations[source_index].name(),
            to = %self.locations[destination_index].name(),
            "location_snapped"
        );
    }

    pub(super) fn step_transitions(&mut self, dt_seconds: f32) {
        let mut finished = Vec::new();
        for location in &mut self.locations {
            let destination = location.id();
            if let Transition::FadingIn(crossfade) = location.transition_mut() {
                if crossfade.step(dt_seconds).is_finished() {
                    finished.push((destination, crossfade.source, crossfade.target));
                }
            }
        }
        for (destination, source, target) in finished {
            self.finish_crossfade(destination, source, target);
        }
    }

    fn finish_crossfade(
        &mut self,
        destination: LocationId,
        source: LocationId,
        target: OffscreenTarget,
    ) {
        if let Ok(index) = self.location_index(source) {
            let outgoing = &mut self.locations[index];
            outgoing.camera_mut().offscreen = None;
            outgoing.set_active(false, &mut self.events);
            outgoing.set_transition(Transition::Idle);
        }
        if let Ok(index) = self.location_index(destination) {
            self.locations[index].set_transition(Transition::Idle);
        }
        self.gate.release(GateHold::Navigation);
        info!(
            destination = destination.0,
            offscreen_target = target.0,
            "crossfade_finished"
        );
    }
}
