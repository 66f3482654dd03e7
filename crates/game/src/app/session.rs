use std::time::Duration;

use pointclick_engine::{
    stage_to_screen, InputAction, InputSnapshot, ScreenSize, ScriptedFrame, Vec2,
};

use super::behavior::{ClickButton, SessionStep};

/// Expands session steps into one frame per tick at `frame_delta`. The
/// pointer stays where the last `move_to` put it.
pub(crate) fn build_frames(
    steps: &[SessionStep],
    screen: ScreenSize,
    frame_delta: Duration,
) -> Vec<ScriptedFrame> {
    let frame_seconds = frame_delta.as_secs_f32().max(f32::EPSILON);
    let mut pointer_px = stage_to_screen(Vec2::ZERO, screen);
    let mut frames = Vec::new();
    let frame = |pointer_px: Vec2| {
        InputSnapshot::empty()
            .with_cursor_position_px(Some(pointer_px))
            .with_window_size(screen)
    };

    for step in steps {
        match *step {
            SessionStep::Wait(seconds) => {
                let count = (seconds.max(0.0) / frame_seconds).ceil() as usize;
                frames.extend(
                    (0..count).map(|_| ScriptedFrame::new(frame_delta, frame(pointer_px))),
                );
            }
            SessionStep::MoveTo(stage) => {
                pointer_px = stage_to_screen(stage, screen);
                frames.push(ScriptedFrame::new(frame_delta, frame(pointer_px)));
            }
            SessionStep::Click(button) => {
                let action = match button {
                    ClickButton::Primary => InputAction::Primary,
                    ClickButton::Secondary => InputAction::Secondary,
                };
                frames.push(ScriptedFrame::new(
                    frame_delta,
                    frame(pointer_px).with_pressed(action, true),
                ));
            }
            SessionStep::Hint => frames.push(ScriptedFrame::new(
                frame_delta,
                frame(pointer_px).with_pressed(InputAction::Hint, true),
            )),
            SessionStep::Quit => frames.push(ScriptedFrame::new(
                frame_delta,
                frame(pointer_px).with_pressed(InputAction::Quit, true),
            )),
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_expand_to_frames_in_screen_pixels() {
        let screen = ScreenSize::default();
        let delta = Duration::from_millis(100);
        let steps = [
            SessionStep::Wait(0.25),
            SessionStep::MoveTo(Vec2::new(-300.0, 100.0)),
            SessionStep::Click(ClickButton::Secondary),
            SessionStep::Quit,
        ];

        let frames = build_frames(&steps, screen, delta);

        assert_eq!(frames.len(), 6);
        assert!(frames.iter().all(|frame| frame.delta == delta));
        assert_eq!(
            frames[0].input.cursor_position_px(),
            Some(Vec2::new(640.0, 360.0))
        );
        assert_eq!(
            frames[3].input.cursor_position_px(),
            Some(Vec2::new(340.0, 260.0))
        );
        assert!(frames[4].input.secondary_pressed());
        assert_eq!(
            frames[4].input.cursor_position_px(),
            Some(Vec2::new(340.0, 260.0))
        );
        assert!(frames[5].input.quit_requested());
        assert!(!frames[0].input.primary_pressed());
    }
}
