use bevy::prelude::*;
use std::collections::HashSet;

/// The four signals the player controller consumes each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    /// Rising edge of the up/jump key, not "held".
    pub up_just_pressed: bool,
}

/// Abstraction layer between raw input and the session.
/// Both keyboard (windowed) and scripted (headless) input write to this.
#[derive(Resource, Default, Clone)]
pub struct VirtualInput {
    pub active: HashSet<String>,
    pub just_pressed: HashSet<String>,
}

impl VirtualInput {
    pub fn pressed(&self, action: &str) -> bool {
        self.active.contains(action)
    }

    pub fn just_pressed(&self, action: &str) -> bool {
        self.just_pressed.contains(action)
    }

    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.pressed("left"),
            right: self.pressed("right"),
            down: self.pressed("down"),
            up_just_pressed: self.just_pressed("up"),
        }
    }

    /// Replace the held set and add any new edges. Edges stay until a fixed
    /// tick consumes them through [`VirtualInput::clear_frame`].
    pub fn apply(&mut self, input: FrameInput) {
        self.active.clear();
        for (held, action) in [
            (input.left, "left"),
            (input.right, "right"),
            (input.down, "down"),
        ] {
            if held {
                self.active.insert(action.into());
            }
        }
        if input.up_just_pressed {
            self.active.insert("up".into());
            self.just_pressed.insert("up".into());
        }
    }

    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
    }
}

/// Deterministic input for headless runs.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptedInput {
    Idle,
    /// Hold right and tap jump every `every` frames.
    RightJump { every: u64 },
}

impl ScriptedInput {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "idle" => Some(Self::Idle),
            "right-jump" | "right_jump" => Some(Self::RightJump { every: 45 }),
            _ => None,
        }
    }

    pub fn at_frame(&self, frame: u64) -> FrameInput {
        match *self {
            Self::Idle => FrameInput::default(),
            Self::RightJump { every } => FrameInput {
                right: true,
                up_just_pressed: every > 0 && frame % every == 0,
                ..Default::default()
            },
        }
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(VirtualInput::default()).add_systems(
            PreUpdate,
            (
                keyboard_to_virtual.run_if(resource_exists::<ButtonInput<KeyCode>>),
                scripted_to_virtual.run_if(resource_exists::<ScriptedInput>),
            ),
        );
    }
}

/// Translate keyboard input to VirtualInput action names
fn keyboard_to_virtual(keyboard: Res<ButtonInput<KeyCode>>, mut vinput: ResMut<VirtualInput>) {
    let left = keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
    let right = keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
    let down = keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);
    let up = keyboard.any_just_pressed([KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp]);
    vinput.apply(FrameInput {
        left,
        right,
        down,
        up_just_pressed: up,
    });
}

fn scripted_to_virtual(
    script: Res<ScriptedInput>,
    session: Option<Res<crate::session::Session>>,
    mut vinput: ResMut<VirtualInput>,
) {
    let frame = session.map(|s| s.frame()).unwrap_or(0);
    vinput.apply(script.at_frame(frame));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_input_round_trips_frame_signals() {
        let mut v = VirtualInput::default();
        let input = FrameInput {
            left: true,
            right: false,
            down: true,
            up_just_pressed: true,
        };
        v.apply(input);
        assert_eq!(v.frame_input(), input);
        v.clear_frame();
        v.apply(FrameInput::default());
        assert_eq!(v.frame_input(), FrameInput::default());
    }

    #[test]
    fn jump_edge_survives_until_consumed() {
        let mut v = VirtualInput::default();
        v.apply(FrameInput {
            up_just_pressed: true,
            ..Default::default()
        });
        // A frame with no fixed tick rebuilds the held set but keeps the edge.
        v.apply(FrameInput {
            right: true,
            ..Default::default()
        });
        let frame = v.frame_input();
        assert!(frame.up_just_pressed);
        assert!(frame.right);
        assert!(!v.pressed("up"));

        v.clear_frame();
        assert!(!v.frame_input().up_just_pressed);
    }

    #[test]
    fn right_jump_script_taps_jump_periodically() {
        let script = ScriptedInput::parse("right-jump").unwrap();
        assert!(script.at_frame(0).up_just_pressed);
        assert!(!script.at_frame(1).up_just_pressed);
        assert!(script.at_frame(45).up_just_pressed);
        assert!(script.at_frame(7).right);
        assert_eq!(ScriptedInput::parse("moonwalk"), None);
    }
}
