use crate::config::MotionConfig;

/// The selectable visual modes of the Limitless canvas, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Technique {
    #[default]
    Infinity,
    Blue,
    Red,
    Purple,
    Void,
}

/// How live slots follow the technique each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Integrator {
    /// Close `factor` of the distance to the target field per frame.
    Ease { factor: f32 },
    /// Spawn-scheduled kinematics; the target field is unused.
    Spawn,
}

/// When the target field is (re)generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Once, on entry.
    OnEntry,
    /// Every frame from the mode clock.
    PerFrame,
}

/// Per-frame change to the cloud's model rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    Spin { y: f32, z: f32 },
    /// Hold the cloud unrotated.
    Reset,
}

/// Everything the controller needs to know about a technique.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    pub integrator: Integrator,
    /// Zero the live buffer and restart the mode clock on entry.
    pub reset_on_entry: bool,
    pub refresh: Refresh,
    pub rotation: Rotation,
    /// Base point size handed to the presenter.
    pub point_size: f32,
    /// Paint an opaque black background instead of fading trails.
    pub opaque_background: bool,
}

impl Technique {
    pub const ALL: [Technique; 5] = [
        Technique::Infinity,
        Technique::Blue,
        Technique::Red,
        Technique::Purple,
        Technique::Void,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Cyclic step; any sign and magnitude wraps.
    pub fn step(self, direction: i32) -> Self {
        let len = Self::ALL.len() as i64;
        let next = (self.index() as i64 + i64::from(direction)).rem_euclid(len);
        Self::from_index(next as usize)
    }

    pub fn next(self) -> Self {
        self.step(1)
    }

    pub fn prev(self) -> Self {
        self.step(-1)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Technique::Infinity => "Limitless: Infinity",
            Technique::Blue => "Cursed Technique Lapse: Blue",
            Technique::Red => "Cursed Technique Reversal: Red",
            Technique::Purple => "Hollow Technique: Purple",
            Technique::Void => "Domain Expansion: Unlimited Void",
        }
    }

    pub fn behavior(self, motion: &MotionConfig) -> Behavior {
        let scale = motion.rot_scale;
        let eased = |rotation, point_size| Behavior {
            integrator: Integrator::Ease { factor: 0.1 },
            reset_on_entry: false,
            refresh: Refresh::OnEntry,
            rotation,
            point_size,
            opaque_background: false,
        };

        match self {
            Technique::Infinity => Behavior {
                integrator: Integrator::Spawn,
                reset_on_entry: true,
                refresh: Refresh::OnEntry,
                rotation: Rotation::Spin {
                    y: motion.pan_rot_y,
                    z: 0.0,
                },
                point_size: 0.18,
                opaque_background: false,
            },
            Technique::Blue => eased(Rotation::Spin { y: 0.0, z: -0.1 * scale }, 0.24),
            Technique::Red => eased(Rotation::Spin { y: 0.0, z: 0.1 * scale }, 0.24),
            Technique::Purple => eased(
                Rotation::Spin {
                    y: 0.05 * scale,
                    z: 0.2 * scale,
                },
                0.3,
            ),
            Technique::Void => Behavior {
                integrator: Integrator::Ease { factor: 0.15 },
                reset_on_entry: false,
                refresh: Refresh::PerFrame,
                rotation: Rotation::Reset,
                point_size: 0.1,
                opaque_background: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_both_ways() {
        assert_eq!(Technique::Infinity.prev(), Technique::Void);
        assert_eq!(Technique::Void.next(), Technique::Infinity);
        assert_eq!(Technique::Blue.step(3), Technique::Void);
        assert_eq!(Technique::Blue.step(-7), Technique::Void);
    }

    #[test]
    fn only_infinity_resets_on_entry() {
        let motion = MotionConfig::default();
        let resetting: Vec<_> = Technique::ALL
            .iter()
            .filter(|t| t.behavior(&motion).reset_on_entry)
            .collect();
        assert_eq!(resetting, vec![&Technique::Infinity]);
        assert_eq!(Technique::Infinity.behavior(&motion).integrator, Integrator::Spawn);
    }

    #[test]
    fn spins_are_scaled() {
        let motion = MotionConfig::default();
        match Technique::Purple.behavior(&motion).rotation {
            Rotation::Spin { y, z } => {
                assert!((y - 0.0175).abs() < 1e-6);
                assert!((z - 0.07).abs() < 1e-6);
            }
            Rotation::Reset => panic!("purple should spin"),
        }
        assert_eq!(Technique::Void.behavior(&motion).rotation, Rotation::Reset);
    }

    #[test]
    fn names_for_status_text() {
        assert_eq!(Technique::Void.display_name(), "Domain Expansion: Unlimited Void");
        assert_eq!(Technique::default().display_name(), "Limitless: Infinity");
    }
}
