use bitflags::bitflags;

bitflags! {
    /// Held movement keys sampled once per frame.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Controls: u8 {
        const UP     = 0x01;
        const DOWN   = 0x02;
        const LEFT   = 0x04;
        const RIGHT  = 0x08;
        /// Edge-triggered: starts a jump arc if none is in flight.
        const JUMP   = 0x10;
        const CROUCH = 0x20;
    }
}

/// Pending relative mouse motion, at most one delta per axis per frame.
///
/// Each axis is consumed with [`Option::take`], so a delta is applied
/// exactly once no matter how often the integrator runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookInput {
    pub dx: Option<i32>,
    pub dy: Option<i32>,
}

impl LookInput {
    /// Record motion; a zero delta leaves the axis empty and an already
    /// pending delta is kept until consumed.
    pub fn push(&mut self, dx: i32, dy: i32) {
        if self.dx.is_none() && dx != 0 {
            self.dx = Some(dx);
        }
        if self.dy.is_none() && dy != 0 {
            self.dy = Some(dy);
        }
    }
}

/// Debug overlay toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlays {
    pub map: bool,
    pub fps: bool,
}

/// Everything the frame loop hands to the integrators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub controls: Controls,
    pub look: LookInput,
    pub overlays: Overlays,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delta_per_axis_wins() {
        let mut look = LookInput::default();
        look.push(0, 4);
        look.push(-3, 9);
        assert_eq!(look.dx, Some(-3));
        assert_eq!(look.dy, Some(4));
    }
}
