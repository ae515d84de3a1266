//! Input seam: the session consumes movement vectors and pause toggles
//! through this trait, never a device directly.

/// Source of player intent for one session.
pub(crate) trait InputSource {
    /// Movement direction for the upcoming tick, as a unit (or zero)
    /// vector.
    fn movement(&mut self) -> (f32, f32);

    /// Reports and consumes a pause press.
    fn pause_toggled(&mut self) -> bool;
}

/// Deterministic input that orbits the player for headless runs.
#[derive(Debug, Default)]
pub(crate) struct ScriptedInput {
    tick: u32,
}

impl ScriptedInput {
    /// Creates a scripted source starting at the first step.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl InputSource for ScriptedInput {
    fn movement(&mut self) -> (f32, f32) {
        self.tick = self.tick.wrapping_add(1);
        // One slow revolution roughly every ten seconds of ticks.
        let angle = (self.tick % 600) as f32 / 600.0 * std::f32::consts::TAU;
        (angle.cos(), angle.sin())
    }

    fn pause_toggled(&mut self) -> bool {
        false
    }
}

/// Input that never moves; handy for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct IdleInput;

#[cfg(test)]
impl InputSource for IdleInput {
    fn movement(&mut self) -> (f32, f32) {
        (0.0, 0.0)
    }

    fn pause_toggled(&mut self) -> bool {
        false
    }
}
