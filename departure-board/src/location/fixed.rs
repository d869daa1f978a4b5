//! Position sensor backed by a configured position.

use crate::domain::Coordinates;

use super::provider::{PositionOptions, PositionSensor};

/// Reports the same position every time.
///
/// A terminal process has no device sensor, so the position comes from
/// configuration instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSensor {
    position: Coordinates,
}

impl FixedSensor {
    /// Create a sensor that always reports `position`.
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

impl PositionSensor for FixedSensor {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Coordinates, u16> {
        Ok(self.position)
    }
}
