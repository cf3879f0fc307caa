use crate::bodies::Body;
use crate::math::{Axis, Vector3};

impl Body {
    /// Keeps the body inside the box `[-half_extent, half_extent]`.
    ///
    /// Each axis is handled on its own: a body poking out is clamped back so
    /// its surface touches the wall and the velocity on that axis is reflected
    /// and scaled by `damping`. Static bodies are left alone. Returns how many
    /// axes were hit.
    pub fn confine(&mut self, half_extent: Vector3, damping: f32) -> usize {
        if self.is_static() {
            return 0;
        }

        let mut hits = 0;
        for axis in Axis::ALL {
            let min = -half_extent[axis] + self.radius;
            let max = half_extent[axis] - self.radius;
            let position = self.position[axis];

            let clamped = if min > max {
                // The box is thinner than the body on this axis
                0.0
            } else if position < min {
                min
            } else if position > max {
                max
            } else {
                continue;
            };

            if clamped == position {
                continue;
            }

            self.position[axis] = clamped;
            self.velocity[axis] = -self.velocity[axis] * damping;
            hits += 1;
        }

        hits
    }
}
