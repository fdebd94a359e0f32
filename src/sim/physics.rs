//! Physics integrator
//!
//! Advances every falling fruit by one step and resolves wall and floor
//! contact. Walls reflect horizontal velocity; the floor is inelastic.

use glam::Vec2;

use super::fruit::{Fruit, FruitId};

/// What happened during one integration step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrationReport {
    /// Fruit whose box crossed the floor line before clamping
    pub floor_contacts: Vec<FruitId>,
}

/// Advance `fruits` by one tick inside `bounds` (width, height).
///
/// `gravity` is added to vertical velocity before the position update.
pub fn integrate(fruits: &mut [Fruit], bounds: Vec2, gravity: f32) -> IntegrationReport {
    let mut report = IntegrationReport::default();

    for fruit in fruits.iter_mut() {
        fruit.vel.y += gravity;
        fruit.pos += fruit.vel;

        // Side walls
        if fruit.pos.x < 0.0 {
            fruit.pos.x = 0.0;
            fruit.vel.x = fruit.vel.x.abs();
        } else if fruit.right() > bounds.x {
            fruit.pos.x = bounds.x - fruit.size;
            fruit.vel.x = -fruit.vel.x.abs();
        }

        // Floor: stop dead, no bounce
        if fruit.bottom() > bounds.y {
            report.floor_contacts.push(fruit.id);
            fruit.pos.y = bounds.y - fruit.size;
            fruit.vel.y = 0.0;
        }
    }

    report
}
