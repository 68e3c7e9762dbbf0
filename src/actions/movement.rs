//! Movement actor: heading + clamped speed become a displacement

use glam::Vec2;

use crate::actions::actor::{Actor, ActorKind, Command};
use crate::actions::influence::Influence;
use crate::core::error::Result;
use crate::core::types::{ActorId, Attachment, BodyId};

#[derive(Debug, Clone)]
pub struct MovementActor {
    attachment: Attachment<ActorId>,
    max_speed: i32,
    speed: i32,
    heading_deg: f32,
}

impl MovementActor {
    pub fn new(max_speed: i32) -> Self {
        Self {
            attachment: Attachment::new(ActorId::new()),
            max_speed: max_speed.max(0),
            speed: 0,
            heading_deg: 0.0,
        }
    }

    pub fn max_speed(&self) -> i32 {
        self.max_speed
    }

    /// Lowering the cap re-clamps the current speed
    pub fn set_max_speed(&mut self, max_speed: i32) {
        self.max_speed = max_speed.max(0);
        self.set_speed(self.speed);
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Speed is always kept within `[0, max_speed]`
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed.clamp(0, self.max_speed);
    }

    pub fn heading_deg(&self) -> f32 {
        self.heading_deg
    }

    pub fn set_heading(&mut self, heading_deg: f32) {
        self.heading_deg = heading_deg;
    }

    /// Displacement for the current heading and speed, truncated toward zero
    pub fn displacement(&self) -> Vec2 {
        let radians = self.heading_deg.to_radians();
        let speed = self.speed as f32;
        Vec2::new(radians.cos() * speed, radians.sin() * speed).trunc()
    }
}

impl Actor for MovementActor {
    fn id(&self) -> ActorId {
        self.attachment.id
    }

    fn body(&self) -> Option<BodyId> {
        self.attachment.body
    }

    fn attach(&mut self, body: BodyId) -> Result<()> {
        self.attachment.bind(body)
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Movement {
            max_speed: self.max_speed,
        }
    }

    fn configure(&mut self, command: &Command) -> bool {
        match *command {
            Command::Move { heading_deg, speed } => {
                self.set_heading(heading_deg);
                self.set_speed(speed);
                true
            }
            Command::Target(_) => false,
        }
    }

    fn act(&mut self) -> Option<Influence> {
        if self.speed <= 0 {
            return None;
        }
        let body = self.attachment.body?;
        let delta = self.displacement();
        if delta == Vec2::ZERO {
            return None;
        }
        Some(Influence::displacement(self.id(), body, delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::influence::Effect;

    #[test]
    fn test_speed_is_clamped() {
        let mut actor = MovementActor::new(10);
        actor.set_speed(25);
        assert_eq!(actor.speed(), 10);
        actor.set_speed(-3);
        assert_eq!(actor.speed(), 0);
        actor.set_speed(7);
        actor.set_max_speed(5);
        assert_eq!(actor.speed(), 5);
    }

    #[test]
    fn test_heading_zero_moves_along_x() {
        let mut actor = MovementActor::new(10);
        let body = BodyId::new();
        actor.attach(body).unwrap();
        assert!(actor.configure(&Command::Move {
            heading_deg: 0.0,
            speed: 10
        }));

        let influence = actor.act().unwrap();
        assert_eq!(influence.target, body);
        assert_eq!(influence.effect, Effect::Displace(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_displacement_truncates_toward_zero() {
        let mut actor = MovementActor::new(10);
        actor.set_heading(135.0);
        actor.set_speed(10);
        // cos(135) * 10 = -7.07, sin(135) * 10 = 7.07
        assert_eq!(actor.displacement(), Vec2::new(-7.0, 7.0));
    }

    #[test]
    fn test_zero_speed_is_a_no_op() {
        let mut actor = MovementActor::new(10);
        actor.attach(BodyId::new()).unwrap();
        assert!(actor.act().is_none());
    }

    #[test]
    fn test_unattached_actor_never_fires() {
        let mut actor = MovementActor::new(10);
        actor.set_speed(10);
        assert!(actor.act().is_none());
    }

    #[test]
    fn test_rejects_target_command() {
        let mut actor = MovementActor::new(10);
        assert!(!actor.configure(&Command::Target(BodyId::new())));
    }
}
