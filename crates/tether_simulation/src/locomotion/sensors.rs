//! Staging компоненты между physics backend и locomotion tick
//!
//! Backend пишет GroundSensor + GroundProbeSample (до tick),
//! tick пишет PendingDisplacement, backend применяет его (после tick).

use bevy::prelude::*;

use super::collaborators::{GroundProbe, ProbeHit};
use super::slope::ProbeRay;

/// Физический grounded после последнего перемещения
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct GroundSensor {
    pub grounded: bool,
}

/// Результат slope probe, снятый backend'ом до tick
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GroundProbeSample {
    pub ray: Option<ProbeRay>,
    pub hit: Option<ProbeHit>,
}

impl GroundProbeSample {
    pub fn record(ray: ProbeRay, probe: &dyn GroundProbe) -> Self {
        Self { ray: Some(ray), hit: ray.cast(probe) }
    }
}

impl GroundProbe for GroundProbeSample {
    /// Отвечаем только на тот же запрос, что снимал backend
    fn cast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<ProbeHit> {
        let requested = ProbeRay { origin, radius, direction, max_distance };
        match self.ray {
            Some(ray) if ray == requested => self.hit,
            _ => None,
        }
    }
}

/// Displacement, которое tick просит применить
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PendingDisplacement(pub Vec3);
