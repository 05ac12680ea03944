//! Scene graph: placed meshes mirrored from the round state

use glam::{Mat4, Quat, Vec3};

use super::geometry::{self, Mesh};
use super::vertex::Vertex;
use crate::sim::{Round, RoundState};

/// A mesh with a transform
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub position: Vec3,
    /// Yaw around +Y in radians
    pub rotation_y: f32,
    pub scale: Vec3,
    pub visible: bool,
}

impl SceneObject {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: Vec3::ONE,
            visible: true,
        }
    }

    /// Scale, then rotate, then translate
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.rotation_y),
            self.position,
        )
    }

    /// Append world-space vertices (nothing when hidden)
    pub fn append_world_vertices(&self, out: &mut Vec<Vertex>) {
        if !self.visible {
            return;
        }
        let model = self.model_matrix();
        out.extend(self.mesh.vertices.iter().map(|v| {
            let p = model.transform_point3(Vec3::from(v.position));
            Vertex::new(p.to_array(), v.color)
        }));
    }
}

/// Everything drawn each frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub track: Vec<SceneObject>,
    pub player: SceneObject,
    pub time_bar: SceneObject,
    /// Absent until the model finishes loading (or forever, if it fails)
    pub doll: Option<SceneObject>,
}

impl Scene {
    pub fn new(start_x: f32) -> Self {
        Self {
            track: geometry::create_track(),
            player: geometry::create_player(start_x),
            time_bar: geometry::create_time_bar(),
            doll: None,
        }
    }

    /// Install the loaded doll model
    pub fn set_doll_model(&mut self, mesh: Mesh) {
        log::info!("Doll model ready ({} vertices)", mesh.vertex_count());
        self.doll = Some(geometry::create_doll(mesh));
    }

    /// Mirror round state into object transforms
    pub fn sync(&mut self, round: &Round) {
        self.player.position.x = round.player().position;

        if let Some(doll) = self.doll.as_mut() {
            doll.rotation_y = round.doll().rotation_y();
        }

        self.time_bar.visible = round.state() >= RoundState::Running;
        self.time_bar.scale.x = round.time_bar();
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.track
            .iter()
            .chain(std::iter::once(&self.player))
            .chain(std::iter::once(&self.time_bar))
            .chain(self.doll.iter())
    }

    /// Flatten visible objects into one world-space triangle list
    pub fn world_vertices(&self) -> Vec<Vertex> {
        let capacity = self.objects().map(|o| o.mesh.vertex_count()).sum();
        let mut vertices = Vec::with_capacity(capacity);
        for object in self.objects() {
            object.append_world_vertices(&mut vertices);
        }
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoundConfig;
    use crate::consts::{FACING_AWAY_ROTATION, START_POSITION};
    use crate::renderer::geometry::box_mesh;
    use crate::renderer::vertex::colors;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_model_matrix_order() {
        let mut object = SceneObject::new(Mesh::new());
        object.position = Vec3::new(1.0, 0.0, 0.0);
        object.rotation_y = std::f32::consts::FRAC_PI_2;
        object.scale = Vec3::splat(2.0);

        // +X scaled to 2, yawed to -Z, then moved by +1 X
        let p = object.model_matrix().transform_point3(Vec3::X);
        assert!(approx(p.x, 1.0));
        assert!(approx(p.z, -2.0));
    }

    #[test]
    fn test_hidden_objects_emit_nothing() {
        let mut object = SceneObject::new(box_mesh(Vec3::ONE, colors::PLAYER));
        let mut out = Vec::new();
        object.append_world_vertices(&mut out);
        assert_eq!(out.len(), 36);

        object.visible = false;
        out.clear();
        object.append_world_vertices(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_doll_is_optional() {
        let mut scene = Scene::new(START_POSITION);
        let without = scene.world_vertices().len();

        scene.set_doll_model(box_mesh(Vec3::ONE, colors::PLAYER));
        assert_eq!(scene.world_vertices().len(), without + 36);
    }

    #[test]
    fn test_sync_tracks_round() {
        let mut round = Round::new(RoundConfig::default(), 1).unwrap();
        let mut scene = Scene::new(START_POSITION);
        scene.set_doll_model(box_mesh(Vec3::ONE, colors::PLAYER));

        round.begin(0.0);
        scene.sync(&round);
        assert!(!scene.time_bar.visible);
        assert!(approx(scene.player.position.x, START_POSITION));

        // Run into the round, past the first turn toward the player
        let mut now = 0.0;
        while round.state() != RoundState::Running {
            now += 1000.0 / 60.0;
            round.frame(now);
        }
        for _ in 0..30 {
            now += 1000.0 / 60.0;
            round.frame(now);
        }
        scene.sync(&round);

        assert!(scene.time_bar.visible);
        assert!(scene.time_bar.scale.x < 1.0);
        assert!(approx(scene.time_bar.scale.x, round.time_bar()));
        let doll = scene.doll.as_ref().unwrap();
        assert!(approx(doll.rotation_y, round.doll().rotation_y()));
        assert!(doll.rotation_y > FACING_AWAY_ROTATION);
    }
}
