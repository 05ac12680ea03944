//! Mesh generation for the scene primitives
//!
//! All meshes are built in model space and positioned through
//! [`SceneObject`] transforms, so the same box mesh serves the wall,
//! the side posts and the time bar.

use glam::Vec3;
use std::f32::consts::PI;

use super::scene::SceneObject;
use super::vertex::{Vertex, colors};
use crate::consts::{END_POSITION, START_POSITION};

/// Track height (wall and posts)
pub const TRACK_HEIGHT: f32 = 1.5;
/// Track depth (wall and posts)
pub const TRACK_DEPTH: f32 = 1.0;
/// Width of each side post
pub const SIDE_POST_WIDTH: f32 = 0.2;
/// Inward yaw of the side posts
pub const SIDE_POST_ANGLE: f32 = 0.35;
/// Back wall sits behind the play line
pub const BACK_WALL_Z: f32 = -1.0;

pub const PLAYER_RADIUS: f32 = 0.3;
pub const PLAYER_WIDTH_SEGMENTS: u32 = 32;
pub const PLAYER_HEIGHT_SEGMENTS: u32 = 16;
/// Player runs in front of the track
pub const PLAYER_Z: f32 = 1.0;

/// Time bar dimensions at full scale
pub const TIME_BAR_SIZE: Vec3 = Vec3::new(5.0, 0.1, 1.0);
pub const TIME_BAR_Y: f32 = 3.35;

/// Doll placement
pub const DOLL_POSITION: Vec3 = Vec3::new(0.0, -1.5, 0.3);
pub const DOLL_SCALE: f32 = 0.4;

/// Non-indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: [f32; 4]) {
        self.vertices.push(Vertex::new(a.to_array(), color));
        self.vertices.push(Vertex::new(b.to_array(), color));
        self.vertices.push(Vertex::new(c.to_array(), color));
    }

    /// Push a quad given counter-clockwise corners
    fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, color: [f32; 4]) {
        self.push_triangle(a, b, c, color);
        self.push_triangle(a, c, d, color);
    }

    /// Axis-aligned bounds, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Box centred on the origin
pub fn box_mesh(size: Vec3, color: [f32; 4]) -> Mesh {
    let h = size * 0.5;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    let mut mesh = Mesh {
        vertices: Vec::with_capacity(36),
    };

    // Front (+Z)
    mesh.push_quad(
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
        color,
    );
    // Back (-Z)
    mesh.push_quad(
        corner(1.0, -1.0, -1.0),
        corner(-1.0, -1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        color,
    );
    // Top (+Y)
    mesh.push_quad(
        corner(-1.0, 1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        color,
    );
    // Bottom (-Y)
    mesh.push_quad(
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, -1.0, 1.0),
        corner(-1.0, -1.0, 1.0),
        color,
    );
    // Right (+X)
    mesh.push_quad(
        corner(1.0, -1.0, 1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(1.0, 1.0, 1.0),
        color,
    );
    // Left (-X)
    mesh.push_quad(
        corner(-1.0, -1.0, -1.0),
        corner(-1.0, -1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
        corner(-1.0, 1.0, -1.0),
        color,
    );

    mesh
}

/// UV sphere centred on the origin
pub fn sphere_mesh(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    color: [f32; 4],
) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let point = |ix: u32, iy: u32| {
        let u = ix as f32 / width_segments as f32;
        let v = iy as f32 / height_segments as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();
        Vec3::new(
            -radius * cos_phi * sin_theta,
            radius * cos_theta,
            radius * sin_phi * sin_theta,
        )
    };

    let triangles = width_segments * (2 * height_segments - 2);
    let mut mesh = Mesh {
        vertices: Vec::with_capacity(triangles as usize * 3),
    };

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = point(ix + 1, iy);
            let b = point(ix, iy);
            let c = point(ix, iy + 1);
            let d = point(ix + 1, iy + 1);

            // Pole rows collapse to a single triangle per segment
            if iy != 0 {
                mesh.push_triangle(a, b, d, color);
            }
            if iy != height_segments - 1 {
                mesh.push_triangle(b, c, d, color);
            }
        }
    }

    mesh
}

/// Box object placed along the track line
pub fn create_cube(size: Vec3, position_x: f32, rotation_y: f32, color: [f32; 4]) -> SceneObject {
    let mut object = SceneObject::new(box_mesh(size, color));
    object.position.x = position_x;
    object.rotation_y = rotation_y;
    object
}

/// Back wall plus the two angled side posts
pub fn create_track() -> Vec<SceneObject> {
    // Wide enough to sit behind both posts
    let track_width = START_POSITION - END_POSITION + SIDE_POST_WIDTH;

    let mut wall = create_cube(
        Vec3::new(track_width, TRACK_HEIGHT, TRACK_DEPTH),
        0.0,
        0.0,
        colors::BACK_WALL,
    );
    wall.position.z = BACK_WALL_Z;

    let post = Vec3::new(SIDE_POST_WIDTH, TRACK_HEIGHT, TRACK_DEPTH);
    let start_post = create_cube(post, START_POSITION, -SIDE_POST_ANGLE, colors::SIDE_POST);
    let end_post = create_cube(post, END_POSITION, SIDE_POST_ANGLE, colors::SIDE_POST);

    vec![wall, start_post, end_post]
}

/// Player sphere at the start of the track
pub fn create_player(start_x: f32) -> SceneObject {
    let mut player = SceneObject::new(sphere_mesh(
        PLAYER_RADIUS,
        PLAYER_WIDTH_SEGMENTS,
        PLAYER_HEIGHT_SEGMENTS,
        colors::PLAYER,
    ));
    player.position = Vec3::new(start_x, 0.0, PLAYER_Z);
    player
}

/// Time bar above the track, hidden until the round runs
pub fn create_time_bar() -> SceneObject {
    let mut bar = SceneObject::new(box_mesh(TIME_BAR_SIZE, colors::TIME_BAR));
    bar.position.y = TIME_BAR_Y;
    bar.visible = false;
    bar
}

/// Wrap a loaded model in the doll's placement
pub fn create_doll(mesh: Mesh) -> SceneObject {
    let mut doll = SceneObject::new(mesh);
    doll.position = DOLL_POSITION;
    doll.scale = Vec3::splat(DOLL_SCALE);
    doll
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_box_has_twelve_triangles() {
        let mesh = box_mesh(Vec3::new(2.0, 4.0, 6.0), colors::BACK_WALL);
        assert_eq!(mesh.vertex_count(), 36);

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let mesh = box_mesh(Vec3::ONE, colors::BACK_WALL);
        for tri in mesh.vertices.chunks_exact(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward face at {centroid}");
        }
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = sphere_mesh(0.3, 32, 16, colors::PLAYER);
        assert_eq!(mesh.vertex_count(), (32 * (2 * 16 - 2) * 3) as usize);
        for v in &mesh.vertices {
            assert!(approx(Vec3::from(v.position).length(), 0.3));
        }
    }

    #[test]
    fn test_sphere_clamps_degenerate_segments() {
        let mesh = sphere_mesh(1.0, 0, 0, colors::PLAYER);
        assert_eq!(mesh.vertex_count(), (3 * (2 * 2 - 2) * 3) as usize);
    }

    #[test]
    fn test_track_layout() {
        let track = create_track();
        assert_eq!(track.len(), 3);

        let wall = &track[0];
        let (min, max) = wall.mesh.bounds().unwrap();
        assert!(approx(max.x - min.x, 6.2));
        // Both posts sit inside the wall's span
        assert!(max.x >= START_POSITION + SIDE_POST_WIDTH / 2.0 - 1e-4);
        assert!(min.x <= END_POSITION - SIDE_POST_WIDTH / 2.0 + 1e-4);
        assert!(approx(wall.position.z, BACK_WALL_Z));

        assert!(approx(track[1].position.x, START_POSITION));
        assert!(approx(track[1].rotation_y, -SIDE_POST_ANGLE));
        assert!(approx(track[2].position.x, END_POSITION));
        assert!(approx(track[2].rotation_y, SIDE_POST_ANGLE));
    }

    #[test]
    fn test_player_and_time_bar_placement() {
        let player = create_player(START_POSITION);
        assert_eq!(player.position, Vec3::new(START_POSITION, 0.0, PLAYER_Z));
        assert!(player.visible);

        let bar = create_time_bar();
        assert!(approx(bar.position.y, TIME_BAR_Y));
        assert!(!bar.visible);
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }
}
