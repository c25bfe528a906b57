use glam::{Mat4, Quat, Vec3};

use crate::lights::{LightKind, LightSource};
use crate::mesh::{self, MeshData};
use crate::types::LightsUniform;

/// Spotlight offset from the object it rides, in that object's local frame
const SPOT_LOCAL_OFFSET: Vec3 = Vec3::new(0.2, 0.2, 0.0);

/// Index of an object in a [`Scene`]'s registry
///
/// Handed out by [`SceneBuilder::add_object`]; holders only ever read through
/// [`PositionSource`], so a stale handle degrades to `None` rather than a
/// dangling reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(usize);

impl ObjectHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Read-only lookup of externally owned object positions
pub trait PositionSource {
    fn position_of(&self, handle: ObjectHandle) -> Option<Vec3>;
}

/// Which procedural texture an object samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Brick,
    Planks,
    Checker,
    White,
}

/// Per-frame motion applied by [`Scene::update`]
#[derive(Debug, Clone, Copy)]
pub enum Animation {
    Static,
    /// Oscillate along world x: `base + (sin(t) * amplitude, 0, 0)`
    Swing { base: Vec3, amplitude: f32 },
    /// Rotate about world y at `rate` rad/s
    Spin { rate: f32 },
}

/// One renderable object in the scene description
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: MeshData,
    pub texture: TextureKind,
    pub animation: Animation,
    /// Drawn in the reflection passes
    pub reflected: bool,
    /// Skips lighting (light marker cube)
    pub emissive: bool,
    translation: Vec3,
    rotation: Quat,
}

impl SceneObject {
    pub fn new(name: &'static str, mesh: MeshData, texture: TextureKind) -> Self {
        Self {
            name,
            mesh,
            texture,
            animation: Animation::Static,
            reflected: false,
            emissive: false,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn animated(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    pub fn reflected(mut self) -> Self {
        self.reflected = true;
        self
    }

    pub fn emissive(mut self) -> Self {
        self.emissive = true;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.translation
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_quat(self.rotation)
    }

    fn advance(&mut self, time: f32) {
        match self.animation {
            Animation::Static => {}
            Animation::Swing { base, amplitude } => {
                self.translation = base + Vec3::X * (time.sin() * amplitude);
            }
            Animation::Spin { rate } => {
                self.rotation = Quat::from_rotation_y(time * rate);
            }
        }
    }
}

/// The scene's three lights
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub fixed: LightSource,
    pub spot: LightSource,
    pub directional: LightSource,
}

impl LightRig {
    pub fn to_uniform(&self) -> LightsUniform {
        LightsUniform {
            fixed: self.fixed.to_gpu(),
            spot: self.spot.to_gpu(),
            directional: self.directional.to_gpu(),
        }
    }
}

/// Owned scene description: objects, mirror geometry, lights
///
/// Built once through [`SceneBuilder`] and handed to the renderer by value -
/// no global geometry or light arrays.
pub struct Scene {
    objects: Vec<SceneObject>,
    pub mirror: MeshData,
    pub lights: LightRig,
    /// Object the spotlight rides
    spot_carrier: Option<ObjectHandle>,
}

impl Scene {
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Advance animations and the light rig to `time` (seconds since start)
    pub fn update(&mut self, time: f32) {
        for object in &mut self.objects {
            object.advance(time);
        }
        if let Some(carrier) = self.spot_carrier {
            if let Some(pos) = self.position_of(carrier) {
                self.lights.spot.position = pos + SPOT_LOCAL_OFFSET;
            }
        }
        self.lights.directional.color = Vec3::new(1.0, 1.0, (time / 10.0).sin());
    }
}

impl PositionSource for Scene {
    fn position_of(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.objects.get(handle.index()).map(SceneObject::position)
    }
}

/// Accumulates a scene description, handing out handles as objects are added
pub struct SceneBuilder {
    objects: Vec<SceneObject>,
    mirror: MeshData,
    spot_carrier: Option<ObjectHandle>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            mirror: mesh::mirror_quad(),
            spot_carrier: None,
        }
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectHandle {
        self.objects.push(object);
        ObjectHandle::new(self.objects.len() - 1)
    }

    /// Attach the spotlight to an object; its position follows every frame
    pub fn carry_spotlight(&mut self, handle: ObjectHandle) {
        self.spot_carrier = Some(handle);
    }

    pub fn build(self, lights: LightRig) -> Scene {
        Scene {
            objects: self.objects,
            mirror: self.mirror,
            lights,
            spot_carrier: self.spot_carrier,
        }
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The demo scene: pyramid, swinging cube, spinning sphere, torus, floor,
/// light marker, and the light rig. Returns the scene and the handle of the
/// cube for the camera's third-person follow.
pub fn demo_scene() -> (Scene, ObjectHandle) {
    let mut builder = SceneBuilder::new();

    let _pyramid = builder.add_object(
        SceneObject::new("pyramid", mesh::pyramid(), TextureKind::Brick).reflected(),
    );
    let cube = builder.add_object(
        SceneObject::new("cube", mesh::cube(), TextureKind::Brick)
            .animated(Animation::Swing {
                base: Vec3::new(0.0, 0.5, 1.0),
                amplitude: 3.0,
            })
            .reflected(),
    );
    let _sphere = builder.add_object(
        SceneObject::new("sphere", mesh::sphere(0.5, 36, 18), TextureKind::Checker)
            .at(Vec3::new(2.0, 1.0, 0.0))
            .animated(Animation::Spin { rate: 1.0 })
            .reflected(),
    );
    let _torus = builder.add_object(
        SceneObject::new("torus", mesh::torus(0.7, 0.25, 36, 18), TextureKind::Checker)
            .at(Vec3::new(-2.5, 0.6, 1.0))
            .reflected(),
    );
    let _floor = builder.add_object(SceneObject::new(
        "floor",
        mesh::floor(),
        TextureKind::Planks,
    ));
    let _marker = builder.add_object(
        SceneObject::new("light marker", mesh::light_cube(), TextureKind::White)
            .at(Vec3::new(3.5, 1.5, 5.5))
            .emissive(),
    );

    builder.carry_spotlight(cube);

    let mut directional = LightSource::new(
        LightKind::Directional,
        Vec3::new(5.0, 5.0, 5.0),
        Vec3::new(1.0, 1.0, 0.0),
    );
    directional.direction = Vec3::new(0.0, -1.0, 0.0);

    let lights = LightRig {
        fixed: LightSource::new(
            LightKind::Point,
            Vec3::new(0.5, 0.5, 6.5),
            Vec3::new(1.0, 0.3, 0.3),
        ),
        spot: LightSource::new(
            LightKind::Spot,
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 1.0, 0.8),
        ),
        directional,
    };

    (builder.build(lights), cube)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_hands_out_sequential_handles() {
        let mut builder = SceneBuilder::new();
        let a = builder.add_object(SceneObject::new("a", mesh::floor(), TextureKind::White));
        let b = builder.add_object(SceneObject::new("b", mesh::floor(), TextureKind::White));

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn test_position_source_resolves_and_tolerates_stale() {
        let (scene, cube) = demo_scene();

        assert!(scene.position_of(cube).is_some());
        assert_eq!(scene.position_of(ObjectHandle::new(999)), None);
    }

    #[test]
    fn test_swing_animation_tracks_sine() {
        let (mut scene, cube) = demo_scene();

        scene.update(std::f32::consts::FRAC_PI_2);

        let pos = scene.position_of(cube).unwrap();
        assert!((pos - Vec3::new(3.0, 0.5, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_spotlight_rides_cube() {
        let (mut scene, cube) = demo_scene();

        scene.update(0.0);

        let cube_pos = scene.position_of(cube).unwrap();
        let expected = cube_pos + SPOT_LOCAL_OFFSET;
        assert!((scene.lights.spot.position - expected).length() < 1e-6);
    }

    #[test]
    fn test_directional_color_animates() {
        let (mut scene, _) = demo_scene();

        scene.update(0.0);
        let at_zero = scene.lights.directional.color.z;
        scene.update(5.0 * std::f32::consts::PI);
        let at_half = scene.lights.directional.color.z;

        assert!((at_zero - 0.0).abs() < 1e-6);
        assert!((at_half - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_demo_scene_reflected_set() {
        let (scene, _) = demo_scene();
        let reflected: Vec<_> = scene
            .objects()
            .iter()
            .filter(|o| o.reflected)
            .map(|o| o.name)
            .collect();

        assert_eq!(reflected, vec!["pyramid", "cube", "sphere", "torus"]);
    }
}
