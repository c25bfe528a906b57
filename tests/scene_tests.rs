use glam::Vec3;
use scene_viewer::config::Config;
use scene_viewer::scene::{demo_scene, PositionSource};

#[test]
fn test_demo_scene_composition() {
    let (scene, _) = demo_scene();
    let names: Vec<_> = scene.objects().iter().map(|o| o.name).collect();

    assert_eq!(
        names,
        vec!["pyramid", "cube", "sphere", "torus", "floor", "light marker"]
    );
}

#[test]
fn test_cube_swings_across_frames() {
    let (mut scene, cube) = demo_scene();

    let mut xs = Vec::new();
    for step in 0..8 {
        scene.update(step as f32 * 0.5);
        xs.push(scene.position_of(cube).unwrap().x);
    }

    assert!(xs.iter().any(|&x| x > 2.0), "cube reaches the right extreme");
    assert!(xs.iter().any(|&x| x < 0.0), "cube swings back through center");
    for (step, &x) in xs.iter().enumerate() {
        let expected = (step as f32 * 0.5).sin() * 3.0;
        assert!((x - expected).abs() < 1e-4);
    }
}

#[test]
fn test_spotlight_tracks_swinging_cube() {
    let (mut scene, cube) = demo_scene();

    scene.update(1.0);
    let first = scene.lights.spot.position;
    scene.update(2.0);
    let second = scene.lights.spot.position;

    assert_ne!(first.x, second.x, "spot moves with the cube");
    let cube_pos = scene.position_of(cube).unwrap();
    assert!((second - (cube_pos + Vec3::new(0.2, 0.2, 0.0))).length() < 1e-5);
}

#[test]
fn test_light_rig_uniform_ordering() {
    let (mut scene, _) = demo_scene();
    scene.update(0.0);

    let uniform = scene.lights.to_uniform();

    assert_eq!(uniform.fixed.position, [0.5, 0.5, 6.5]);
    assert_eq!(uniform.fixed.color, [1.0, 0.3, 0.3]);
    assert_eq!(uniform.directional.direction, [0.0, -1.0, 0.0]);
    // Spot cutoffs travel as cosines, inner tighter than outer
    assert!(uniform.spot.cut_off > uniform.spot.outer_cut_off);
}

#[test]
fn test_config_feeds_mode_bank() {
    let config: Config = serde_json::from_str(
        r#"{ "orbit_radius": 42.0, "third_person_offset": [0.0, 1.0, 4.0] }"#,
    )
    .unwrap();

    let bank = config.mode_bank();

    assert_eq!(bank.orbital.radius, 42.0);
    assert_eq!(bank.orbital.sensitivity, 100.0);
    assert_eq!(bank.third_person.offset, Vec3::new(0.0, 1.0, 4.0));
}
