//! Sandbox demo application
//!
//! Loads a declarative scene over the headless renderer, drops a ball onto
//! a floor for two simulated seconds, and prints the refreshed scene export.

use scene_sync::prelude::*;

const SCENE: &str = r#"[
    {"type": "scene", "background": 0x101418,
     "camera": {"position": [0.0, 6.0, 14.0], "lookAt": [0.0, 1.0, 0.0], "fov": 60.0}},
    {"type": "light", "name": "sun",
     "light": {"type": "directional", "color": 0xffffff, "intensity": 1.2},
     "pos": [5.0, 10.0, 5.0]},
    {"name": "ground",
     "shape": {"type": "box", "width": 20.0, "height": 1.0, "depth": 20.0},
     "material": {"color": 0x446644, "roughness": 0.9},
     "pos": [0.0, -0.5, 0.0],
     "physics": {"motionType": "static"}},
    {"name": "ball",
     "shape": {"type": "sphere", "radius": 0.5},
     "material": {"color": 0xdd3322, "metalness": 0.3},
     "pos": [0.0, 6.0, 0.0],
     "physics": {"motionType": "dynamic", "mass": 2.0, "restitution": 0.4}},
    {"name": "crate",
     "shape": {"type": "box", "width": 1.0, "height": 1.0, "depth": 1.0},
     "material": {"color": 0xaa8844},
     "pos": [2.0, 0.5, 0.0],
     "euler": [0.0, 30.0, 0.0]}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    log::info!("Creating sandbox engine...");
    let mut engine = SceneEngine::new(HeadlessRenderer::new());
    engine.initialize_physics(Box::new(RigidWorld::new()));

    let report = engine.load_scene_json(SCENE);
    log::info!(
        "Scene loaded: {} objects, {} failures",
        report.ids.len(),
        report.failures.len()
    );

    // The crate has no physics block; pin it down with the rest of the layer
    let converted = engine.convert_layer_to_static();
    log::info!("Converted {} remaining meshes to static", converted.success_count);

    engine.start_simulation();
    for _ in 0..120 {
        engine.tick(1.0 / 60.0)?;
    }

    if let Some(ball) = engine.registry().object("ball") {
        if let Some(transform) = engine.registry().render().transform(ball.render_key) {
            log::info!(
                "Ball after 2s: ({:.2}, {:.2}, {:.2})",
                transform.position.x,
                transform.position.y,
                transform.position.z
            );
        }
    }

    engine.stop_simulation();
    println!("{}", engine.export_json()?);
    Ok(())
}
