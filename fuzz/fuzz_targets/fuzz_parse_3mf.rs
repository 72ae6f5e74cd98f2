#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Full pipeline: ZIP extraction -> every model part -> scene
    let cursor = Cursor::new(data);
    if let Ok(mut scene) = scene3mf::Scene::from_reader(cursor) {
        let _ = scene3mf::scene_to_string(&mut scene);
    }
});
