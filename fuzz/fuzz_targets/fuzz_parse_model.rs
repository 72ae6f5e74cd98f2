#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed the input through one session, split into a part and a root model
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut session = scene3mf::ParseSession::new();
    match text.split_once('\u{0}') {
        Some((part, root)) => {
            let _ = session.parse(&format!("/fuzz.model:{}", part));
            if let Ok(mut scene) = session.parse(root) {
                let _ = scene3mf::scene_to_string(&mut scene);
            }
        }
        None => {
            if let Ok(mut scene) = session.parse(text) {
                let _ = scene3mf::scene_to_string(&mut scene);
            }
        }
    }
});
