//! Native dog scene. Assets are read from `./assets`.
//!
//! Scroll with the mouse wheel, press 1..7 to hover a variant and 0 or
//! Escape to leave it.

use matcap_flow::{
    config::SceneConfig,
    flow,
    scene::{DogScene, SceneEvent},
};

fn main() {
    let config = SceneConfig::default();
    if let Err(e) = flow::run::<(), SceneEvent>(vec![DogScene::constructor(config)], vec![]) {
        log::error!("{:#}", e);
        eprintln!("dog: {:#}", e);
        std::process::exit(1);
    }
}
