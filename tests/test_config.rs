use std::path::PathBuf;

use shooting_gallery::assets::{self, Assets};
use shooting_gallery::config::{HitPolicy, TargetMotion};
use shooting_gallery::entities::Cue;
use shooting_gallery::{GameConfig, GameError};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn demo_config_loads_and_validates() {
    let config = GameConfig::load(demo("wander.json")).unwrap();
    assert_eq!(config.target_motion, TargetMotion::Wander);
    assert_eq!(config.hit_policy, HitPolicy::Respawn);
    assert_eq!(config.time_limit_ms, Some(60_000));
    assert!(config.obstacles_block);
    assert_eq!(config.frame_delay_ms, 30);
    assert!(config.validate().is_ok());
}

#[test]
fn missing_config_file_is_an_io_error() {
    let err = GameConfig::load(demo("no_such_config.json")).unwrap_err();
    assert!(matches!(err, GameError::ConfigIo { .. }));
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains("no_such_config.json"));
}

#[test]
fn malformed_config_is_an_io_error() {
    let path = std::env::temp_dir().join("shooting_gallery_bad_config.json");
    std::fs::write(&path, "{ \"max_level\": \"three\" }").unwrap();
    let err = GameConfig::load(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, GameError::ConfigIo { .. }));
}

#[test]
fn demo_assets_enable_every_cue() {
    let assets = Assets::load(demo("assets.json"));
    for cue in Cue::ALL {
        assert!(assets.has_sound(cue), "no sound for {}", cue.name());
    }
    assert_eq!(assets.sprite(assets::OBSTACLE), Some("#"));
    assert_eq!(assets.sprite("zombie2"), Some("[o_O]"));
}
