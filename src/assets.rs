//! Sprite and sound catalog
//!
//! Sprites are short strings of terminal glyphs keyed by name; sounds are
//! the cues the terminal is allowed to ring the bell for. Anything missing or
//! unusable becomes a placeholder: the sprite is not drawn, the cue is not
//! played. None of that is fatal.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::{Cue, TargetKind};
use crate::error::GameError;

pub const AVATAR: &str = "tank";
pub const BACKGROUND: &str = "background";
pub const OBSTACLE: &str = "obstacle";
pub const PROJECTILE: &str = "projectile";

/// Every sprite key the display asks for.
pub fn sprite_keys() -> Vec<&'static str> {
    let mut keys = vec![AVATAR, BACKGROUND, OBSTACLE, PROJECTILE];
    keys.extend(TargetKind::ALL.iter().map(|k| k.sprite_key()));
    keys
}

/// On-disk description of the asset set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub sprites: HashMap<String, String>,
    #[serde(default)]
    pub sounds: Vec<String>,
}

impl Manifest {
    pub fn builtin() -> Self {
        let sprites = [
            (AVATAR, "▗▟█▙▖"),
            (BACKGROUND, "·"),
            (OBSTACLE, "▬"),
            (PROJECTILE, "•"),
            ("zombie1", "(x_x)"),
            ("zombie2", "[o_O]"),
            ("zombie3", "{>_<}"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            sprites,
            sounds: vec![Cue::Gunshot.name().to_string(), Cue::Hit.name().to_string()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Assets {
    sprites: HashMap<String, String>,
    sounds: HashSet<Cue>,
}

impl Assets {
    pub fn builtin() -> Self {
        Self::from_manifest(Manifest::builtin()).0
    }

    /// Load a JSON manifest. An unreadable manifest falls back to the
    /// built-in set; individual missing entries become placeholders.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let manifest = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Manifest>(&text).map_err(|e| e.to_string()));

        match manifest {
            Ok(manifest) => {
                let (assets, problems) = Self::from_manifest(manifest);
                for problem in &problems {
                    log::warn!("{}", problem);
                }
                log::info!(
                    "Loaded assets from {} ({} sprites, {} sounds)",
                    path.display(),
                    assets.sprites.len(),
                    assets.sounds.len()
                );
                assets
            }
            Err(reason) => {
                let err = GameError::AssetUnavailable {
                    name: path.display().to_string(),
                    reason,
                };
                log::warn!("{}; using built-in assets", err);
                Self::builtin()
            }
        }
    }

    /// Build the catalog, reporting every asset that had to be replaced by a
    /// placeholder.
    pub fn from_manifest(manifest: Manifest) -> (Self, Vec<GameError>) {
        let mut problems = Vec::new();
        let mut sprites = HashMap::new();

        for key in sprite_keys() {
            match manifest.sprites.get(key) {
                None => problems.push(GameError::AssetUnavailable {
                    name: key.to_string(),
                    reason: "missing from manifest".to_string(),
                }),
                Some(glyphs) if glyphs.is_empty() || glyphs.chars().any(char::is_control) => {
                    problems.push(GameError::AssetUnavailable {
                        name: key.to_string(),
                        reason: "sprite must be non-empty printable text".to_string(),
                    })
                }
                Some(glyphs) => {
                    sprites.insert(key.to_string(), glyphs.clone());
                }
            }
        }

        let mut sounds = HashSet::new();
        for name in &manifest.sounds {
            match Cue::ALL.iter().find(|c| c.name() == name) {
                Some(cue) => {
                    sounds.insert(*cue);
                }
                None => problems.push(GameError::AssetUnavailable {
                    name: name.clone(),
                    reason: "unknown sound cue".to_string(),
                }),
            }
        }

        (Self { sprites, sounds }, problems)
    }

    /// `None` means the sprite is a placeholder and should be skipped.
    pub fn sprite(&self, key: &str) -> Option<&str> {
        self.sprites.get(key).map(String::as_str)
    }

    pub fn has_sound(&self, cue: Cue) -> bool {
        self.sounds.contains(&cue)
    }

    /// Drop every sound.
    pub fn muted(mut self) -> Self {
        self.sounds.clear();
        self
    }
}
