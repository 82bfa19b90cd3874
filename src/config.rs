use crate::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for replaying one recorded session. Every field has a default,
/// so a config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub project_location: PathBuf,
    pub dumps_folder: String,
    pub textures_folder: String,
    pub dump_extension: String,
    pub frame_interval_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            project_location: PathBuf::from("."),
            dumps_folder: DUMPS_FOLDER.to_string(),
            textures_folder: TEXTURES_FOLDER.to_string(),
            dump_extension: DUMP_EXTENSION.to_string(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl ReplayConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> ReplayResult<Self> {
        let path = path.as_ref();
        let config_error = |message: String| {
            ReplayError::new(ReplayErrorVariant::Config {
                path: path.to_path_buf(),
                message,
            })
        };
        let data = std::fs::read(path).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_slice(&data).map_err(|e| config_error(e.to_string()))
    }

    pub fn with_project_location<P: Into<PathBuf>>(mut self, project_location: P) -> Self {
        self.project_location = project_location.into();
        self
    }

    pub fn layout(&self) -> SessionLayout {
        SessionLayout {
            root: self.project_location.clone(),
            dumps_folder: self.dumps_folder.clone(),
            textures_folder: self.textures_folder.clone(),
        }
    }

    pub fn dump_directory(&self) -> DumpDirectory {
        DumpDirectory::new(self.layout().dumps_dir()).with_extension(self.dump_extension.clone())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Paths inside a project folder: numbered dumps plus the textures the
/// renderer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLayout {
    root: PathBuf,
    dumps_folder: String,
    textures_folder: String,
}

impl SessionLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        ReplayConfig::default().with_project_location(root).layout()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dumps_dir(&self) -> PathBuf {
        self.root.join(&self.dumps_folder)
    }

    pub fn textures_dir(&self) -> PathBuf {
        self.root.join(&self.textures_folder)
    }

    pub fn pitch_texture(&self) -> PathBuf {
        self.textures_dir().join(PITCH_TEXTURE_FILE)
    }

    pub fn player_texture(&self, player_id: i32) -> PathBuf {
        self.textures_dir().join(format!(
            "{}{}.{}",
            PLAYER_TEXTURE_PREFIX, player_id, PLAYER_TEXTURE_EXTENSION
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ReplayConfig =
            serde_json::from_str(r#"{"project_location": "/data/match", "frame_interval_ms": 40}"#)
                .unwrap();
        assert_eq!(config.project_location, PathBuf::from("/data/match"));
        assert_eq!(config.frame_interval(), Duration::from_millis(40));
        assert_eq!(config.dumps_folder, "dumps");
        assert_eq!(config.dump_extension, "json");
    }

    #[test]
    fn test_layout_paths() {
        let layout = SessionLayout::new("/data/match");
        assert_eq!(layout.dumps_dir(), PathBuf::from("/data/match/dumps"));
        assert_eq!(
            layout.pitch_texture(),
            PathBuf::from("/data/match/textures/pitch.jpg")
        );
        assert_eq!(
            layout.player_texture(7),
            PathBuf::from("/data/match/textures/player_7.png")
        );
    }

    #[test]
    fn test_dump_directory_from_config() {
        let config = ReplayConfig {
            dump_extension: "dump".to_string(),
            ..ReplayConfig::default()
        }
        .with_project_location("/data/match");
        assert_eq!(
            config.dump_directory().dump_path(3),
            PathBuf::from("/data/match/dumps/3.dump")
        );
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = ReplayConfig::from_path("/definitely/not/here.json");
        match result {
            Err(e) => assert!(matches!(e.variant, ReplayErrorVariant::Config { .. })),
            Ok(config) => panic!("Expected config error, got {config:?}"),
        }
    }
}
