use jobtree_graph::DiagramConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub window_size: [f32; 2],
    /// Snapshot to seed the in-memory job service from. The bundled demo
    /// data is used when unset.
    pub snapshot_path: Option<PathBuf>,
    pub group_id: i64,
    pub notifications: NotificationSettings,
    pub diagram: DiagramConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            window_size: [1100.0, 720.0],
            snapshot_path: None,
            group_id: 1,
            notifications: NotificationSettings::default(),
            diagram: DiagramConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub position: NotificationPosition,
    pub success_secs: u64,
    pub error_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            position: NotificationPosition::TopRight,
            success_secs: 4,
            error_secs: 8,
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jobtree").join("settings.json"))
}

impl AppSettings {
    pub fn load() -> Self {
        match settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Reads settings from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        tracing::info!("Loading settings from {:?}", path);
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(mut settings) => {
                    settings.diagram = settings.diagram.validated();
                    settings
                }
                Err(e) => {
                    tracing::error!("Failed to parse settings: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = settings_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(dir) = path.parent()
            && let Err(e) = std::fs::create_dir_all(dir)
        {
            tracing::error!("Failed to create settings directory {:?}: {}", dir, e);
            return;
        }
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = std::fs::write(path, content) {
                    tracing::error!("Failed to write settings to {:?}: {}", path, e);
                }
            }
            Err(e) => tracing::error!("Failed to serialize settings: {}", e),
        }
    }
}
