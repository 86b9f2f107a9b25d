use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const SETTINGS_PATH: &str = "settings.toml";

const MIN_MESH_WORKER_THREADS: usize = 1;
const MAX_MESH_WORKER_THREADS: usize = 8;
const MIN_WORLD_REFRESH_MS: u64 = 100;
const MAX_WORLD_REFRESH_MS: u64 = 5000;
const MIN_RENDER_DISTANCE: i32 = 2;
const MAX_RENDER_DISTANCE: i32 = 16;

/// Runtime client tunables. Chunk side length and block dimension are
/// compile-time constants; changing those requires regenerating all
/// chunks, so they never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_mesh_worker_threads")]
    pub mesh_worker_threads: usize,
    #[serde(default = "default_world_refresh_ms")]
    pub world_refresh_ms: u64,
    #[serde(default = "default_render_distance")]
    pub render_distance: i32,
}

fn default_mesh_worker_threads() -> usize {
    4
}

fn default_world_refresh_ms() -> u64 {
    500
}

fn default_render_distance() -> i32 {
    8
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            mesh_worker_threads: default_mesh_worker_threads(),
            world_refresh_ms: default_world_refresh_ms(),
            render_distance: default_render_distance(),
        }
    }
}

impl ClientSettings {
    pub fn sanitize(mut self) -> Self {
        self.mesh_worker_threads = self
            .mesh_worker_threads
            .clamp(MIN_MESH_WORKER_THREADS, MAX_MESH_WORKER_THREADS);
        self.world_refresh_ms = self
            .world_refresh_ms
            .clamp(MIN_WORLD_REFRESH_MS, MAX_WORLD_REFRESH_MS);
        self.render_distance = self
            .render_distance
            .clamp(MIN_RENDER_DISTANCE, MAX_RENDER_DISTANCE);
        self
    }

    /// Loads from `settings.toml` in the working directory.
    pub fn load_default() -> io::Result<Self> {
        Self::load(Path::new(SETTINGS_PATH))
    }

    /// Saves to `settings.toml` in the working directory.
    pub fn save_default(&self) -> io::Result<()> {
        self.save(Path::new(SETTINGS_PATH))
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let parsed = toml::from_str::<Self>(&contents).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to deserialize settings: {e}"),
            )
        })?;
        Ok(parsed.sanitize())
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let settings = self.clone().sanitize();
        let serialized = toml::to_string_pretty(&settings).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize settings: {e}"),
            )
        })?;
        fs::write(path, serialized)
    }
}
