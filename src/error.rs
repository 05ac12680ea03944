//! Error types
//!
//! Asset failures are reported and the game carries on without the model.
//! Config and startup failures stop the game from starting.

/// Doll model could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("failed to parse glTF: {0}")]
    Parse(#[from] gltf::Error),

    #[error("buffer {0} has no data")]
    MissingBuffer(usize),

    #[error("mesh '{0}' has no position data")]
    MissingPositions(String),

    #[error("unsupported buffer uri: {0}")]
    UnsupportedUri(String),

    #[error("model contains no triangles")]
    Empty,
}

/// A `RoundConfig` that cannot produce a playable round.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{which} hold range is empty ({min_ms}..={max_ms} ms)")]
    EmptyRange {
        which: &'static str,
        min_ms: f64,
        max_ms: f64,
    },

    #[error("{which} hold ({hold_ms} ms) must outlast its settle delay ({settle_ms} ms)")]
    HoldShorterThanSettle {
        which: &'static str,
        hold_ms: f64,
        settle_ms: f64,
    },

    #[error("run velocity {0} does not move toward the goal")]
    NotForward(f32),

    #[error("goal {goal} is not ahead of start {start}")]
    GoalBehindStart { start: f32, goal: f32 },
}

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("no browser window")]
    NoWindow,

    #[error("element #{0} not found")]
    MissingElement(&'static str),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface has no formats supported by the adapter")]
    UnsupportedSurface,

    #[error("invalid round config: {0}")]
    Config(#[from] ConfigError),
}
