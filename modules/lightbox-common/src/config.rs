use std::env;

/// Pipeline configuration. Every knob has a default; `from_env` overrides
/// from `LIGHTBOX_*` environment variables where present.
#[derive(Debug, Clone)]
pub struct LightboxConfig {
    /// Minimum gap between two accepted click triggers.
    pub debounce_window_ms: u64,
    /// Hard upper bound on one authoritative data-service call.
    pub primary_timeout_ms: u64,
    /// When false, video elements are skipped by the fallback scanners.
    pub include_videos: bool,
    /// Deepest ancestor level any identity strategy may walk.
    pub max_ancestor_walk_depth: u32,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 500,
            primary_timeout_ms: 5000,
            include_videos: true,
            max_ancestor_walk_depth: 10,
        }
    }
}

impl LightboxConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            debounce_window_ms: env_u64("LIGHTBOX_DEBOUNCE_MS", defaults.debounce_window_ms),
            primary_timeout_ms: env_u64("LIGHTBOX_PRIMARY_TIMEOUT_MS", defaults.primary_timeout_ms),
            include_videos: env::var("LIGHTBOX_INCLUDE_VIDEOS")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.include_videos),
            max_ancestor_walk_depth: env_u64(
                "LIGHTBOX_MAX_WALK_DEPTH",
                defaults.max_ancestor_walk_depth as u64,
            ) as u32,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
