use crate::actions::{Action, KeyBindings};
use crate::destination::OverwritePolicy;

/// Comma-separated action names whose shortcuts should be removed,
/// e.g. `PICKSORT_UNBIND=save`.
pub const UNBIND_VAR: &str = "PICKSORT_UNBIND";
/// `overwrite` (default) or `refuse`.
pub const OVERWRITE_VAR: &str = "PICKSORT_OVERWRITE";

/// Runtime settings. There is no config file; everything comes from the
/// defaults below plus a couple of environment variables read at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub zoom: ZoomSettings,
    pub overwrite: OverwritePolicy,
    pub key_bindings: KeyBindings,
    pub window_size: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    /// Factor applied by a single zoom in, undone by a single zoom out.
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            step: 1.25,
            min: 0.1,
            max: 20.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            overwrite: OverwritePolicy::Overwrite,
            key_bindings: KeyBindings::default(),
            window_size: (1280.0, 800.0),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(names) = lookup(UNBIND_VAR) {
            for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                match Action::from_name(name) {
                    Some(action) => {
                        config.key_bindings = config.key_bindings.without(action);
                    }
                    None => log::warn!("{UNBIND_VAR}: unknown action '{name}'"),
                }
            }
        }

        if let Some(value) = lookup(OVERWRITE_VAR) {
            match value.trim().to_ascii_lowercase().as_str() {
                "overwrite" => config.overwrite = OverwritePolicy::Overwrite,
                "refuse" => config.overwrite = OverwritePolicy::Refuse,
                other => log::warn!("{OVERWRITE_VAR}: expected overwrite or refuse, got '{other}'"),
            }
        }

        config
    }
}
