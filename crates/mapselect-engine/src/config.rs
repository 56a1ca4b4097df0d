// Imports
use crate::tools::ToolStyle;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Fallback profile for a configuration that ended up with none, keeping the
/// active-profile accessor total.
static FALLBACK_PROFILE: Lazy<SelectionProfile> = Lazy::new(SelectionProfile::default);

/// A named layer scope for queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionProfile {
    /// Display name of the profile.
    #[serde(rename = "name")]
    pub name: String,
    /// Explicit layer (or group) names to query. `None` means all queryable layers.
    #[serde(rename = "layers")]
    pub layers: Option<Vec<String>>,
    /// Layer (or group) names that are never queried, taking precedence over `layers`.
    #[serde(rename = "exclude")]
    pub exclude: Option<Vec<String>>,
}

impl SelectionProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the profile names its layers explicitly.
    pub fn is_explicit(&self) -> bool {
        self.layers.as_ref().is_some_and(|layers| !layers.is_empty())
    }

    /// Whether the given layer or group name is excluded.
    pub fn excludes(&self, name: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|excluded| excluded.iter().any(|excl| excl == name))
    }
}

/// The engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename = "select_config")]
pub struct SelectConfig {
    /// The tools available for activation.
    #[serde(rename = "tools")]
    pub tools: Vec<ToolStyle>,
    /// The tool activated when selection is enabled.
    #[serde(rename = "default_tool")]
    pub default_tool: ToolStyle,
    /// Multiplied with the view resolution to size the query buffer around a click.
    #[serde(rename = "point_buffer_factor")]
    pub point_buffer_factor: f64,
    /// Multiplied with the view resolution to size the query buffer around a sketched
    /// line. Values below 1.0 are treated as 1.0.
    #[serde(rename = "line_buffer_factor")]
    pub line_buffer_factor: f64,
    /// The configured layer scopes.
    #[serde(rename = "profiles")]
    pub profiles: Vec<SelectionProfile>,
    /// Index of the active profile.
    #[serde(rename = "active_profile")]
    pub active_profile: usize,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            tools: vec![
                ToolStyle::Click,
                ToolStyle::Box,
                ToolStyle::Circle,
                ToolStyle::Polygon,
                ToolStyle::Buffer,
                ToolStyle::Line,
            ],
            default_tool: ToolStyle::Click,
            point_buffer_factor: 1.0,
            line_buffer_factor: 1.0,
            profiles: vec![SelectionProfile::default()],
            active_profile: 0,
        }
    }
}

impl SelectConfig {
    /// The active profile. Always resolves, clamping an out of range index and falling
    /// back to an unnamed unrestricted profile when none are configured.
    pub fn active_profile(&self) -> &SelectionProfile {
        if self.profiles.is_empty() {
            return &FALLBACK_PROFILE;
        }
        let index = self.active_profile.min(self.profiles.len() - 1);
        &self.profiles[index]
    }

    /// Set the active profile, ignoring out of range indices.
    pub fn set_active_profile(&mut self, index: usize) {
        if index < self.profiles.len() {
            self.active_profile = index;
        }
    }

    pub fn point_buffer_factor(&self) -> f64 {
        self.point_buffer_factor.max(0.0)
    }

    pub fn line_buffer_factor(&self) -> f64 {
        self.line_buffer_factor.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let mut config = SelectConfig::default();
        config.tools = vec![ToolStyle::Click, ToolStyle::Buffer];
        config.line_buffer_factor = 3.0;
        config.profiles = vec![
            SelectionProfile::new("all"),
            SelectionProfile {
                name: "water".to_string(),
                layers: Some(vec!["lakes".to_string()]),
                exclude: Some(vec!["wells".to_string()]),
            },
        ];
        config.active_profile = 1;

        let json = serde_json::to_string(&config).unwrap();
        let back: SelectConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.tools, config.tools);
        assert_eq!(back.default_tool, ToolStyle::Click);
        assert_eq!(back.active_profile, 1);
        assert_eq!(back.active_profile().name, "water");
        assert!(back.active_profile().is_explicit());
        assert!(back.active_profile().excludes("wells"));
    }

    #[test]
    fn active_profile_is_total() {
        let mut config = SelectConfig::default();
        config.active_profile = 42;
        assert_eq!(config.active_profile().name, "");

        config.profiles.clear();
        assert!(!config.active_profile().is_explicit());

        // Out of range set requests are ignored.
        config.profiles = vec![SelectionProfile::new("a"), SelectionProfile::new("b")];
        config.active_profile = 0;
        config.set_active_profile(5);
        assert_eq!(config.active_profile().name, "a");
        config.set_active_profile(1);
        assert_eq!(config.active_profile().name, "b");
    }

    #[test]
    fn buffer_factors_are_clamped() {
        let mut config = SelectConfig::default();
        config.line_buffer_factor = 0.2;
        config.point_buffer_factor = -1.0;

        assert_eq!(config.line_buffer_factor(), 1.0);
        assert_eq!(config.point_buffer_factor(), 0.0);
    }
}
