//! Configuration system
//!
//! [`Config`] gives any serde type TOML/RON file loading keyed on the file
//! extension. [`TextEngineConfig`] is the one configuration block the text
//! pipeline reads: layout defaults, 2D placement scale, outline defaults and
//! draw ordering.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;
        
        Self::from_str_with_format(&contents, path)
    }
    
    /// Parse configuration text, picking the format from the extension of `path`
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }
    
    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    
    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    
    /// A value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Text Engine Configuration
///
/// Defaults shared by the 2D batched path and the 3D instanced path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEngineConfig {
    /// Tab width in multiples of the space advance
    pub tab_size: f32,
    /// Flip the V texture coordinate when building quads
    pub flip_y: bool,
    /// Scale applied to 2D layout units when placing text in the scene
    pub world_scale: f32,
    /// Opacity used when a style does not set one
    pub default_opacity: f32,
    /// Outline opacity used when a style does not set one
    pub default_outline_opacity: f32,
    /// Render order of the foreground pass
    pub foreground_render_order: i32,
    /// Render order of the outline pass, drawn before the foreground
    pub outline_render_order: i32,
    /// Default `env_logger` filter
    pub log_filter: String,
}

impl Default for TextEngineConfig {
    fn default() -> Self {
        Self {
            tab_size: 4.0,
            flip_y: true,
            world_scale: 0.01,
            default_opacity: 1.0,
            default_outline_opacity: 0.4,
            foreground_render_order: 99_999,
            outline_render_order: 99_998,
            log_filter: "info".to_string(),
        }
    }
}

impl Config for TextEngineConfig {}

impl TextEngineConfig {
    /// Set the tab size
    pub fn with_tab_size(mut self, tab_size: f32) -> Self {
        self.tab_size = tab_size;
        self
    }
    
    /// Set the world scale applied to 2D text
    pub fn with_world_scale(mut self, world_scale: f32) -> Self {
        self.world_scale = world_scale;
        self
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tab_size >= 0.0) {
            return Err(ConfigError::Invalid(format!("tab_size must be >= 0, got {}", self.tab_size)));
        }
        
        if !(self.world_scale > 0.0) {
            return Err(ConfigError::Invalid(format!("world_scale must be > 0, got {}", self.world_scale)));
        }
        
        for (name, value) in [
            ("default_opacity", self.default_opacity),
            ("default_outline_opacity", self.default_outline_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{} must be within 0..=1, got {}", name, value)));
            }
        }
        
        if self.outline_render_order >= self.foreground_render_order {
            return Err(ConfigError::Invalid(
                "outline_render_order must be lower than foreground_render_order".to_string(),
            ));
        }
        
        Ok(())
    }
}
