//! Viewer settings, parsed from the embedded `assets/viewer.json`.

#[derive(Debug, Clone, serde::Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub clear_color: [f32; 4],
    pub fov_degrees: f32,
    /// Largest bounding-box extent of the model after the fit transform,
    /// in world units.
    pub fit_size: f32,
    /// Translation speed in world units per second.
    pub move_speed: f32,
    pub rotation_step_degrees: f32,
    /// Z-scale change per second while R or F is held.
    pub scale_speed: f32,
    pub scale_min: f32,
    pub scale_max: f32,
}

impl ViewerConfig {
    pub fn new(s: &str) -> Result<Self, String> {
        let config: ViewerConfig = serde_json::from_str(s).map_err(|e| e.to_string())?;
        if config.window.width == 0 || config.window.height == 0 {
            return Err("Window dimensions must be non-zero".to_string());
        }
        if config.fit_size <= 0.0 {
            return Err("fit_size must be positive".to_string());
        }
        if config.move_speed <= 0.0 || config.scale_speed <= 0.0 {
            return Err("Speeds must be positive".to_string());
        }
        if config.scale_min <= 0.0 || config.scale_min > config.scale_max {
            return Err(format!(
                "Invalid scale range: {} to {}",
                config.scale_min, config.scale_max
            ));
        }
        Ok(config)
    }
}
