//! Window, camera and colour parameters for the render collaborator.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Window title
    pub title: String,

    /// Initial field of view (degrees)
    pub fov_degrees: f32,

    /// Field of view limits reachable with the FoV keys (degrees)
    pub fov_range_degrees: (f32, f32),

    /// FoV change while a FoV key is held (degrees per second)
    pub fov_speed_deg_per_s: f32,

    /// Near clipping plane (cells)
    pub near_plane: f32,

    /// Far clipping plane (cells); the draw distance stays inside the resident window
    pub far_plane: f32,

    /// Background colour (linear RGB)
    pub clear_color: [f64; 3],

    /// Camera height above the terrain base plane in follow mode (cells)
    pub camera_height: f32,

    /// Free-fly movement speed (cells per second)
    pub fly_speed: f32,

    /// Extra brightness of the wireframe overlay over the filled surface
    pub wireframe_boost: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            window_width: 1920,
            window_height: 1080,
            title: "Ridgeline".to_string(),
            fov_degrees: 100.0, // Wide view so neighbouring ridges stay on screen
            fov_range_degrees: (45.0, 120.0),
            fov_speed_deg_per_s: 50.0,
            near_plane: 0.1,
            far_plane: 120.0,
            clear_color: [0.05, 0.0, 0.15],
            camera_height: 2.0,
            fly_speed: 6.0,
            wireframe_boost: 0.4,
        }
    }
}

/// Surface colour: base brightness plus per-channel multipliers
#[derive(Debug, Clone, Copy)]
pub struct ColorParams {
    /// Initial base brightness (also settable by the embedding caller)
    pub brightness: f32,

    /// Initial channel multipliers (r, g, b), each in [0, 1]
    pub rgb: [f32; 3],

    /// Channel change per frame while a colour key is held
    pub key_step: f32,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            brightness: 0.9,
            rgb: [1.0, 0.1, 0.7],
            key_step: 0.01,
        }
    }
}
