/// GPU layer parameters.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format. `Color` values are sRGB-encoded, so
    /// the default is a plain unorm surface that passes them through.
    pub prefer_srgb: bool,

    /// FIFO is supported everywhere and caps redraws at the display rate.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// A hint; support depends on the backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            // A clock redraws rarely; don't wake the discrete GPU for it.
            power_preference: wgpu::PowerPreference::LowPower,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
