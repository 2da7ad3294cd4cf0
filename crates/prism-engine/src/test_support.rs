//! Headless device for tests that need real GPU objects.
//!
//! Returns `None` (and the calling test returns early) on machines without a
//! usable adapter, so the pure-CPU suites still run everywhere.

pub(crate) fn device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("skipping GPU test: no adapter ({e})");
                return None;
            }
        };

        match adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("prism test device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
        {
            Ok(pair) => Some(pair),
            Err(e) => {
                log::warn!("skipping GPU test: no device ({e})");
                None
            }
        }
    })
}
