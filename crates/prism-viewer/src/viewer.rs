use std::f32::consts::PI;

use anyhow::{Context, Result};
use glam::Vec3;

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::Gpu;
use prism_engine::input::Key;
use prism_engine::material::CookTorrancePipeline;
use prism_engine::render::{FrameOutcome, RenderCtx, RenderSettings, Renderer};
use prism_engine::resource::{ResourceBuilder, ResourceManager};
use prism_engine::scene::{CameraBuilder, Scene, SceneBuilder, TransformBuilder};

use crate::controls::apply_controls;
use crate::geometry::{box_vertices, cone_vertices};

const CONE_SEGMENTS: u32 = 32;

const ALBEDO_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/albedo.png");
const ROUGHNESS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/roughness.png");

/// Two boxes and an upside-down cone, lit with the Cook-Torrance material.
pub struct Viewer {
    // Keeps the meshes and textures the scene and pipeline share.
    _resources: ResourceManager,
    scene: Scene,
    pipeline: CookTorrancePipeline,
    renderer: Renderer,
}

impl Viewer {
    pub fn new(gpu: &Gpu<'_>) -> Result<Self> {
        let resources: ResourceManager = ResourceBuilder::new(gpu.device(), gpu.queue())
            .with_mesh("BOX", &box_vertices())?
            .with_mesh("CONE", &cone_vertices(CONE_SEGMENTS))?
            .with_texture("ALBEDO", ALBEDO_PATH)
            .with_texture("ROUGHNESS", ROUGHNESS_PATH)
            .build()
            .context("failed to load resources")?;

        let scene = build_scene(&resources, gpu.aspect()).context("failed to build scene")?;

        let ctx = RenderCtx::from_gpu(gpu, RenderSettings::default());
        let pipeline = CookTorrancePipeline::create(
            &ctx,
            resources.texture("ALBEDO")?.clone(),
            resources.texture("ROUGHNESS")?.clone(),
            &scene,
        )
        .context("failed to create Cook-Torrance pipeline")?;
        let renderer = Renderer::new(&ctx);

        log::info!("scene ready: {} objects", scene.len());

        Ok(Self {
            _resources: resources,
            scene,
            pipeline,
            renderer,
        })
    }
}

fn build_scene(resources: &ResourceManager, aspect: f32) -> Result<Scene> {
    let camera = CameraBuilder::new()
        .with_look_at(Vec3::splat(4.0), Vec3::ZERO)
        .with_perspective(aspect)
        .build();

    let scene = SceneBuilder::new(resources)
        .with_camera(camera)
        .with_object(
            "BOX",
            TransformBuilder::new()
                .with_translation(Vec3::new(-1.0, -1.0, 0.0))
                .build(),
            Vec3::new(0.8, 0.2, 0.4),
        )?
        .with_object(
            "BOX",
            TransformBuilder::new()
                .with_translation(Vec3::new(-1.0, 1.0, 0.0))
                .build(),
            Vec3::new(0.4, 0.8, 0.2),
        )?
        .with_object(
            "CONE",
            TransformBuilder::new()
                .with_translation(Vec3::new(0.0, 0.0, 0.5))
                .with_scale(Vec3::new(1.0, 1.0, 2.0))
                .with_rotation_x(PI)
                .build(),
            Vec3::new(0.2, 0.4, 0.8),
        )?
        .build()?;

    Ok(scene)
}

impl App for Viewer {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if ctx.input.key_down(Key::Escape) {
            return Ok(AppControl::Exit);
        }

        apply_controls(ctx.input, self.scene.active_camera_mut());
        self.pipeline.upload_camera(&self.scene)?;

        match self.renderer.run(ctx.gpu, &self.scene, &self.pipeline)? {
            FrameOutcome::Presented { draws } if ctx.frame_index == 0 => {
                log::info!("first frame presented ({draws} draws)");
            }
            FrameOutcome::Presented { .. } => {}
            FrameOutcome::Skipped => log::trace!("frame {} skipped", ctx.frame_index),
        }

        Ok(AppControl::Continue)
    }
}
