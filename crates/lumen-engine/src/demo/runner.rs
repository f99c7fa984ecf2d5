use anyhow::Result;
use bytemuck::Pod;

use crate::core::{App, AppControl, FrameCtx};
use crate::device::Gpu;
use crate::render::{plan_bindings, MeshRenderer, RenderCtx};
use crate::shader::{ShaderError, ShaderProgram};
use crate::window::Runtime;

use super::DemoConfig;

/// A validated demo, ready to run.
pub struct Demo<U> {
    config: DemoConfig<U>,
    program: ShaderProgram,
    renderer: Option<MeshRenderer<U>>,
}

impl<U: Pod> Demo<U> {
    /// Loads and links the shaders and checks that the mesh layout, the
    /// uniform struct and the texture fit the program. No window or device
    /// is touched.
    pub fn new(config: DemoConfig<U>) -> Result<Self, ShaderError> {
        let program = ShaderProgram::load(&config.vertex_shader, &config.fragment_shader)?;
        let checked = config
            .mesh
            .layout()
            .check_against(program.interface())
            .and_then(|()| {
                plan_bindings(program.interface(), size_of::<U>(), config.texture.is_some())
            });
        if let Err(e) = checked {
            log::error!("{e}");
            return Err(e);
        }

        log::debug!("demo '{}' validated", config.runtime.title);
        Ok(Self {
            config,
            program,
            renderer: None,
        })
    }

    pub fn config(&self) -> &DemoConfig<U> {
        &self.config
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }
}

impl<U: Pod + 'static> Demo<U> {
    /// Opens the window and renders until an exit key or close request.
    pub fn run(self) -> Result<()> {
        let runtime = self.config.runtime.clone();
        let gpu = self.config.gpu.clone();
        Runtime::run(runtime, gpu, self)
    }
}

impl<U: Pod> App for Demo<U> {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let size = gpu.size();
        let ctx = RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            gpu.depth_format(),
            (size.width, size.height),
        );
        let renderer = MeshRenderer::new(
            &ctx,
            &self.program,
            &self.config.mesh,
            self.config.texture.as_ref(),
        )?;
        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_ref() else {
            return AppControl::Continue;
        };

        let uniforms = (self.config.update)(&ctx.time, ctx.size());
        ctx.render(self.config.clear_color, |rctx, target| {
            renderer.update(rctx.queue, &uniforms);
            renderer.draw(target);
        })
    }
}
