//! The dog scene.
//!
//! [`SceneDriver`] holds everything that changes over time and is free of GPU
//! state: the matcap transition, the scroll position and its timeline, the
//! pointer parallax and the animation clock. [`DogScene`] owns the loaded
//! asset and the GPU materials and implements [`GraphicsFlow`] on top of a
//! driver.

use std::pin::Pin;

use cgmath::Vector2;
use instant::Duration;
use winit::event::WindowEvent;

use crate::{
    camera::{Camera, Projection},
    config::SceneConfig,
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        scene_graph::{NodeDraw, SceneNode},
        texture::TextureOptions,
    },
    error::SetupError,
    flow::{FlowConstructor, GraphicsFlow, Out},
    material::{
        MatcapId, MatcapLibrary, MatcapMaterials, MaterialVariant, VariantTable, classify,
    },
    parallax::PointerParallax,
    render::{Instanced, Render},
    resources::{load_model_gltf, texture::load_texture},
    timeline::{ScrollTimeline, Transform, VirtualScroll},
    transition::{MatcapTransition, Settled},
    tween::TweenStatus,
};

#[derive(Clone, Debug, PartialEq)]
pub enum HoverEvent {
    /// The pointer entered the anchor of the named variant.
    Enter(String),
    /// The pointer left any hover anchor.
    Leave,
}

/// Events host bindings deliver to the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    Hover(HoverEvent),
    /// Normalized scroll position between the start and end anchors.
    ScrollProgress(f32),
    /// Pointer position and viewport size, both in logical pixels.
    PointerMoved {
        x: f32,
        y: f32,
        viewport_w: f32,
        viewport_h: f32,
    },
}

/// The single light the scene exposes to its host. Matcap shading ignores
/// it; hosts that composite other lit content can use it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 5.0],
            color: [1.0, 1.0, 1.0],
            intensity: 5.0,
        }
    }
}

/// What changed during one [`SceneDriver::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameAdvance {
    /// Set on the frame a matcap fade settles.
    pub settled: Option<Settled>,
    pub parallax: TweenStatus,
}

#[derive(Debug)]
pub struct SceneDriver {
    variants: VariantTable,
    default_primary: MatcapId,
    default_environment: MatcapId,
    transition: MatcapTransition,
    timeline: ScrollTimeline,
    scroll_progress: f32,
    virtual_scroll: VirtualScroll,
    parallax: PointerParallax,
    clip_time: f32,
    clip_duration: f32,
}

impl SceneDriver {
    /// At rest on the default primary matcap, scrolled to the top.
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            variants: config.variants.clone(),
            default_primary: config.default_primary,
            default_environment: config.default_environment,
            transition: MatcapTransition::new(
                config.default_primary,
                config.default_environment,
                config.transition,
            ),
            timeline: config.scroll_timeline(),
            scroll_progress: 0.0,
            virtual_scroll: VirtualScroll::new(config.scroll_sections, 1.0),
            parallax: PointerParallax::new(config.parallax),
            clip_time: 0.0,
            clip_duration: 0.0,
        }
    }

    /// Fades to the matcap of the named variant. Unknown names are logged
    /// and ignored.
    pub fn enter_variant(&mut self, name: &str) -> bool {
        match self.variants.get(name) {
            Some(matcap) => {
                log::debug!("hover enter `{}` -> {}", name, matcap);
                self.transition.enter(matcap, matcap);
                true
            }
            None => {
                log::warn!("no matcap configured for hover anchor `{}`", name);
                false
            }
        }
    }

    /// Fades back to the defaults.
    pub fn leave(&mut self) {
        log::debug!("hover leave");
        self.transition
            .enter(self.default_primary, self.default_environment);
    }

    pub fn handle(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::Hover(HoverEvent::Enter(name)) => {
                self.enter_variant(&name);
            }
            SceneEvent::Hover(HoverEvent::Leave) => self.leave(),
            SceneEvent::ScrollProgress(progress) => self.set_scroll_progress(progress),
            SceneEvent::PointerMoved {
                x,
                y,
                viewport_w,
                viewport_h,
            } => self.pointer_moved(Vector2::new(x, y), Vector2::new(viewport_w, viewport_h)),
        }
    }

    pub fn set_scroll_progress(&mut self, progress: f32) {
        if progress.is_finite() {
            self.scroll_progress = progress.clamp(0.0, 1.0);
        }
    }

    /// Scrolls the emulated page by `delta` pixels.
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_progress = self.virtual_scroll.scroll_by(delta);
    }

    pub fn resize(&mut self, viewport_height: f32) {
        self.virtual_scroll.resize(viewport_height);
    }

    pub fn pointer_moved(&mut self, pointer: Vector2<f32>, viewport: Vector2<f32>) {
        self.parallax.pointer_moved(pointer, viewport);
    }

    /// Length of the looping clip; `0` stops the clock.
    pub fn set_clip_duration(&mut self, duration: f32) {
        self.clip_duration = duration.max(0.0);
        self.clip_time = 0.0;
    }

    /// Advances every running animation by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> FrameAdvance {
        let dt = dt.max(0.0);
        if self.clip_duration > 0.0 {
            self.clip_time = (self.clip_time + dt) % self.clip_duration;
        }
        FrameAdvance {
            settled: self.transition.advance(dt),
            parallax: self.parallax.advance(dt),
        }
    }

    /// Transform of the asset root at the current scroll position.
    pub fn root_transform(&self) -> Transform {
        self.timeline.sample(self.scroll_progress)
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    pub fn clip_time(&self) -> f32 {
        self.clip_time
    }

    pub fn transition(&self) -> &MatcapTransition {
        &self.transition
    }

    pub fn parallax(&self) -> &PointerParallax {
        &self.parallax
    }

    pub fn variants(&self) -> &VariantTable {
        &self.variants
    }
}

pub struct DogScene {
    config: SceneConfig,
    driver: SceneDriver,
    root: Box<dyn SceneNode>,
    library: MatcapLibrary,
    materials: MatcapMaterials,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl DogScene {
    /// Loads the asset, the matcaps and both normal maps.
    pub async fn load(ctx: InitContext, config: SceneConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let device = &ctx.device;
        let queue = &ctx.queue;

        log::info!("loading `{}`", config.model_path);
        let (library, primary_normal, environment_normal, root) = futures::join!(
            MatcapLibrary::load(config.matcap_count, device, queue),
            load_texture(
                &config.primary_normal_map.path,
                TextureOptions::NORMAL.flipped(config.primary_normal_map.flip_y),
                device,
                queue,
            ),
            load_texture(
                &config.environment_normal_map.path,
                TextureOptions::NORMAL.flipped(config.environment_normal_map.flip_y),
                device,
                queue,
            ),
            load_model_gltf(&config.model_path, device),
        );
        let (library, primary_normal, environment_normal, mut root) =
            (library?, primary_normal?, environment_normal?, root?);

        let marker = config.marker.clone();
        root.assign_materials(&|name| classify(name, &marker));
        let mut primary_nodes = 0;
        root.visit(&mut |node| {
            if node.material() == Some(MaterialVariant::PrimaryObject) {
                primary_nodes += 1;
            }
        });
        if primary_nodes == 0 {
            log::warn!("no node name contains `{}`, everything is environment", config.marker);
        } else {
            log::info!("{} node(s) use the primary material", primary_nodes);
        }

        let mut driver = SceneDriver::new(&config);
        if let Some(clip) = &config.animation_clip {
            let duration = root.clip_duration(clip);
            if duration > 0.0 {
                log::info!("playing `{}` ({:.2}s loop)", clip, duration);
            } else {
                log::warn!("animation clip `{}` not found, keeping the rest pose", clip);
            }
            driver.set_clip_duration(duration);
        }

        let materials = MatcapMaterials::new(
            device,
            &ctx.layouts,
            &library,
            primary_normal,
            environment_normal,
            driver.transition().state(),
            driver.transition().environment(),
        )?;

        let mut scene = Self {
            driver,
            root,
            library,
            materials,
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            config,
        };
        scene.apply_pose();
        Ok(scene)
    }

    /// Flow constructor for [`crate::flow::run`].
    pub fn constructor<S: 'static>(config: SceneConfig) -> FlowConstructor<S, SceneEvent> {
        Box::new(
            move |ctx: InitContext| -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S, SceneEvent>>>>>> {
                Box::pin(async move {
                    let scene = DogScene::load(ctx, config).await?;
                    let flow: Box<dyn GraphicsFlow<S, SceneEvent>> = Box::new(scene);
                    Ok::<_, anyhow::Error>(flow)
                })
            },
        )
    }

    pub fn driver(&self) -> &SceneDriver {
        &self.driver
    }

    pub fn root(&self) -> &dyn SceneNode {
        self.root.as_ref()
    }

    pub fn light(&self) -> DirectionalLight {
        self.config.light
    }

    /// Poses the asset for the current clip time and scroll position and
    /// uploads the node transforms.
    fn apply_pose(&mut self) {
        if let Some(clip) = &self.config.animation_clip {
            self.root.animate(clip, self.driver.clip_time());
        }
        self.root
            .set_local_transform(self.driver.root_transform().to_instance());
        self.root.update_world_transforms(&Instance::new());
        self.root.write_to_buffers(&self.queue);
    }

    /// Parallax offsets are kept in logical pixels, so the conversion to
    /// clip space uses the logical viewport.
    fn screen_offset(&self, ctx: &Context) -> [f32; 2] {
        let [width, height] = ctx.logical_viewport();
        self.driver
            .parallax()
            .ndc_offset(Vector2::new(width, height))
            .into()
    }
}

impl<S> GraphicsFlow<S, SceneEvent> for DogScene {
    fn on_init(&mut self, ctx: &mut Context, _state: &mut S) -> Out<S, SceneEvent> {
        ctx.clear_colour = self.config.clear_colour;
        let camera = self.config.camera;
        ctx.camera.camera = Camera::new((0.0, 0.0, camera.distance), (0.0, 0.0, 0.0));
        ctx.projection = Projection::new(
            ctx.config.width,
            ctx.config.height,
            cgmath::Deg(camera.fov),
            camera.near,
            camera.far,
        );
        ctx.camera.uniform.set_exposure(self.config.exposure);
        self.driver.resize(ctx.viewport()[1]);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _state: &mut S, dt: Duration) -> Out<S, SceneEvent> {
        let frame = self.driver.advance(dt.as_secs_f32());
        if let Some(settled) = frame.settled {
            log::debug!(
                "transition settled on {} (environment {})",
                settled.active,
                settled.environment
            );
        }
        self.apply_pose();

        let transition = self.driver.transition();
        if let Err(e) = self.materials.sync(
            &self.device,
            &self.queue,
            &self.library,
            transition.state(),
            transition.environment(),
        ) {
            log::error!("cannot update the matcap bindings: {}", e);
        }

        if frame.parallax == TweenStatus::Idle {
            return Out::Empty;
        }
        let offset = self.screen_offset(ctx);
        Out::Configure(Box::new(move |ctx: &mut Context| {
            ctx.camera.uniform.set_screen_offset(offset)
        }))
    }

    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn on_window_events(
        &mut self,
        ctx: &Context,
        _state: &mut S,
        event: &WindowEvent,
    ) -> Out<S, SceneEvent> {
        match event {
            // The browser reports pointer moves through the document listener
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = Vector2::new(position.x as f32, position.y as f32);
                self.driver.pointer_moved(
                    crate::parallax::logical_pixels(pointer, ctx.scale_factor()),
                    ctx.logical_viewport().into(),
                );
            }
            WindowEvent::Resized(size) => self.driver.resize(size.height as f32),
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseWheel { delta, .. } => {
                let pixels = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => {
                        -y * self.config.wheel_line_height
                    }
                    winit::event::MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.driver.scroll_by(pixels);
            }
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && !event.repeat =>
            {
                use winit::keyboard::{Key, NamedKey};
                match event.logical_key.as_ref() {
                    Key::Named(NamedKey::Escape) | Key::Character("0") => self.driver.leave(),
                    Key::Character(c) => {
                        let variant = c
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .and_then(|i| self.driver.variants().nth(i))
                            .map(|(name, _)| name.to_string());
                        if let Some(name) = variant {
                            self.driver.enter_variant(&name);
                        }
                    }
                    _ => (),
                }
            }
            _ => (),
        }
        Out::Empty
    }

    fn on_custom_events(
        &mut self,
        _ctx: &Context,
        _state: &mut S,
        event: SceneEvent,
    ) -> Option<SceneEvent> {
        self.driver.handle(event);
        None
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        let mut draws: Vec<NodeDraw> = Vec::new();
        self.root.collect_draws(&mut draws);
        let blend = self.materials.transition_bind_group();
        Render::Matcaps(
            draws
                .into_iter()
                .map(|draw| Instanced {
                    instance: draw.instance,
                    model: draw.model,
                    amount: 1,
                    material: self.materials.bind_group(draw.variant),
                    blend: match draw.variant {
                        MaterialVariant::PrimaryObject => Some(blend),
                        MaterialVariant::Environment if self.config.blend_environment => {
                            Some(blend)
                        }
                        MaterialVariant::Environment => None,
                    },
                })
                .collect(),
        )
    }
}
