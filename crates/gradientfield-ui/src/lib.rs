//! Desktop window hosting the particle field through eframe.

use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec2;
use gradientfield_core::{
    AppConfig, FieldConfig, FieldPreset, HostRect, PathShape, ScrollContext, ScrollState, Timeline,
};
use gradientfield_platform::{ParticleFieldAnimator, Result};
use gradientfield_raster::PixelCanvas;
use tracing::{error, info, warn};

mod host;
pub use host::{EguiInput, RepaintScheduler};

pub fn run_window(config: AppConfig) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window.title.clone())
            .with_inner_size([config.window.width, config.window.height]),
        ..Default::default()
    };
    let title = config.window.title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |creation_context| {
            let app = GradientApp::new(&creation_context.egui_ctx, config)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| format!("eframe failed: {e}"))?;
    Ok(())
}

pub struct GradientApp {
    config: AppConfig,
    shape: PathShape,
    animator: ParticleFieldAnimator,
    scheduler: RepaintScheduler,
    input: EguiInput,
    bounds: HostRect,
    canvas: PixelCanvas,
    texture: Option<egui::TextureHandle>,
    scroll: ScrollContext,
    scrolled: Arc<Mutex<ScrollState>>,
    scroll_target: f32,
    exit: Timeline,
    preset: Option<FieldPreset>,
    closed: bool,
}

impl GradientApp {
    pub fn new(context: &egui::Context, config: AppConfig) -> Result<Self> {
        let shape = PathShape::zigzag();
        let bounds = HostRect::new(0.0, 0.0, config.window.width, config.window.height);
        let mut animator = ParticleFieldAnimator::new(config.field.clone(), &shape, bounds)?;
        let mut scheduler = RepaintScheduler::new(context.clone());
        let mut input = EguiInput::new();
        animator.mount(&mut scheduler, &mut input)?;

        let mut scroll = ScrollContext::new(config.scroll.content_height, config.window.height, config.scroll.duration);
        let scrolled = Arc::new(Mutex::new(scroll.state()));
        let sink = Arc::clone(&scrolled);
        scroll.subscribe(move |state| {
            *sink.lock().unwrap_or_else(PoisonError::into_inner) = state;
        });
        scroll.init();

        Ok(Self {
            config,
            shape,
            animator,
            scheduler,
            input,
            bounds,
            canvas: PixelCanvas::new(0, 0),
            texture: None,
            scroll,
            scrolled,
            scroll_target: 0.0,
            exit: Timeline::hero_exit(),
            preset: None,
            closed: false,
        })
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.animator.teardown(&mut self.scheduler, &mut self.input) {
            error!("animator teardown failed: {err}");
        }
        self.scroll.teardown();
        info!(frames = self.animator.frames(), "window closing");
    }

    /// Swap in a fresh field. Needed when the particle layout itself changes.
    fn rebuild(&mut self, field: FieldConfig) {
        let next = match ParticleFieldAnimator::new(field, &self.shape, self.bounds) {
            Ok(next) => next,
            Err(err) => {
                warn!("keeping current field: {err}");
                return;
            }
        };
        if let Err(err) = self.animator.replace_with(next, &mut self.scheduler, &mut self.input) {
            error!("field swap incomplete: {err}");
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Field");
        let mut tuning = self.animator.field().config().clone();
        let mut changed = false;
        changed |= ui
            .add(egui::Slider::new(&mut tuning.interaction_radius, 0.05..=1.0).text("radius"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut tuning.spring_rate, 0.01..=0.3).text("spring"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut tuning.logo_scale, 0.25..=2.0).text("scale"))
            .changed();
        changed |= ui.checkbox(&mut tuning.glow, "glow").changed();
        if changed {
            self.animator.reconfigure(tuning);
        }

        let mut preset = self.preset;
        egui::ComboBox::from_label("preset")
            .selected_text(preset.map_or("custom", FieldPreset::name))
            .show_ui(ui, |ui| {
                for option in FieldPreset::ALL {
                    ui.selectable_value(&mut preset, Some(option), option.name());
                }
            });
        if preset != self.preset {
            if let Some(chosen) = preset {
                info!(preset = chosen.name(), "switching preset");
                let mut field = chosen.config();
                field.seed = self.config.field.seed;
                self.rebuild(field);
            }
            self.preset = preset;
        }

        ui.separator();
        ui.heading("Page");
        let mut progress = self.scroll.state().progress;
        if ui
            .add(egui::Slider::new(&mut progress, 0.0..=1.0).text("scroll"))
            .changed()
        {
            self.scroll.set_progress(progress);
            self.scroll_target = self.scroll.metrics().offset;
        }
        if ui.button("Back to top").clicked() {
            self.scroll_target = 0.0;
            self.scroll.scroll_to(0.0);
        }
        ui.label(format!("frames: {}", self.animator.frames()));
    }

    fn field(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::hover());
        let ppp = ui.ctx().pixels_per_point();

        let physical = rect.size() * ppp;
        self.bounds = HostRect::new(rect.min.x * ppp, rect.min.y * ppp, physical.x, physical.y);
        let hover = response.hover_pos().map(|p| Vec2::new(p.x * ppp, p.y * ppp));
        let touching = ui.input(|i| i.any_touches());
        for event in self.input.poll(self.bounds, hover, touching) {
            self.animator.handle_event(event);
        }

        let (width, height) = (physical.x.round() as u32, physical.y.round() as u32);
        if (width, height) != (self.canvas.width(), self.canvas.height()) {
            self.canvas.resize(width, height);
            self.scroll.resize(self.config.scroll.content_height, rect.height());
        }

        if response.hovered() {
            let wheel = ui.input(|i| i.raw_scroll_delta.y);
            if wheel != 0.0 {
                self.scroll_target = (self.scroll_target - wheel).clamp(0.0, self.scroll.metrics().max_offset());
                self.scroll.scroll_to(self.scroll_target);
            }
        }

        if self.scheduler.is_running() {
            self.animator.frame(Some(&mut self.canvas));
        }
        if width == 0 || height == 0 {
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], self.canvas.as_bytes());
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                let texture = ui.ctx().load_texture("gradientfield", image, egui::TextureOptions::LINEAR);
                self.texture = Some(texture);
            }
        }
        let Some(texture_id) = self.texture.as_ref().map(egui::TextureHandle::id) else {
            return;
        };

        let progress = self.scrolled.lock().unwrap_or_else(PoisonError::into_inner).progress;
        let pose = self.exit.evaluate(progress);
        let center = rect.center() + egui::vec2(pose.translate_x, pose.translate_y);
        let placed = egui::Rect::from_center_size(center, rect.size() * pose.scale);
        let tint = egui::Color32::from_white_alpha((pose.opacity.clamp(0.0, 1.0) * 255.0).round() as u8);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(3, 0, 20));
        painter.image(
            texture_id,
            placed,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            tint,
        );
    }
}

impl eframe::App for GradientApp {
    fn update(&mut self, context: &egui::Context, _frame: &mut eframe::Frame) {
        if self.closed {
            return;
        }
        if context.input(|i| i.viewport().close_requested()) {
            self.shutdown();
            return;
        }

        let dt = context.input(|i| i.stable_dt).min(0.1);
        self.scroll.advance(dt);

        if self.config.window.show_controls {
            egui::SidePanel::right("controls").show(context, |ui| self.controls(ui));
        }
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(context, |ui| self.field(ui));

        self.scheduler.request_frame();
        if self.scroll.is_animating() {
            context.request_repaint();
        }
    }
}
