use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Receiver;

use facetag_core::annotate::frame_annotator::FrameAnnotator;
use facetag_core::io::snapshot_writer::SnapshotWriter;
use facetag_core::pipeline::analyze_use_case::FaceAnalysis;
use facetag_core::shared::frame::Frame;

use crate::worker::WorkerEvent;

/// The live window: newest analyzed frame as a texture, boxes and labels
/// painted on top, `S` saves, `Q`/`Escape` quits.
pub struct ViewerApp {
    rx: Receiver<WorkerEvent>,
    stop: Arc<AtomicBool>,
    annotator: FrameAnnotator,
    snapshots: SnapshotWriter,
    texture: Option<egui::TextureHandle>,
    current: Option<(Frame, Vec<FaceAnalysis>)>,
    status: String,
    worker_down: Option<String>,
}

impl ViewerApp {
    pub fn new(rx: Receiver<WorkerEvent>, stop: Arc<AtomicBool>, snapshots: SnapshotWriter) -> Self {
        Self {
            rx,
            stop,
            annotator: FrameAnnotator::default(),
            snapshots,
            texture: None,
            current: None,
            status: "Waiting for camera...".to_string(),
            worker_down: None,
        }
    }

    /// Pulls everything queued and keeps only the newest frame.
    fn drain_events(&mut self, ctx: &egui::Context) {
        let mut newest = None;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                WorkerEvent::Frame { frame, analyses } => newest = Some((frame, analyses)),
                WorkerEvent::Stopped { reason } => self.worker_down = Some(reason),
            }
        }

        if let Some((frame, analyses)) = newest {
            let image = egui::ColorImage::from_rgb(
                [frame.width() as usize, frame.height() as usize],
                frame.data(),
            );
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture = Some(ctx.load_texture(
                        "webcam-frame",
                        image,
                        egui::TextureOptions::LINEAR,
                    ))
                }
            }
            self.status = format!(
                "frame {} | {} face(s) | S saves, Q quits",
                frame.index(),
                analyses.len()
            );
            self.current = Some((frame, analyses));
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let quit = ctx.input(|i| i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape));
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            self.save_snapshot();
        }
    }

    fn save_snapshot(&mut self) {
        let Some((frame, analyses)) = &self.current else {
            self.status = "Nothing to save yet.".to_string();
            return;
        };

        let mut annotated = frame.clone();
        self.annotator.annotate(&mut annotated, analyses);
        match self.snapshots.save(&annotated) {
            Ok(path) => self.status = format!("Saved {}", path.display()),
            Err(e) => {
                log::error!("snapshot failed: {e}");
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn draw_video(&self, ui: &mut egui::Ui) {
        let Some(texture) = &self.texture else {
            ui.centered_and_justified(|ui| {
                ui.label(self.worker_down.as_deref().unwrap_or("Waiting for camera..."));
            });
            return;
        };

        let available = ui.available_size();
        let tex_size = texture.size_vec2();
        let scale = (available.x / tex_size.x)
            .min(available.y / tex_size.y)
            .min(4.0);
        let response = ui.add(egui::Image::new(texture).fit_to_exact_size(tex_size * scale));

        if let Some((_, analyses)) = &self.current {
            let painter = ui.painter_at(response.rect);
            let origin = response.rect.min;
            for analysis in analyses {
                let region = &analysis.region;
                let rect = egui::Rect::from_min_size(
                    origin + egui::vec2(region.x as f32 * scale, region.y as f32 * scale),
                    egui::vec2(region.width as f32 * scale, region.height as f32 * scale),
                );
                let [r, g, b] = FrameAnnotator::box_color(analysis.gender.label);
                let color = egui::Color32::from_rgb(r, g, b);
                painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, color));

                let label = format!(
                    "{} {:.0}%",
                    analysis.gender.label,
                    analysis.gender.confidence * 100.0
                );
                painter.text(
                    rect.left_top() - egui::vec2(0.0, 4.0),
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::proportional(14.0),
                    color,
                );
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.handle_keys(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            match &self.worker_down {
                Some(reason) => ui.colored_label(egui::Color32::RED, reason),
                None => ui.label(&self.status),
            };
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_video(ui);
        });

        // The camera drives updates, not user input.
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
