use egui_plot::{Legend, Line, Plot, PlotPoints};
use lf_app::{
    AppResult, RecordingSink, RunConfig, default_curve, plot_curve, plot_trajectory, run_lorenz,
};
use tracing::{error, info};

use crate::projection::ViewAngles;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Attractor,
    Curve,
}

pub struct LorenzViewer {
    sink: RecordingSink,
    summary: String,
    error: Option<String>,
    view: ViewAngles,
    auto_rotate: bool,
    tab: Tab,
}

impl LorenzViewer {
    pub fn new(config: AppResult<RunConfig>) -> Self {
        let mut sink = RecordingSink::default();
        let outcome = config.and_then(|config| Self::populate(&mut sink, &config));

        let (summary, error) = match outcome {
            Ok(summary) => (summary, None),
            Err(e) => {
                error!(error = %e, "failed to build plots");
                (String::new(), Some(e.to_string()))
            }
        };

        Self {
            sink,
            summary,
            error,
            view: ViewAngles::default(),
            auto_rotate: false,
            tab: Tab::Attractor,
        }
    }

    fn populate(sink: &mut RecordingSink, config: &RunConfig) -> AppResult<String> {
        let response = run_lorenz(config)?;
        plot_trajectory(sink, &response.title(), &response.trajectory)?;
        plot_curve(sink, "y = 2 sin(x) cos(x)", &default_curve()?)?;

        let stats = response.trajectory.stats;
        info!(samples = response.trajectory.len(), "plots ready");
        Ok(format!(
            "{} samples, {} rhs calls, {} steps ({} rejected), {:.3}s",
            response.trajectory.len(),
            stats.rhs_calls,
            stats.accepted_steps,
            stats.rejected_steps,
            response.elapsed_s
        ))
    }

    fn show_attractor(&self, ui: &mut egui::Ui) {
        let lines: Vec<Line> = self
            .sink
            .lines3
            .iter()
            .map(|line| {
                let points: PlotPoints = self.view.project_all(&line.points).into();
                Line::new(points).name(&line.title).width(0.5_f32)
            })
            .collect();

        Plot::new("attractor_plot")
            .legend(Legend::default())
            .data_aspect(1.0)
            .show_axes([false, false])
            .show(ui, |plot_ui| {
                for line in lines {
                    plot_ui.line(line);
                }
            });
    }

    fn show_curve(&self, ui: &mut egui::Ui) {
        Plot::new("curve_plot")
            .legend(Legend::default())
            .x_axis_label("x")
            .y_axis_label("y")
            .show(ui, |plot_ui| {
                for line in &self.sink.lines2 {
                    let points: PlotPoints = line.points.clone().into();
                    plot_ui.line(Line::new(points).name(&line.title));
                }
            });
    }
}

impl eframe::App for LorenzViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.auto_rotate {
            self.view.yaw_deg = (self.view.yaw_deg + 0.5 + 180.0).rem_euclid(360.0) - 180.0;
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Attractor, "Attractor");
                ui.selectable_value(&mut self.tab, Tab::Curve, "Curve");

                if self.tab == Tab::Attractor {
                    ui.separator();
                    ui.add(
                        egui::DragValue::new(&mut self.view.yaw_deg)
                            .speed(1.0)
                            .range(-180.0..=180.0)
                            .prefix("yaw ")
                            .suffix("°"),
                    );
                    ui.add(
                        egui::DragValue::new(&mut self.view.pitch_deg)
                            .speed(1.0)
                            .range(-90.0..=90.0)
                            .prefix("pitch ")
                            .suffix("°"),
                    );
                    ui.checkbox(&mut self.auto_rotate, "Rotate");
                    if ui.button("Reset view").clicked() {
                        self.view = ViewAngles::default();
                    }
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| match &self.error {
            Some(message) => {
                ui.colored_label(egui::Color32::RED, message);
            }
            None => {
                ui.label(&self.summary);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Attractor => self.show_attractor(ui),
            Tab::Curve => self.show_curve(ui),
        });
    }
}
