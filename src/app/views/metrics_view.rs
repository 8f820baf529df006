use egui_extras::{Column, TableBuilder};

use crate::app::views::View;
use crate::report::MetricFormat;
use crate::surface::RoughnessReport;

pub struct MetricsView {
    report: Option<RoughnessReport>,
    format: MetricFormat,
}

impl MetricsView {
    pub fn new(format: MetricFormat) -> Self {
        Self {
            report: None,
            format,
        }
    }

    pub fn set_report(&mut self, report: Option<RoughnessReport>) {
        self.report = report;
    }

    /// Rows shown in the table, headline metrics first.
    pub fn rows(&self) -> Vec<(String, String)> {
        let Some(report) = &self.report else {
            return Vec::new();
        };
        let mut rows: Vec<(String, String)> = report
            .metrics()
            .into_iter()
            .map(|(name, value)| (name.to_string(), self.format.format(value)))
            .collect();
        rows.push(("Mean height".to_string(), self.format.format(report.mean)));
        rows.push(("Min".to_string(), self.format.format(report.min)));
        rows.push(("Max".to_string(), self.format.format(report.max)));
        rows.push(("Samples".to_string(), report.sample_count.to_string()));
        rows
    }
}

impl View for MetricsView {
    fn draw(&mut self, ui: &mut egui::Ui) {
        let Some(report) = self.report else {
            return;
        };

        ui.horizontal(|ui| {
            for (name, value) in report.metrics() {
                ui.group(|ui| {
                    ui.vertical(|ui| {
                        ui.label(name);
                        ui.heading(self.format.format(value));
                    });
                });
            }
        });

        ui.collapsing("All statistics", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(140.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Statistic");
                    });
                    header.col(|ui| {
                        ui.strong("Value");
                    });
                })
                .body(|mut body| {
                    for (name, value) in self.rows() {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(name);
                            });
                            row.col(|ui| {
                                ui.monospace(value);
                            });
                        });
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{analyze, HeightMap};

    #[test]
    fn rows_use_configured_precision() {
        let report = analyze(
            &HeightMap::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]])
                .unwrap(),
        )
        .unwrap();
        let mut view = MetricsView::new(MetricFormat {
            decimals: 3,
            unit: "nm".to_string(),
        });
        assert!(view.rows().is_empty());
        view.set_report(Some(report));
        let rows = view.rows();
        assert_eq!(rows[0], ("Ra".to_string(), "2.222 nm".to_string()));
        assert_eq!(rows[1], ("Rq".to_string(), "2.582 nm".to_string()));
        assert_eq!(rows[2], ("Peak-to-Valley".to_string(), "8.000 nm".to_string()));
        assert_eq!(rows.last().unwrap(), &("Samples".to_string(), "9".to_string()));
    }
}
