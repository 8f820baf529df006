use crate::surface::RoughnessReport;

/// How numbers are rendered in the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFormat {
    pub decimals: usize,
    pub unit: String,
}

impl Default for MetricFormat {
    fn default() -> Self {
        Self {
            decimals: 3,
            unit: "nm".to_string(),
        }
    }
}

impl MetricFormat {
    pub fn format(&self, value: f64) -> String {
        RoughnessReport::format_metric(value, self.decimals, &self.unit)
    }
}

pub fn build_prompt(
    report: &RoughnessReport,
    goal: &str,
    format: &MetricFormat,
    include_peak_to_valley: bool,
) -> String {
    let mut prompt = format!(
        "The calculated roughness is Ra: {} and Rq: {}",
        format.format(report.ra),
        format.format(report.rq)
    );
    if include_peak_to_valley {
        prompt.push_str(&format!(
            " (peak-to-valley: {})",
            format.format(report.peak_to_valley)
        ));
    }
    prompt.push('.');

    let goal = goal.trim();
    if !goal.is_empty() {
        prompt.push(' ');
        prompt.push_str(goal);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{analyze, HeightMap};

    fn step_report() -> RoughnessReport {
        analyze(&HeightMap::from_rows(vec![vec![0.0, 0.0], vec![10.0, 10.0]]).unwrap()).unwrap()
    }

    #[test]
    fn prompt_carries_fixed_precision_metrics_and_goal() {
        let prompt = build_prompt(
            &step_report(),
            "Analyze the morphology.",
            &MetricFormat::default(),
            false,
        );
        assert_eq!(
            prompt,
            "The calculated roughness is Ra: 5.000 nm and Rq: 5.000 nm. Analyze the morphology."
        );
    }

    #[test]
    fn peak_to_valley_is_optional() {
        let format = MetricFormat {
            decimals: 2,
            unit: "nm".to_string(),
        };
        let prompt = build_prompt(&step_report(), "  ", &format, true);
        assert_eq!(
            prompt,
            "The calculated roughness is Ra: 5.00 nm and Rq: 5.00 nm (peak-to-valley: 10.00 nm)."
        );
    }
}
