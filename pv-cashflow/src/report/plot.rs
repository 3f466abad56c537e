use std::path::Path;

use plotters::prelude::*;
use pv_model::YearlyRecord;

use crate::report::summary::{sample_years, to_blocks};

/// Min and max over all values, widened so the range always contains zero and
/// is never empty.
pub fn value_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .fold((0f64, 0f64), |(min, max), &v| (min.min(v), max.max(v)));
    if max - min < f64::EPSILON {
        (min, min + 1.0)
    } else {
        let margin = (max - min) * 0.05;
        (min - margin, max + margin)
    }
}

/// Cumulative cashflow and NPV over the horizon, in display blocks, with a
/// break-even line.
pub fn plot_cashflow(
    records: &[YearlyRecord],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let cumulative: Vec<(f64, f64)> = records
        .iter()
        .map(|r| (f64::from(r.year), to_blocks(r.cumulative_cashflow)))
        .collect();
    let npv: Vec<(f64, f64)> = records
        .iter()
        .map(|r| (f64::from(r.year), to_blocks(r.npv)))
        .collect();
    let (y_min, y_max) = value_range(cumulative.iter().chain(&npv).map(|(_, y)| y));
    let x_max = records.len().max(1) as f64;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative cashflow and NPV", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Amount (10,000 units)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(vec![(0.0, 0.0), (x_max, 0.0)], &BLACK))?
        .label("Break-even")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &BLACK));

    chart
        .draw_series(LineSeries::new(cumulative, &BLUE))?
        .label("Cumulative cashflow")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(npv, &GREEN))?
        .label("NPV")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &GREEN));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Generation, self-consumption, feed-in and grid purchase of the sampled
/// years as grouped bars.
pub fn plot_energy_flow(
    records: &[YearlyRecord],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let sampled = sample_years(records);
    let series: [(&str, RGBColor, fn(&YearlyRecord) -> f64); 4] = [
        ("Generation", RGBColor(234, 179, 8), |r| r.generation),
        ("Self-consumed", GREEN, |r| r.self_consumed),
        ("Feed-in", BLUE, |r| r.feed_in),
        ("Grid purchase", RED, |r| r.grid_purchase),
    ];

    let y_max = sampled
        .iter()
        .flat_map(|r| series.iter().map(move |(_, _, value)| value(*r)))
        .fold(0f64, f64::max)
        .max(1.0)
        * 1.05;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Energy flow", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..sampled.len() as f64 - 0.5, 0f64..y_max)?;

    let labels: Vec<String> = sampled.iter().map(|r| format!("Year {}", r.year)).collect();
    chart
        .configure_mesh()
        .x_labels(sampled.len())
        .x_label_formatter(&|x| {
            let index = x.round();
            if index >= 0.0 && (x - index).abs() < 1e-6 {
                labels.get(index as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_desc("kWh")
        .draw()?;

    let bar_width = 0.8 / series.len() as f64;
    for (offset, (label, color, value)) in series.iter().enumerate() {
        let left = -0.4 + offset as f64 * bar_width;
        chart
            .draw_series(sampled.iter().enumerate().map(|(i, r)| {
                let x = i as f64 + left;
                Rectangle::new([(x, 0.0), (x + bar_width, value(*r))], color.filled())
            }))?
            .label(*label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pv_model::InputParameters;

    use super::*;
    use crate::simulation::run_simulation;

    #[test]
    fn test_plots_are_written() {
        let result = run_simulation(&InputParameters::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let cashflow = dir.path().join("cashflow.png");
        plot_cashflow(&result.yearly_data, &cashflow).unwrap();
        assert!(std::fs::metadata(&cashflow).unwrap().len() > 0);

        let energy_flow = dir.path().join("energy_flow.png");
        plot_energy_flow(&result.yearly_data, &energy_flow).unwrap();
        assert!(std::fs::metadata(&energy_flow).unwrap().len() > 0);
    }

    #[test]
    fn test_value_range_contains_zero() {
        let (min, max) = value_range(&[-500.0, -100.0]);
        assert!(min < -500.0 && max >= 0.0);

        let (min, max) = value_range(&[10.0, 200.0]);
        assert!(min <= 0.0 && max > 200.0);
    }

    #[test]
    fn test_value_range_is_never_empty() {
        assert_eq!(value_range(&[]), (0.0, 1.0));
        assert_eq!(value_range(&[0.0, 0.0]), (0.0, 1.0));
    }
}
