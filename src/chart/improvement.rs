use std::path::Path;

use plotters::prelude::*;

use super::{cartesian, draw_markers, epoch_points, padded_range, Axes, Figure};
use crate::metrics::{improvement_series, Marker, Method};

pub const TITLE: &str = "Progressive WER Improvement: Entropy-Aware QLoRA";

pub fn draw(path: &Path, fig: &Figure) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, fig.pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let improvement = improvement_series();
    let y = padded_range(improvement, 0.05);
    let mut chart = cartesian(&root, fig, Axes::epochs(TITLE, "WER Improvement (Δ%)", y))?;

    let color = Method::EntropyAwareQlora.color();
    let points: Vec<_> = epoch_points(improvement).collect();
    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        color.stroke_width(fig.stroke(2.5)),
    ))?;
    draw_markers(&mut chart, fig, &points, Marker::Circle, color, None)?;

    root.present()?;
    Ok(())
}
