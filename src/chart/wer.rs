use std::path::Path;

use plotters::prelude::*;

use super::{cartesian, draw_legend, draw_markers, epoch_points, padded_range, Axes, Figure};
use crate::metrics::Method;

pub const TITLE: &str = "Validation WER Across Training Epochs";

pub fn draw(path: &Path, fig: &Figure) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, fig.pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let series = Method::ALL.map(|m| (m, m.wer_series()));
    let y = padded_range(series.iter().flat_map(|(_, s)| s.iter().copied()), 0.05);
    let mut chart = cartesian(&root, fig, Axes::epochs(TITLE, "Validation WER (%)", y))?;

    for (method, wer) in series {
        let points: Vec<_> = epoch_points(wer).collect();
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            method.color().stroke_width(fig.stroke(1.5)),
        ))?;
        draw_markers(
            &mut chart,
            fig,
            &points,
            method.marker(),
            method.color(),
            Some(method.label()),
        )?;
    }

    draw_legend(&mut chart, fig)?;
    root.present()?;
    Ok(())
}
