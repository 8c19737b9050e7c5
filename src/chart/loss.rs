use std::path::Path;

use plotters::prelude::*;

use super::{cartesian, draw_legend, epoch_points, padded_range, Axes, Figure};
use crate::metrics::Method;

pub const TITLE: &str = "Training Loss Convergence";

pub fn draw(path: &Path, fig: &Figure) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, fig.pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let series = Method::ALL.map(|m| (m, m.loss_series()));
    let y = padded_range(series.iter().flat_map(|(_, s)| s.iter().copied()), 0.05);
    let mut chart = cartesian(&root, fig, Axes::epochs(TITLE, "Training Loss", y))?;

    let len = fig.legend_len();
    for (method, losses) in series {
        let style = method.color().stroke_width(fig.stroke(2.2));
        chart
            .draw_series(LineSeries::new(epoch_points(losses), style))?
            .label(method.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + len, y)], style));
    }

    draw_legend(&mut chart, fig)?;
    root.present()?;
    Ok(())
}
