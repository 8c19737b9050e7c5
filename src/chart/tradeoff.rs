use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{cartesian, padded_range, Axes, Figure};
use crate::metrics::Method;

pub const TITLE: &str = "Trade-off Between Training Time and Accuracy";
/// 标注相对数据点的偏移（小时, WER%）
pub const LABEL_OFFSET: (f64, f64) = (0.05, -0.03);
/// 横轴右侧给最右边的标注留出的空间（小时）
const LABEL_ROOM: f64 = 1.3;
/// 散点面积（磅²，即标记直径的平方）
const POINT_AREA: f64 = 120.;

/// 散点半径（像素）
pub fn point_radius(fig: &Figure) -> i32 {
    fig.px_i32(POINT_AREA.sqrt() / 2.)
}

pub fn annotation_anchor(method: Method) -> (f64, f64) {
    (
        method.train_time() + LABEL_OFFSET.0,
        method.final_wer() + LABEL_OFFSET.1,
    )
}

pub fn draw(path: &Path, fig: &Figure) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, fig.pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let x = padded_range(Method::ALL.map(Method::train_time), 0.1);
    let y = padded_range(
        Method::ALL
            .iter()
            .flat_map(|&m| [m.final_wer(), annotation_anchor(m).1]),
        0.25,
    );
    let mut chart = cartesian(
        &root,
        fig,
        Axes {
            title: TITLE,
            x_desc: "Training Time (hrs)",
            y_desc: "Final WER (%)",
            x: x.start..x.end + LABEL_ROOM,
            y,
            x_labels: 8,
            x_fmt: |x| format!("{:.1}", x),
        },
    )?;

    let radius = point_radius(fig);
    chart.draw_series(Method::ALL.iter().map(|&m| {
        Circle::new((m.train_time(), m.final_wer()), radius, m.color().filled())
    }))?;

    let text_style =
        TextStyle::from(fig.font(10.)).pos(Pos::new(HPos::Left, VPos::Bottom));
    chart.draw_series(
        Method::ALL
            .iter()
            .map(|&m| Text::new(m.label(), annotation_anchor(m), text_style.clone())),
    )?;

    root.present()?;
    Ok(())
}
