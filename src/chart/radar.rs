use std::f64::consts::PI;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::Figure;
use crate::metrics::{radar_angles, radar_polygon, Method, RADAR_AXES};

pub const TITLE: &str = "Multi-Metric Efficiency Comparison";
/// 网格圆环半径
pub const RINGS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];
/// 坐标范围半径，外圈之外给轴标签留位置
const EXTENT: f64 = 1.45;
const LABEL_RADIUS: f64 = 1.2;
const RING_SEGMENTS: usize = 120;

fn ring(r: f64) -> Vec<(f64, f64)> {
    (0..=RING_SEGMENTS)
        .map(|i| {
            let theta = 2. * PI * i as f64 / RING_SEGMENTS as f64;
            (r * theta.cos(), r * theta.sin())
        })
        .collect()
}

pub fn draw(path: &Path, fig: &Figure) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, fig.pixels()).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root
        .titled(TITLE, fig.bold(13.))?
        .margin(fig.px_i32(8.), fig.px_i32(8.), fig.px_i32(8.), fig.px_i32(8.));

    // 保持横纵比例一致，圆不变形
    let (w, h) = root.dim_in_pixel();
    let aspect = w as f64 / h.max(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(-EXTENT * aspect..EXTENT * aspect, -EXTENT..EXTENT)?;

    let grid = BLACK.mix(0.2).stroke_width(fig.stroke(0.8));
    chart.draw_series(RINGS.iter().map(|&r| PathElement::new(ring(r), grid)))?;
    let angles = radar_angles(RADAR_AXES.len());
    chart.draw_series(
        angles[..RADAR_AXES.len()]
            .iter()
            .map(|&t| PathElement::new(vec![(0., 0.), (t.cos(), t.sin())], grid)),
    )?;

    let tick_color = BLACK.mix(0.6);
    let tick_style = TextStyle::from(fig.font(8.))
        .color(&tick_color)
        .pos(Pos::new(HPos::Left, VPos::Bottom));
    let tick_angle = PI / RADAR_AXES.len() as f64;
    chart.draw_series(RINGS.iter().map(|&r| {
        Text::new(
            format!("{:.1}", r),
            (r * tick_angle.cos(), r * tick_angle.sin()),
            tick_style.clone(),
        )
    }))?;

    let label_style = TextStyle::from(fig.font(11.)).pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(RADAR_AXES.iter().zip(&angles).map(|(&label, &t)| {
        Text::new(
            label,
            (LABEL_RADIUS * t.cos(), LABEL_RADIUS * t.sin()),
            label_style.clone(),
        )
    }))?;

    let len = fig.legend_len();
    let half = fig.px_i32(4.);
    for method in Method::ALL {
        let color = method.color();
        let polygon = radar_polygon(&method.radar_profile());
        chart.draw_series(std::iter::once(Polygon::new(
            polygon.clone(),
            color.mix(0.25).filled(),
        )))?;
        let outline = color.stroke_width(fig.stroke(2.5));
        chart
            .draw_series(LineSeries::new(polygon, outline))?
            .label(method.label())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - half), (x + len, y + half)], color.mix(0.25).filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .margin(fig.px_i32(4.))
        .legend_area_size(len + fig.px_i32(4.))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .label_font(fig.font(10.))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_closed_circle() {
        let pts = ring(0.6);
        assert_eq!(pts.len(), RING_SEGMENTS + 1);
        let (x0, y0) = pts[0];
        let (xn, yn) = pts[RING_SEGMENTS];
        assert!((x0 - xn).abs() < 1e-9 && (y0 - yn).abs() < 1e-9);
        assert!(pts
            .iter()
            .all(|(x, y)| ((x * x + y * y).sqrt() - 0.6).abs() < 1e-9));
    }

    #[test]
    fn polygons_inside_outer_ring() {
        for m in Method::ALL {
            for (x, y) in radar_polygon(&m.radar_profile()) {
                assert!((x * x + y * y).sqrt() <= RINGS[RINGS.len() - 1] + 1e-12);
            }
        }
        assert!(LABEL_RADIUS < EXTENT);
    }
}
