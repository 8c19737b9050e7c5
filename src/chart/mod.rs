use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use plotters::coord::{cartesian::Cartesian2d, types::RangedCoordf64, Shift};
use plotters::prelude::*;
use plotters::style::FontStyle;
use tracing::info;

use crate::{
    config::ChartConfig,
    error::{Error, Result},
    metrics::{epochs, EpochSeries, Marker, EPOCHS},
};

pub mod improvement;
pub mod loss;
pub mod radar;
pub mod tradeoff;
pub mod wer;

pub(crate) type XyChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// 画布尺寸（英寸）与分辨率，字号和线宽都以磅（1/72 英寸）给出
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Figure {
    pub fn new(width_in: f64, height_in: f64, dpi: u32) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    /// 磅 -> 像素
    pub fn px(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.
    }

    pub fn px_i32(&self, pt: f64) -> i32 {
        (self.px(pt).round() as i32).max(1)
    }

    pub fn stroke(&self, pt: f64) -> u32 {
        self.px_i32(pt) as u32
    }

    pub fn font(&self, pt: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.px(pt), FontStyle::Normal)
    }

    pub fn bold(&self, pt: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.px(pt), FontStyle::Bold)
    }

    pub(crate) fn legend_len(&self) -> i32 {
        self.px_i32(20.)
    }

    pub(crate) fn marker_size(&self) -> i32 {
        self.px_i32(3.)
    }
}

/// 数据范围两端各留 pad 比例的空白
pub fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = if max > min { max - min } else { 1. };
    (min - span * pad)..(max + span * pad)
}

pub(crate) fn epoch_range() -> Range<f64> {
    padded_range(epochs().map(f64::from), 0.05)
}

pub(crate) fn epoch_points(series: EpochSeries) -> impl Iterator<Item = (f64, f64)> {
    epochs()
        .into_iter()
        .zip(series)
        .map(|(e, v)| (f64::from(e), v))
}

pub(crate) struct Axes<'s> {
    pub title: &'s str,
    pub x_desc: &'s str,
    pub y_desc: &'s str,
    pub x: Range<f64>,
    pub y: Range<f64>,
    pub x_labels: usize,
    pub x_fmt: fn(&f64) -> String,
}

impl<'s> Axes<'s> {
    /// 横轴为 epoch 的折线图
    pub fn epochs(title: &'s str, y_desc: &'s str, y: Range<f64>) -> Self {
        Self {
            title,
            x_desc: "Epoch",
            y_desc,
            x: epoch_range(),
            y,
            x_labels: EPOCHS,
            x_fmt: |x| format!("{:.0}", x),
        }
    }
}

/// 带标题、坐标轴说明和网格的直角坐标图
pub(crate) fn cartesian<'a, 'b>(
    root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    fig: &Figure,
    axes: Axes<'_>,
) -> anyhow::Result<XyChart<'a, 'b>> {
    let mut chart = ChartBuilder::on(root)
        .caption(axes.title, fig.bold(13.))
        .margin(fig.px_i32(10.))
        .x_label_area_size(fig.px_i32(36.))
        .y_label_area_size(fig.px_i32(48.))
        .build_cartesian_2d(axes.x, axes.y)?;

    chart
        .configure_mesh()
        .x_desc(axes.x_desc)
        .y_desc(axes.y_desc)
        .x_labels(axes.x_labels)
        .x_label_formatter(&axes.x_fmt)
        .axis_desc_style(fig.font(12.))
        .label_style(fig.font(10.))
        .bold_line_style(BLACK.mix(0.15).stroke_width(fig.stroke(0.8)))
        .light_line_style(WHITE.mix(0.))
        .draw()?;

    Ok(chart)
}

pub(crate) fn draw_legend<'a, 'b: 'a>(chart: &mut XyChart<'a, 'b>, fig: &Figure) -> anyhow::Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .margin(fig.px_i32(6.))
        .legend_area_size(fig.legend_len() + fig.px_i32(4.))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .label_font(fig.font(10.))
        .draw()?;
    Ok(())
}

/// 在每个数据点画标记；给出 label 时图例显示线段加标记
pub(crate) fn draw_markers<'a, 'b: 'a>(
    chart: &mut XyChart<'a, 'b>,
    fig: &Figure,
    points: &[(f64, f64)],
    marker: Marker,
    color: RGBColor,
    label: Option<&str>,
) -> anyhow::Result<()> {
    let s = fig.marker_size();
    let fill = color.filled();
    let line = color.stroke_width(fig.stroke(1.5));
    let len = fig.legend_len();
    let pts = points.iter().copied();

    let anno = match marker {
        Marker::Circle => chart.draw_series(pts.map(|p| Circle::new(p, s, fill)))?,
        Marker::Square => chart.draw_series(
            pts.map(|p| EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], fill)),
        )?,
        Marker::Triangle => {
            chart.draw_series(pts.map(|p| TriangleMarker::new(p, s + s / 3, fill)))?
        }
        Marker::Diamond => chart.draw_series(pts.map(|p| {
            EmptyElement::at(p) + Polygon::new(vec![(0, -s), (s, 0), (0, s), (-s, 0)], fill)
        }))?,
    };

    let Some(label) = label else {
        return Ok(());
    };
    anno.label(label);
    let mid = len / 2;
    match marker {
        Marker::Circle => anno.legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (len, 0)], line)
                + Circle::new((mid, 0), s, fill)
        }),
        Marker::Square => anno.legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (len, 0)], line)
                + Rectangle::new([(mid - s, -s), (mid + s, s)], fill)
        }),
        Marker::Triangle => anno.legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (len, 0)], line)
                + TriangleMarker::new((mid, 0), s + s / 3, fill)
        }),
        Marker::Diamond => anno.legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (len, 0)], line)
                + Polygon::new(
                    vec![(mid, -s), (mid + s, 0), (mid, s), (mid - s, 0)],
                    fill,
                )
        }),
    };
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chart {
    LossConvergence,
    WerEpochs,
    TimeVsAccuracy,
    EfficiencyRadar,
    ImprovementTrend,
}

impl Chart {
    pub const ALL: [Chart; 5] = [
        Chart::LossConvergence,
        Chart::WerEpochs,
        Chart::TimeVsAccuracy,
        Chart::EfficiencyRadar,
        Chart::ImprovementTrend,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Chart::LossConvergence => "loss convergence",
            Chart::WerEpochs => "wer per epoch",
            Chart::TimeVsAccuracy => "time vs accuracy",
            Chart::EfficiencyRadar => "efficiency radar",
            Chart::ImprovementTrend => "improvement trend",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Chart::LossConvergence => "training_loss_convergence.png",
            Chart::WerEpochs => "validation_wer_epochs.png",
            Chart::TimeVsAccuracy => "accuracy_vs_trainingtime.png",
            Chart::EfficiencyRadar => "efficiency_radar.png",
            Chart::ImprovementTrend => "wer_improvement_trend.png",
        }
    }

    pub fn figure(self, dpi: u32) -> Figure {
        let (w, h) = match self {
            Chart::LossConvergence | Chart::WerEpochs | Chart::ImprovementTrend => (8., 5.),
            Chart::TimeVsAccuracy => (7., 5.),
            Chart::EfficiencyRadar => (7., 7.),
        };
        Figure::new(w, h, dpi)
    }

    pub fn draw(self, path: &Path, fig: &Figure) -> anyhow::Result<()> {
        match self {
            Chart::LossConvergence => loss::draw(path, fig),
            Chart::WerEpochs => wer::draw(path, fig),
            Chart::TimeVsAccuracy => tradeoff::draw(path, fig),
            Chart::EfficiencyRadar => radar::draw(path, fig),
            Chart::ImprovementTrend => improvement::draw(path, fig),
        }
    }

    /// 渲染到 output_dir 下的固定文件名，已存在则覆盖
    pub fn render(self, config: &ChartConfig) -> Result<PathBuf> {
        std::fs::create_dir_all(&config.output_dir)?;
        let path = config.output_dir.join(self.file_name());
        let fig = self.figure(config.dpi);
        self.draw(&path, &fig).map_err(|source| Error::Render {
            chart: self.name(),
            source,
        })?;
        let size = std::fs::metadata(&path)?.len();
        info!("chart saved: {} ({} bytes)", path.display(), size);
        Ok(path)
    }
}

pub fn render_all(config: &ChartConfig) -> Result<Vec<PathBuf>> {
    Chart::ALL.iter().map(|c| c.render(config)).collect()
}
