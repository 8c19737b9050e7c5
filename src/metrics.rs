use plotters::style::RGBColor;

/// 训练轮数（epoch 从 1 开始）
pub const EPOCHS: usize = 10;
/// Entropy-Aware QLoRA 的 WER 起点，改进量以它为基线
pub const WER_BASELINE: f64 = 8.3;

/// 雷达图各轴名称，顺序与 [`Method::radar_profile`] 对应
pub const RADAR_AXES: [&str; 5] = [
    "WER (↓)",
    "GPU Memory (↓)",
    "Energy (↓)",
    "Training Time (↓)",
    "Efficiency (↑)",
];

pub type EpochSeries = [f64; EPOCHS];

pub fn epochs() -> [u32; EPOCHS] {
    std::array::from_fn(|i| i as u32 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    FullFineTuning,
    Lora,
    Qlora,
    EntropyAwareQlora,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Diamond,
}

/// loss(e) = scale * exp(-e / tau) + floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossCurve {
    pub tau: f64,
    pub scale: f64,
    pub floor: f64,
}

impl LossCurve {
    pub fn at(&self, epoch: u32) -> f64 {
        (-(epoch as f64) / self.tau).exp() * self.scale + self.floor
    }
}

/// wer(e) = start - slope * e
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WerLine {
    pub start: f64,
    pub slope: f64,
}

impl WerLine {
    pub fn at(&self, epoch: u32) -> f64 {
        self.start - self.slope * epoch as f64
    }
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::FullFineTuning,
        Method::Lora,
        Method::Qlora,
        Method::EntropyAwareQlora,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Method::FullFineTuning => "Full Fine-Tuning",
            Method::Lora => "LoRA",
            Method::Qlora => "QLoRA",
            Method::EntropyAwareQlora => "Entropy-Aware QLoRA",
        }
    }

    pub fn color(self) -> RGBColor {
        match self {
            Method::FullFineTuning => RGBColor(0xcc, 0x00, 0x00),
            Method::Lora => RGBColor(0xe6, 0x91, 0x38),
            Method::Qlora => RGBColor(0x6a, 0xa8, 0x4f),
            Method::EntropyAwareQlora => RGBColor(0x3d, 0x85, 0xc6),
        }
    }

    pub fn marker(self) -> Marker {
        match self {
            Method::FullFineTuning => Marker::Circle,
            Method::Lora => Marker::Square,
            Method::Qlora => Marker::Triangle,
            Method::EntropyAwareQlora => Marker::Diamond,
        }
    }

    /// 最终验证集 WER（%）
    pub fn final_wer(self) -> f64 {
        match self {
            Method::FullFineTuning => 7.8,
            Method::Lora => 8.0,
            Method::Qlora => 8.1,
            Method::EntropyAwareQlora => 7.7,
        }
    }

    /// 训练耗时（小时）
    pub fn train_time(self) -> f64 {
        match self {
            Method::FullFineTuning => 6.4,
            Method::Lora => 4.2,
            Method::Qlora => 3.9,
            Method::EntropyAwareQlora => 3.7,
        }
    }

    /// 能耗（kWh）
    pub fn energy(self) -> f64 {
        match self {
            Method::FullFineTuning => 1.35,
            Method::Lora => 0.88,
            Method::Qlora => 0.74,
            Method::EntropyAwareQlora => 0.68,
        }
    }

    /// 显存占用（GB）
    pub fn gpu_mem(self) -> f64 {
        match self {
            Method::FullFineTuning => 10.1,
            Method::Lora => 4.8,
            Method::Qlora => 3.2,
            Method::EntropyAwareQlora => 3.1,
        }
    }

    pub fn efficiency_score(self) -> f64 {
        match self {
            Method::FullFineTuning => 0.45,
            Method::Lora => 0.68,
            Method::Qlora => 0.82,
            Method::EntropyAwareQlora => 0.90,
        }
    }

    pub fn loss_curve(self) -> LossCurve {
        let (tau, scale, floor) = match self {
            Method::FullFineTuning => (3.5, 0.7, 0.25),
            Method::Lora => (3.3, 0.75, 0.28),
            Method::Qlora => (3.1, 0.78, 0.30),
            Method::EntropyAwareQlora => (3.7, 0.70, 0.23),
        };
        LossCurve { tau, scale, floor }
    }

    pub fn wer_line(self) -> WerLine {
        let (start, slope) = match self {
            Method::FullFineTuning => (8.2, 0.04),
            Method::Lora => (8.6, 0.05),
            Method::Qlora => (8.7, 0.06),
            Method::EntropyAwareQlora => (8.3, 0.07),
        };
        WerLine { start, slope }
    }

    /// 归一化后的雷达图得分，0..=1，越大越好
    pub fn radar_profile(self) -> [f64; RADAR_AXES.len()] {
        match self {
            Method::FullFineTuning => [0.5, 0.0, 0.0, 0.0, 0.3],
            Method::Lora => [0.7, 0.55, 0.35, 0.45, 0.6],
            Method::Qlora => [0.75, 0.70, 0.55, 0.55, 0.8],
            Method::EntropyAwareQlora => [0.85, 0.75, 0.65, 0.60, 0.9],
        }
    }

    pub fn loss_series(self) -> EpochSeries {
        let curve = self.loss_curve();
        epochs().map(|e| curve.at(e))
    }

    pub fn wer_series(self) -> EpochSeries {
        let line = self.wer_line();
        epochs().map(|e| line.at(e))
    }
}

/// 相对基线的 WER 改进量
pub fn improvement_series() -> EpochSeries {
    Method::EntropyAwareQlora
        .wer_series()
        .map(|wer| WER_BASELINE - wer)
}

/// 雷达图角度：从 0 开始均分圆周，末尾重复第一个角度以闭合多边形
pub fn radar_angles(n: usize) -> Vec<f64> {
    let mut angles: Vec<f64> = (0..n)
        .map(|k| 2. * std::f64::consts::PI * k as f64 / n as f64)
        .collect();
    if let Some(&first) = angles.first() {
        angles.push(first);
    }
    angles
}

/// 闭合的数值序列：末尾重复第一个值
pub fn close_loop(values: &[f64]) -> Vec<f64> {
    let mut closed = values.to_vec();
    if let Some(&first) = values.first() {
        closed.push(first);
    }
    closed
}

/// 雷达多边形顶点（极坐标 -> 直角坐标），已闭合
pub fn radar_polygon(values: &[f64]) -> Vec<(f64, f64)> {
    radar_angles(values.len())
        .into_iter()
        .zip(close_loop(values))
        .map(|(theta, r)| (r * theta.cos(), r * theta.sin()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_decreasing_above_floor() {
        for m in Method::ALL {
            let floor = m.loss_curve().floor;
            let s = m.loss_series();
            assert!(s.iter().all(|&v| v > floor), "{}", m.label());
            assert!(s.windows(2).all(|w| w[1] < w[0]), "{}", m.label());
        }
        assert!(Method::FullFineTuning.loss_series().iter().all(|&v| v > 0.25));
    }

    #[test]
    fn wer_linear_and_decreasing() {
        for m in Method::ALL {
            let slope = m.wer_line().slope;
            let s = m.wer_series();
            for w in s.windows(2) {
                assert!(w[1] < w[0]);
                assert!((w[0] - w[1] - slope).abs() < 1e-9);
            }
            assert!((s[0] - (m.wer_line().start - slope)).abs() < 1e-12);
        }
    }

    #[test]
    fn improvement_is_baseline_minus_entropy_wer() {
        let wer = Method::EntropyAwareQlora.wer_series();
        let imp = improvement_series();
        for (i, e) in epochs().iter().enumerate() {
            assert_eq!(imp[i], 8.3 - wer[i]);
            assert!((imp[i] - 0.07 * *e as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn radar_profiles_normalized() {
        for m in Method::ALL {
            assert!(m
                .radar_profile()
                .iter()
                .all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn radar_angles_evenly_spaced_and_closed() {
        let angles = radar_angles(RADAR_AXES.len());
        assert_eq!(angles.len(), RADAR_AXES.len() + 1);
        assert_eq!(angles[0], 0.);
        assert_eq!(angles.first(), angles.last());
        let step = 2. * std::f64::consts::PI / RADAR_AXES.len() as f64;
        for w in angles[..RADAR_AXES.len()].windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-12);
        }
        assert!(angles[RADAR_AXES.len() - 1] < 2. * std::f64::consts::PI);
        assert!(radar_angles(0).is_empty());
    }

    #[test]
    fn radar_polygon_closed() {
        let values = Method::Lora.radar_profile();
        let closed = close_loop(&values);
        assert_eq!(closed.len(), values.len() + 1);
        assert_eq!(closed.first(), closed.last());

        let poly = radar_polygon(&values);
        assert_eq!(poly.len(), values.len() + 1);
        assert_eq!(poly.first(), poly.last());
        assert_eq!(poly[0], (0.7, 0.));
    }

    #[test]
    fn series_deterministic() {
        for m in Method::ALL {
            let a = m.loss_series().map(f64::to_bits);
            let b = m.loss_series().map(f64::to_bits);
            assert_eq!(a, b);
            assert_eq!(
                m.wer_series().map(f64::to_bits),
                m.wer_series().map(f64::to_bits)
            );
        }
        assert_eq!(
            improvement_series().map(f64::to_bits),
            improvement_series().map(f64::to_bits)
        );
    }
}
