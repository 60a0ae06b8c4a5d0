/// Mean of a sample, or `None` when it is empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator, matching the pandas
/// figures the dashboard showed). `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values
        .iter()
        .map(|&x| {
            let diff = x - m;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson correlation coefficient of two equal-length samples.
/// `None` when there are fewer than two points or either sample has zero
/// variance, instead of a NaN that could be mistaken for a result.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Fixed-step histogram covering the sample range, with bin edges aligned
/// to multiples of `step` (0.5 gives the dashboard's 30-minute buckets).
/// Values on an edge fall into the bin above it.
pub fn histogram(values: &[f64], step: f64) -> Vec<HistogramBin> {
    if values.is_empty() || step <= 0.0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let first = (min / step).floor() as i64;
    let last = (max / step).floor() as i64;

    let mut bins: Vec<HistogramBin> = (first..=last)
        .map(|i| HistogramBin {
            lower: i as f64 * step,
            upper: (i + 1) as f64 * step,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = ((v / step).floor() as i64 - first) as usize;
        // Float rounding at the top edge lands in the last bin.
        let idx = idx.min(bins.len() - 1);
        bins[idx].count += 1;
    }
    bins
}
