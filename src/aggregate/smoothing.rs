//! Local polynomial smoothing (Savitzky-Golay) and first differences.
//!
//! Each interior point is replaced by the value at the window centre of a
//! least-squares polynomial fitted to the window around it. The first and
//! last half-window points are read off the polynomial fitted to the first
//! (resp. last) full window, so edges are never zero-padded or mirrored.

/// Smooth `values` with an odd `window` and polynomial `degree`.
///
/// A series shorter than the window is smoothed with the largest odd
/// window that fits, and the degree is capped at `window - 1`.
pub fn savgol(values: &[f64], window: usize, degree: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let window = effective_window(window, n);
    let degree = degree.min(window - 1);
    if window == 1 {
        return values.to_vec();
    }
    let half = window / 2;
    let mut out = vec![0.0; n];

    for i in half..n - half {
        let slice = &values[i - half..=i + half];
        out[i] = LocalFit::fit(slice, degree)
            .map(|f| f.eval(half as f64))
            .unwrap_or(values[i]);
    }

    let head = LocalFit::fit(&values[..window], degree);
    for (i, slot) in out.iter_mut().enumerate().take(half) {
        *slot = head.as_ref().map(|f| f.eval(i as f64)).unwrap_or(values[i]);
    }

    let offset = n - window;
    let tail = LocalFit::fit(&values[offset..], degree);
    for i in n - half..n {
        out[i] = tail
            .as_ref()
            .map(|f| f.eval((i - offset) as f64))
            .unwrap_or(values[i]);
    }
    out
}

/// `out[0] = 0`, `out[i] = values[i] - values[i - 1]`.
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if !values.is_empty() {
        out.push(0.0);
    }
    out.extend(values.windows(2).map(|w| w[1] - w[0]));
    out
}

fn effective_window(window: usize, len: usize) -> usize {
    let w = window.min(len).max(1);
    if w % 2 == 0 { w - 1 } else { w }
}

/// Polynomial fitted over positions `0..len`, in a centred and scaled
/// coordinate so the normal equations stay well conditioned.
#[derive(Debug)]
struct LocalFit {
    coeffs: Vec<f64>,
    center: f64,
    scale: f64,
}

impl LocalFit {
    fn fit(ys: &[f64], degree: usize) -> Option<Self> {
        let center = (ys.len() as f64 - 1.0) / 2.0;
        let scale = center.max(1.0);
        let m = degree + 1;

        // Normal equations: (AᵀA) c = Aᵀy, A[j][k] = t_j^k.
        let mut ata = vec![vec![0.0; m]; m];
        let mut aty = vec![0.0; m];
        for (j, &y) in ys.iter().enumerate() {
            let t = (j as f64 - center) / scale;
            let powers: Vec<f64> = std::iter::successors(Some(1.0), |p| Some(p * t))
                .take(2 * m - 1)
                .collect();
            for r in 0..m {
                aty[r] += powers[r] * y;
                for c in 0..m {
                    ata[r][c] += powers[r + c];
                }
            }
        }

        let coeffs = solve(ata, aty)?;
        Some(LocalFit {
            coeffs,
            center,
            scale,
        })
    }

    fn eval(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.scale;
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }
}

/// Gaussian elimination with partial pivoting. `None` if singular.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
