/// One-dimensional linear interpolation without extrapolation
///
/// `xp` must be sorted ascending and have the same length as `fp`. Returns
/// `None` when `x` is NaN, outside `[xp[0], xp[n - 1]]`, or the table is empty.
/// For runs of equal `xp` values the last sample of the run wins.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> Option<f64> {
    let n = xp.len().min(fp.len());
    if n == 0 || x.is_nan() {
        return None;
    }
    if x < xp[0] || x > xp[n - 1] {
        return None;
    }

    // First sample strictly to the right of x
    let right = xp[..n].partition_point(|&v| v <= x);
    if right == n {
        return Some(fp[n - 1]);
    }
    let left = right - 1;

    let (x0, x1) = (xp[left], xp[right]);
    let (y0, y1) = (fp[left], fp[right]);
    if x == x0 {
        return Some(y0);
    }
    Some(y0 + (x - x0) * (y1 - y0) / (x1 - x0))
}
