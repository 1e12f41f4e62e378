/// n evenly spaced samples over [lo, hi], both endpoints included.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / ((n - 1) as f64);
    (0..n).map(|i| lo + step * (i as f64)).collect()
}

pub fn now_millis() -> u128 {
    let now = std::time::SystemTime::now();
    let dur = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    (dur.as_secs() as u128) * 1000 + (dur.subsec_nanos() as u128) / 1_000_000
}
