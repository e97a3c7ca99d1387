//! Floor-based integer draw over a half-open range

use rand::Rng;

/// Draw an integer from `[ceil(min), floor(max))`.
///
/// The result is `floor(u * (max - min)) + min` for `u` uniform in `[0, 1)`,
/// so `max` itself is never produced. Callers must ensure the rounded range
/// is non-empty; [`crate::WidgetConfig::validate`] does this for the widget.
#[allow(clippy::cast_possible_truncation)]
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> i64 {
    let min = min.ceil();
    let max = max.floor();
    let u: f64 = rng.gen();
    ((u * (max - min)).floor() + min) as i64
}
