//! Angle helpers shared by the path decoder and the timing passes.
//!
//! All angles are degrees. Headings live in `[0, 360)`.

/// Raw angle value marking a mid-spin tile.
pub const MIDSPIN: f64 = 999.0;

/// Tolerance used when comparing a raw angle against [`MIDSPIN`].
pub const MIDSPIN_TOLERANCE: f64 = 0.01;

/// Tolerance for treating two headings as identical (full-circle turn).
pub const FULL_CIRCLE_TOLERANCE: f64 = 0.001;

/// Map any angle into `[0, 360)` using floored modulo.
///
/// Unlike `%`, negative inputs wrap upward: `normalize(-90.0) == 270.0`.
///
/// # Example
/// ```
/// use adofai_timing::angle::normalize;
///
/// assert_eq!(normalize(450.0), 90.0);
/// assert_eq!(normalize(-90.0), 270.0);
/// assert_eq!(normalize(720.0), 0.0);
/// ```
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle - (angle / 360.0).floor() * 360.0;
    // Tiny negative inputs round up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Whether a raw angle is the mid-spin sentinel.
pub fn is_midspin(angle: f64) -> bool {
    (angle - MIDSPIN).abs() < MIDSPIN_TOLERANCE
}

/// Whether two normalized headings coincide, so reaching one from the other
/// takes a full revolution.
pub fn is_full_circle(dest: f64, reference: f64) -> bool {
    let diff = normalize(dest - reference);
    diff <= FULL_CIRCLE_TOLERANCE || diff >= 360.0 - FULL_CIRCLE_TOLERANCE
}
