//! Clock position to planar angle.
//!
//! angle(c) = radians(90 - c * 30)
//! Clock 12 (or 0) points straight up; positions advance clockwise at
//! 30 degrees per hour.

pub const DEGREES_PER_HOUR: f64 = 30.0;

/// Angle in degrees for a clock position. Not normalised: 11.5 gives -255.
pub fn clock_to_degrees(clock: f64) -> f64 {
    90.0 - clock * DEGREES_PER_HOUR
}

pub fn clock_to_radians(clock: f64) -> f64 {
    clock_to_degrees(clock).to_radians()
}
