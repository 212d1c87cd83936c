use fixed::types::I32F32;
use fixed_sqrt::FixedSqrt;

use crate::event::ImuSample;

type Fx = I32F32;

/// Per-frame quantities every detector reads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionFeatures {
    pub magnitude_g: f32,
    pub prev_magnitude_g: f32,
    pub delta_g: f32,
    pub z_diff_g: f32,
    pub gyro_deg_s: f32,
    pub gyro_max_axis_deg_s: f32,
    pub horizontal_g: f32,
}

pub fn compute_features(current: &ImuSample, last: &ImuSample) -> MotionFeatures {
    MotionFeatures {
        magnitude_g: accel_magnitude(current),
        prev_magnitude_g: accel_magnitude(last),
        delta_g: accel_delta(current, last),
        z_diff_g: current.az - last.az,
        gyro_deg_s: gyro_magnitude(current),
        gyro_max_axis_deg_s: abs_f32(current.gx)
            .max(abs_f32(current.gy))
            .max(abs_f32(current.gz)),
        horizontal_g: norm(&[current.ax, current.ay]),
    }
}

pub fn accel_magnitude(s: &ImuSample) -> f32 {
    norm(&[s.ax, s.ay, s.az])
}

pub fn accel_delta(current: &ImuSample, last: &ImuSample) -> f32 {
    norm(&[
        current.ax - last.ax,
        current.ay - last.ay,
        current.az - last.az,
    ])
}

pub fn gyro_magnitude(s: &ImuSample) -> f32 {
    norm(&[s.gx, s.gy, s.gz])
}

/// Stillness test used for the externally visible stability predicate.
pub fn is_still(current: &ImuSample, last: &ImuSample) -> bool {
    accel_delta(current, last) < 0.1
        && gyro_magnitude(current) < 30.0
        && abs_f32(accel_magnitude(current) - 1.0) < 0.3
}

#[inline]
pub(crate) fn abs_f32(v: f32) -> f32 {
    if v < 0.0 {
        -v
    } else {
        v
    }
}

fn norm(components: &[f32]) -> f32 {
    let sum_sq = components
        .iter()
        .fold(Fx::ZERO, |acc, c| {
            let c = Fx::saturating_from_num(*c);
            acc.saturating_add(c.saturating_mul(c))
        });
    sqrt_fx(sum_sq).to_num::<f32>()
}

#[inline]
fn sqrt_fx(v: Fx) -> Fx {
    FixedSqrt::sqrt(v.max(Fx::ZERO))
}
