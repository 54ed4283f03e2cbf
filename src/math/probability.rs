/// Error function approximation using the Abramowitz and Stegun method
///
/// Maximum absolute error is about 1.5e-7, which is below the tolerance
/// reference densities are checked against.
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254_829_592_f64;
    let a2 = -0.284_496_736_f64;
    let a3 = 1.421_413_741_f64;
    let a4 = -1.453_152_027_f64;
    let a5 = 1.061_405_429_f64;
    let p = 0.327_591_1_f64;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / p.mul_add(x, 1.0);
    let y = (((((a5.mul_add(t, a4)).mul_add(t, a3)).mul_add(t, a2)).mul_add(t, a1)) * t)
        .mul_add(-(-x * x).exp(), 1.0);

    sign * y
}

/// Standard normal cumulative distribution function
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}
