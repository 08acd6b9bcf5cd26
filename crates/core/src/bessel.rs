//! Bessel function evaluations for the mode solver.
//!
//! Integer-order `J_n` by its ascending series (accurate to machine
//! precision for the argument range the solver produces, x ≲ 30), modified
//! `K_n` from the Abramowitz & Stegun rational approximations with upward
//! recurrence, and `J_n` zeros by scan-and-bisect.

/// Bessel function of the first kind, integer order `n >= 0`.
pub fn bessel_j(n: u32, x: f64) -> f64 {
    debug_assert!(x >= 0.0);
    let half = 0.5 * x;

    // term_0 = (x/2)^n / n!
    let mut term = 1.0;
    for k in 1..=n {
        term *= half / k as f64;
    }
    let mut sum = term;
    let h2 = half * half;
    for k in 1..200 {
        term *= -h2 / (k as f64 * (k + n) as f64);
        sum += term;
        if term.abs() < 1e-17 * sum.abs().max(1e-30) {
            break;
        }
    }
    sum
}

/// Modified Bessel function of the second kind, integer order `n >= 0`.
pub fn bessel_k(n: u32, x: f64) -> f64 {
    debug_assert!(x > 0.0);
    let k0 = bessel_k0(x);
    if n == 0 {
        return k0;
    }
    let k1 = bessel_k1(x);
    if n == 1 {
        return k1;
    }
    let mut km = k0;
    let mut k = k1;
    for j in 1..n {
        let next = km + (2.0 * j as f64 / x) * k;
        km = k;
        k = next;
    }
    k
}

fn bessel_i0(x: f64) -> f64 {
    let t = x / 3.75;
    let t2 = t * t;
    polyval(
        &[1.0, 3.5156229, 3.0899424, 1.2067492, 0.2659732, 0.0360768, 0.0045813],
        t2,
    )
}

fn bessel_i1(x: f64) -> f64 {
    let t = x / 3.75;
    let t2 = t * t;
    x * polyval(
        &[0.5, 0.87890594, 0.51498869, 0.15084934, 0.02658733, 0.00301532, 0.00032411],
        t2,
    )
}

fn bessel_k0(x: f64) -> f64 {
    if x <= 2.0 {
        let t2 = x * x / 4.0;
        -(x / 2.0).ln() * bessel_i0(x)
            + polyval(
                &[
                    -0.57721566, 0.42278420, 0.23069756, 0.03488590, 0.00262698, 0.00010750,
                    0.00000740,
                ],
                t2,
            )
    } else {
        let t = 2.0 / x;
        (-x).exp() / x.sqrt()
            * polyval(
                &[
                    1.25331414, -0.07832358, 0.02189568, -0.01062446, 0.00587872, -0.00251540,
                    0.00053208,
                ],
                t,
            )
    }
}

fn bessel_k1(x: f64) -> f64 {
    if x <= 2.0 {
        let t2 = x * x / 4.0;
        (x / 2.0).ln() * bessel_i1(x)
            + (1.0 / x)
                * polyval(
                    &[
                        1.0, 0.15443144, -0.67278579, -0.18156897, -0.01919402, -0.00110404,
                        -0.00004686,
                    ],
                    t2,
                )
    } else {
        let t = 2.0 / x;
        (-x).exp() / x.sqrt()
            * polyval(
                &[
                    1.25331414, 0.23498619, -0.03655620, 0.01504268, -0.00780353, 0.00325614,
                    -0.00068245,
                ],
                t,
            )
    }
}

fn polyval(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Positive zeros of `J_n` up to `x_max`, ascending.
pub fn bessel_j_zeros(n: u32, x_max: f64) -> Vec<f64> {
    let mut zeros = Vec::new();
    let step = 0.05;
    let mut x0 = step;
    let mut f0 = bessel_j(n, x0);
    while x0 < x_max {
        let x1 = x0 + step;
        let f1 = bessel_j(n, x1);
        if f0 == 0.0 {
            zeros.push(x0);
        } else if f0.signum() != f1.signum() {
            zeros.push(bisect_zero(n, x0, x1));
        }
        x0 = x1;
        f0 = f1;
    }
    zeros
}

fn bisect_zero(n: u32, mut lo: f64, mut hi: f64) -> f64 {
    let mut flo = bessel_j(n, lo);
    for _ in 0..80 {
        let mid = 0.5 * (lo + hi);
        let fmid = bessel_j(n, mid);
        if fmid == 0.0 {
            return mid;
        }
        if flo.signum() == fmid.signum() {
            lo = mid;
            flo = fmid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
