//! Reverse-mode counterparts of the reflection kernels.
//!
//! Each function repeats the forward computation of its kernel in
//! [`kernels`](super::kernels), caches the intermediates, then seeds the
//! output adjoint with 1 and sweeps back to the kernel's own inputs. The
//! pricer replays the dispatch combination over these local partials and
//! finishes with one fixed chain rule to the seven caller-facing slots.
//!
//! `spot` is the partial holding the moneyness variables fixed (it carries
//! the `H/S` power factors); `spot_spot` is the full second derivative along
//! spot, moneyness included. It is assembled leg by leg: every kernel is a
//! sum of `G(S)·N(s·v(S))` with `G ∝ S^k` and `dv/dS = c/S`, whose curvature is
//!
//! ```text
//! G/S²·(k(k-1)·N + 2k·s·n(s·v)·c - s·n(s·v)·(v·c² + c))
//! ```
//!
//! Densities are evaluated at the same signed argument as the matching `Φ`.

use pricer_core::math::NormalDistribution;

use super::kernels::{power_unless_zero, TermInputs};

/// Value and local partials of one kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TermDerivatives {
    /// Kernel value
    pub value: f64,
    /// ∂/∂S with moneyness held fixed
    pub spot: f64,
    /// ∂/∂K with moneyness held fixed
    pub strike: f64,
    /// ∂/∂df1
    pub df1: f64,
    /// ∂/∂df2
    pub df2: f64,
    /// ∂/∂x (`x1` for A, `x2` for B and E)
    pub x: f64,
    /// ∂/∂y (`y1` for C, `y2` for D and E)
    pub y: f64,
    /// ∂/∂z (F only)
    pub z: f64,
    /// ∂/∂(σ√T) with moneyness held fixed
    pub sigma_t: f64,
    /// ∂/∂μ
    pub mu: f64,
    /// ∂/∂λ (F only)
    pub lambda: f64,
    /// d²/dS², moneyness included
    pub spot_spot: f64,
}

/// Curvature of one `G·N(s·v)` leg; see the module docs.
///
/// Uses `φ'(u) = -u·φ(u)` of the standard normal density.
#[inline]
#[allow(clippy::too_many_arguments)]
fn leg_curvature<N: NormalDistribution + ?Sized>(
    n: &N,
    spot: f64,
    g: f64,
    k: f64,
    s: f64,
    v: f64,
    c: f64,
    cdf: f64,
) -> f64 {
    if g == 0.0 {
        return 0.0;
    }
    let density = s * n.pdf(s * v);
    g / (spot * spot) * (k * (k - 1.0) * cdf + 2.0 * k * density * c - density * (v * c * c + c))
}

/// Adjoint of [`vanilla_term`](super::kernels::vanilla_term).
pub fn vanilla_term<N: NormalDistribution + ?Sized>(
    n: &N,
    p: &TermInputs,
    x: f64,
) -> TermDerivatives {
    let (phi, s_t) = (p.phi, p.sigma_t);
    let x_shift = x - s_t;

    // Forward sweep
    let n1 = n.cdf(phi * x);
    let n2 = n.cdf(phi * x_shift);
    let forward = p.spot * p.df1;
    let strike_leg = p.strike * p.df2;
    let value = phi * (forward * n1 - strike_leg * n2);

    // Reverse sweep
    let pdf1 = n.pdf(phi * x);
    let pdf2 = n.pdf(phi * x_shift);
    let c = 1.0 / s_t;
    let spot_spot = leg_curvature(n, p.spot, phi * forward, 1.0, phi, x, c, n1)
        + leg_curvature(n, p.spot, -phi * strike_leg, 0.0, phi, x_shift, c, n2);

    TermDerivatives {
        value,
        spot: phi * p.df1 * n1,
        strike: -phi * p.df2 * n2,
        df1: phi * p.spot * n1,
        df2: -phi * p.strike * n2,
        x: p.spot * p.df1 * pdf1 - p.strike * p.df2 * pdf2,
        sigma_t: p.strike * p.df2 * pdf2,
        spot_spot,
        ..TermDerivatives::default()
    }
}

/// Adjoint of [`reflected_term`](super::kernels::reflected_term).
pub fn reflected_term<N: NormalDistribution + ?Sized>(
    n: &N,
    p: &TermInputs,
    y: f64,
) -> TermDerivatives {
    let (phi, eta, s_t) = (p.phi, p.eta, p.sigma_t);
    let ratio = p.ratio();
    let y_shift = y - s_t;
    let k1 = 2.0 * (p.mu + 1.0);
    let k2 = 2.0 * p.mu;

    // Forward sweep
    let n1 = n.cdf(eta * y);
    let n2 = n.cdf(eta * y_shift);
    let p1 = power_unless_zero(ratio, k1, n1);
    let p2 = power_unless_zero(ratio, k2, n2);
    let forward = p.spot * p.df1 * p1;
    let strike_leg = p.strike * p.df2 * p2;
    let value = phi * (forward * n1 - strike_leg * n2);

    // Reverse sweep
    let p1_bar = phi * p.spot * p.df1 * n1;
    let p2_bar = -phi * p.strike * p.df2 * n2;
    let n1_bar = phi * forward;
    let n2_bar = -phi * strike_leg;
    let pdf1 = n.pdf(eta * y);
    let pdf2 = n.pdf(eta * y_shift);

    // d(ratio^k)/dS = -k·ratio^k / S
    let spot = phi * p.df1 * p1 * n1 - (p1_bar * k1 * p1 + p2_bar * k2 * p2) / p.spot;
    let log_ratio = ratio.ln();

    let c = -1.0 / s_t;
    let spot_spot = leg_curvature(n, p.spot, phi * forward, 1.0 - k1, eta, y, c, n1)
        + leg_curvature(n, p.spot, -phi * strike_leg, -k2, eta, y_shift, c, n2);

    TermDerivatives {
        value,
        spot,
        strike: -phi * p.df2 * p2 * n2,
        df1: phi * p.spot * p1 * n1,
        df2: -phi * p.strike * p2 * n2,
        y: eta * (n1_bar * pdf1 + n2_bar * pdf2),
        sigma_t: -eta * n2_bar * pdf2,
        mu: 2.0 * log_ratio * (p1_bar * p1 + p2_bar * p2),
        spot_spot,
        ..TermDerivatives::default()
    }
}

/// Adjoint of [`rebate_at_expiry_term`](super::kernels::rebate_at_expiry_term).
pub fn rebate_at_expiry_term<N: NormalDistribution + ?Sized>(
    n: &N,
    p: &TermInputs,
    x2: f64,
    y2: f64,
) -> TermDerivatives {
    let (eta, s_t) = (p.eta, p.sigma_t);
    let x_shift = x2 - s_t;
    let y_shift = y2 - s_t;
    let k = 2.0 * p.mu;
    let scale = p.rebate * p.df2;

    // Forward sweep
    let n1 = n.cdf(eta * x_shift);
    let n2 = n.cdf(eta * y_shift);
    let power = power_unless_zero(p.ratio(), k, n2);
    let value = scale * (n1 - power * n2);

    // Reverse sweep
    let power_bar = -scale * n2;
    let x_bar = scale * eta * n.pdf(eta * x_shift);
    let y_bar = -scale * power * eta * n.pdf(eta * y_shift);

    let c = 1.0 / s_t;
    let spot_spot = leg_curvature(n, p.spot, scale, 0.0, eta, x_shift, c, n1)
        + leg_curvature(n, p.spot, -scale * power, -k, eta, y_shift, -c, n2);

    TermDerivatives {
        value,
        spot: -power_bar * k * power / p.spot,
        df2: p.rebate * (n1 - power * n2),
        x: x_bar,
        y: y_bar,
        sigma_t: -x_bar - y_bar,
        mu: power_bar * 2.0 * p.ratio().ln() * power,
        spot_spot,
        ..TermDerivatives::default()
    }
}

/// Adjoint of [`rebate_at_hit_term`](super::kernels::rebate_at_hit_term).
pub fn rebate_at_hit_term<N: NormalDistribution + ?Sized>(
    n: &N,
    p: &TermInputs,
    z: f64,
) -> TermDerivatives {
    let (eta, s_t, lambda) = (p.eta, p.sigma_t, p.lambda);
    let ratio = p.ratio();
    let z_shift = z - 2.0 * lambda * s_t;
    let k1 = p.mu + lambda;
    let k2 = p.mu - lambda;

    // Forward sweep
    let n1 = n.cdf(eta * z);
    let n2 = n.cdf(eta * z_shift);
    let p1 = power_unless_zero(ratio, k1, n1);
    let p2 = power_unless_zero(ratio, k2, n2);
    let value = p.rebate * (p1 * n1 + p2 * n2);

    // Reverse sweep
    let p1_bar = p.rebate * n1;
    let p2_bar = p.rebate * n2;
    let n1_bar = p.rebate * p1;
    let n2_bar = p.rebate * p2;
    let shift_bar = n2_bar * eta * n.pdf(eta * z_shift);
    let log_ratio = ratio.ln();

    let c = -1.0 / s_t;
    let spot_spot = leg_curvature(n, p.spot, p.rebate * p1, -k1, eta, z, c, n1)
        + leg_curvature(n, p.spot, p.rebate * p2, -k2, eta, z_shift, c, n2);

    TermDerivatives {
        value,
        spot: -(p1_bar * k1 * p1 + p2_bar * k2 * p2) / p.spot,
        z: n1_bar * eta * n.pdf(eta * z) + shift_bar,
        sigma_t: -2.0 * lambda * shift_bar,
        mu: log_ratio * (p1_bar * p1 + p2_bar * p2),
        lambda: log_ratio * (p1_bar * p1 - p2_bar * p2) - 2.0 * s_t * shift_bar,
        spot_spot,
        ..TermDerivatives::default()
    }
}
