//! Landé g-factors for fine- and hyperfine-structure levels.
//!
//! Both formulas divide by `X(X + 1)` for the relevant total angular momentum
//! `X`; for `X = 0` the single sublevel has `m = 0` and does not split, so the
//! g-factor is left undefined and `None` is returned.

use crate::spin::SpinTotal;

/// Electron spin quantum number.
pub const S_ELECTRON: f64 = 0.5;

fn jj1(j: f64) -> f64 { j * (j + 1.0) }

/// Fine-structure g-factor
/// ```text
/// g_J = 1 + [J(J + 1) - L(L + 1) + s(s + 1)] / [2 J(J + 1)]
/// ```
/// with `s = 1/2`.
pub fn lande_g_j(L: u32, J: SpinTotal) -> Option<f64> {
    if J.halves() == 0 { return None; }
    let j = J.f();
    let l = f64::from(L);
    Some(
        1.0 + (jj1(j) - jj1(l) + jj1(S_ELECTRON)) / (2.0 * jj1(j))
    )
}

/// Hyperfine g-factor
/// ```text
/// g_F = 1 + [F(F + 1) - J(J + 1) + I(I + 1)] / [2 F(F + 1)]
/// ```
pub fn lande_g_f(J: SpinTotal, I: SpinTotal, F: SpinTotal) -> Option<f64> {
    if F.halves() == 0 { return None; }
    let f = F.f();
    Some(
        1.0 + (jj1(f) - jj1(J.f()) + jj1(I.f())) / (2.0 * jj1(f))
    )
}
