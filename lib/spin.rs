//! Angular-momentum quantum numbers and Wigner 3j symbols.
//!
//! All quantum numbers are stored as an integer number of halves so that
//! integer and half-integer values are never confused by floating-point
//! rounding.

use std::{ fmt, hash::Hash };
use wigner_symbols::Wigner3jm;
use crate::error::{ IonError, IonResult };

/// Absolute tolerance (in units of halves) used when converting floats to
/// quantum numbers.
pub const HALF_INT_TOL: f64 = 1e-9;

fn checked_halves(f: f64) -> IonResult<i64> {
    let twice = 2.0 * f;
    let rounded = twice.round();
    if !f.is_finite() || (twice - rounded).abs() > HALF_INT_TOL {
        return Err(IonError::InvalidAngularMomentum(f));
    }
    Ok(rounded as i64)
}

fn fmt_halves(h: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if h % 2 == 0 {
        write!(f, "{}", h / 2)
    } else {
        write!(f, "{}/2", h)
    }
}

/// Magnetic (projection) quantum number m, stored as `2m`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinProj(i32);

impl SpinProj {
    /// `m` given as `2m`.
    pub fn new(m: i32) -> Self { Self(m) }

    /// `-m`.
    pub fn reflected(self) -> Self { Self(-self.0) }

    /// `2m`.
    pub fn halves(self) -> i32 { self.0 }

    /// `m` itself.
    pub fn f(self) -> f64 { f64::from(self.0) / 2.0 }

    /// Convert a `f64` to a projection quantum number, failing if it is not
    /// within [`HALF_INT_TOL`] of an integer or half-integer.
    pub fn try_from_f64(f: f64) -> IonResult<Self> {
        let h = checked_halves(f)?;
        i32::try_from(h)
            .map(Self)
            .map_err(|_| IonError::InvalidAngularMomentum(f))
    }
}

impl fmt::Display for SpinProj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_halves(i64::from(self.0), f)
    }
}

/// Total angular momentum quantum number J (or F, or I), stored as `2J`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinTotal(u32);

impl SpinTotal {
    /// `J` given as `2J`.
    pub fn new(j: u32) -> Self { Self(j) }

    /// `2J`.
    pub fn halves(self) -> u32 { self.0 }

    /// `J` itself.
    pub fn f(self) -> f64 { f64::from(self.0) / 2.0 }

    /// `true` for odd `2J`.
    pub fn is_half_integer(self) -> bool { self.0 % 2 == 1 }

    /// Convert a `f64` to a total-spin quantum number, failing if it is
    /// negative or not within [`HALF_INT_TOL`] of an integer or half-integer.
    pub fn try_from_f64(f: f64) -> IonResult<Self> {
        let h = checked_halves(f)?;
        u32::try_from(h)
            .map(Self)
            .map_err(|_| IonError::InvalidAngularMomentum(f))
    }

    /// Number of projection states, `2J + 1`.
    pub fn multiplicity(self) -> usize { self.0 as usize + 1 }

    /// All `(J, m)` pairs for `m = -J, -J + 1, ..., J`.
    pub fn projections(self) -> SpinProjections {
        SpinProjections {
            total: self,
            next: -(self.0 as i64),
        }
    }
}

impl IntoIterator for SpinTotal {
    type IntoIter = SpinProjections;
    type Item = Spin;

    fn into_iter(self) -> Self::IntoIter { self.projections() }
}

impl fmt::Display for SpinTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_halves(i64::from(self.0), f)
    }
}

/// A valid `(J, m)` pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Spin(SpinTotal, SpinProj);

impl Spin {
    /// Pair `2J = j` with `2m = m`, if `|m| <= J` and `J - m` is an integer.
    pub fn new(j: u32, m: i32) -> Option<Self> {
        let (jj, mm) = (i64::from(j), i64::from(m));
        (mm.abs() <= jj && (jj - mm) % 2 == 0)
            .then_some(Self(SpinTotal(j), SpinProj(m)))
    }

    /// Like [`Self::new`], but with typed arguments and an error on failure.
    pub fn checked(j: SpinTotal, m: SpinProj) -> IonResult<Self> {
        Self::new(j.halves(), m.halves())
            .ok_or_else(|| IonError::InvalidProjection {
                total: j.to_string(),
                proj: m.to_string(),
            })
    }

    pub fn total(self) -> SpinTotal { self.0 }

    pub fn proj(self) -> SpinProj { self.1 }

    /// `(J, -m)`.
    pub fn reflected(self) -> Self { Self(self.0, self.1.reflected()) }

    /// `(2J, 2m)`.
    pub fn halves(self) -> (u32, i32) { (self.0.halves(), self.1.halves()) }

    /// `(J, m)` as floats.
    pub fn f(self) -> (f64, f64) { (self.0.f(), self.1.f()) }

    /// Convert a pair of `f64`s, checking that both are (half-)integers and
    /// that the projection is valid for the total.
    pub fn try_from_f64(j: f64, m: f64) -> IonResult<Self> {
        Self::checked(SpinTotal::try_from_f64(j)?, SpinProj::try_from_f64(m)?)
    }
}

impl TryFrom<(SpinTotal, SpinProj)> for Spin {
    type Error = IonError;

    fn try_from(jm: (SpinTotal, SpinProj)) -> IonResult<Self> {
        Self::checked(jm.0, jm.1)
    }
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}, {}>", self.0, self.1)
    }
}

/// Iterator returned by [`SpinTotal::projections`].
#[derive(Copy, Clone, Debug)]
pub struct SpinProjections {
    total: SpinTotal,
    next: i64,
}

impl Iterator for SpinProjections {
    type Item = Spin;

    fn next(&mut self) -> Option<Self::Item> {
        let j = i64::from(self.total.0);
        if self.next > j { return None; }
        let m = self.next;
        self.next += 2;
        Some(Spin(self.total, SpinProj(m as i32)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (i64::from(self.total.0) - self.next) / 2 + 1;
        let remaining = usize::try_from(remaining).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SpinProjections { }

/// Compute `(-1)^(h / 2)` for a phase exponent given in halves.
///
/// Returns `None` if the exponent is not an integer.
pub fn phase_halves(h: i64) -> Option<f64> {
    if h % 2 != 0 { return None; }
    Some(if (h / 2) % 2 == 0 { 1.0 } else { -1.0 })
}

/// Return `true` if the Wigner 3j symbol with the given columns can be
/// nonzero.
///
/// Checks that each projection is valid for its total, that the projections
/// sum to zero, and that the totals satisfy the triangle condition with an
/// integer sum.
pub fn w3j_allowed(s1: Spin, s2: Spin, s3: Spin) -> bool {
    let (j1, m1) = s1.halves();
    let (j2, m2) = s2.halves();
    let (j3, m3) = s3.halves();
    let (j1, j2, j3) = (i64::from(j1), i64::from(j2), i64::from(j3));
    let (m1, m2, m3) = (i64::from(m1), i64::from(m2), i64::from(m3));
    m1 + m2 + m3 == 0
        && (j1 - j2).abs() <= j3
        && j3 <= j1 + j2
        && (j1 + j2 + j3) % 2 == 0
}

/// Calculate the Wigner 3j symbol for columns (left to right) `s1..s3`.
///
/// The symbol is evaluated exactly and converted to `f64` only at the end.
/// It is exactly zero whenever the projections do not sum to zero or the
/// triangle condition is violated.
pub fn w3j<S1, S2, S3>(s1: S1, s2: S2, s3: S3) -> f64
where
    S1: Into<Spin>,
    S2: Into<Spin>,
    S3: Into<Spin>,
{
    let s1 = s1.into();
    let s2 = s2.into();
    let s3 = s3.into();
    if !w3j_allowed(s1, s2, s3) { return 0.0; }
    Wigner3jm {
        tj1: s1.total().halves() as i32,
        tm1: s1.proj().halves(),
        tj2: s2.total().halves() as i32,
        tm2: s2.proj().halves(),
        tj3: s3.total().halves() as i32,
        tm3: s3.proj().halves(),
    }
    .value()
    .into()
}

/// Compute the Wigner 3j symbol from float-valued quantum numbers.
///
/// Each argument is converted to an exact number of halves first; a value not
/// within tolerance of an integer or half-integer is an error. Projections
/// that are inconsistent with their totals give a zero symbol, not an error.
pub fn w3j_f64(j: [f64; 3], m: [f64; 3]) -> IonResult<f64> {
    let mut spins: Vec<Spin> = Vec::with_capacity(3);
    for (jk, mk) in j.into_iter().zip(m) {
        let jk = SpinTotal::try_from_f64(jk)?;
        let mk = SpinProj::try_from_f64(mk)?;
        match Spin::new(jk.halves(), mk.halves()) {
            Some(s) => spins.push(s),
            None => { return Ok(0.0); },
        }
    }
    Ok(w3j(spins[0], spins[1], spins[2]))
}
