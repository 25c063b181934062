//! Index-addressable bases of sublevels for handing a driven system to a
//! dynamics solver.

use std::{ fmt::Debug, hash::Hash, ops::{ Deref, DerefMut } };
use ndarray as nd;
use indexmap::IndexMap;
use num_complex::Complex64 as C64;
use num_traits::{ One, Zero };

/// Anything usable as a label for a basis state.
pub trait BasisState: Clone + Eq + Hash + Debug { }

impl<T> BasisState for T
where T: Clone + Eq + Hash + Debug
{ }

/// `|a><b|` for two state vectors.
pub fn outer_prod(a: &nd::Array1<C64>, b: &nd::Array1<C64>)
    -> nd::Array2<C64>
{
    nd::Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j].conj())
}

/* Bases **********************************************************************/

/// Ordered map from basis states to their energies in rad/s.
///
/// Insertion order fixes the row/column index of each state in every array
/// built from the basis. The underlying [`IndexMap`] is reachable through
/// [`Deref`] and [`DerefMut`].
#[derive(Clone, Debug, PartialEq)]
pub struct Basis<S>
where S: BasisState
{
    states: IndexMap<S, f64>,
}

impl<S> Deref for Basis<S>
where S: BasisState
{
    type Target = IndexMap<S, f64>;

    fn deref(&self) -> &Self::Target { &self.states }
}

impl<S> DerefMut for Basis<S>
where S: BasisState
{
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.states }
}

impl<S> Default for Basis<S>
where S: BasisState
{
    fn default() -> Self { Self { states: IndexMap::new() } }
}

impl<S> FromIterator<(S, f64)> for Basis<S>
where S: BasisState
{
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = (S, f64)>
    {
        Self { states: iter.into_iter().collect() }
    }
}

impl<S> Basis<S>
where S: BasisState
{
    pub fn new() -> Self { Self::default() }

    /// Energy of `state` in rad/s.
    pub fn energy(&self, state: &S) -> Option<f64> {
        self.states.get(state).copied()
    }

    /// Energy of the `k`-th state in rad/s.
    pub fn energy_at(&self, k: usize) -> Option<f64> {
        self.states.get_index(k).map(|(_, e)| *e)
    }

    /// All energies in index order.
    pub fn energies(&self) -> nd::Array1<f64> {
        self.states.values().copied().collect()
    }

    /// Unit vector for the `k`-th state.
    pub fn ket_at(&self, k: usize) -> Option<nd::Array1<C64>> {
        let n = self.states.len();
        (k < n).then(|| {
            let mut ket: nd::Array1<C64> = nd::Array1::zeros(n);
            ket[k] = C64::one();
            ket
        })
    }

    /// Unit vector for `state`.
    pub fn ket(&self, state: &S) -> Option<nd::Array1<C64>> {
        self.states.get_index_of(state).and_then(|k| self.ket_at(k))
    }

    /// State vector with amplitudes `amp(state, index, energy)`.
    ///
    /// The result is not normalized.
    pub fn superposition<F>(&self, amp: F) -> nd::Array1<C64>
    where F: Fn(&S, usize, f64) -> C64
    {
        self.states.iter().enumerate()
            .map(|(k, (s, e))| amp(s, k, *e))
            .collect()
    }

    /// Density matrix of the pure state `state`.
    pub fn density(&self, state: &S) -> Option<nd::Array2<C64>> {
        self.ket(state).map(|ket| outer_prod(&ket, &ket))
    }

    /// Density matrix of the pure state built by [`Self::superposition`].
    pub fn pure_density<F>(&self, amp: F) -> nd::Array2<C64>
    where F: Fn(&S, usize, f64) -> C64
    {
        let psi = self.superposition(amp);
        outer_prod(&psi, &psi)
    }

    /// Diagonal density matrix of an incoherent mixture with populations
    /// `pop(state, index, energy)`.
    pub fn mixture<F>(&self, pop: F) -> nd::Array2<C64>
    where F: Fn(&S, usize, f64) -> f64
    {
        let n = self.states.len();
        let mut rho: nd::Array2<C64> = nd::Array2::zeros((n, n));
        rho.diag_mut().iter_mut()
            .zip(self.states.iter().enumerate())
            .for_each(|(r, (k, (s, e)))| { *r = C64::from(pop(s, k, *e)); });
        rho
    }

    /// Free-evolution factors `exp(-i E t)` for every state at time `t`.
    pub fn phases_at(&self, t: f64) -> nd::Array1<C64> {
        self.states.values()
            .map(|e| (-C64::i() * *e * t).exp())
            .collect()
    }

    /// Accumulated phase `E t` of every state over a time grid, as an array
    /// with states along the first axis and time along the second.
    pub fn phases(&self, time: &nd::Array1<f64>) -> nd::Array2<f64> {
        let n = self.states.len();
        let energies = self.energies();
        nd::Array2::from_shape_fn((n, time.len()), |(k, j)| energies[k] * time[j])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;
    use assert_approx_eq::assert_approx_eq;

    fn basis() -> Basis<&'static str> {
        [("g", 0.0), ("e", 2.0), ("r", 5.0)].into_iter().collect()
    }

    #[test]
    fn energies_and_kets() {
        let b = basis();
        assert_eq!(b.len(), 3);
        assert_eq!(b.energy(&"e"), Some(2.0));
        assert_eq!(b.energy_at(2), Some(5.0));
        assert_eq!(b.energy(&"x"), None);
        assert_eq!(b.energies().to_vec(), vec![0.0, 2.0, 5.0]);
        let v = b.ket(&"e").unwrap();
        assert_eq!(v.to_vec(), vec![C64::zero(), C64::one(), C64::zero()]);
        assert!(b.ket_at(3).is_none());
    }

    #[test]
    fn densities() {
        let b = basis();
        let rho = b.density(&"r").unwrap();
        assert_eq!(rho[[2, 2]], C64::one());
        assert_eq!(rho.iter().filter(|x| **x != C64::zero()).count(), 1);

        let amp = C64::from(0.5_f64.sqrt());
        let rho = b.pure_density(|s, _, _| {
            if *s == "r" { C64::zero() } else { amp }
        });
        assert_approx_eq!(rho[[0, 1]].re, 0.5, 1e-12);
        assert_eq!(rho[[2, 2]], C64::zero());

        let mix = b.mixture(|_, k, _| k as f64);
        assert_eq!(mix[[1, 1]], C64::from(1.0));
        assert_eq!(mix[[2, 2]], C64::from(2.0));
        assert_eq!(mix[[0, 1]], C64::zero());
    }

    #[test]
    fn free_evolution() {
        let b = basis();
        let ph = b.phases_at(PI / 2.0);
        assert_approx_eq!(ph[0].re, 1.0, 1e-12);
        assert_approx_eq!(ph[1].re, -1.0, 1e-12);
        let time = nd::array![0.0, 1.0, 2.0];
        let acc = b.phases(&time);
        assert_eq!(acc.dim(), (3, 3));
        assert_eq!(acc.row(2).to_vec(), vec![0.0, 5.0, 10.0]);
    }
}
