//! Stransverse mass (mT2)
//!
//! mT2 bounds from below the mass of pair-produced particles which each decay
//! into one visible and one invisible product, when only the sum of the two
//! invisible transverse momenta is measured. It is the minimum, over all ways
//! of splitting the missing transverse momentum into two invisible momenta q1
//! and q2, of the larger of the two transverse masses mT(visible_i, q_i).
//!
//! mT² is a convex function of the invisible momentum, so the larger of the
//! two transverse masses is a convex function of q1 = p_miss - q2. We minimize
//! it by nested golden-section searches over a window of the q1 plane, which
//! is moved and enlarged until the minimum lies well inside of it.

use crate::{
    momentum::{Kinematics, Momentum, Transverse, E, X},
    numeric::Float,
};
use prefix_num_ops::real::*;
use std::cmp::Ordering;

/// Value returned when mT2 is undefined
///
/// This happens when the missing transverse momentum vanishes, when the
/// inputs are not finite, or when no minimum could be located. Since it lies
/// below any realistic threshold, events in this situation fail every
/// "mT2 > X" requirement.
///
pub const MT2_DEGENERATE: Float = 0.;

/// Missing transverse momentum magnitude below which mT2 is degenerate (GeV)
const DEGENERATE_MISSING_PT: Float = 1e-9;

/// Number of golden-section iterations per dimension
///
/// Each iteration shrinks the search interval by a factor ~0.618, so this
/// brings the initial window below 1e-10 of its size.
///
const GOLDEN_ITERATIONS: usize = 64;

/// Number of times the search window may be enlarged before giving up
const MAX_WINDOW_EXPANSIONS: usize = 48;

/// A minimum is trusted if it lies within this fraction of the search
/// window's half-width from its center
const INNER_WINDOW_FRACTION: Float = 0.9;

/// Squared transverse mass of a visible and an invisible system
pub fn transverse_mass_sq(
    visible: &Momentum,
    invisible: &Transverse,
    invisible_mass: Float,
) -> Float {
    let vis_mass_sq = (visible[E] * visible[E] - visible.fixed_rows::<3>(X).norm_squared()).max(0.);
    let inv_mass_sq = invisible_mass * invisible_mass;
    let vis_pt = visible.transverse();
    let vis_et = sqrt(vis_mass_sq + vis_pt.norm_squared());
    let inv_et = sqrt(inv_mass_sq + invisible.norm_squared());
    vis_mass_sq + inv_mass_sq + 2. * (vis_et * inv_et - vis_pt.dot(invisible))
}

/// Transverse mass of a visible and an invisible system
pub fn transverse_mass(visible: &Momentum, invisible: &Transverse, invisible_mass: Float) -> Float {
    sqrt(transverse_mass_sq(visible, invisible, invisible_mass).max(0.))
}

/// Stransverse mass of two visible systems and the missing momentum
///
/// The result does not depend on the order of the visible systems, down to
/// the last bit. Degenerate inputs yield `MT2_DEGENERATE`.
///
pub fn mt2(
    visible_a: &Momentum,
    visible_b: &Momentum,
    invisible_mass: Float,
    missing: &Transverse,
) -> Float {
    let finite = visible_a
        .iter()
        .chain(visible_b.iter())
        .chain(missing.iter())
        .all(|x| x.is_finite())
        && invisible_mass.is_finite();
    if !finite || missing.norm() < DEGENERATE_MISSING_PT {
        return MT2_DEGENERATE;
    }

    // Solve in a canonical order, so that swapping the inputs cannot change
    // the floating-point operations that are carried out
    let (first, second) = if canonical_cmp(visible_a, visible_b) == Ordering::Greater {
        (visible_b, visible_a)
    } else {
        (visible_a, visible_b)
    };
    let problem = Mt2Problem {
        first,
        second,
        invisible_mass,
        missing: *missing,
    };

    match problem.minimize() {
        Some(mt2_sq) if mt2_sq.is_finite() => sqrt(mt2_sq.max(0.)),
        _ => MT2_DEGENERATE,
    }
}

/// Lexicographic total order on 4-momenta
fn canonical_cmp(a: &Momentum, b: &Momentum) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// mT2 minimization problem
struct Mt2Problem<'a> {
    first: &'a Momentum,
    second: &'a Momentum,
    invisible_mass: Float,
    missing: Transverse,
}
//
impl Mt2Problem<'_> {
    /// Larger squared transverse mass when the first invisible momentum is q1
    fn objective(&self, q1: Transverse) -> Float {
        let q2 = self.missing - q1;
        let mt_sq_1 = transverse_mass_sq(self.first, &q1, self.invisible_mass);
        let mt_sq_2 = transverse_mass_sq(self.second, &q2, self.invisible_mass);
        mt_sq_1.max(mt_sq_2)
    }

    /// Minimal value of the objective, or None if no minimum could be found
    ///
    /// The search starts from a window centered on the even split, whose size
    /// is set by the momentum scale of the event. When the leptons are nearly
    /// collinear or the invisible particles are heavy, the optimal split can
    /// lie far away from that initial guess: as long as the minimum found sits
    /// on the window's edge, the window is re-centered on it and enlarged.
    ///
    fn minimize(&self) -> Option<Float> {
        let mut center = self.missing / 2.;
        let mut half_width =
            2. * (self.missing.norm() + self.first.pt() + self.second.pt()) + self.invisible_mass;
        for _ in 0..=MAX_WINDOW_EXPANSIONS {
            let (argmin, value) = self.minimize_in_window(center, half_width);
            let offset = argmin - center;
            let inner_edge = INNER_WINDOW_FRACTION * half_width;
            if abs(offset.x) < inner_edge && abs(offset.y) < inner_edge {
                return Some(value);
            }
            center = argmin;
            half_width *= 2.;
        }
        None
    }

    /// Location and value of the minimum of the objective over a square
    /// window of the q1 plane
    fn minimize_in_window(&self, center: Transverse, half_width: Float) -> (Transverse, Float) {
        // The partial minimum over y of a jointly convex function is convex
        // in x, so both levels of the search see a unimodal function.
        let min_over_y = |x: Float| {
            golden_section(center.y - half_width, center.y + half_width, |y| {
                self.objective(Transverse::new(x, y))
            })
        };
        let (x, _) = golden_section(center.x - half_width, center.x + half_width, |x| {
            min_over_y(x).1
        });
        let (y, value) = min_over_y(x);
        (Transverse::new(x, y), value)
    }
}

/// Location and value of the minimum of a unimodal function over an interval
fn golden_section(mut lo: Float, mut hi: Float, f: impl Fn(Float) -> Float) -> (Float, Float) {
    let inv_phi = (sqrt(5.) - 1.) / 2.;
    let mut x1 = hi - inv_phi * (hi - lo);
    let mut x2 = lo + inv_phi * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);
    for _ in 0..GOLDEN_ITERATIONS {
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - inv_phi * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + inv_phi * (hi - lo);
            f2 = f(x2);
        }
    }
    if f1 <= f2 {
        (x1, f1)
    } else {
        (x2, f2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::momentum::from_pt_eta_phi_m;
    use crate::numeric::floats::consts::{FRAC_PI_2, PI};
    use crate::random::RandomGenerator;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn massless(pt: Float, eta: Float, phi: Float) -> Momentum {
        from_pt_eta_phi_m(pt, eta, phi, 0.)
    }

    #[test]
    fn transverse_mass_of_back_to_back_massless_pair() {
        let lepton = massless(40., 0.7, 0.);
        let neutrino = Transverse::new(-40., 0.);
        assert_relative_eq!(transverse_mass(&lepton, &neutrino, 0.), 80., max_relative = 1e-12);
    }

    #[test]
    fn orthogonal_pair_recoiling_against_invisibles() {
        // Two 50 GeV massless leptons along x and y, invisibles recoiling
        // against them: the optimal split is q1 = (0, -50), q2 = (-50, 0),
        // where both transverse masses equal sqrt(2) * 50 GeV.
        let a = massless(50., 0.3, 0.);
        let b = massless(50., -1.1, FRAC_PI_2);
        let missing = Transverse::new(-50., -50.);
        let expected = (2. as Float).sqrt() * 50.;
        assert_relative_eq!(mt2(&a, &b, 0., &missing), expected, max_relative = 1e-7);
    }

    #[test]
    fn unequal_orthogonal_pair() {
        // With q_i orthogonal to the visible p_i, mT_i² = 2 |p_i| |q_i|, and
        // this split is optimal. Choosing |q_1| = M² / 100 and |q_2| = M² / 60
        // for leptons of 50 and 30 GeV therefore yields mT2 = M.
        let target: Float = 95.;
        let a = massless(50., 0., 0.);
        let b = massless(30., 0.62, FRAC_PI_2);
        let missing = Transverse::new(-target * target / 60., -target * target / 100.);
        assert_relative_eq!(mt2(&a, &b, 0., &missing), target, max_relative = 1e-7);
    }

    #[test]
    fn vanishes_when_missing_momentum_is_between_the_leptons() {
        let a = massless(40., 0., 0.3);
        let b = massless(25., 1.0, 1.2);
        let missing = a.transverse() * 0.5 + b.transverse() * 2.;
        assert_abs_diff_eq!(mt2(&a, &b, 0., &missing), 0., epsilon = 1e-3);
    }

    #[test]
    fn symmetric_under_exchange_of_visible_systems() {
        let a = from_pt_eta_phi_m(63., 0.4, -2.1, 0.105);
        let b = from_pt_eta_phi_m(38., -1.3, 0.9, 0.000511);
        let missing = Transverse::new(71., -12.);
        for &m_inv in &[0., 50.] {
            assert_eq!(mt2(&a, &b, m_inv, &missing), mt2(&b, &a, m_inv, &missing));
        }
    }

    #[test]
    fn bounded_below_by_the_visible_masses() {
        let a = from_pt_eta_phi_m(45., 0.2, 1.0, 10.);
        let b = from_pt_eta_phi_m(30., -0.5, -2.0, 3.);
        let missing = Transverse::new(20., 5.);
        assert!(mt2(&a, &b, 0., &missing) >= 10. * (1. - 1e-9));
        assert!(mt2(&a, &b, 20., &missing) >= 30. * (1. - 1e-9));
    }

    #[test]
    fn degenerate_inputs_give_the_sentinel() {
        let a = massless(50., 0., 0.);
        let b = massless(50., 0., 2.);
        assert_eq!(mt2(&a, &b, 0., &Transverse::zeros()), MT2_DEGENERATE);
        let nan = Transverse::new(Float::NAN, 3.);
        assert_eq!(mt2(&a, &b, 0., &nan), MT2_DEGENERATE);
    }

    /// Upper bound on mT² from a refining grid search over q1
    fn grid_search_mt2_sq(a: &Momentum, b: &Momentum, m_inv: Float, missing: &Transverse) -> Float {
        const STEPS: i32 = 10;
        let objective = |q1: Transverse| {
            let q2 = missing - q1;
            transverse_mass_sq(a, &q1, m_inv).max(transverse_mass_sq(b, &q2, m_inv))
        };
        let mut best = missing / 2.;
        let mut best_value = objective(best);
        let mut half_width: Float = 1e6;
        for _ in 0..80 {
            let center = best;
            let step = half_width / STEPS as Float;
            for i in -STEPS..=STEPS {
                for j in -STEPS..=STEPS {
                    let q1 = center + Transverse::new(i as Float * step, j as Float * step);
                    let value = objective(q1);
                    if value < best_value {
                        best = q1;
                        best_value = value;
                    }
                }
            }
            half_width *= 0.6;
        }
        best_value
    }

    #[test]
    fn matches_grid_search_on_random_configurations() {
        let mut rng = RandomGenerator::new(20140321);
        for k in 0..60 {
            let [pt_a, pt_b, eta_a, eta_b, phi_a, dphi, mx, my] = rng.random_array::<8>();
            let pt_a = 10. + 190. * pt_a;
            let pt_b = 10. + 190. * pt_b;
            let phi_a = 2. * PI * phi_a - PI;
            // Nearly collinear and nearly back-to-back leptons push the
            // optimal split far away from the even split
            let phi_b = match k % 4 {
                0 => phi_a + 0.02 * (dphi - 0.5),
                1 => phi_a + PI + 0.02 * (dphi - 0.5),
                _ => phi_a + 2. * PI * dphi,
            };
            let mass_a = if k % 2 == 0 { 0.105 } else { 5. };
            let a = from_pt_eta_phi_m(pt_a, 4. * eta_a - 2., phi_a, mass_a);
            let b = from_pt_eta_phi_m(pt_b, 4. * eta_b - 2., phi_b, 0.000511);
            let missing = Transverse::new(600. * mx - 300., 600. * my - 300.);
            let m_inv = [0., 50., 150.][k % 3];

            let solver = mt2(&a, &b, m_inv, &missing);
            let lower_bound = mass_a + m_inv;
            assert!(solver >= lower_bound * (1. - 1e-9), "case {k}: {solver} < {lower_bound}");

            let grid = grid_search_mt2_sq(&a, &b, m_inv, &missing);
            let scale = missing.norm() + pt_a + pt_b + m_inv;
            assert!(
                solver * solver <= grid + 1e-6 * scale * scale,
                "case {k}: solver gives {solver}, grid search reaches {}",
                grid.max(0.).sqrt()
            );
        }
    }

    #[test]
    fn finds_minima_far_from_the_even_split() {
        // Nearly back-to-back massless leptons, with a missing momentum that
        // splits into invisibles parallel to each lepton. mT2 vanishes, but
        // only for invisible momenta of 3 TeV, while the missing momentum
        // itself is a few tens of GeV.
        let a = massless(60., 0.2, 0.);
        let b = massless(40., -0.4, PI - 0.01);
        let missing = a.transverse() * 50. + b.transverse() * 75.;
        assert!(missing.norm() < 40.);
        assert_abs_diff_eq!(mt2(&a, &b, 0., &missing), 0., epsilon = 1e-2);
    }
}
