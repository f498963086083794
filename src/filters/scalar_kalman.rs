// 1-D Kalman filter over a scalar signal (here: ground speed in m/s).
//
// The instrument tracks a single scalar, so the full matrix machinery is
// unnecessary; the gain and covariance updates stay closed-form and
// branch-free, which keeps the per-sample cost trivial at GPS rate (~1 Hz)
// and accelerometer rate (~50 Hz).

/// Post-predict state, returned by [`ScalarKalman::predict`].
#[derive(Clone, Copy, Debug)]
pub struct Prediction {
    pub x: f64,
    pub p: f64,
}

/// Post-update state, returned by [`ScalarKalman::filter`].
#[derive(Clone, Copy, Debug)]
pub struct Estimate {
    pub x: f64,
    pub k: f64,
    pub p: f64,
}

/// Recursive 1-D estimator with scalar dynamics `x' = A·x + B·u` and scalar
/// measurement model `z = C·x`.
///
/// `R` is measurement noise, `Q` is process noise. The plain constructor
/// uses identity dynamics (A=1, B=0, C=1), which reduces the update to
/// `k = P/(P+R)`, `x += k·(z − x)`, `P = (1−k)·P`.
///
/// The filter is seeded by its first measurement: the first `filter` call
/// returns the measurement unchanged, and `predict` before seeding is a
/// no-op so the instrument can idle indefinitely with no data.
///
/// Inputs are unconstrained reals. A non-finite measurement after seeding
/// propagates through `x` and `P` and poisons the instance; callers that
/// care must gate their inputs.
#[derive(Clone, Debug)]
pub struct ScalarKalman {
    r: f64,
    q: f64,
    a: f64,
    b: f64,
    c: f64,
    x: f64,
    p: f64,
    k: f64,
    seeded: bool,
}

impl Default for ScalarKalman {
    /// Instrument defaults: R = 0.01, Q = 3.
    fn default() -> Self {
        ScalarKalman::new(0.01, 3.0)
    }
}

impl ScalarKalman {
    /// Identity-dynamics filter from measurement noise `r` and process
    /// noise `q`.
    pub fn new(r: f64, q: f64) -> Self {
        Self::with_dynamics(r, q, 1.0, 0.0, 1.0)
    }

    /// Full scalar model: state transition `a`, control gain `b`,
    /// measurement map `c`.
    pub fn with_dynamics(r: f64, q: f64, a: f64, b: f64, c: f64) -> Self {
        ScalarKalman {
            r,
            q,
            a,
            b,
            c,
            x: 0.0,
            p: 0.0,
            k: 0.0,
            seeded: false,
        }
    }

    /// Advance the state one step using a control input without consuming a
    /// measurement. Covariance grows by `Q`; with the default `B = 0` the
    /// estimate itself is untouched, so control inputs (accelerometer
    /// samples) only perturb uncertainty between measurements.
    pub fn predict(&mut self, control: f64) -> Prediction {
        if self.seeded {
            self.x = self.a * self.x + self.b * control;
            self.p = self.a * self.p * self.a + self.q;
        }
        Prediction { x: self.x, p: self.p }
    }

    /// Predict-then-update with a new measurement. Mutates `x`, `k`, `P` in
    /// place and returns the updated estimate.
    pub fn filter(&mut self, measurement: f64) -> Estimate {
        if !self.seeded {
            self.x = measurement / self.c;
            self.p = self.q / (self.c * self.c);
            self.seeded = true;
        } else {
            let x_pred = self.a * self.x;
            let p_pred = self.a * self.p * self.a + self.q;

            self.k = p_pred * self.c / (self.c * p_pred * self.c + self.r);
            self.x = x_pred + self.k * (measurement - self.c * x_pred);
            self.p = p_pred - self.k * self.c * p_pred;
        }
        Estimate { x: self.x, k: self.k, p: self.p }
    }

    pub fn estimate(&self) -> f64 {
        self.x
    }

    pub fn covariance(&self) -> f64 {
        self.p
    }

    pub fn gain(&self) -> f64 {
        self.k
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> ScalarKalman {
        // Instrument defaults: trust measurements heavily (R=0.01), assume
        // the true speed drifts a lot between fixes (Q=3).
        ScalarKalman::default()
    }

    #[test]
    fn test_default_matches_instrument_parameters() {
        let mut a = ScalarKalman::default();
        let mut b = ScalarKalman::new(0.01, 3.0);
        a.filter(10.0);
        b.filter(10.0);
        for _ in 0..5 {
            let ea = a.filter(12.0);
            let eb = b.filter(12.0);
            assert_eq!(ea.x, eb.x);
            assert_eq!(ea.k, eb.k);
            assert_eq!(ea.p, eb.p);
        }
    }

    #[test]
    fn test_first_measurement_seeds() {
        let mut kf = default_filter();
        assert!(!kf.is_seeded());
        let est = kf.filter(12.5);
        assert_eq!(est.x, 12.5);
        assert!(kf.is_seeded());
    }

    #[test]
    fn test_converges_to_constant_input() {
        let mut kf = default_filter();
        kf.filter(0.0);
        let target = 5.0;
        let mut prev_err = f64::INFINITY;
        for i in 0..50 {
            let est = kf.filter(target);
            let err = (est.x - target).abs();
            if i >= 2 {
                assert!(err <= prev_err, "error grew at step {i}: {err} > {prev_err}");
            }
            prev_err = err;
        }
        assert!(prev_err < 0.01);
    }

    #[test]
    fn test_bounded_under_oscillation() {
        let mut kf = default_filter();
        for i in 0..1000 {
            let z = if i % 2 == 0 { 10.0 } else { -10.0 };
            let est = kf.filter(z);
            assert!(est.x.is_finite());
            assert!(est.x.abs() <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_gain_in_unit_interval() {
        let mut kf = default_filter();
        kf.filter(3.0);
        for _ in 0..20 {
            let est = kf.filter(4.0);
            assert!(est.k > 0.0 && est.k < 1.0);
        }
    }

    #[test]
    fn test_predict_before_seed_is_noop() {
        let mut kf = default_filter();
        for _ in 0..100 {
            let pred = kf.predict(9.81);
            assert_eq!(pred.x, 0.0);
            assert_eq!(pred.p, 0.0);
        }
        // First real measurement still seeds cleanly afterwards
        let est = kf.filter(7.0);
        assert_eq!(est.x, 7.0);
    }

    #[test]
    fn test_predict_grows_covariance_only() {
        let mut kf = default_filter();
        kf.filter(6.0);
        let x_before = kf.estimate();
        let p_before = kf.covariance();
        kf.predict(2.5);
        assert_eq!(kf.estimate(), x_before);
        assert!(kf.covariance() > p_before);
    }

    #[test]
    fn test_control_gain_moves_estimate() {
        let mut kf = ScalarKalman::with_dynamics(0.01, 3.0, 1.0, 0.1, 1.0);
        kf.filter(10.0);
        let pred = kf.predict(2.0);
        assert!((pred.x - 10.2).abs() < 1e-12);
    }

    #[test]
    fn test_nan_poisons_after_seed() {
        let mut kf = default_filter();
        kf.filter(5.0);
        kf.filter(f64::NAN);
        assert!(kf.estimate().is_nan());
        // No self-healing: later finite measurements stay poisoned
        let est = kf.filter(5.0);
        assert!(est.x.is_nan());
    }

    #[test]
    fn test_independent_instances() {
        let mut a = default_filter();
        let mut b = default_filter();
        a.filter(1.0);
        b.filter(100.0);
        assert!((a.estimate() - 1.0).abs() < 1e-12);
        assert!((b.estimate() - 100.0).abs() < 1e-12);
    }
}
