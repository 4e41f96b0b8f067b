//! Pluggable local source terms `S(u, t)`.
//!
//! The engine supplies none by default. [`LinearSource`] and
//! [`QuadraticSource`] cover the common reaction terms; anything else can be
//! passed as a closure `Fn(u, t) -> f64`.

/// Pointwise source contribution to the field rate of change.
pub trait SourceTerm: Send + Sync {
    /// Rate contributed at a cell holding `value` at simulated `time`.
    fn rate(&self, value: f64, time: f64) -> f64;
}

/// No source: `S = 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoSource;

impl SourceTerm for NoSource {
    #[inline]
    fn rate(&self, _value: f64, _time: f64) -> f64 {
        0.0
    }
}

/// Exponential growth or decay: `S = a u`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearSource {
    /// Growth rate `a` (negative for decay).
    pub rate: f64,
}

impl SourceTerm for LinearSource {
    #[inline]
    fn rate(&self, value: f64, _time: f64) -> f64 {
        self.rate * value
    }
}

/// Logistic-type reaction: `S = a u - b u²`.
///
/// This is the deterministic part of a directed-percolation Langevin
/// equation; with `a > 0, b > 0` the homogeneous fixed point is `u = a / b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticSource {
    /// Linear coefficient `a`.
    pub linear: f64,
    /// Quadratic coefficient `b`.
    pub quadratic: f64,
}

impl SourceTerm for QuadraticSource {
    #[inline]
    fn rate(&self, value: f64, _time: f64) -> f64 {
        self.linear * value - self.quadratic * value * value
    }
}

impl<F> SourceTerm for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn rate(&self, value: f64, time: f64) -> f64 {
        self(value, time)
    }
}
