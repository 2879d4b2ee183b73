use num_traits::{One, Zero};

use crate::element::Element;

/// The pluggable combining rule driven by the filtering engines.
///
/// One instance lives for a whole filtering call; the engine invokes
/// `reset` once per output sample and `result` exactly once after the
/// taps of that sample were accumulated. Only the norm survives across
/// samples.
///
/// `accumulate_sym` and `accumulate_antisym` fold the two mirror-image
/// taps of a symmetric / antisymmetric kernel in one call and are only
/// driven under the matching [`KernelType`](crate::KernelType)
/// classification. `accumulate_zero` carries the contribution of the
/// always-zero center tap of an antisymmetric kernel — a no-op for plain
/// convolution but meaningful for statistic-gathering rules.
pub trait Accumulator<T: Element>: Default {
    /// Clear per-sample state.
    fn reset(&mut self);

    /// Set the norm dividing (or otherwise scaling) results.
    fn set_norm(&mut self, norm: T);

    /// Combine one kernel tap with one source sample.
    fn accumulate(&mut self, kernel: T, src: T);

    /// Combine the mirror-image tap pair of a symmetric kernel.
    fn accumulate_sym(&mut self, kernel: T, left: T, right: T);

    /// Combine the mirror-image tap pair of an antisymmetric kernel;
    /// `kernel` is the coefficient of the left tap, the right one is its
    /// negation.
    fn accumulate_antisym(&mut self, kernel: T, left: T, right: T);

    /// Fold the sample under the zero-valued center tap of an
    /// antisymmetric kernel.
    fn accumulate_zero(&mut self, src: T);

    /// The combined value for the current output sample.
    fn result(&self) -> T;
}

/// Plain convolution: multiply-accumulate, result divided by the norm.
#[derive(Debug, Clone, Copy)]
pub struct Convolution<T: Element> {
    sum: T::Acc,
    norm: T::Acc,
}

impl<T: Element> Default for Convolution<T> {
    fn default() -> Self {
        Self {
            sum: T::Acc::zero(),
            norm: T::Acc::one(),
        }
    }
}

impl<T: Element> Accumulator<T> for Convolution<T> {
    fn reset(&mut self) {
        self.sum = T::Acc::zero();
    }

    fn set_norm(&mut self, norm: T) {
        let norm = norm.to_acc();
        // a zero norm would poison every division; treat it as 1
        self.norm = if norm == T::Acc::zero() {
            T::Acc::one()
        } else {
            norm
        };
    }

    fn accumulate(&mut self, kernel: T, src: T) {
        self.sum = self.sum + kernel.to_acc() * src.to_acc();
    }

    fn accumulate_sym(&mut self, kernel: T, left: T, right: T) {
        self.sum = self.sum + kernel.to_acc() * (left.to_acc() + right.to_acc());
    }

    fn accumulate_antisym(&mut self, kernel: T, left: T, right: T) {
        self.sum = self.sum + kernel.to_acc() * (left.to_acc() - right.to_acc());
    }

    fn accumulate_zero(&mut self, _src: T) {}

    fn result(&self) -> T {
        T::from_acc(self.sum / self.norm)
    }
}

/// Grayscale morphological dilation: max of `src + kernel`.
///
/// The norm is ignored; max has no meaningful rescale. Narrowing back to
/// integer element types saturates.
#[derive(Debug, Clone, Copy)]
pub struct Dilation<T: Element> {
    best: Option<T::Acc>,
}

impl<T: Element> Default for Dilation<T> {
    fn default() -> Self {
        Self { best: None }
    }
}

impl<T: Element> Dilation<T> {
    fn consider(&mut self, candidate: T::Acc) {
        match self.best {
            Some(best) if best >= candidate => {}
            _ => self.best = Some(candidate),
        }
    }
}

impl<T: Element> Accumulator<T> for Dilation<T> {
    fn reset(&mut self) {
        self.best = None;
    }

    fn set_norm(&mut self, _norm: T) {}

    fn accumulate(&mut self, kernel: T, src: T) {
        self.consider(src.to_acc() + kernel.to_acc());
    }

    fn accumulate_sym(&mut self, kernel: T, left: T, right: T) {
        self.consider(left.to_acc() + kernel.to_acc());
        self.consider(right.to_acc() + kernel.to_acc());
    }

    fn accumulate_antisym(&mut self, kernel: T, left: T, right: T) {
        self.consider(left.to_acc() + kernel.to_acc());
        self.consider(right.to_acc() - kernel.to_acc());
    }

    fn accumulate_zero(&mut self, src: T) {
        self.consider(src.to_acc());
    }

    fn result(&self) -> T {
        T::from_acc(self.best.unwrap_or_else(T::Acc::zero))
    }
}

/// Grayscale morphological erosion: min of `src - kernel`.
///
/// The norm is ignored. Narrowing back to integer element types saturates.
#[derive(Debug, Clone, Copy)]
pub struct Erosion<T: Element> {
    best: Option<T::Acc>,
}

impl<T: Element> Default for Erosion<T> {
    fn default() -> Self {
        Self { best: None }
    }
}

impl<T: Element> Erosion<T> {
    fn consider(&mut self, candidate: T::Acc) {
        match self.best {
            Some(best) if best <= candidate => {}
            _ => self.best = Some(candidate),
        }
    }
}

impl<T: Element> Accumulator<T> for Erosion<T> {
    fn reset(&mut self) {
        self.best = None;
    }

    fn set_norm(&mut self, _norm: T) {}

    fn accumulate(&mut self, kernel: T, src: T) {
        self.consider(src.to_acc() - kernel.to_acc());
    }

    fn accumulate_sym(&mut self, kernel: T, left: T, right: T) {
        self.consider(left.to_acc() - kernel.to_acc());
        self.consider(right.to_acc() - kernel.to_acc());
    }

    fn accumulate_antisym(&mut self, kernel: T, left: T, right: T) {
        self.consider(left.to_acc() - kernel.to_acc());
        self.consider(right.to_acc() + kernel.to_acc());
    }

    fn accumulate_zero(&mut self, src: T) {
        self.consider(src.to_acc());
    }

    fn result(&self) -> T {
        T::from_acc(self.best.unwrap_or_else(T::Acc::zero))
    }
}

/// Template-matching criterion: sum of squared differences between kernel
/// and source values, divided by the norm.
///
/// Here the zero-tap hook matters: a zero kernel coefficient still
/// contributes `src²` to the statistic. A non-positive norm yields zero
/// instead of a numeric fault.
#[derive(Debug, Clone, Copy)]
pub struct SquaredError<T: Element> {
    sum: T::Acc,
    norm: T::Acc,
}

impl<T: Element> Default for SquaredError<T> {
    fn default() -> Self {
        Self {
            sum: T::Acc::zero(),
            norm: T::Acc::one(),
        }
    }
}

impl<T: Element> Accumulator<T> for SquaredError<T> {
    fn reset(&mut self) {
        self.sum = T::Acc::zero();
    }

    fn set_norm(&mut self, norm: T) {
        self.norm = norm.to_acc();
    }

    fn accumulate(&mut self, kernel: T, src: T) {
        let d = kernel.to_acc() - src.to_acc();
        self.sum = self.sum + d * d;
    }

    fn accumulate_sym(&mut self, kernel: T, left: T, right: T) {
        self.accumulate(kernel, left);
        self.accumulate(kernel, right);
    }

    fn accumulate_antisym(&mut self, kernel: T, left: T, right: T) {
        let dl = kernel.to_acc() - left.to_acc();
        let dr = T::Acc::zero() - kernel.to_acc() - right.to_acc();
        self.sum = self.sum + dl * dl + dr * dr;
    }

    fn accumulate_zero(&mut self, src: T) {
        let s = src.to_acc();
        self.sum = self.sum + s * s;
    }

    fn result(&self) -> T {
        if self.norm <= T::Acc::zero() {
            return T::zero();
        }
        T::from_acc(self.sum / self.norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convolution_divides_by_norm() {
        let mut acc = Convolution::<i32>::default();
        acc.set_norm(3);
        acc.reset();
        acc.accumulate(1, 3);
        acc.accumulate(1, 4);
        acc.accumulate(1, 5);
        assert_eq!(acc.result(), 4);
    }

    #[test]
    fn convolution_sym_pairs_match_plain() {
        let mut plain = Convolution::<f32>::default();
        plain.reset();
        plain.accumulate(2.0, 3.0);
        plain.accumulate(2.0, 5.0);

        let mut paired = Convolution::<f32>::default();
        paired.reset();
        paired.accumulate_sym(2.0, 3.0, 5.0);

        assert_eq!(plain.result(), paired.result());
    }

    #[test]
    fn convolution_antisym_pairs() {
        let mut acc = Convolution::<f32>::default();
        acc.reset();
        acc.accumulate_antisym(0.5, 7.0, 3.0);
        acc.accumulate_zero(100.0);
        assert_eq!(acc.result(), 2.0);
    }

    #[test]
    fn zero_norm_is_treated_as_one() {
        let mut acc = Convolution::<i32>::default();
        acc.set_norm(0);
        acc.reset();
        acc.accumulate(1, 5);
        assert_eq!(acc.result(), 5);
    }

    #[test]
    fn dilation_takes_max() {
        let mut acc = Dilation::<u8>::default();
        acc.reset();
        acc.accumulate(0, 10);
        acc.accumulate(5, 20);
        acc.accumulate(0, 7);
        assert_eq!(acc.result(), 25);
    }

    #[test]
    fn dilation_saturates() {
        let mut acc = Dilation::<u8>::default();
        acc.reset();
        acc.accumulate(10, 250);
        assert_eq!(acc.result(), 255);
    }

    #[test]
    fn erosion_takes_min() {
        let mut acc = Erosion::<u8>::default();
        acc.reset();
        acc.accumulate(0, 10);
        acc.accumulate(5, 20);
        assert_eq!(acc.result(), 10);
    }

    #[test]
    fn squared_error_counts_zero_taps() {
        let mut acc = SquaredError::<f32>::default();
        acc.reset();
        acc.accumulate(1.0, 3.0);
        acc.accumulate_zero(2.0);
        assert_eq!(acc.result(), 8.0);
    }

    #[test]
    fn squared_error_degenerate_norm() {
        let mut acc = SquaredError::<f32>::default();
        acc.set_norm(0.0);
        acc.reset();
        acc.accumulate(1.0, 3.0);
        assert_eq!(acc.result(), 0.0);
    }
}
