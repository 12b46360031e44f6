//! Fixed-window moving average.

/// Moving average over the last `N` samples.
///
/// The window starts out full of zeros and the average always divides by
/// `N`, so until `N` samples have been pushed the average is pulled towards
/// zero. Pushing is O(N): the window is shifted down by one and the new sample
/// lands in the last position.
///
/// ```rust
/// use tasktick_control::MovingAverage;
///
/// let mut average = MovingAverage::<4>::new();
/// average.push(80.0);
/// assert!((average.average() - 20.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverage<const N: usize> {
    window: [f64; N],
}

impl<const N: usize> MovingAverage<N> {
    /// Create an average with a zero-filled window.
    #[must_use]
    pub const fn new() -> Self {
        Self { window: [0.0; N] }
    }

    /// Window length.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop the oldest sample and append `sample`.
    pub fn push(&mut self, sample: f64) {
        if N == 0 {
            return;
        }
        self.window.rotate_left(1);
        if let Some(last) = self.window.last_mut() {
            *last = sample;
        }
    }

    /// Mean of the whole window; 0.0 for an empty window.
    #[must_use]
    pub fn average(&self) -> f64 {
        if N == 0 {
            return 0.0;
        }
        let sum: f64 = self.window.iter().sum();
        #[expect(clippy::cast_precision_loss, reason = "window length is small")]
        let len = N as f64;
        sum / len
    }

    /// Samples in the window, oldest first.
    #[must_use]
    pub const fn samples(&self) -> &[f64; N] {
        &self.window
    }

    /// Refill the window with zeros.
    pub fn reset(&mut self) {
        self.window = [0.0; N];
    }
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}
