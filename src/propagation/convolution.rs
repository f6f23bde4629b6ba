use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Linear convolution of long signals through zero-padded FFTs.
///
/// All transforms share one size so a signal spectrum can be reused against
/// several kernels.
pub struct FftConvolver {
    fft_size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl FftConvolver {
    /// Creates a convolver able to hold `signal_len + kernel_len - 1` output samples.
    pub fn new(signal_len: usize, kernel_len: usize) -> Self {
        let output_len = (signal_len + kernel_len).saturating_sub(1).max(1);
        let fft_size = output_len.next_power_of_two();

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            fft_size,
            forward,
            inverse,
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Zero-padded forward transform of `samples`.
    pub fn spectrum(&mut self, samples: &[f32]) -> Vec<Complex<f32>> {
        debug_assert!(samples.len() <= self.fft_size);
        let mut buffer = vec![Complex::new(0.0, 0.0); self.fft_size];
        for (dst, &s) in buffer.iter_mut().zip(samples) {
            dst.re = s;
        }
        self.forward
            .process_with_scratch(&mut buffer, &mut self.scratch);
        buffer
    }

    /// Convolves the signal behind `signal_spectrum` with `kernel` and adds the
    /// first `output.len()` samples of the result into `output`.
    pub fn convolve_accumulate(
        &mut self,
        signal_spectrum: &[Complex<f32>],
        kernel: &[f32],
        output: &mut [f32],
    ) {
        let mut product = self.spectrum(kernel);
        for (p, s) in product.iter_mut().zip(signal_spectrum) {
            *p *= *s;
        }
        self.inverse
            .process_with_scratch(&mut product, &mut self.scratch);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / self.fft_size as f32;
        for (dst, c) in output.iter_mut().zip(&product) {
            *dst += c.re * scale;
        }
    }

    /// Full linear convolution of `signal` and `kernel`.
    pub fn convolve(&mut self, signal: &[f32], kernel: &[f32]) -> Vec<f32> {
        if signal.is_empty() || kernel.is_empty() {
            return Vec::new();
        }
        let mut output = vec![0.0; signal.len() + kernel.len() - 1];
        let spectrum = self.spectrum(signal);
        self.convolve_accumulate(&spectrum, kernel, &mut output);
        output
    }
}
