#![forbid(unsafe_code)]

//! Stateless backend adapter: a fresh plan on every call.
//!
//! Wraps rustfft in one-shot mode. Construction is a thin capture of the
//! configuration; every call re-plans, allocates a new result and leaves
//! the input untouched, which makes execution pure and safe to run from
//! any number of threads on independent instances. Real transforms go
//! through the full complex spectrum: forward keeps the `n/2 + 1`
//! non-redundant bins, backward rebuilds the Hermitian-symmetric spectrum
//! from the half and takes real parts after a complex inverse.

use ndarray::{ArrayD, Axis, IxDyn};
use rustfft::{FftDirection, FftPlanner};
use tracing::trace;

use crate::error::{FftError, FftResult};
use crate::spec::{ElementKind, Samples, TransformSpec};
use crate::transform::FftExec;
use crate::{Complex64, Direction};

#[derive(Debug)]
pub(crate) struct DirectFft {
    spec: TransformSpec,
}

impl DirectFft {
    pub(crate) fn build(spec: TransformSpec) -> Self {
        Self { spec }
    }

    fn complex_to_complex(&self, input: &ArrayD<Complex64>) -> ArrayD<Complex64> {
        let spec = &self.spec;
        let n = spec.time_axis_len();
        let axis = Axis(spec.axis());
        let scale = spec.scale();
        let fft_direction = match spec.direction() {
            Direction::Forward => FftDirection::Forward,
            Direction::Backward => FftDirection::Inverse,
        };
        let fft = FftPlanner::new().plan_fft(n, fft_direction);

        let mut out = ArrayD::<Complex64>::zeros(IxDyn(&spec.output_shape()));
        let mut lane_buf = vec![Complex64::new(0.0, 0.0); n];
        for (src, mut dst) in input.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
            for (slot, &value) in lane_buf.iter_mut().zip(src.iter()) {
                *slot = value;
            }
            fft.process(&mut lane_buf);
            for (slot, &value) in dst.iter_mut().zip(lane_buf.iter()) {
                *slot = value * scale;
            }
        }
        out
    }

    fn real_forward(&self, input: &ArrayD<f64>) -> ArrayD<Complex64> {
        let spec = &self.spec;
        let n = spec.time_axis_len();
        let axis = Axis(spec.axis());
        let scale = spec.scale();
        let fft = FftPlanner::new().plan_fft_forward(n);

        let mut out = ArrayD::<Complex64>::zeros(IxDyn(&spec.freq_shape()));
        let mut lane_buf = vec![Complex64::new(0.0, 0.0); n];
        for (src, mut dst) in input.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
            for (slot, &value) in lane_buf.iter_mut().zip(src.iter()) {
                *slot = Complex64::new(value, 0.0);
            }
            fft.process(&mut lane_buf);
            // keep the non-redundant half of the spectrum
            for (slot, &value) in dst.iter_mut().zip(lane_buf.iter()) {
                *slot = value * scale;
            }
        }
        out
    }

    fn real_backward(&self, input: &ArrayD<Complex64>) -> ArrayD<f64> {
        let spec = &self.spec;
        let n = spec.time_axis_len();
        let axis = Axis(spec.axis());
        let half = spec.freq_shape()[spec.axis()];
        let scale = spec.scale();
        let fft = FftPlanner::new().plan_fft_inverse(n);

        let mut out = ArrayD::<f64>::zeros(IxDyn(spec.time_shape()));
        let mut lane_buf = vec![Complex64::new(0.0, 0.0); n];
        for (src, mut dst) in input.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
            for (slot, &value) in lane_buf.iter_mut().zip(src.iter()) {
                *slot = value;
            }
            // mirror the redundant upper bins as conjugates
            for k in half..n {
                lane_buf[k] = lane_buf[n - k].conj();
            }
            if n % 2 == 0 {
                lane_buf[n / 2].im = 0.0;
            }
            fft.process(&mut lane_buf);
            for (slot, &value) in dst.iter_mut().zip(lane_buf.iter()) {
                *slot = value.re * scale;
            }
        }
        out
    }
}

impl FftExec for DirectFft {
    fn execute(&mut self, data: &Samples) -> FftResult<Samples> {
        trace!(
            n = self.spec.time_axis_len(),
            axis = self.spec.axis(),
            "one-shot transform"
        );
        match (self.spec.time_kind(), self.spec.direction(), data) {
            (ElementKind::Complex, _, Samples::Complex(input)) => {
                Ok(Samples::Complex(self.complex_to_complex(input)))
            }
            (ElementKind::Real, Direction::Forward, Samples::Real(input)) => {
                Ok(Samples::Complex(self.real_forward(input)))
            }
            (ElementKind::Real, Direction::Backward, Samples::Complex(input)) => {
                Ok(Samples::Real(self.real_backward(input)))
            }
            _ => Err(self.spec.input_mismatch(data)),
        }
    }

    fn execute_inplace(&mut self, _data: &mut Samples) -> FftResult<()> {
        Err(FftError::config(
            "the `direct` backend never executes in place; \
             use the `planned` backend with overwrite_input",
        ))
    }

    fn inverse_exec(&self, inverse_spec: &TransformSpec) -> Box<dyn FftExec> {
        // nothing to share: a fresh adapter for the flipped configuration
        Box::new(DirectFft::build(inverse_spec.clone()))
    }
}
