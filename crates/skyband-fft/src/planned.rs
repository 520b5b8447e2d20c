#![forbid(unsafe_code)]

//! Planning backend adapter: plan once, reuse pair buffers.
//!
//! Wraps rustfft (complex) and realfft (real) plans built exactly once at
//! construction, together with staging buffers tied to the configured
//! lane length. The up-front cost is amortized over every subsequent
//! call. A transform and its inverse jointly own one buffer allocation
//! with the time-side and frequency-side roles swapped; the memory is
//! released when the last handle of the pair drops. Calls on the two
//! handles of a pair serialize on the shared buffers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ndarray::{ArrayD, Axis, IxDyn};
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use tracing::debug;

use crate::error::{FftError, FftResult};
use crate::spec::{ElementKind, Samples, TransformSpec};
use crate::transform::FftExec;
use crate::{Complex64, Direction};

/// Direction-specific plan held by one handle of a pair.
enum LanePlan {
    Complex(Arc<dyn Fft<f64>>),
    RealForward(Arc<dyn RealToComplex<f64>>),
    RealBackward(Arc<dyn ComplexToReal<f64>>),
}

impl LanePlan {
    fn scratch_len(&self) -> usize {
        match self {
            Self::Complex(fft) => fft
                .get_outofplace_scratch_len()
                .max(fft.get_inplace_scratch_len()),
            Self::RealForward(fft) => fft.get_scratch_len(),
            Self::RealBackward(fft) => fft.get_scratch_len(),
        }
    }
}

/// Planners and lane buffers jointly owned by a forward/backward pair.
///
/// The planners cache plans by length and direction, so building the
/// paired inverse reuses the work already done here. Buffer roles swap
/// with direction: forward stages input on the time side and produces
/// into the frequency side, backward the reverse.
struct PairShared {
    planner: FftPlanner<f64>,
    real_planner: RealFftPlanner<f64>,
    time_real: Vec<f64>,
    time_complex: Vec<Complex64>,
    freq: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

pub(crate) struct PlannedFft {
    spec: TransformSpec,
    plan: LanePlan,
    shared: Arc<Mutex<PairShared>>,
    overwrite_input: bool,
}

impl PlannedFft {
    pub(crate) fn build(spec: TransformSpec, overwrite_input: bool) -> Self {
        let mut planner = FftPlanner::new();
        let mut real_planner = RealFftPlanner::new();
        let n = spec.time_axis_len();

        let (plan, time_real, time_complex, freq) = match (spec.time_kind(), spec.direction()) {
            (ElementKind::Complex, Direction::Forward) => {
                let fft = planner.plan_fft_forward(n);
                (
                    LanePlan::Complex(fft),
                    Vec::new(),
                    vec![Complex64::new(0.0, 0.0); n],
                    vec![Complex64::new(0.0, 0.0); n],
                )
            }
            (ElementKind::Complex, Direction::Backward) => {
                let fft = planner.plan_fft_inverse(n);
                (
                    LanePlan::Complex(fft),
                    Vec::new(),
                    vec![Complex64::new(0.0, 0.0); n],
                    vec![Complex64::new(0.0, 0.0); n],
                )
            }
            (ElementKind::Real, Direction::Forward) => {
                let fft = real_planner.plan_fft_forward(n);
                let time_real = fft.make_input_vec();
                let freq = fft.make_output_vec();
                (LanePlan::RealForward(fft), time_real, Vec::new(), freq)
            }
            (ElementKind::Real, Direction::Backward) => {
                let fft = real_planner.plan_fft_inverse(n);
                let freq = fft.make_input_vec();
                let time_real = fft.make_output_vec();
                (LanePlan::RealBackward(fft), time_real, Vec::new(), freq)
            }
        };
        let scratch_len = plan.scratch_len();
        debug!(
            n,
            scratch_len,
            kind = %spec.time_kind(),
            direction = %spec.direction(),
            "planned transform and pair buffers"
        );

        Self {
            spec,
            plan,
            shared: Arc::new(Mutex::new(PairShared {
                planner,
                real_planner,
                time_real,
                time_complex,
                freq,
                scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
            })),
            overwrite_input,
        }
    }

    fn lock_shared(&self) -> MutexGuard<'_, PairShared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn real_exec_error(err: realfft::FftError) -> FftError {
    FftError::config(format!("planned real transform failed: {err}"))
}

impl FftExec for PlannedFft {
    fn execute(&mut self, data: &Samples) -> FftResult<Samples> {
        let spec = &self.spec;
        let axis = Axis(spec.axis());
        let scale = spec.scale();
        let mut guard = self.lock_shared();
        let shared = &mut *guard;

        match (&self.plan, data) {
            (LanePlan::Complex(fft), Samples::Complex(input)) => {
                let (stage_in, stage_out) = match spec.direction() {
                    Direction::Forward => (&mut shared.time_complex, &mut shared.freq),
                    Direction::Backward => (&mut shared.freq, &mut shared.time_complex),
                };
                let mut out = ArrayD::<Complex64>::zeros(IxDyn(&spec.output_shape()));
                for (src, mut dst) in input.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
                    for (slot, &value) in stage_in.iter_mut().zip(src.iter()) {
                        *slot = value;
                    }
                    fft.process_outofplace_with_scratch(stage_in, stage_out, &mut shared.scratch);
                    for (slot, &value) in dst.iter_mut().zip(stage_out.iter()) {
                        *slot = value * scale;
                    }
                }
                Ok(Samples::Complex(out))
            }
            (LanePlan::RealForward(fft), Samples::Real(input)) => {
                let mut out = ArrayD::<Complex64>::zeros(IxDyn(&spec.freq_shape()));
                for (src, mut dst) in input.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
                    for (slot, &value) in shared.time_real.iter_mut().zip(src.iter()) {
                        *slot = value;
                    }
                    fft.process_with_scratch(
                        &mut shared.time_real,
                        &mut shared.freq,
                        &mut shared.scratch,
                    )
                    .map_err(real_exec_error)?;
                    for (slot, &value) in dst.iter_mut().zip(shared.freq.iter()) {
                        *slot = value * scale;
                    }
                }
                Ok(Samples::Complex(out))
            }
            (LanePlan::RealBackward(fft), Samples::Complex(input)) => {
                let n = spec.time_axis_len();
                let mut out = ArrayD::<f64>::zeros(IxDyn(spec.time_shape()));
                for (src, mut dst) in input.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
                    for (slot, &value) in shared.freq.iter_mut().zip(src.iter()) {
                        *slot = value;
                    }
                    // the DC bin (and Nyquist bin for even n) is real by the
                    // half-spectrum convention; drop numerical residue there
                    shared.freq[0].im = 0.0;
                    if n % 2 == 0 {
                        let nyquist = shared.freq.len() - 1;
                        shared.freq[nyquist].im = 0.0;
                    }
                    fft.process_with_scratch(
                        &mut shared.freq,
                        &mut shared.time_real,
                        &mut shared.scratch,
                    )
                    .map_err(real_exec_error)?;
                    for (slot, &value) in dst.iter_mut().zip(shared.time_real.iter()) {
                        *slot = value * scale;
                    }
                }
                Ok(Samples::Real(out))
            }
            _ => Err(spec.input_mismatch(data)),
        }
    }

    fn execute_inplace(&mut self, data: &mut Samples) -> FftResult<()> {
        if !self.overwrite_input {
            return Err(FftError::config(
                "in-place execution requires the overwrite_input backend option",
            ));
        }
        let LanePlan::Complex(fft) = &self.plan else {
            return Err(FftError::config(
                "in-place execution is only available for complex-to-complex transforms",
            ));
        };
        let Samples::Complex(input) = data else {
            return Err(self.spec.input_mismatch(data));
        };

        let axis = Axis(self.spec.axis());
        let scale = self.spec.scale();
        let mut guard = self.lock_shared();
        let shared = &mut *guard;
        for mut lane in input.lanes_mut(axis) {
            if let Some(slice) = lane.as_slice_mut() {
                fft.process_with_scratch(slice, &mut shared.scratch);
            } else {
                // non-contiguous lane: stage through the time-side buffer
                for (slot, &value) in shared.time_complex.iter_mut().zip(lane.iter()) {
                    *slot = value;
                }
                fft.process_with_scratch(&mut shared.time_complex, &mut shared.scratch);
                for (slot, &value) in lane.iter_mut().zip(shared.time_complex.iter()) {
                    *slot = value;
                }
            }
            if scale != 1.0 {
                lane.mapv_inplace(|value| value * scale);
            }
        }
        Ok(())
    }

    fn inverse_exec(&self, inverse_spec: &TransformSpec) -> Box<dyn FftExec> {
        let n = inverse_spec.time_axis_len();
        let mut guard = self.lock_shared();
        let shared = &mut *guard;
        // planner caches make this a lookup, not a re-plan
        let plan = match (inverse_spec.time_kind(), inverse_spec.direction()) {
            (ElementKind::Complex, Direction::Forward) => {
                LanePlan::Complex(shared.planner.plan_fft_forward(n))
            }
            (ElementKind::Complex, Direction::Backward) => {
                LanePlan::Complex(shared.planner.plan_fft_inverse(n))
            }
            (ElementKind::Real, Direction::Forward) => {
                LanePlan::RealForward(shared.real_planner.plan_fft_forward(n))
            }
            (ElementKind::Real, Direction::Backward) => {
                LanePlan::RealBackward(shared.real_planner.plan_fft_inverse(n))
            }
        };
        let needed = plan.scratch_len();
        if shared.scratch.len() < needed {
            shared.scratch.resize(needed, Complex64::new(0.0, 0.0));
        }
        drop(guard);

        Box::new(PlannedFft {
            spec: inverse_spec.clone(),
            plan,
            shared: Arc::clone(&self.shared),
            overwrite_input: self.overwrite_input,
        })
    }
}

impl fmt::Debug for PlannedFft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedFft")
            .field("spec", &self.spec)
            .field("overwrite_input", &self.overwrite_input)
            .finish_non_exhaustive()
    }
}
