//! Shared live-tunable effect parameters.
//!
//! A [`ParamStore`] is the one piece of mutable state shared between the
//! control surface and the audio thread. Writers call [`ParamStore::set`] at
//! any rate; the chain reads a whole-set [`ParamStore::snapshot`] exactly once
//! per chunk, so parameter changes land at chunk boundaries and never tear a
//! chunk mid-flight.

use std::sync::Mutex;

/// Lower clamp for `volume_roll_rate` (the bound is an open interval).
const ROLL_RATE_MIN: f32 = 1e-4;
/// Upper clamp for `volume_roll_rate`.
const ROLL_RATE_MAX: f32 = 0.9999;

/// Names of the live-tunable parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    /// Output gain applied last, scaling back up to the sink's sample range.
    Volume,
    /// Left/right balance; 0.5 is centered and leaves both channels untouched.
    Fade,
    /// Distortion strength; 0 bypasses the stage.
    DistortionAmount,
    /// Delay line length in seconds; 0 bypasses the stage.
    DelaySeconds,
    /// Amplitude of the delayed tap mixed back into the signal.
    DelayFeedback,
    /// Reverb line length in seconds; 0 bypasses the stage.
    ReverbSeconds,
    /// Feedback written back into the reverb buffer (falloff).
    ReverbFeedback,
    /// Amplitude of the reverb tap mixed back into the signal.
    ReverbAmplitude,
    /// Exponential release coefficient for the peak tracker.
    VolumeRollRate,
}

impl Param {
    pub const ALL: [Param; 9] = [
        Param::Volume,
        Param::Fade,
        Param::DistortionAmount,
        Param::DelaySeconds,
        Param::DelayFeedback,
        Param::ReverbSeconds,
        Param::ReverbFeedback,
        Param::ReverbAmplitude,
        Param::VolumeRollRate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::Volume => "volume",
            Param::Fade => "fade",
            Param::DistortionAmount => "distortion_amount",
            Param::DelaySeconds => "delay_seconds",
            Param::DelayFeedback => "delay_feedback",
            Param::ReverbSeconds => "reverb_seconds",
            Param::ReverbFeedback => "reverb_feedback",
            Param::ReverbAmplitude => "reverb_amplitude",
            Param::VolumeRollRate => "volume_roll_rate",
        }
    }

    /// Look a parameter up by its wire name (as a slider surface would send).
    pub fn from_name(name: &str) -> Option<Param> {
        Param::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// Upper bounds for the open-ended parameters.
#[derive(Clone, Copy, Debug)]
pub struct ParamLimits {
    pub max_volume: f32,
    pub max_distortion: f32,
    pub max_delay_seconds: f32,
    pub max_reverb_seconds: f32,
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self {
            max_volume: 32768.0,
            max_distortion: 10.0,
            max_delay_seconds: 5.0,
            max_reverb_seconds: 2.0,
        }
    }
}

/// A self-consistent copy of every parameter, taken once per chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectParams {
    pub volume: f32,
    pub fade: f32,
    pub distortion_amount: f32,
    pub delay_seconds: f32,
    pub delay_feedback: f32,
    pub reverb_seconds: f32,
    pub reverb_feedback: f32,
    pub reverb_amplitude: f32,
    pub volume_roll_rate: f32,
}

impl EffectParams {
    fn defaults(limits: &ParamLimits) -> Self {
        Self {
            volume: 10000.0_f32.min(limits.max_volume),
            fade: 0.5,
            distortion_amount: 0.0,
            delay_seconds: 0.0,
            delay_feedback: 0.5,
            reverb_seconds: 0.0,
            reverb_feedback: 0.5,
            reverb_amplitude: 0.5,
            volume_roll_rate: 0.05,
        }
    }

    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::Volume => self.volume,
            Param::Fade => self.fade,
            Param::DistortionAmount => self.distortion_amount,
            Param::DelaySeconds => self.delay_seconds,
            Param::DelayFeedback => self.delay_feedback,
            Param::ReverbSeconds => self.reverb_seconds,
            Param::ReverbFeedback => self.reverb_feedback,
            Param::ReverbAmplitude => self.reverb_amplitude,
            Param::VolumeRollRate => self.volume_roll_rate,
        }
    }

    fn set(&mut self, param: Param, value: f32) {
        match param {
            Param::Volume => self.volume = value,
            Param::Fade => self.fade = value,
            Param::DistortionAmount => self.distortion_amount = value,
            Param::DelaySeconds => self.delay_seconds = value,
            Param::DelayFeedback => self.delay_feedback = value,
            Param::ReverbSeconds => self.reverb_seconds = value,
            Param::ReverbFeedback => self.reverb_feedback = value,
            Param::ReverbAmplitude => self.reverb_amplitude = value,
            Param::VolumeRollRate => self.volume_roll_rate = value,
        }
    }
}

/// Thread-safe store of the live parameter set.
///
/// One mutex covers the whole map, so a reader always sees a self-consistent
/// set. Out-of-range writes are clamped to the parameter's bounds, never
/// rejected — the control surface stays fire-and-forget.
pub struct ParamStore {
    limits: ParamLimits,
    inner: Mutex<EffectParams>,
}

impl ParamStore {
    pub fn new(limits: ParamLimits) -> Self {
        Self {
            inner: Mutex::new(EffectParams::defaults(&limits)),
            limits,
        }
    }

    pub fn limits(&self) -> &ParamLimits {
        &self.limits
    }

    /// (min, max) bounds for a parameter under this store's limits.
    pub fn bounds(&self, param: Param) -> (f32, f32) {
        match param {
            Param::Volume => (0.0, self.limits.max_volume),
            Param::DistortionAmount => (0.0, self.limits.max_distortion),
            Param::DelaySeconds => (0.0, self.limits.max_delay_seconds),
            Param::ReverbSeconds => (0.0, self.limits.max_reverb_seconds),
            Param::VolumeRollRate => (ROLL_RATE_MIN, ROLL_RATE_MAX),
            Param::Fade | Param::DelayFeedback | Param::ReverbFeedback | Param::ReverbAmplitude => {
                (0.0, 1.0)
            }
        }
    }

    pub fn get(&self, param: Param) -> f32 {
        self.inner.lock().unwrap().get(param)
    }

    /// Store a value, clamped to the parameter's bounds. NaN is ignored.
    pub fn set(&self, param: Param, value: f32) {
        if value.is_nan() {
            log::debug!("ignoring NaN write to {}", param.name());
            return;
        }
        let (min, max) = self.bounds(param);
        let clamped = value.clamp(min, max);
        if clamped != value {
            log::debug!("{} clamped from {} to {}", param.name(), value, clamped);
        }
        self.inner.lock().unwrap().set(param, clamped);
    }

    /// Copy the whole parameter set under a single lock acquisition.
    pub fn snapshot(&self) -> EffectParams {
        *self.inner.lock().unwrap()
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new(ParamLimits::default())
    }
}
