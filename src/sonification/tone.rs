use std::f64::consts::PI;
use std::time::Duration;

use super::SonificationError;

/// Shape of a synthesized cue tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSpec {
    pub sample_rate: u32,
    pub duration: Duration,
    /// Linear fade applied to both ends to avoid clicks.
    pub fade: Duration,
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            duration: Duration::from_millis(200),
            fade: Duration::from_millis(10),
        }
    }
}

impl ToneSpec {
    pub fn sample_count(&self) -> usize {
        seconds_to_samples(self.duration, self.sample_rate)
    }

    /// Samples per fade, capped at half the tone.
    pub fn fade_samples(&self) -> usize {
        seconds_to_samples(self.fade, self.sample_rate).min(self.sample_count() / 2)
    }
}

fn seconds_to_samples(d: Duration, sample_rate: u32) -> usize {
    (d.as_secs_f64() * f64::from(sample_rate)).round() as usize
}

/// Sine wave at `frequency_hz` as 16-bit PCM, faded in and out.
pub fn synthesize_tone(frequency_hz: f64, spec: &ToneSpec) -> Result<Vec<i16>, SonificationError> {
    if spec.sample_rate == 0 {
        return Err(SonificationError::InvalidSpec("sample rate is zero".into()));
    }
    let nyquist = f64::from(spec.sample_rate) / 2.0;
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 || frequency_hz >= nyquist {
        return Err(SonificationError::InvalidSpec(format!(
            "frequency {frequency_hz} Hz outside (0, {nyquist}) Hz"
        )));
    }

    let n = spec.sample_count();
    let rate = f64::from(spec.sample_rate);
    let mut wave: Vec<f64> = (0..n)
        .map(|i| (2.0 * PI * frequency_hz * i as f64 / rate).sin())
        .collect();

    let fade = spec.fade_samples();
    if fade > 1 {
        let last = (fade - 1) as f64;
        for i in 0..fade {
            let gain = i as f64 / last;
            wave[i] *= gain;
            wave[n - 1 - i] *= gain;
        }
    } else if fade == 1 {
        wave[0] = 0.0;
        wave[n - 1] = 0.0;
    }

    Ok(wave
        .into_iter()
        .map(|s| (s * f64::from(i16::MAX)) as i16)
        .collect())
}
