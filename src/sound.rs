//! Audible alert pulses
//!
//! One pulse is a short sine burst on the default audio output. When no
//! output device is usable the pulse degrades to a terminal bell.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, StreamConfig};
use std::f32::consts::PI;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

const PULSE_FREQ_HZ: f32 = 1000.0;
const PULSE_LENGTH: Duration = Duration::from_millis(800);
const PULSE_AMPLITUDE: f32 = 0.4;

/// Emit one alert pulse, blocking for its duration.
pub fn pulse() {
    if let Err(err) = beep(PULSE_FREQ_HZ, PULSE_LENGTH) {
        debug!("Audio pulse unavailable ({err}), falling back to terminal bell");
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}

/// Play a sine tone on the default output device.
fn beep(freq: f32, duration: Duration) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no default audio output device"))?;
    let supported = device.default_output_config()?;

    match supported.sample_format() {
        SampleFormat::F32 => play_tone::<f32>(&device, &supported.config(), freq, duration),
        SampleFormat::I16 => play_tone::<i16>(&device, &supported.config(), freq, duration),
        SampleFormat::U16 => play_tone::<u16>(&device, &supported.config(), freq, duration),
        other => Err(anyhow!("unsupported output sample format {other:?}")),
    }
}

fn play_tone<T>(device: &Device, config: &StreamConfig, freq: f32, duration: Duration) -> Result<()>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;
    let mut tick = 0f32;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            for frame in data.chunks_mut(channels) {
                tick += 1.0;
                let value = (tick * freq * 2.0 * PI / sample_rate).sin() * PULSE_AMPLITUDE;
                let sample = T::from_sample(value);
                for out in frame.iter_mut() {
                    *out = sample;
                }
            }
        },
        |err| debug!("Audio stream error: {err}"),
        None,
    )?;

    stream.play()?;
    std::thread::sleep(duration);
    Ok(())
}
