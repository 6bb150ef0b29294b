//! Live playback sink over the default output device.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SizedSample, Stream, StreamConfig};

use crate::io::PlaybackSink;

/// [`PlaybackSink`] backed by a cpal output stream.
///
/// The device callback drains an internal sample queue; [`PlaybackSink::push`]
/// refills it, blocking briefly when about a second of audio is already
/// queued so the engine loop paces itself to the device — the push side of
/// the real-time budget the engine assumes.
pub struct CpalSink {
    // Held to keep the output stream alive for the sink's lifetime
    _stream: Stream,
    queue: Arc<Mutex<VecDeque<i16>>>,
    capacity: usize,
}

impl CpalSink {
    /// Open the default output device at the engine's negotiated format.
    pub fn open(sample_rate: u32, channels: u16) -> Result<Self, anyhow::Error> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("default output device is not available"))?;
        log::info!("output device: {}", device.name()?);

        let config = StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        let queue: Arc<Mutex<VecDeque<i16>>> = Arc::new(Mutex::new(VecDeque::new()));

        let supported_config = device.default_output_config()?;
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::I8 => Self::make_stream::<i8>(&device, &config, queue.clone())?,
            cpal::SampleFormat::I16 => Self::make_stream::<i16>(&device, &config, queue.clone())?,
            cpal::SampleFormat::I32 => Self::make_stream::<i32>(&device, &config, queue.clone())?,
            cpal::SampleFormat::I64 => Self::make_stream::<i64>(&device, &config, queue.clone())?,
            cpal::SampleFormat::U8 => Self::make_stream::<u8>(&device, &config, queue.clone())?,
            cpal::SampleFormat::U16 => Self::make_stream::<u16>(&device, &config, queue.clone())?,
            cpal::SampleFormat::U32 => Self::make_stream::<u32>(&device, &config, queue.clone())?,
            cpal::SampleFormat::U64 => Self::make_stream::<u64>(&device, &config, queue.clone())?,
            cpal::SampleFormat::F32 => Self::make_stream::<f32>(&device, &config, queue.clone())?,
            cpal::SampleFormat::F64 => Self::make_stream::<f64>(&device, &config, queue.clone())?,
            sample_format => {
                return Err(anyhow::anyhow!("unsupported sample format '{sample_format}'"))
            }
        };
        stream.play()?;

        Ok(Self {
            _stream: stream,
            queue,
            capacity: sample_rate as usize * channels as usize,
        })
    }

    /// Create a typed stream for the given sample format.
    fn make_stream<T>(
        device: &Device,
        config: &StreamConfig,
        queue: Arc<Mutex<VecDeque<i16>>>,
    ) -> Result<Stream, anyhow::Error>
    where
        T: SizedSample + FromSample<i16>,
    {
        let err_fn = |err| log::error!("output stream error: {err}");

        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                let mut queue = queue.lock().unwrap();
                for sample in output.iter_mut() {
                    // Underrun fills with silence; the engine catches up on
                    // its next push
                    *sample = T::from_sample(queue.pop_front().unwrap_or(0));
                }
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }

    /// Samples queued and not yet played.
    pub fn queued_samples(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

impl PlaybackSink for CpalSink {
    fn push(&mut self, samples: &[i16]) -> anyhow::Result<()> {
        loop {
            {
                let mut queue = self.queue.lock().unwrap();
                if queue.len() <= self.capacity {
                    queue.extend(samples.iter().copied());
                    return Ok(());
                }
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
