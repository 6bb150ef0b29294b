// Integration tests for the streaming engine: end-to-end processing,
// chunk-boundary parameter atomicity, visualization retention, cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ripplefx::chunk::AudioChunk;
use ripplefx::io::{ChunkSource, MemorySink, MemorySource, PlaybackSink};
use ripplefx::{
    EngineConfig, Param, ParamStore, StopReason, StreamEngine, VisualizationBuffer,
};

fn engine_with(
    chunk_frames: usize,
    initial_peak: f32,
    window: usize,
) -> (StreamEngine, Arc<ParamStore>, Arc<VisualizationBuffer>) {
    let params = Arc::new(ParamStore::default());
    let viz = Arc::new(VisualizationBuffer::new(window));
    let engine = StreamEngine::new(
        EngineConfig {
            chunk_frames,
            initial_peak,
            ..EngineConfig::default()
        },
        params.clone(),
        viz.clone(),
    );
    (engine, params, viz)
}

fn bypass_all(params: &ParamStore) {
    params.set(Param::Volume, 1.0);
    params.set(Param::Fade, 0.5);
    params.set(Param::DistortionAmount, 0.0);
    params.set(Param::DelaySeconds, 0.0);
    params.set(Param::ReverbSeconds, 0.0);
}

#[test]
fn test_end_to_end_bypassed_scenario() {
    // Three 4-sample chunks: silence, a full-scale square, silence.
    // With every effect bypassed the sink sees only the envelope's work.
    let (mut engine, params, viz) = engine_with(2, 1.0, 64);
    bypass_all(&params);

    let mut source = MemorySource::new(vec![
        0.0, 0.0, 0.0, 0.0, //
        1.0, -1.0, 1.0, -1.0, //
        0.0, 0.0, 0.0, 0.0,
    ]);
    let mut sink = MemorySink::new();

    let reason = engine.run(&mut source, &mut sink).unwrap();
    assert_eq!(reason, StopReason::EndOfStream);

    // Chunk 1: silent, peak estimate decays from 1.0 to 0.95, output stays 0.
    // Chunk 2: peak 1.0 > 0.95 snaps the estimate to 1.0, so the square
    // normalizes to exactly ±1, times volume 1.
    // Chunk 3: silent again.
    assert_eq!(
        sink.samples(),
        &[0, 0, 0, 0, 1, -1, 1, -1, 0, 0, 0, 0]
    );

    // The visualization buffer mirrors the processed f32 samples
    let window = viz.window(12);
    assert_eq!(
        window,
        vec![0.0, 0.0, 0.0, 0.0, 1.0, -1.0, 1.0, -1.0, 0.0, 0.0, 0.0, 0.0]
    );
}

#[test]
fn test_fade_scales_channels_at_sink() {
    let (mut engine, params, _viz) = engine_with(2, 1.0, 64);
    bypass_all(&params);
    params.set(Param::Volume, 100.0);
    params.set(Param::Fade, 1.0); // full right

    let mut source = MemorySource::new(vec![1.0, 1.0, 1.0, 1.0]);
    let mut sink = MemorySink::new();
    engine.run(&mut source, &mut sink).unwrap();

    // Left channel zeroed, right passes at volume scale (peak snaps to 1.0)
    assert_eq!(sink.samples(), &[0, 100, 0, 100]);
}

#[test]
fn test_visualization_retention_through_engine() {
    let window = 32;
    let (mut engine, params, viz) = engine_with(4, 1.0, window);
    bypass_all(&params);

    // 100 chunks of 8 samples
    let mut source = MemorySource::new(vec![0.5; 800]);
    let mut sink = MemorySink::new();
    engine.run(&mut source, &mut sink).unwrap();

    assert!(viz.len() <= window * 2, "viz grew to {}", viz.len());
    assert_eq!(viz.window(window).len(), window);
    assert_eq!(sink.samples().len(), 800);
}

/// Source that never runs dry; used to exercise cancellation.
struct EndlessSource;

impl ChunkSource for EndlessSource {
    fn pull(&mut self, samples: usize) -> anyhow::Result<Option<AudioChunk>> {
        Ok(Some(AudioChunk::from_samples(vec![0.25; samples])))
    }
}

#[test]
fn test_cancellation_stops_endless_stream() {
    let (mut engine, params, _viz) = engine_with(64, 1.0, 256);
    bypass_all(&params);
    let token = engine.cancel_token();

    let handle = thread::spawn(move || {
        let mut sink = MemorySink::new();
        engine.run(&mut EndlessSource, &mut sink)
    });

    thread::sleep(Duration::from_millis(20));
    token.cancel();

    let reason = handle.join().unwrap().unwrap();
    assert_eq!(reason, StopReason::Cancelled);
}

/// Sink asserting that, within each pushed chunk, every left sample is equal
/// and every right sample is equal — i.e. the fade applied to a chunk never
/// changed mid-chunk even while writers hammered the store.
struct UniformityCheckingSink {
    chunks_seen: usize,
}

impl PlaybackSink for UniformityCheckingSink {
    fn push(&mut self, samples: &[i16]) -> anyhow::Result<()> {
        let left = samples[0];
        let right = samples[1];
        for pair in samples.chunks_exact(2) {
            anyhow::ensure!(
                pair[0] == left && pair[1] == right,
                "parameter change observed mid-chunk: ({}, {}) vs ({}, {})",
                pair[0],
                pair[1],
                left,
                right
            );
        }
        self.chunks_seen += 1;
        Ok(())
    }
}

#[test]
fn test_parameter_changes_land_on_chunk_boundaries() {
    let (mut engine, params, _viz) = engine_with(128, 1000.0, 1024);
    bypass_all(&params);
    params.set(Param::Volume, 1000.0);

    let stop_writers = Arc::new(AtomicBool::new(false));
    let mut writers = Vec::new();
    for seed in 0..3u32 {
        let params = params.clone();
        let stop = stop_writers.clone();
        writers.push(thread::spawn(move || {
            // Deliberately includes out-of-range values; the store clamps
            let values = [0.0, 0.25, 5.0, 1.0, -2.0, 0.75];
            let mut i = seed as usize;
            while !stop.load(Ordering::Relaxed) {
                params.set(Param::Fade, values[i % values.len()]);
                params.set(Param::Volume, values[i % values.len()] * 800.0);
                i += 1;
            }
        }));
    }

    // A constant source: any intra-chunk variation at the sink can only come
    // from a torn parameter read
    let mut source = MemorySource::new(vec![1000.0; 128 * 2 * 400]);
    let mut sink = UniformityCheckingSink { chunks_seen: 0 };
    let result = engine.run(&mut source, &mut sink);

    stop_writers.store(true, Ordering::Relaxed);
    for writer in writers {
        writer.join().unwrap();
    }

    result.unwrap();
    assert_eq!(sink.chunks_seen, 400);
}

#[test]
fn test_concurrent_writes_never_escape_bounds() {
    let params = Arc::new(ParamStore::default());
    let stop = Arc::new(AtomicBool::new(false));

    let mut writers = Vec::new();
    for seed in 0..4u32 {
        let params = params.clone();
        let stop = stop.clone();
        writers.push(thread::spawn(move || {
            let mut value = seed as f32 * 17.3 - 40.0;
            while !stop.load(Ordering::Relaxed) {
                for param in Param::ALL {
                    params.set(param, value);
                    value = (value * 1.7 + 13.1) % 100.0 - 50.0;
                }
            }
        }));
    }

    for _ in 0..2000 {
        let snap = params.snapshot();
        for param in Param::ALL {
            let (min, max) = params.bounds(param);
            let value = snap.get(param);
            assert!(
                value >= min && value <= max,
                "{} escaped bounds: {} not in [{}, {}]",
                param.name(),
                value,
                min,
                max
            );
        }
    }

    stop.store(true, Ordering::Relaxed);
    for writer in writers {
        writer.join().unwrap();
    }
}
