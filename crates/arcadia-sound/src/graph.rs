//! The stream graph: creation, wiring, lazy generation and frame maintenance.
//!
//! [`StreamGraph`] owns every stream of one emulated machine. Generation is
//! pull-based: asking a stream for samples first tops up each of its inputs,
//! which recursively asks upstream streams for exactly the source samples the
//! resampler will read. A stream that is already caught up does no work.
//!
//! # Frame boundary
//!
//! [`frame_update()`](StreamGraph::frame_update) must be called once per
//! emulated video frame. It completes the frame for every stream, compacts
//! buffers, moves each shared output's read cursor to its slowest reader, and
//! commits pending sample rate changes. Rate changes never take effect
//! mid-frame.
//!
//! # Example
//!
//! ```rust
//! use arcadia_sound::{Mixer, StreamGraph, Tone};
//!
//! let mut graph = StreamGraph::new(60.0)?;
//! graph.set_tag("psg");
//! let tone = graph.create(0, 1, 44100, Tone::new(440.0, 4000, 44100));
//! graph.set_tag("speaker");
//! let mix = graph.create(1, 1, 22050, Mixer);
//! graph.set_input(mix, 0, Some(tone), 0, 0.5)?;
//!
//! let samples = graph.consume_output(mix, 0, 64)?;
//! assert_eq!(samples.len(), 64);
//! # Ok::<(), arcadia_sound::StreamError>(())
//! ```

use std::collections::HashMap;

use crate::clock::{FrameClock, ManualClock};
use crate::error::StreamError;
use crate::fixed::{self, FRAC_BITS, FRAC_MASK};
use crate::producer::SampleProducer;
use crate::resample::{required_source_end, resample};
use crate::ring::COMPACT_TAIL;
use crate::stream::{
    Input, InputRef, InputState, Output, OutputRef, OutputState, Stream, StreamId,
};

/// Refresh rate used by [`StreamGraph::default()`].
pub const DEFAULT_REFRESH_RATE: f64 = 60.0;

/// Frames of audio each buffer is sized for up front.
const BUFFER_FRAMES: usize = 4;

/// Frames an output without dependents keeps for `consume_output` callers.
const UNREAD_FRAMES: u64 = 2;

type Result<T> = core::result::Result<T, StreamError>;

/// All sound streams of one running machine.
pub struct StreamGraph {
    streams: Vec<Stream>,
    lookup: HashMap<(String, u32), StreamId>,
    current_tag: String,
    refresh_rate: f64,
    pending_refresh_rate: f64,
    clock: Box<dyn FrameClock>,
}

impl Default for StreamGraph {
    fn default() -> Self {
        Self::with_clock_unchecked(DEFAULT_REFRESH_RATE, Box::new(ManualClock::new()))
    }
}

impl StreamGraph {
    /// Creates an empty graph driven by a [`ManualClock`] that stays at the
    /// start of the frame until replaced with [`set_clock()`](Self::set_clock).
    pub fn new(refresh_rate: f64) -> Result<Self> {
        Self::with_clock(refresh_rate, ManualClock::new())
    }

    /// Creates an empty graph driven by `clock`.
    pub fn with_clock(refresh_rate: f64, clock: impl FrameClock + 'static) -> Result<Self> {
        check_refresh_rate(refresh_rate)?;
        Ok(Self::with_clock_unchecked(refresh_rate, Box::new(clock)))
    }

    fn with_clock_unchecked(refresh_rate: f64, clock: Box<dyn FrameClock>) -> Self {
        Self {
            streams: Vec::new(),
            lookup: HashMap::new(),
            current_tag: String::new(),
            refresh_rate,
            pending_refresh_rate: refresh_rate,
            clock,
        }
    }

    /// Replaces the frame clock.
    pub fn set_clock(&mut self, clock: impl FrameClock + 'static) {
        self.clock = Box::new(clock);
    }

    // --- Registration ---

    /// Sets the owner tag for streams created after this call.
    ///
    /// Each stream gets the next free index under its tag, so a device that
    /// creates three streams can find them again as `(tag, 0..3)`.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.current_tag = tag.into();
    }

    /// Creates a stream with fixed input and output counts.
    ///
    /// Inputs start unconnected (reading silence) at unity gain.
    pub fn create(
        &mut self,
        inputs: usize,
        outputs: usize,
        sample_rate: u32,
        producer: impl SampleProducer + 'static,
    ) -> StreamId {
        self.create_boxed(inputs, outputs, sample_rate, Box::new(producer))
    }

    /// [`create()`](Self::create) for a producer chosen at run time.
    pub fn create_boxed(
        &mut self,
        inputs: usize,
        outputs: usize,
        sample_rate: u32,
        producer: Box<dyn SampleProducer>,
    ) -> StreamId {
        let id = StreamId(self.streams.len() as u32);
        let index = self
            .streams
            .iter()
            .filter(|s| s.tag == self.current_tag)
            .count() as u32;
        let capacity = self.frame_capacity(sample_rate);

        self.streams.push(Stream {
            tag: self.current_tag.clone(),
            index,
            sample_rate,
            pending_sample_rate: sample_rate,
            samples_per_frame_frac: fixed::samples_per_frame_frac(sample_rate, self.refresh_rate),
            frame_carry: 0,
            generated_this_frame: 0,
            inputs: (0..inputs).map(|_| Input::new(capacity)).collect(),
            outputs: (0..outputs).map(|_| Output::new(capacity)).collect(),
            producer,
        });
        self.lookup.insert((self.current_tag.clone(), index), id);

        tracing::debug!(
            "stream_create: {id} tag={:?} index={index} inputs={inputs} outputs={outputs} rate={sample_rate}",
            self.current_tag
        );
        id
    }

    /// Looks up a stream by owner tag and per-tag index.
    pub fn find(&self, tag: &str, index: u32) -> Option<StreamId> {
        self.lookup.get(&(tag.to_owned(), index)).copied()
    }

    // --- Inspection ---

    /// Number of streams created so far.
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Handles of every stream, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = StreamId> + '_ {
        (0..self.streams.len() as u32).map(StreamId)
    }

    /// Owner tag and per-tag index of a stream.
    pub fn tag(&self, id: StreamId) -> Result<(&str, u32)> {
        let stream = self.stream(id)?;
        Ok((stream.tag.as_str(), stream.index))
    }

    /// Current sample rate (pending changes are not reflected until the next
    /// frame boundary).
    pub fn sample_rate(&self, id: StreamId) -> Result<u32> {
        Ok(self.stream(id)?.sample_rate)
    }

    /// Number of inputs fixed at creation.
    pub fn input_count(&self, id: StreamId) -> Result<usize> {
        Ok(self.stream(id)?.inputs.len())
    }

    /// Number of outputs fixed at creation.
    pub fn output_count(&self, id: StreamId) -> Result<usize> {
        Ok(self.stream(id)?.outputs.len())
    }

    /// Snapshot of an input's source, cursors, step and gain.
    pub fn input_state(&self, id: StreamId, input: usize) -> Result<InputState> {
        let slot = self.check_input(id, input)?;
        Ok(InputState::of(&self.streams[slot].inputs[input]))
    }

    /// Snapshot of an output's cursors, dependents and gain.
    pub fn output_state(&self, id: StreamId, output: usize) -> Result<OutputState> {
        let slot = self.check_output(id, output)?;
        Ok(OutputState::of(&self.streams[slot].outputs[output]))
    }

    /// Inputs currently reading from an output.
    pub fn dependents(&self, id: StreamId, output: usize) -> Result<&[InputRef]> {
        let slot = self.check_output(id, output)?;
        Ok(&self.streams[slot].outputs[output].dependents)
    }

    /// Presentation refresh rate in Hz.
    pub fn refresh_rate(&self) -> f64 {
        self.refresh_rate
    }

    // --- Wiring and gains ---

    /// Connects an input to an upstream output, or disconnects it with `None`.
    ///
    /// The input's step rate is recomputed from the two sample rates, its
    /// resample buffer is emptied, and it starts reading at the upstream
    /// output's current write position. `gain` is a linear multiplier.
    pub fn set_input(
        &mut self,
        id: StreamId,
        input: usize,
        source: Option<StreamId>,
        source_output: usize,
        gain: f32,
    ) -> Result<()> {
        let slot = self.check_input(id, input)?;
        let target = source
            .map(|src| -> Result<OutputRef> {
                self.check_output(src, source_output)?;
                if self.depends_on(src, id) {
                    return Err(StreamError::CycleDetected {
                        stream: id,
                        upstream: src,
                    });
                }
                Ok(OutputRef {
                    stream: src,
                    output: source_output,
                })
            })
            .transpose()?;

        let me = InputRef { stream: id, input };
        if let Some(old) = self.streams[slot].inputs[input].source.take() {
            self.streams[old.stream.slot()].outputs[old.output]
                .dependents
                .retain(|dep| *dep != me);
        }

        let rate = self.streams[slot].sample_rate;
        let (step, start) = match target {
            Some(src) => {
                let upstream = &mut self.streams[src.stream.slot()];
                let output = &mut upstream.outputs[src.output];
                output.dependents.push(me);
                (
                    fixed::step_rate(upstream.sample_rate, rate),
                    fixed::to_frac(output.buffer.write_pos()),
                )
            }
            None => (fixed::FRAC_ONE, 0),
        };

        let entry = &mut self.streams[slot].inputs[input];
        entry.source = target;
        entry.step = step;
        entry.source_frac = start;
        entry.gain = fixed::gain_from_f32(gain);
        entry.resample.clear();

        match target {
            Some(src) => tracing::debug!(
                "stream_connect: {}[{}] → {id}[{input}] step={step:#x} gain={:#x}",
                src.stream,
                src.output,
                entry.gain
            ),
            None => tracing::debug!("stream_disconnect: {id}[{input}]"),
        }
        Ok(())
    }

    /// Sets the linear gain of an input.
    pub fn set_input_gain(&mut self, id: StreamId, input: usize, gain: f32) -> Result<()> {
        let slot = self.check_input(id, input)?;
        self.streams[slot].inputs[input].gain = fixed::gain_from_f32(gain);
        Ok(())
    }

    /// Sets the linear gain of an output, applied by every reader.
    pub fn set_output_gain(&mut self, id: StreamId, output: usize, gain: f32) -> Result<()> {
        let slot = self.check_output(id, output)?;
        self.streams[slot].outputs[output].gain = fixed::gain_from_f32(gain);
        Ok(())
    }

    /// Requests a new sample rate, applied at the next frame boundary.
    pub fn set_sample_rate(&mut self, id: StreamId, sample_rate: u32) -> Result<()> {
        let slot = self.slot(id)?;
        self.streams[slot].pending_sample_rate = sample_rate;
        Ok(())
    }

    /// Requests a new presentation refresh rate, applied at the next frame
    /// boundary.
    pub fn set_refresh_rate(&mut self, refresh_rate: f64) -> Result<()> {
        check_refresh_rate(refresh_rate)?;
        self.pending_refresh_rate = refresh_rate;
        Ok(())
    }

    // --- Generation ---

    /// Brings a stream up to the current position within the frame.
    pub fn update(&mut self, id: StreamId) -> Result<()> {
        let slot = self.slot(id)?;
        let fraction = self.clock.frame_fraction();
        self.catch_up(slot, fraction);
        Ok(())
    }

    /// Brings every stream up to the current position, in creation order.
    pub fn update_all(&mut self) {
        let fraction = self.clock.frame_fraction();
        for slot in 0..self.streams.len() {
            self.catch_up(slot, fraction);
        }
    }

    /// Generates `count` more samples on every output of a stream.
    ///
    /// Zero and negative counts do nothing.
    pub fn generate_samples(&mut self, id: StreamId, count: i64) -> Result<()> {
        let slot = self.slot(id)?;
        self.generate(slot, count);
        Ok(())
    }

    /// Returns the next `count` unread samples of an output and advances its
    /// read cursor past them, generating first if the output is behind.
    ///
    /// Samples are returned before output gain; readers apply the gain. The
    /// slice is shorter than `count` only when generation was clamped.
    ///
    /// An output with no dependents keeps only its two most recent frames
    /// across [`frame_update()`](Self::frame_update); older unread samples
    /// are dropped.
    pub fn consume_output(&mut self, id: StreamId, output: usize, count: usize) -> Result<&[i32]> {
        let slot = self.check_output(id, output)?;
        let (start, have) = {
            let buffer = &self.streams[slot].outputs[output].buffer;
            (buffer.read_pos(), buffer.write_pos())
        };
        if start + count > have {
            self.generate(slot, (start + count - have) as i64);
        }

        let buffer = &mut self.streams[slot].outputs[output].buffer;
        let end = (start + count).min(buffer.write_pos());
        buffer.set_read_pos(end);
        Ok(&buffer.written()[start..end])
    }

    /// Frame-boundary maintenance; call exactly once per emulated frame.
    pub fn frame_update(&mut self) {
        for slot in 0..self.streams.len() {
            self.catch_up(slot, 1.0);
        }

        for stream in &mut self.streams {
            let total = stream.frame_carry + stream.samples_per_frame_frac;
            stream.frame_carry = total & u64::from(FRAC_MASK);
            stream.generated_this_frame = stream
                .generated_this_frame
                .saturating_sub(total >> FRAC_BITS);
        }

        for slot in 0..self.streams.len() {
            self.compact(slot);
        }

        self.commit_rates();
    }

    fn catch_up(&mut self, slot: usize, fraction: f64) {
        let stream = &self.streams[slot];
        let target = stream.frame_target(fraction);
        let count = target as i64 - stream.generated_this_frame as i64;
        self.generate(slot, count);
    }

    fn generate(&mut self, slot: usize, count: i64) {
        if count <= 0 {
            return;
        }
        let rate = self.streams[slot].sample_rate;
        let mut count = count as usize;
        // Inherited behaviour: a single request is capped at one second of
        // audio. Hitting this means an upstream timing bug.
        if count > rate as usize {
            tracing::warn!(
                "stream_generate: {} asked for {count} samples, clamped to {rate}",
                StreamId(slot as u32)
            );
            count = rate as usize;
        }
        if count == 0 {
            return;
        }

        for input in 0..self.streams[slot].inputs.len() {
            self.fill_input(slot, input, count);
        }

        let stream = &mut self.streams[slot];
        {
            let Stream {
                inputs,
                outputs,
                producer,
                ..
            } = &mut *stream;
            let input_views: Vec<&[i32]> =
                inputs.iter().map(|input| input.resample.peek(count)).collect();
            let mut output_views: Vec<&mut [i32]> = outputs
                .iter_mut()
                .map(|output| output.buffer.write_slot(count))
                .collect();
            producer.generate(&input_views, &mut output_views, count);
        }
        for input in &mut stream.inputs {
            input.resample.advance_read(count);
        }
        for output in &mut stream.outputs {
            output.buffer.commit(count);
        }
        stream.generated_this_frame += count as u64;

        tracing::trace!("stream_generate: {} +{count}", StreamId(slot as u32));
    }

    /// Tops up an input's resample buffer to at least `count` unread samples.
    fn fill_input(&mut self, slot: usize, input: usize, count: usize) {
        let entry = &self.streams[slot].inputs[input];
        let available = entry.resample.available();
        if available >= count {
            return;
        }
        let needed = count - available;

        let Some(source) = entry.source else {
            let ring = &mut self.streams[slot].inputs[input].resample;
            ring.write_slot(needed);
            ring.commit(needed);
            return;
        };

        let end = required_source_end(entry.source_frac, entry.step, needed);
        let upstream = source.stream.slot();
        let have = self.streams[upstream].outputs[source.output].buffer.write_pos();
        if end > have {
            self.generate(upstream, (end - have) as i64);
        }

        let (consumer, producer) = pair_mut(&mut self.streams, slot, upstream);
        let output = &producer.outputs[source.output];
        let entry = &mut consumer.inputs[input];
        let gain = fixed::combine_gains(entry.gain, output.gain);
        let dest = entry.resample.write_slot(needed);
        resample(
            output.buffer.written(),
            &mut entry.source_frac,
            entry.step,
            gain,
            dest,
        );
        entry.resample.commit(needed);
    }

    // --- Frame maintenance ---

    fn compact(&mut self, slot: usize) {
        for input in &mut self.streams[slot].inputs {
            input.resample.compact(COMPACT_TAIL);
        }

        for output in 0..self.streams[slot].outputs.len() {
            let dependents = self.streams[slot].outputs[output].dependents.clone();
            if let Some(slowest) = dependents
                .iter()
                .map(|dep| fixed::whole(self.streams[dep.stream.slot()].inputs[dep.input].source_frac))
                .min()
            {
                self.streams[slot].outputs[output]
                    .buffer
                    .set_read_pos(slowest);
            } else {
                // Nobody reads this output through the graph: keep the most
                // recent frames for `consume_output` callers, drop the rest.
                let keep =
                    fixed::whole(self.streams[slot].samples_per_frame_frac * UNREAD_FRAMES) + 1;
                let buffer = &mut self.streams[slot].outputs[output].buffer;
                let floor = buffer.write_pos().saturating_sub(keep);
                if buffer.read_pos() < floor {
                    buffer.set_read_pos(floor);
                }
            }

            let discarded = self.streams[slot].outputs[output]
                .buffer
                .compact(COMPACT_TAIL);
            if discarded > 0 {
                let shift = fixed::to_frac(discarded);
                for dep in &dependents {
                    let reader = &mut self.streams[dep.stream.slot()].inputs[dep.input];
                    reader.source_frac = reader.source_frac.saturating_sub(shift);
                }
                tracing::trace!(
                    "stream_compact: {}[{output}] discarded {discarded}",
                    StreamId(slot as u32)
                );
            }
        }
    }

    fn commit_rates(&mut self) {
        let refresh_changed = self.pending_refresh_rate != self.refresh_rate;
        if refresh_changed {
            tracing::debug!(
                "stream_refresh: {} Hz → {} Hz",
                self.refresh_rate,
                self.pending_refresh_rate
            );
            self.refresh_rate = self.pending_refresh_rate;
        }

        let mut any_rate_changed = false;
        for (slot, stream) in self.streams.iter_mut().enumerate() {
            let rate_changed = stream.pending_sample_rate != stream.sample_rate;
            if !rate_changed && !refresh_changed {
                continue;
            }
            if rate_changed {
                tracing::debug!(
                    "stream_rate: {} {} Hz → {} Hz",
                    StreamId(slot as u32),
                    stream.sample_rate,
                    stream.pending_sample_rate
                );
                stream.sample_rate = stream.pending_sample_rate;
                stream.producer.sample_rate_changed(stream.sample_rate);
                any_rate_changed = true;
            }
            stream.samples_per_frame_frac =
                fixed::samples_per_frame_frac(stream.sample_rate, self.refresh_rate);
            stream.frame_carry = 0;
            stream.generated_this_frame = 0;
        }

        if any_rate_changed {
            self.recompute_steps();
        }
    }

    fn recompute_steps(&mut self) {
        let rates: Vec<u32> = self.streams.iter().map(|s| s.sample_rate).collect();
        for (slot, stream) in self.streams.iter_mut().enumerate() {
            for input in &mut stream.inputs {
                if let Some(source) = input.source {
                    input.step = fixed::step_rate(rates[source.stream.slot()], rates[slot]);
                }
            }
        }
    }

    // --- Validation helpers ---

    fn slot(&self, id: StreamId) -> Result<usize> {
        if id.slot() < self.streams.len() {
            Ok(id.slot())
        } else {
            Err(StreamError::UnknownStream(id))
        }
    }

    fn stream(&self, id: StreamId) -> Result<&Stream> {
        Ok(&self.streams[self.slot(id)?])
    }

    fn check_input(&self, id: StreamId, input: usize) -> Result<usize> {
        let slot = self.slot(id)?;
        let count = self.streams[slot].inputs.len();
        if input >= count {
            return Err(StreamError::InputOutOfRange {
                stream: id,
                index: input,
                count,
            });
        }
        Ok(slot)
    }

    fn check_output(&self, id: StreamId, output: usize) -> Result<usize> {
        let slot = self.slot(id)?;
        let count = self.streams[slot].outputs.len();
        if output >= count {
            return Err(StreamError::OutputOutOfRange {
                stream: id,
                index: output,
                count,
            });
        }
        Ok(slot)
    }

    /// Whether `from` is `target` or transitively reads from it.
    fn depends_on(&self, from: StreamId, target: StreamId) -> bool {
        let mut visited = vec![false; self.streams.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if std::mem::replace(&mut visited[id.slot()], true) {
                continue;
            }
            stack.extend(
                self.streams[id.slot()]
                    .inputs
                    .iter()
                    .filter_map(|input| input.source.map(|src| src.stream)),
            );
        }
        false
    }

    fn frame_capacity(&self, sample_rate: u32) -> usize {
        (f64::from(sample_rate) / self.refresh_rate) as usize * BUFFER_FRAMES
    }
}

fn check_refresh_rate(refresh_rate: f64) -> Result<()> {
    if refresh_rate.is_finite() && refresh_rate > 0.0 {
        Ok(())
    } else {
        Err(StreamError::FrameRate(refresh_rate))
    }
}

/// Borrows two distinct streams mutably.
fn pair_mut(streams: &mut [Stream], a: usize, b: usize) -> (&mut Stream, &mut Stream) {
    assert_ne!(a, b, "a stream cannot read its own output");
    if a < b {
        let (low, high) = streams.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = streams.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}
