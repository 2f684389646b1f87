//! Linear sample buffer with read/write cursors and tail-preserving compaction.
//!
//! A [`SampleRing`] stores samples at absolute indices `0..write_pos()`. Readers
//! track their own position (`read_pos()` for the primary reader, fixed-point
//! source positions for resampling inputs). Instead of wrapping indices on
//! every access, the buffer is compacted at frame boundaries: once more than
//! half the capacity has been written, everything older than the read cursor
//! minus a small tail is discarded and both cursors shift down together.

/// Samples kept behind the read cursor when compacting.
///
/// Interpolating readers may look one sample back from their position; the
/// tail keeps that history valid across a compaction.
pub const COMPACT_TAIL: usize = 16;

/// Smallest allocation for a new buffer.
pub const MIN_CAPACITY: usize = 256;

/// Growable sample store with a write cursor and a primary read cursor.
#[derive(Debug, Clone)]
pub struct SampleRing {
    samples: Vec<i32>,
    write_pos: usize,
    read_pos: usize,
}

impl SampleRing {
    /// Creates an empty buffer with room for at least `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0; capacity.max(MIN_CAPACITY)],
            write_pos: 0,
            read_pos: 0,
        }
    }

    /// Current allocation in samples.
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Index one past the last written sample.
    #[inline]
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Index of the next sample the primary reader will see.
    #[inline]
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// Samples written but not yet read by the primary reader.
    #[inline]
    pub fn available(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Every sample currently held, from index 0 to the write cursor.
    #[inline]
    pub fn written(&self) -> &[i32] {
        &self.samples[..self.write_pos]
    }

    /// Returns `len` samples starting at `start`, or `None` if any of them has
    /// not been written yet.
    pub fn get(&self, start: usize, len: usize) -> Option<&[i32]> {
        let end = start.checked_add(len)?;
        if end > self.write_pos {
            return None;
        }
        Some(&self.samples[start..end])
    }

    /// Returns the next `len` unread samples without advancing the reader.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `len` samples are available.
    pub fn peek(&self, len: usize) -> &[i32] {
        assert!(
            len <= self.available(),
            "peek of {len} samples with only {} available",
            self.available()
        );
        &self.samples[self.read_pos..self.read_pos + len]
    }

    /// Returns a writable slot of `len` samples just past the write cursor.
    ///
    /// The slot is zeroed. Nothing becomes visible to readers until
    /// [`commit()`](Self::commit) is called.
    pub fn write_slot(&mut self, len: usize) -> &mut [i32] {
        self.reserve(len);
        let slot = &mut self.samples[self.write_pos..self.write_pos + len];
        slot.fill(0);
        slot
    }

    /// Publishes `len` samples previously filled through
    /// [`write_slot()`](Self::write_slot).
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the allocated space.
    pub fn commit(&mut self, len: usize) {
        assert!(
            self.write_pos + len <= self.samples.len(),
            "commit past the end of the sample buffer"
        );
        self.write_pos += len;
    }

    /// Appends samples to the buffer.
    pub fn push_slice(&mut self, data: &[i32]) {
        self.write_slot(data.len()).copy_from_slice(data);
        self.commit(data.len());
    }

    /// Advances the primary reader by up to `len` samples.
    pub fn advance_read(&mut self, len: usize) {
        self.read_pos = (self.read_pos + len).min(self.write_pos);
    }

    /// Moves the primary reader to `pos`, clamped to the write cursor.
    pub fn set_read_pos(&mut self, pos: usize) {
        self.read_pos = pos.min(self.write_pos);
    }

    /// Drops all samples and resets both cursors to zero.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.read_pos = 0;
    }

    /// Whether the buffer has crossed the compaction threshold.
    #[inline]
    pub fn over_half_full(&self) -> bool {
        self.write_pos > self.samples.len() / 2
    }

    /// Discards samples older than `read_pos() - tail` when more than half the
    /// capacity is in use.
    ///
    /// Returns the number of samples discarded; both cursors have moved down by
    /// that amount. Unread samples are never discarded.
    pub fn compact(&mut self, tail: usize) -> usize {
        if !self.over_half_full() {
            return 0;
        }
        let discard = self.read_pos.saturating_sub(tail);
        if discard == 0 {
            return 0;
        }
        self.samples.copy_within(discard..self.write_pos, 0);
        self.write_pos -= discard;
        self.read_pos -= discard;
        discard
    }

    fn reserve(&mut self, len: usize) {
        let needed = self.write_pos + len;
        if needed > self.samples.len() {
            let new_len = needed.next_power_of_two().max(self.samples.len() * 2);
            self.samples.resize(new_len, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let mut ring = SampleRing::new(8);
        ring.push_slice(&[1, 2, 3, 4]);
        assert_eq!(ring.available(), 4);
        assert_eq!(ring.peek(2), &[1, 2]);
        ring.advance_read(2);
        assert_eq!(ring.peek(2), &[3, 4]);
        assert_eq!(ring.get(1, 3), Some(&[2, 3, 4][..]));
        assert_eq!(ring.get(3, 2), None);
    }

    #[test]
    fn grows_on_demand() {
        let mut ring = SampleRing::new(0);
        let data: Vec<i32> = (0..1000).collect();
        ring.push_slice(&data);
        assert!(ring.capacity() >= 1000);
        assert_eq!(ring.written(), data.as_slice());
    }

    #[test]
    fn uncommitted_slot_is_invisible() {
        let mut ring = SampleRing::new(16);
        ring.write_slot(4).copy_from_slice(&[9, 9, 9, 9]);
        assert_eq!(ring.write_pos(), 0);
        ring.commit(4);
        assert_eq!(ring.written(), &[9, 9, 9, 9]);
    }

    #[test]
    fn compact_keeps_tail_and_unread() {
        let mut ring = SampleRing::new(MIN_CAPACITY);
        let data: Vec<i32> = (0..200).collect();
        ring.push_slice(&data);
        ring.advance_read(150);

        let discarded = ring.compact(COMPACT_TAIL);
        assert_eq!(discarded, 150 - COMPACT_TAIL);
        assert_eq!(ring.read_pos(), COMPACT_TAIL);
        assert_eq!(ring.available(), 50);
        assert_eq!(ring.peek(3), &[150, 151, 152]);
        assert_eq!(ring.written()[0], 150 - COMPACT_TAIL as i32);
    }

    #[test]
    fn compact_below_threshold_is_noop() {
        let mut ring = SampleRing::new(MIN_CAPACITY);
        ring.push_slice(&[0; 100]);
        ring.advance_read(100);
        assert_eq!(ring.compact(COMPACT_TAIL), 0);
        assert_eq!(ring.write_pos(), 100);
    }
}
