//! Stream classification and type-relative indexing.

use crate::probe::{StreamInfo, StreamKind};

/// Per-kind counters for one mapping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamTypeCounters([usize; 5]);

impl StreamTypeCounters {
    /// Current ordinal for `kind` (number of streams of that kind seen so far).
    pub fn get(&self, kind: StreamKind) -> usize {
        self.0[kind.slot()]
    }

    /// Return the current ordinal for `kind` and advance it.
    pub fn next(&mut self, kind: StreamKind) -> usize {
        let slot = &mut self.0[kind.slot()];
        let index = *slot;
        *slot += 1;
        index
    }
}

/// A stream together with its kind and type-relative index.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedStream<'a> {
    pub kind: StreamKind,
    /// Zero-based position among streams of the same kind.
    pub index: usize,
    pub stream: &'a StreamInfo,
}

/// Iterator over the recognized streams of a probe result, in source order.
///
/// Streams with a missing or unknown `codec_type` are skipped without
/// touching any counter.
pub struct Classifier<'a> {
    streams: std::slice::Iter<'a, StreamInfo>,
    counters: StreamTypeCounters,
}

impl<'a> Classifier<'a> {
    pub fn new(streams: &'a [StreamInfo]) -> Self {
        Self {
            streams: streams.iter(),
            counters: StreamTypeCounters::default(),
        }
    }

    /// Counters after the streams consumed so far.
    pub fn counters(&self) -> StreamTypeCounters {
        self.counters
    }
}

impl<'a> Iterator for Classifier<'a> {
    type Item = ClassifiedStream<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for stream in self.streams.by_ref() {
            if let Some(kind) = stream.kind() {
                let index = self.counters.next(kind);
                return Some(ClassifiedStream {
                    kind,
                    index,
                    stream,
                });
            }
        }
        None
    }
}

/// Classify every recognized stream.
pub fn classify(streams: &[StreamInfo]) -> Classifier<'_> {
    Classifier::new(streams)
}
