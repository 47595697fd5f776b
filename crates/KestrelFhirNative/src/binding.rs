//! Binding to the native parser plus pooled parse contexts.
//!
//! Parsing happens in two stages: a [`NativeParser`] turns wire bytes into
//! records inside a [`ParseContext`]'s arena, and the generated decoding
//! routines turn the root record into a domain [`Resource`]. Contexts are
//! expensive to grow and cheap to reuse, so the deserializer keeps a fixed
//! pool of them; when every context is busy, callers block until one is
//! returned.

use std::io::Read;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use kestrel_fhir_lib::r4::Resource;
use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::arena::{NativeArena, NativeRef};
use crate::error::{DecodeError, ParseError};
use crate::generated::r4::decode_resource;

/// Contexts kept by a deserializer unless configured otherwise.
const DEFAULT_CONTEXTS: usize = 4;

/// Zero bytes appended after reader input so the parser's fixed-width field
/// reads never run off the end of the buffer. Native payloads are
/// length-prefixed, so trailing zeros are never interpreted as data.
const LOOKAHEAD_PADDING: usize = 64;

/// Reusable parse state: the arena one parse writes its records into.
#[derive(Debug, Default)]
pub struct ParseContext {
    arena: NativeArena,
}

impl ParseContext {
    pub fn new() -> Self {
        ParseContext {
            arena: NativeArena::new(),
        }
    }

    pub fn arena(&self) -> &NativeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NativeArena {
        &mut self.arena
    }

    /// Drops all records, keeping the allocation for the next parse.
    pub fn reset(&mut self) {
        self.arena.clear();
    }
}

/// The native parsing stage: wire bytes in, arena records out.
pub trait NativeParser: Send + Sync {
    /// Parses `input` into the context's arena and returns the root record.
    fn parse(&self, input: &[u8], context: &mut ParseContext) -> Result<NativeRef, ParseError>;
}

/// Fixed-size pool of parse contexts with blocking acquisition.
struct ContextPool {
    idle: Mutex<Vec<ParseContext>>,
    available: Condvar,
}

impl ContextPool {
    fn new(capacity: usize) -> Self {
        let contexts = (0..capacity.max(1)).map(|_| ParseContext::new()).collect();
        ContextPool {
            idle: Mutex::new(contexts),
            available: Condvar::new(),
        }
    }

    /// Takes an idle context, blocking until one is returned if none is.
    fn acquire(&self) -> PoolGuard<'_> {
        let mut idle = self.idle.lock();
        loop {
            if let Some(context) = idle.pop() {
                return PoolGuard {
                    pool: self,
                    context: Some(context),
                };
            }
            self.available.wait(&mut idle);
        }
    }

    fn release(&self, mut context: ParseContext) {
        context.reset();
        self.idle.lock().push(context);
        self.available.notify_one();
    }
}

/// Checked-out context; returns itself to the pool on drop.
struct PoolGuard<'a> {
    pool: &'a ContextPool,
    context: Option<ParseContext>,
}

impl Deref for PoolGuard<'_> {
    type Target = ParseContext;

    fn deref(&self) -> &ParseContext {
        self.context.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PoolGuard<'_> {
    fn deref_mut(&mut self) -> &mut ParseContext {
        self.context.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PoolGuard<'_> {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            self.pool.release(context);
        }
    }
}

/// Decodes native payloads into domain resources using a pooled parser.
pub struct NativeDeserializer<P> {
    parser: P,
    pool: ContextPool,
}

impl<P: NativeParser> NativeDeserializer<P> {
    pub fn new(parser: P) -> Self {
        Self::with_contexts(parser, DEFAULT_CONTEXTS)
    }

    /// Creates a deserializer with an explicit context pool size.
    pub fn with_contexts(parser: P, contexts: usize) -> Self {
        NativeDeserializer {
            parser,
            pool: ContextPool::new(contexts),
        }
    }

    /// Parses and decodes one native payload.
    ///
    /// Returns `Ok(None)` when the payload holds no root record.
    pub fn decode_bytes(&self, input: &[u8]) -> Result<Option<Resource>, DecodeError> {
        let mut context = self.pool.acquire();
        let root = self.parser.parse(input, &mut context)?;
        debug!(
            input_bytes = input.len(),
            arena_bytes = context.arena().len(),
            "parsed native payload"
        );
        decode_resource(context.arena(), root)
    }

    /// Reads a whole payload from `reader` and decodes it.
    pub fn decode_reader(&self, mut reader: impl Read) -> Result<Option<Resource>, DecodeError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).map_err(ParseError::from)?;
        buffer.resize(buffer.len() + LOOKAHEAD_PADDING, 0);
        self.decode_bytes(&buffer)
    }

    /// Reads and decodes a payload file.
    pub fn decode_file(&self, path: impl AsRef<Path>) -> Result<Option<Resource>, DecodeError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "decoding native payload file");
        let file = std::fs::File::open(path).map_err(ParseError::from)?;
        self.decode_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parser stub that allocates one empty record with a fixed tag.
    struct TagParser {
        tag: u32,
        size: u32,
    }

    impl NativeParser for TagParser {
        fn parse(
            &self,
            _input: &[u8],
            context: &mut ParseContext,
        ) -> Result<NativeRef, ParseError> {
            let arena = context.arena_mut();
            assert!(arena.is_empty(), "context was not reset before reuse");
            let record = arena.alloc(self.size);
            arena.write(record.0, &self.tag.to_le_bytes());
            Ok(record)
        }
    }

    struct FailingParser;

    impl NativeParser for FailingParser {
        fn parse(
            &self,
            _input: &[u8],
            _context: &mut ParseContext,
        ) -> Result<NativeRef, ParseError> {
            Err(ParseError::Truncated {
                expected: 8,
                actual: 0,
            })
        }
    }

    #[test]
    fn decodes_an_empty_patient_record() {
        let deserializer = NativeDeserializer::new(TagParser { tag: 10, size: 92 });
        let resource = deserializer.decode_bytes(&[]).unwrap().unwrap();
        assert_eq!(resource.resource_type(), "Patient");
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let deserializer = NativeDeserializer::new(TagParser { tag: 99, size: 16 });
        let error = deserializer.decode_bytes(&[]).unwrap_err();
        assert!(matches!(error, DecodeError::UnknownTag { tag: 99 }));
    }

    #[test]
    fn parse_failures_surface_as_decode_errors() {
        let deserializer = NativeDeserializer::new(FailingParser);
        let error = deserializer.decode_bytes(&[]).unwrap_err();
        assert!(matches!(error, DecodeError::Parse(ParseError::Truncated { .. })));
    }

    #[test]
    fn contexts_are_reset_and_reused() {
        let deserializer =
            NativeDeserializer::with_contexts(TagParser { tag: 10, size: 92 }, 1);
        for _ in 0..3 {
            // TagParser asserts the arena is empty on entry.
            deserializer.decode_bytes(&[]).unwrap();
        }
    }

    #[test]
    fn single_context_pool_serves_concurrent_callers() {
        let deserializer = std::sync::Arc::new(NativeDeserializer::with_contexts(
            TagParser { tag: 11, size: 104 },
            1,
        ));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let deserializer = deserializer.clone();
                std::thread::spawn(move || {
                    let resource = deserializer.decode_bytes(&[]).unwrap().unwrap();
                    assert_eq!(resource.resource_type(), "Observation");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
