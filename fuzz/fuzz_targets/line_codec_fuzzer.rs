//! Fuzz target for line reframing
//!
//! The network loop feeds the codec whatever each read returned, carrying the
//! unterminated tail over to the next read. Reads split the stream at
//! arbitrary points. Framing must not depend on where they fall; the text
//! may, since a bad byte escapes every line completed by the same read.
//!
//! # Strategy
//!
//! - Arbitrary byte stream cut into arbitrary chunk sizes
//! - Arbitrary outbound text with an arbitrary truncation limit
//!
//! # Invariants
//!
//! - Chunked decoding yields as many lines and the same remainder as
//!   decoding the whole stream, and the same lines when it is valid UTF-8
//! - One line per terminator, none containing a terminator
//! - Remainder never contains a terminator
//! - Encoded frames are valid UTF-8, at most limit + 1 bytes, end in `\n`
//! - NEVER panic on any input

#![no_main]

use arbitrary::Arbitrary;
use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use linewire_client::LineCodec;

#[derive(Debug, Clone, Arbitrary)]
enum CodecInput {
    Inbound { stream: Vec<u8>, cuts: Vec<u8> },
    Outbound { text: String, limit: u16 },
}

fuzz_target!(|input: CodecInput| {
    match input {
        CodecInput::Inbound { stream, cuts } => {
            let codec = LineCodec::default();

            let whole = codec.decode(&stream);
            assert!(!whole.remainder.contains(&b'\n'));
            assert_eq!(whole.lines.len(), stream.iter().filter(|&&b| b == b'\n').count());
            for line in &whole.lines {
                assert!(!line.contains('\n'));
            }

            let mut pending = Vec::new();
            let mut lines = Vec::new();
            let mut rest = stream.as_slice();
            for cut in cuts.iter().map(|&c| usize::from(c)).chain(std::iter::once(usize::MAX)) {
                let (chunk, tail) = rest.split_at(cut.min(rest.len()));
                rest = tail;

                pending.extend_from_slice(chunk);
                let decoded = codec.decode(&pending);
                lines.extend(decoded.lines);
                pending = decoded.remainder.to_vec();
            }

            assert_eq!(lines.len(), whole.lines.len());
            assert_eq!(pending, whole.remainder);
            if std::str::from_utf8(&stream).is_ok() {
                assert_eq!(lines, whole.lines);
            }
        }

        CodecInput::Outbound { text, limit } => {
            let codec = LineCodec::new(usize::from(limit));
            let mut frame = BytesMut::new();
            codec.encode(&text, &mut frame);

            assert!(frame.len() <= usize::from(limit) + 1);
            assert_eq!(frame.last(), Some(&b'\n'));
            let body = std::str::from_utf8(&frame[..frame.len() - 1]).expect("valid UTF-8");
            assert!(text.starts_with(body));
        }
    }
});
