//! Splits decoded text chunks into lines and feeds them to an ingest context.
//!
//! Chunk boundaries may fall anywhere, including inside a multi-byte character
//! when the caller decodes lossily, so the undelivered tail is buffered until
//! the next newline or the end of the stream.

use crate::ingest::{IngestContext, RawGraph};
use netpixi_core::LoadError;
use std::io::BufRead;

#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and hands every completed line to `sink`.
    pub fn push<F, E>(&mut self, chunk: &str, mut sink: F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<(), E>,
    {
        self.buffer.push_str(chunk);
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].find('\n') {
            let end = start + offset;
            sink(&self.buffer[start..end])?;
            start = end + 1;
        }
        self.buffer.drain(..start);
        Ok(())
    }

    /// Delivers the last line when the stream did not end with a newline.
    pub fn finish<F, E>(self, mut sink: F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<(), E>,
    {
        if self.buffer.is_empty() {
            Ok(())
        } else {
            sink(&self.buffer)
        }
    }

    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

/// Ingests an in-memory sequence of chunks.
pub fn ingest_chunks<'a, I>(chunks: I) -> Result<RawGraph, LoadError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut context = IngestContext::new();
    let mut decoder = LineDecoder::new();
    for chunk in chunks {
        decoder.push(chunk, |line| context.process_line(line))?;
    }
    decoder.finish(|line| context.process_line(line))?;
    Ok(context.finish())
}

/// Ingests a reader line by line. Read failures surface as `LoadError::Stream`.
pub fn ingest_reader<R: BufRead>(mut reader: R) -> Result<RawGraph, LoadError> {
    let mut context = IngestContext::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.strip_suffix('\n').unwrap_or(&line);
        context.process_line(text)?;
    }
    Ok(context.finish())
}

pub fn ingest_str(text: &str) -> Result<RawGraph, LoadError> {
    ingest_chunks([text])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read};

    const GRAPH: &str = concat!(
        "{\"type\": \"settings\"}\n",
        "{\"type\": \"vertex\", \"id\": \"a\", \"props\": {\"x\": 0, \"y\": 0}}\n",
        "{\"type\": \"vertex\", \"id\": \"b\", \"props\": {\"x\": 1, \"y\": 1}}\n",
        "\n",
        "{\"type\": \"edge\", \"source\": \"a\", \"target\": \"b\"}"
    );

    #[test]
    fn test_decoder_buffers_partial_lines() {
        let mut decoder = LineDecoder::new();
        let mut lines = Vec::new();
        decoder
            .push::<_, ()>("one\ntw", |line| {
                lines.push(line.to_string());
                Ok(())
            })
            .unwrap();
        assert_eq!(decoder.pending(), "tw");
        decoder
            .push::<_, ()>("o\n\nthree", |line| {
                lines.push(line.to_string());
                Ok(())
            })
            .unwrap();
        decoder
            .finish::<_, ()>(|line| {
                lines.push(line.to_string());
                Ok(())
            })
            .unwrap();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn test_chunk_boundaries_do_not_matter() {
        let whole = ingest_str(GRAPH).unwrap();
        for size in [1, 3, 7, 64] {
            let bytes = GRAPH.as_bytes();
            let chunks: Vec<&str> = bytes
                .chunks(size)
                .map(|c| std::str::from_utf8(c).unwrap())
                .collect();
            let raw = ingest_chunks(chunks).unwrap();
            assert_eq!(raw.vertices, whole.vertices);
            assert_eq!(raw.edge_count, 1);
        }
    }

    #[test]
    fn test_reader_counts_blank_lines() {
        let text = "{\"type\": \"vertex\", \"id\": \"a\"}\r\n\n{\"type\": \"vertex\", \"id\": \"a\"}\n";
        let err = ingest_reader(text.as_bytes()).unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("connection reset"))
        }
    }

    #[test]
    fn test_read_failure_is_stream_error() {
        let err = ingest_reader(io::BufReader::new(Broken)).unwrap_err();
        assert!(matches!(err, LoadError::Stream(_)));
    }
}
