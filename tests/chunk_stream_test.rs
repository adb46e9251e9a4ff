//! Chunked delivery of archive blobs to sinks

use scribe::adapters::sink::{FileSink, MemorySink};
use scribe::core::export::{never_cancelled, ChunkedStreamWriter};
use scribe::domain::{ScribeError, StreamError};
use tempfile::TempDir;
use test_case::test_case;

fn blob(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test_case(0, 10, 0 ; "empty blob")]
#[test_case(1, 10, 1 ; "single byte")]
#[test_case(10, 10, 1 ; "exact fit")]
#[test_case(11, 10, 2 ; "one byte over")]
#[test_case(25_000_001, 10_000_000, 3 ; "reference chunk size")]
#[test_case(4096, 1, 4096 ; "byte at a time")]
#[tokio::test]
async fn test_chunk_count_law(len: usize, chunk_size: usize, expected: usize) {
    let writer = ChunkedStreamWriter::new(chunk_size).unwrap();
    let sink = MemorySink::new();
    let data = blob(len);

    let report = writer
        .stream(&data, &sink, "room.zip", &never_cancelled())
        .await
        .unwrap();

    let record = sink.record();
    assert_eq!(report.chunks_written, expected);
    assert_eq!(record.chunks.len(), expected);
    assert_eq!(writer.chunk_count(len), expected);
    assert_eq!(record.bytes(), data);
    assert_eq!(record.total_size, len as u64);
    assert!(record.chunks.iter().all(|c| !c.is_empty() && c.len() <= chunk_size));
    assert!(record.closed);
}

#[test]
fn test_zero_chunk_size_rejected() {
    assert!(matches!(
        ChunkedStreamWriter::new(0),
        Err(StreamError::InvalidChunkSize)
    ));
}

#[tokio::test]
async fn test_write_failure_aborts_sink() {
    let writer = ChunkedStreamWriter::new(4).unwrap();
    let sink = MemorySink::failing_at_write(2);

    let err = writer
        .stream(&blob(20), &sink, "room.zip", &never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScribeError::Stream(StreamError::WriteFailed { index: 2, .. })
    ));
    let record = sink.record();
    assert_eq!(record.chunks.len(), 2);
    assert!(record.aborted);
    assert!(!record.closed);
}

#[tokio::test]
async fn test_open_failure() {
    let writer = ChunkedStreamWriter::new(4).unwrap();
    let sink = MemorySink::failing_on_open();

    let err = writer
        .stream(&blob(8), &sink, "room.zip", &never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(err, ScribeError::Stream(StreamError::OpenFailed { .. })));
}

#[tokio::test]
async fn test_file_sink_receives_whole_blob() {
    let dir = TempDir::new().unwrap();
    let sink = FileSink::new(dir.path());
    let writer = ChunkedStreamWriter::new(1000).unwrap();
    let data = blob(12_345);

    let report = writer
        .stream(&data, &sink, "room.zip", &never_cancelled())
        .await
        .unwrap();

    assert_eq!(report.chunks_written, 13);
    assert_eq!(report.bytes_written, 12_345);
    assert_eq!(std::fs::read(dir.path().join("room.zip")).unwrap(), data);
    assert!(!dir.path().join("room.zip.part").exists());
}
