//! End-to-end tests of the export pipeline against stub collaborators
//!
//! Archives are streamed into a `MemorySink` and read back with
//! `zip::ZipArchive`.

mod common;

use common::{image, media_event, room, state, text, GapRules, MarkerRenderer, StubMediaSource};
use scribe::adapters::sink::MemorySink;
use scribe::core::export::{never_cancelled, ChunkedStreamWriter, ExportJob, HtmlExporter, JobReport};
use scribe::domain::{Event, Room, ScribeError};
use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::sync::Arc;
use zip::ZipArchive;

fn exporter(media: StubMediaSource) -> HtmlExporter {
    HtmlExporter::builder()
        .rules(Arc::new(GapRules))
        .renderer(Arc::new(MarkerRenderer))
        .media_source(Arc::new(media))
        .build()
        .unwrap()
}

async fn run(exporter: &HtmlExporter, room: Room, events: Vec<Event>) -> (JobReport, Vec<u8>) {
    let sink = MemorySink::new();
    let writer = ChunkedStreamWriter::new(4096).unwrap();
    let report = ExportJob::new(room, events)
        .run(exporter, &sink, &writer, &never_cancelled())
        .await
        .unwrap();
    let record = sink.record();
    assert!(record.closed);
    (report, record.bytes())
}

fn entry_names(blob: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(blob.to_vec())).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn read_entry(blob: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(blob.to_vec())).unwrap();
    let mut contents = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    contents
}

/// The timeline markup between the shell's `<ol>` tags
fn body(blob: &[u8]) -> String {
    let index = read_entry(blob, "index.html");
    let start = index.find("<ol class=\"timeline\">\n").unwrap() + "<ol class=\"timeline\">\n".len();
    let end = index.rfind("</ol>").unwrap();
    index[start..end].to_string()
}

#[tokio::test]
async fn test_text_image_text_scenario() {
    let events = vec![
        text("A", "@alice:example.org", 1_000),
        image("B", "@alice:example.org", 1_005),
        text("C", "@bob:example.org", 200_000),
    ];

    let (report, blob) = run(&exporter(StubMediaSource::new()), room(), events).await;

    assert_eq!(body(&blob), "[sep][A][B|c|images/B.png][sep][C]");
    assert!(entry_names(&blob).contains(&"images/B.png".to_string()));
    assert_eq!(read_entry(&blob, "images/B.png"), "mxc://example.org/B");

    let stats = report.archive.stats;
    assert_eq!(stats.events_rendered, 3);
    assert_eq!(stats.date_separators, 2);
    assert_eq!(stats.continuations, 1);
    assert_eq!(stats.media_exported, 1);
}

#[tokio::test]
async fn test_failed_media_fetch_renders_missing_media() {
    let events = vec![
        text("A", "@alice:example.org", 1_000),
        image("B", "@alice:example.org", 2_000),
        image("C", "@alice:example.org", 3_000),
    ];
    let media = StubMediaSource::new().failing("mxc://example.org/B");

    let (report, blob) = run(&exporter(media), room(), events).await;

    assert_eq!(
        body(&blob),
        "[sep][A][B|c|missing][C|c|images/C.png]"
    );
    let names = entry_names(&blob);
    assert!(!names.iter().any(|n| n.starts_with("images/B")));
    assert!(names.contains(&"images/C.png".to_string()));

    assert_eq!(report.archive.stats.media_missing, 1);
    assert_eq!(report.archive.missing_media.len(), 1);
    assert_eq!(report.archive.missing_media[0].event_id.as_str(), "B");
}

#[tokio::test]
async fn test_empty_sequence_has_only_fixed_entries() {
    let (report, blob) = run(&exporter(StubMediaSource::new()), room(), Vec::new()).await;

    let mut names = entry_names(&blob);
    names.sort();
    assert_eq!(names, vec!["css/style.css", "index.html", "js/script.js"]);

    let index = read_entry(&blob, "index.html");
    assert!(index.starts_with("<!DOCTYPE html>"));
    assert_eq!(body(&blob), "");
    assert_eq!(report.archive.stats.events_total, 0);
}

#[tokio::test]
async fn test_fragments_follow_renderable_event_order() {
    let events = vec![
        state("S1", 500),
        text("A", "@alice:example.org", 1_000),
        text("B", "@bob:example.org", 1_100),
        state("S2", 1_150),
        text("C", "@alice:example.org", 1_200),
        text("D", "@alice:example.org", 1_300),
    ];

    let (report, blob) = run(&exporter(StubMediaSource::new()), room(), events).await;

    let markup = body(&blob);
    let positions: Vec<usize> = ["[A", "[B", "[C", "[D"]
        .iter()
        .map(|marker| markup.find(marker).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!markup.contains("S1") && !markup.contains("S2"));
    assert_eq!(report.archive.stats.events_skipped, 2);
}

#[tokio::test]
async fn test_separator_and_continuation_laws() {
    // Deterministic pseudo-random walk over senders and gaps
    let senders = ["@alice:example.org", "@bob:example.org", "@carol:example.org"];
    let mut seed: u64 = 0x5eed;
    let mut next = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };

    let mut events = Vec::new();
    let mut millis = 0i64;
    for i in 0..60 {
        millis += [10, 500, 99_000, 150_000][next() % 4];
        let sender = senders[next() % senders.len()];
        if next() % 5 == 0 {
            events.push(state(&format!("S{i}"), millis));
        } else {
            events.push(text(&format!("E{i}"), sender, millis));
        }
    }

    let mut expected = String::new();
    let mut prev: Option<&Event> = None;
    for event in events.iter().filter(|e| !e.is_state()) {
        let separator = match prev {
            None => true,
            Some(p) => (event.timestamp - p.timestamp).num_milliseconds() > 100_000,
        };
        let continuation = !separator && prev.is_some_and(|p| p.sender == event.sender);
        if separator {
            expected.push_str("[sep]");
        }
        expected.push_str(&format!(
            "[{}{}]",
            event.event_id,
            if continuation { "|c" } else { "" }
        ));
        prev = Some(event);
    }

    let (_, blob) = run(&exporter(StubMediaSource::new()), room(), events).await;
    assert_eq!(body(&blob), expected);
}

#[tokio::test]
async fn test_media_paths_are_unique() {
    let kinds = [("m.image", "images"), ("m.video", "videos"), ("m.audio", "audio")];
    let events: Vec<Event> = (0..30)
        .map(|i| {
            let (msgtype, _) = kinds[i % kinds.len()];
            media_event(
                &format!("$m{i}:example.org"),
                "@alice:example.org",
                1_000 + i as i64,
                msgtype,
                &format!("mxc://example.org/m{i}"),
            )
        })
        .collect();

    let (report, blob) = run(&exporter(StubMediaSource::new()), room(), events).await;

    let media: Vec<String> = entry_names(&blob)
        .into_iter()
        .filter(|n| kinds.iter().any(|(_, folder)| n.starts_with(&format!("{folder}/"))))
        .collect();
    let unique: HashSet<&String> = media.iter().collect();
    assert_eq!(media.len(), 30);
    assert_eq!(unique.len(), 30);
    assert_eq!(report.archive.stats.media_exported, 30);
}

#[tokio::test]
async fn test_same_input_produces_identical_archive() {
    let events = vec![
        text("A", "@alice:example.org", 1_000),
        image("B", "@bob:example.org", 2_000),
    ];
    let exporter = exporter(StubMediaSource::new());

    let (first_report, first) = run(&exporter, room(), events.clone()).await;
    let (second_report, second) = run(&exporter, room(), events).await;

    assert_eq!(read_entry(&first, "index.html"), read_entry(&second, "index.html"));
    assert_eq!(first, second);
    assert_eq!(first_report.archive_sha256, second_report.archive_sha256);
    assert_ne!(first_report.job_id, second_report.job_id);
}

#[tokio::test]
async fn test_concurrent_media_resolution_matches_sequential() {
    let events: Vec<Event> = (0..12)
        .map(|i| image(&format!("I{i}"), "@alice:example.org", 1_000 + i * 10))
        .collect();

    let sequential = exporter(StubMediaSource::new());
    let concurrent = HtmlExporter::builder()
        .rules(Arc::new(GapRules))
        .renderer(Arc::new(MarkerRenderer))
        .media_source(Arc::new(StubMediaSource::new()))
        .media_concurrency(8)
        .build()
        .unwrap();

    let (_, a) = run(&sequential, room(), events.clone()).await;
    let (_, b) = run(&concurrent, room(), events).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_room_avatar_fetched_once() {
    let media = Arc::new(StubMediaSource::new().with_avatar(vec![0x89, b'P', b'N', b'G']));
    let exporter = HtmlExporter::builder()
        .rules(Arc::new(GapRules))
        .renderer(Arc::new(MarkerRenderer))
        .media_source(media.clone())
        .build()
        .unwrap();
    let room = room().with_avatar_url("mxc://example.org/avatar");

    let (report, blob) = run(&exporter, room, vec![text("A", "@alice:example.org", 0)]).await;

    assert!(report.archive.avatar_included);
    assert!(entry_names(&blob).contains(&"room.png".to_string()));
    assert!(read_entry(&blob, "index.html").contains(r#"src="room.png""#));
    assert_eq!(
        *media.thumbnail_requests.lock().unwrap(),
        vec!["mxc://example.org/avatar".to_string()]
    );
}

#[tokio::test]
async fn test_room_avatar_failure_degrades() {
    let room = room().with_avatar_url("mxc://example.org/avatar");
    let (report, blob) = run(&exporter(StubMediaSource::new()), room, Vec::new()).await;

    assert!(!report.archive.avatar_included);
    assert!(!entry_names(&blob).contains(&"room.png".to_string()));
    assert!(read_entry(&blob, "index.html").contains("room-avatar initial"));
}

#[tokio::test]
async fn test_room_avatar_disabled() {
    let media = Arc::new(StubMediaSource::new().with_avatar(vec![1]));
    let exporter = HtmlExporter::builder()
        .media_source(media.clone())
        .include_room_avatar(false)
        .build()
        .unwrap();
    let room = room().with_avatar_url("mxc://example.org/avatar");

    let (report, _) = run(&exporter, room, Vec::new()).await;
    assert!(!report.archive.avatar_included);
    assert!(media.thumbnail_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_render_error_fails_before_sink() {
    struct FailingRenderer;

    impl scribe::adapters::traits::EventRenderer for FailingRenderer {
        fn is_renderable(&self, _event: &Event) -> bool {
            true
        }

        fn render_event(
            &self,
            event: &Event,
            _continuation: bool,
            _media: scribe::adapters::traits::MediaSlot<'_>,
        ) -> scribe::domain::Result<String> {
            Err(ScribeError::render(event.event_id.as_str(), "template missing"))
        }

        fn render_date_separator(
            &self,
            _timestamp: chrono::DateTime<chrono::Utc>,
        ) -> scribe::domain::Result<String> {
            Ok(String::new())
        }
    }

    let exporter = HtmlExporter::builder()
        .renderer(Arc::new(FailingRenderer))
        .media_source(Arc::new(StubMediaSource::new()))
        .build()
        .unwrap();
    let sink = MemorySink::new();
    let writer = ChunkedStreamWriter::new(1024).unwrap();

    let err = ExportJob::new(room(), vec![text("A", "@alice:example.org", 0)])
        .run(&exporter, &sink, &writer, &never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(err, ScribeError::Render { .. }));
    assert!(sink.record().name.is_none());
}

#[tokio::test]
async fn test_default_renderer_anchors_tiles() {
    let exporter = HtmlExporter::builder()
        .media_source(Arc::new(StubMediaSource::new()))
        .build()
        .unwrap();
    let events = vec![
        text("$a:example.org", "@alice:example.org", 1_700_000_000_000),
        image("$b:example.org", "@alice:example.org", 1_700_000_001_000),
    ];

    let (report, blob) = run(&exporter, room(), events).await;

    let index = read_entry(&blob, "index.html");
    assert!(index.contains(r#"<li id="$a:example.org" class="tile">"#));
    assert!(index.contains(r#"<li id="$b:example.org" class="tile continuation">"#));
    assert!(index.contains(r#"<img src="images/$b:example.org.png""#));
    assert!(report.file_name.starts_with("matrix-export-"));
    assert!(report.file_name.ends_with("Z.zip"));
}

#[tokio::test]
async fn test_event_ids_differing_only_in_separators() {
    let exporter = HtmlExporter::builder()
        .media_source(Arc::new(StubMediaSource::new()))
        .build()
        .unwrap();
    let events = vec![
        image("$a/b:example.org", "@alice:example.org", 1_700_000_000_000),
        image("$a_b:example.org", "@alice:example.org", 1_700_000_001_000),
    ];

    let (report, blob) = run(&exporter, room(), events).await;

    let names = entry_names(&blob);
    assert!(names.contains(&"images/$a%2Fb:example.org.png".to_string()));
    assert!(names.contains(&"images/$a_b:example.org.png".to_string()));
    assert_eq!(report.archive.stats.media_exported, 2);

    let index = read_entry(&blob, "index.html");
    assert!(index.contains(r#"<img src="images/$a%252Fb:example.org.png""#));
    assert!(index.contains(r#"<img src="images/$a_b:example.org.png""#));
}
