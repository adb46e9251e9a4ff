//! Default HTML tile renderer
//!
//! Produces one `<li>` per event, anchored by the event ID so links of the
//! form `index.html#$eventId` land on the tile.

use crate::adapters::traits::{EventRenderer, MediaSlot};
use crate::domain::{ContentKind, Event, Result};
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::Write as _;

/// Bytes that cannot appear literally in a relative URL path segment
const URL_PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Renders events as timeline tiles
#[derive(Debug, Clone, Default)]
pub struct HtmlTileRenderer;

impl HtmlTileRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl EventRenderer for HtmlTileRenderer {
    fn is_renderable(&self, event: &Event) -> bool {
        if event.is_state() {
            return false;
        }
        // Redacted events keep their envelope but lose all content
        event
            .content
            .as_object()
            .map(|content| !content.is_empty())
            .unwrap_or(false)
    }

    fn render_event(
        &self,
        event: &Event,
        continuation: bool,
        media: MediaSlot<'_>,
    ) -> Result<String> {
        let mut tile = String::new();
        let class = if continuation {
            "tile continuation"
        } else {
            "tile"
        };
        let id = escape_html(event.event_id.as_str());

        // Writing into a String cannot fail
        let _ = write!(tile, r#"<li id="{id}" class="{class}">"#);
        if !continuation {
            let _ = write!(
                tile,
                r#"<div class="sender" title="{}">{}</div>"#,
                escape_html(event.sender.as_str()),
                escape_html(event.sender.localpart()),
            );
        }
        let _ = write!(
            tile,
            r#"<time datetime="{}">{}</time>"#,
            event.timestamp.to_rfc3339(),
            event.timestamp.format("%H:%M"),
        );

        tile.push_str(r#"<div class="body">"#);
        match media {
            MediaSlot::Resolved(path) => tile.push_str(&media_element(event, path)),
            MediaSlot::Missing => {
                let _ = write!(
                    tile,
                    r#"<p class="missing-media">Media unavailable: {}</p>"#,
                    escape_html(event.body().unwrap_or("attachment")),
                );
            }
            MediaSlot::None => {
                let body = event.body().unwrap_or_default();
                let _ = write!(tile, "<p>{}</p>", escape_html(body).replace('\n', "<br>"));
            }
        }
        tile.push_str("</div></li>\n");

        Ok(tile)
    }

    fn render_date_separator(&self, timestamp: DateTime<Utc>) -> Result<String> {
        Ok(format!(
            "<li class=\"date-separator\"><h2>{}</h2></li>\n",
            timestamp.format("%A, %B %-d, %Y")
        ))
    }
}

fn media_element(event: &Event, path: &str) -> String {
    let src = escape_html(&asset_url(path));
    let alt = escape_html(event.body().unwrap_or_default());
    match event.kind {
        ContentKind::Image => {
            format!(r#"<a href="{src}"><img src="{src}" alt="{alt}" loading="lazy"></a>"#)
        }
        ContentKind::Video => format!(r#"<video src="{src}" controls></video>"#),
        ContentKind::Audio => format!(r#"<audio src="{src}" controls></audio>"#),
        ContentKind::Plain | ContentKind::Other => {
            format!(r#"<a href="{src}">{alt}</a>"#)
        }
    }
}

/// Relative URL of an archive entry
///
/// Entry names may contain `%` (see `EventId::to_path_component`), so each
/// segment is encoded again to reach the exact file.
pub fn asset_url(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, URL_PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
