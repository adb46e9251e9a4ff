//! Fixed document shell and static assets
//!
//! `index.html` is the assembled timeline body wrapped in a fixed page with a
//! room header. The stylesheet and script are written verbatim to
//! `css/style.css` and `js/script.js`.

use crate::adapters::render::escape_html;
use crate::domain::Room;

/// Archive path of the wrapped document
pub const INDEX_PATH: &str = "index.html";
/// Archive path of the stylesheet
pub const STYLESHEET_PATH: &str = "css/style.css";
/// Archive path of the script
pub const SCRIPT_PATH: &str = "js/script.js";
/// Archive path of the optional room avatar
pub const AVATAR_PATH: &str = "room.png";

pub const STYLESHEET: &str = r#"* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
  font-size: 15px;
  color: #17191c;
  background: #ffffff;
}
header.room-header {
  display: flex;
  align-items: center;
  gap: 12px;
  padding: 12px 20px;
  border-bottom: 1px solid #e3e8f0;
  position: sticky;
  top: 0;
  background: #ffffff;
}
.room-avatar {
  width: 32px;
  height: 32px;
  border-radius: 50%;
  object-fit: cover;
}
.room-avatar.initial {
  display: inline-flex;
  align-items: center;
  justify-content: center;
  background: #0dbd8b;
  color: #ffffff;
  font-weight: 600;
}
.room-name { font-size: 18px; font-weight: 600; }
.export-info { color: #737d8c; font-size: 12px; }
ol.timeline { list-style: none; margin: 0; padding: 0 20px 40px; }
li.tile { padding: 6px 0 2px; }
li.tile.continuation { padding-top: 0; }
li.tile:target { background: #fff8e3; }
.sender { font-weight: 600; color: #0dbd8b; }
time { float: right; color: #a9b2bc; font-size: 12px; }
.body p { margin: 2px 0; white-space: pre-wrap; word-wrap: break-word; }
.body img, .body video { max-width: 480px; max-height: 360px; border-radius: 8px; }
.missing-media { color: #737d8c; font-style: italic; }
li.date-separator h2 {
  margin: 24px 0 8px;
  font-size: 14px;
  text-align: center;
  color: #737d8c;
  border-bottom: 1px solid #e3e8f0;
}
"#;

pub const SCRIPT: &str = r#"(function () {
  function highlight() {
    var id = decodeURIComponent(window.location.hash.slice(1));
    if (!id) return;
    var tile = document.getElementById(id);
    if (tile) tile.scrollIntoView({ block: "center" });
  }
  window.addEventListener("hashchange", highlight);
  document.addEventListener("DOMContentLoaded", highlight);
})();
"#;

/// Wrap the assembled timeline body into the full `index.html` page
///
/// `has_avatar` selects between the archived `room.png` and an
/// initial-letter placeholder.
pub fn wrap_document(room: &Room, has_avatar: bool, body: &str) -> String {
    let name = escape_html(room.display_name());
    let avatar = if has_avatar {
        format!(r#"<img class="room-avatar" src="{AVATAR_PATH}" alt="{name}">"#)
    } else {
        let initial = room
            .display_name()
            .trim_start_matches(['#', '!', '@'])
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());
        format!(
            r#"<span class="room-avatar initial">{}</span>"#,
            escape_html(&initial)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link href="{STYLESHEET_PATH}" rel="stylesheet">
<script src="{SCRIPT_PATH}"></script>
<title>Exported Data - {name}</title>
</head>
<body>
<header class="room-header">
{avatar}
<div>
<div class="room-name">{name}</div>
<div class="export-info">{room_id}</div>
</div>
</header>
<main>
<ol class="timeline">
{body}</ol>
</main>
</body>
</html>
"#,
        room_id = escape_html(room.room_id.as_str()),
    )
}
