//! Event renderers

pub mod html;

pub use html::{asset_url, escape_html, HtmlTileRenderer};
