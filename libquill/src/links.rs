//! Link and video URL detection
//!
//! Pure predicates used before a link or a video is added to a document.
//! A rejected input is reported as `false` or `None`, never as an error;
//! the caller decides what to tell the user.
//!
//! # Supported video links
//!
//! - `youtube.com` / `youtube-nocookie.com`: `watch?v=`, `embed/`, `live/`, `v/`, `shorts/`
//! - `youtu.be/<id>` short links
//!
//! The scheme is optional, as is a `www.` or `m.` prefix.
//!
//! # Example
//!
//! ```
//! use libquill::links::{is_valid_url, video_id};
//!
//! assert!(is_valid_url("https://example.com/path"));
//! assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
//! assert_eq!(video_id("https://vimeo.com/123456789"), None);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// http(s) URL with a dotted host and an optional path/query
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .expect("Invalid URL regex pattern")
});

/// YouTube watch/embed/live/short links; the `id` group is the video token
static VIDEO_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:https?:)?//)?(?:(?:www|m)\.)?(?:youtube(?:-nocookie)?\.com|youtu\.be)/(?:[A-Za-z0-9_-]+\?v=|embed/|live/|v/|shorts/)?(?P<id>[A-Za-z0-9_-]+)(?:\S+)?$",
    )
    .expect("Invalid video regex pattern")
});

/// Host used for embedded video attachments
const EMBED_BASE: &str = "http://www.youtube.com/embed/";

/// Default thumbnail resolution prefix (`hqdefault.jpg`)
pub const DEFAULT_THUMBNAIL_RESOLUTION: &str = "hq";

/// Check whether `url` is a well-formed http(s) link
///
/// Scheme typos (`htttp://`), a missing scheme and a single-slash scheme
/// (`http:/`) are all rejected.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Check whether `link` points at a recognized video
#[must_use]
pub fn is_video_link(link: &str) -> bool {
    video_id(link).is_some()
}

/// Extract the video identifier from a video link
///
/// Returns `None` when no pattern matches.
#[must_use]
pub fn video_id(link: &str) -> Option<&str> {
    VIDEO_REGEX
        .captures(link)
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str())
}

/// Embed URL stored on video attachments
#[must_use]
pub fn video_embed_url(id: &str) -> String {
    format!("{}{}", EMBED_BASE, id)
}

/// Thumbnail image for a video id
///
/// `resolution` is the size prefix used by the thumbnail host
/// (`hq`, `mq`, `sd`, `maxres`, or empty for the default size).
#[must_use]
pub fn video_thumbnail_url(id: &str, resolution: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/{}default.jpg", id, resolution)
}
