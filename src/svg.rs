//! SVG document writer for emitted glyphs.

use crate::sample::Glyph;
use std::borrow::Cow;
use std::fmt::Write;

/// File name used when the document is offered for download.
pub const DOWNLOAD_FILE_NAME: &str = "ascii-art.svg";
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Escape `&`, `<` and `>` for use as text content.
pub fn escape_glyph(ch: char) -> Cow<'static, str> {
    match ch {
        '&' => Cow::Borrowed("&amp;"),
        '<' => Cow::Borrowed("&lt;"),
        '>' => Cow::Borrowed("&gt;"),
        c => Cow::Owned(c.to_string()),
    }
}

/// Append one centered `<text>` element.
pub fn write_glyph(out: &mut String, glyph: &Glyph<'_>) {
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{:.2}" fill="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
        glyph.x,
        glyph.y,
        glyph.font_size,
        glyph.color,
        escape_glyph(glyph.ch),
    );
}

/// Wrap already-serialized glyph elements into a sized document.
pub fn document(width: u32, height: u32, background: &str, body: &str) -> String {
    format!(
        concat!(
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" "#,
            r#"style="background-color: {bg}">"#,
            "{body}</svg>\n"
        ),
        w = width,
        h = height,
        bg = background,
        body = body,
    )
}
