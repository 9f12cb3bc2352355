//! Generate an HTML/SVG picture of the keypad key map.
//! Columns run left to right, rows top to bottom, one square per switch.

use keypad_core::{Coord, KeyDescriptor, KEYMAP};

/// Key unit size in SVG pixels.
const U: f64 = 64.0;
/// Gap between keys.
const GAP: f64 = 6.0;
/// Step: key + gap.
const S: f64 = U + GAP;
/// Key corner radius.
const R: f64 = 6.0;
/// Margin around the SVG content.
const MARGIN: f64 = 20.0;
/// Room for the title above the keys.
const TITLE: f64 = 30.0;

fn key_class(desc: &KeyDescriptor) -> &'static str {
    if desc.hold {
        "key hold"
    } else if desc.modifier.is_some() {
        "key combo"
    } else {
        "key"
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render one switch: the rectangle, the key label, and the modifier (if
/// any) in small print underneath.
fn render_key(coord: Coord, desc: &KeyDescriptor) -> String {
    let x = coord.col as f64 * S;
    let y = coord.row as f64 * S;
    let cx = x + U / 2.0;

    let mut svg = format!(
        r#"<rect x="{x}" y="{y}" width="{U}" height="{U}" rx="{R}" class="{}"><title>{coord}</title></rect>"#,
        key_class(desc),
    );

    let label = desc.key.display_name();
    let font_class = if label.chars().count() > 3 { " small" } else { "" };
    let label_y = if desc.modifier.is_some() { y + U * 0.42 } else { y + U / 2.0 + 1.0 };
    svg.push_str(&format!(
        r#"<text x="{cx}" y="{label_y}" class="label{font_class}">{}</text>"#,
        html_escape(label),
    ));

    if let Some(modifier) = desc.modifier {
        svg.push_str(&format!(
            r#"<text x="{cx}" y="{}" class="label modifier">+{}</text>"#,
            y + U * 0.75,
            html_escape(modifier.display_name()),
        ));
    }

    svg
}

/// Generate the complete HTML document with inline SVG.
pub fn generate_html() -> String {
    let content_w = KEYMAP.columns() as f64 * S - GAP;
    let content_h = KEYMAP.rows() as f64 * S - GAP;
    let total_width = content_w + 2.0 * MARGIN;
    let total_height = content_h + TITLE + 2.0 * MARGIN;

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Keypad Layout</title>
<style>
  body {{
    background: #1a1a2e;
    color: #eee;
    font-family: system-ui, -apple-system, sans-serif;
    display: flex;
    justify-content: center;
    padding: 2em;
  }}
  .key {{
    fill: #16213e;
    stroke: #0f3460;
    stroke-width: 1.5;
  }}
  .key:hover {{
    stroke: #e94560;
  }}
  .key.combo {{
    fill: #1b2e4e;
    stroke: #53a8b6;
  }}
  .key.hold {{
    fill: #2d1b4e;
    stroke: #e94560;
    stroke-width: 2;
  }}
  .label {{
    fill: #eee;
    font-family: "JetBrains Mono", "Fira Code", monospace;
    font-size: 16px;
    text-anchor: middle;
    dominant-baseline: middle;
    pointer-events: none;
  }}
  .label.small, .label.modifier {{
    font-size: 11px;
  }}
  .label.modifier {{
    fill: #53a8b6;
  }}
  .title {{
    fill: #e94560;
    font-size: 16px;
    font-weight: bold;
  }}
</style>
</head>
<body>
<svg width="{total_width}" height="{total_height}" xmlns="http://www.w3.org/2000/svg">
<text x="{MARGIN}" y="{}" class="title">Keypad {}x{}</text>
<g transform="translate({MARGIN}, {})">
"#,
        MARGIN + TITLE / 2.0,
        KEYMAP.columns(),
        KEYMAP.rows(),
        MARGIN + TITLE,
    );

    for (coord, desc) in KEYMAP.iter() {
        html.push_str(&render_key(coord, desc));
        html.push('\n');
    }

    html.push_str("</g>\n</svg>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_rect_per_switch() {
        let html = generate_html();
        assert_eq!(html.matches("<rect ").count(), 20);
    }

    #[test]
    fn hold_and_combo_keys_are_marked() {
        let html = generate_html();
        // Left and right arrows
        assert_eq!(html.matches(r#"class="key hold""#).count(), 2);
        // Three shifted and four alt keys
        assert_eq!(html.matches(r#"class="key combo""#).count(), 7);
        assert!(html.contains(">+Alt<"));
        assert!(html.contains(">+Shft<"));
    }

    #[test]
    fn keys_sit_on_the_grid() {
        let html = render_key(Coord::new(2, 1), KEYMAP.descriptor(Coord::new(2, 1)));
        assert!(html.starts_with(r#"<rect x="140" y="70""#));
        assert!(html.contains("<title>(2, 1)</title>"));
        assert!(html.contains(">j<"));
    }
}
