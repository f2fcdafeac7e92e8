//! Content renderers: the wide "strip" canvases the scheduler scrolls.
//!
//! Strips are rebuilt per content refresh (fresh clock string, fresh
//! weather) and sampled many times per pass, so all layout happens here
//! once and the tick loop only copies pixels.

use crate::Color;
use crate::canvas::Canvas;
use crate::icons;
use crate::text::TextRenderer;
use crate::weather::WeatherReport;
use rand::Rng;

/// Inter-item gap in the continuous banner.
pub const DEFAULT_SPACING: u32 = 60;

/// Gap between the weather text and its icon.
const ICON_GAP: u32 = 6;

/// Icon glyph width inside the time/weather strip.
const ICON_SIZE: u32 = 24;

/// The combined time + weather line, e.g. `"3:07 PM  Clear Sky 72°F"` or,
/// after a failed fetch, `"3:07 PM  Weather Unavailable N/A°F"`.
pub fn compose_weather_text(time_str: &str, report: &WeatherReport) -> String {
    format!(
        "{time_str}  {} {}°F",
        report.description,
        report.temperature_label()
    )
}

/// Render the time/weather strip: the combined text followed by the
/// condition icon, vertically centered on a black background.
pub fn time_weather_strip(
    renderer: &dyn TextRenderer,
    rows: u32,
    time_str: &str,
    report: &WeatherReport,
    color: Color,
    rng: &mut impl Rng,
) -> Canvas {
    let text = compose_weather_text(time_str, report);
    let (text_w, text_h) = renderer.measure(&text);

    let mut strip = Canvas::new(text_w + ICON_GAP + ICON_SIZE, rows);
    strip.stamp_text(0, centered(rows, text_h), &text, renderer, color);

    let icon = icons::render(report.condition, ICON_SIZE, rng);
    strip.paste(
        text_w + ICON_GAP,
        centered(rows, icon.height().min(rows)),
        &icon,
    );
    strip
}

/// Render a single announcement as its own strip.
pub fn announcement_strip(
    renderer: &dyn TextRenderer,
    rows: u32,
    message: &str,
    color: Color,
) -> Canvas {
    let (text_w, text_h) = renderer.measure(message);
    let mut strip = Canvas::new(text_w.max(1), rows);
    strip.stamp_text(0, centered(rows, text_h), message, renderer, color);
    strip
}

/// Render text with one screen width of lead-in and lead-out padding, so a
/// single bounded pass enters and leaves fully off-screen with no pop-in.
pub fn scroll_strip(
    renderer: &dyn TextRenderer,
    screen_width: u32,
    rows: u32,
    message: &str,
    color: Color,
) -> Canvas {
    let (text_w, text_h) = renderer.measure(message);
    let mut strip = Canvas::new(screen_width + text_w + screen_width, rows);
    strip.stamp_text(screen_width, centered(rows, text_h), message, renderer, color);
    strip
}

/// Concatenate strips left to right with a fixed gap between items. The
/// result's width is exactly `sum(widths) + spacing * (len - 1)`.
pub fn continuous_banner(items: &[Canvas], spacing: u32, rows: u32) -> Canvas {
    let total: u32 = items.iter().map(Canvas::width).sum::<u32>()
        + spacing * (items.len().saturating_sub(1) as u32);
    let mut banner = Canvas::new(total.max(1), rows);

    let mut x = 0;
    for item in items {
        banner.paste(x, 0, item);
        x += item.width() + spacing;
    }
    banner
}

/// Continuous banner for endless wrapping: a duplicate of the first item is
/// appended so the seam where the scroll offset wraps reads seamlessly.
pub fn looping_banner(items: &[Canvas], spacing: u32, rows: u32) -> Canvas {
    match items.first() {
        Some(first) => {
            let mut all: Vec<Canvas> = items.to_vec();
            all.push(first.clone());
            continuous_banner(&all, spacing, rows)
        }
        None => Canvas::new(1, rows),
    }
}

/// Static banner: up to three copies of the time/weather unit, evenly
/// spaced across the full matrix width.
pub fn static_banner(
    renderer: &dyn TextRenderer,
    cols: u32,
    rows: u32,
    time_str: &str,
    report: &WeatherReport,
    color: Color,
    rng: &mut impl Rng,
) -> Canvas {
    let unit = time_weather_strip(renderer, rows, time_str, report, color, rng);
    let mut banner = Canvas::new(cols, rows);

    let copies = (cols / unit.width().max(1)).clamp(1, 3);
    let gap = cols.saturating_sub(copies * unit.width()) / (copies + 1);
    for i in 0..copies {
        banner.paste(gap + i * (unit.width() + gap), 0, &unit);
    }
    banner
}

fn centered(rows: u32, content_height: u32) -> u32 {
    rows.saturating_sub(content_height) / 2
}
