//! Vector weather icons, drawn with `embedded-graphics` primitives onto a
//! small canvas that the banner renderer pastes into its strip.
//!
//! The vocabulary is fixed: one glyph per [`Condition`], with the
//! thermometer as the default for anything unrecognized.

use crate::Color;
use crate::canvas::Canvas;
use crate::weather::Condition;
use embedded_graphics::Drawable;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::{Point, Primitive, Size};
use embedded_graphics::primitives::{Circle, Ellipse, Line, PrimitiveStyle, Rectangle, Triangle};
use rand::Rng;
use std::f32::consts::PI;

/// Canvas height needed for an icon of width `size`; the thermometer bulb
/// and raindrops hang below the square glyph body.
pub fn canvas_height(size: u32) -> u32 {
    size + size / 2
}

/// Render the icon for `condition` at the given width. Rain, snow, and the
/// sun rays use the caller's RNG so repeated banners do not repeat pixels.
pub fn render(condition: Condition, size: u32, rng: &mut impl Rng) -> Canvas {
    let mut canvas = Canvas::new(size, canvas_height(size));
    let s = size as f32;

    match condition {
        Condition::Clear => sun(&mut canvas, s),
        Condition::Clouds => clouds(&mut canvas, s),
        Condition::Rain => rain(&mut canvas, s, rng),
        Condition::Snow => snow(&mut canvas, s, rng),
        Condition::Thunderstorm => thunderstorm(&mut canvas, s),
        Condition::Fog | Condition::Mist => fog(&mut canvas, s),
        Condition::Default => thermometer(&mut canvas, s),
    }

    canvas
}

fn fill(color: Color) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyle::with_fill(color.into())
}

fn stroke(color: Color) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyle::with_stroke(color.into(), 1)
}

fn pt(x: f32, y: f32) -> Point {
    Point::new(x as i32, y as i32)
}

fn sun(canvas: &mut Canvas, s: f32) {
    let yellow = Color::new(255, 255, 0);
    let center = s / 2.0;
    // Disc
    let _ = Circle::new(pt(s * 0.25, s * 0.25), (s / 2.0) as u32)
        .into_styled(fill(yellow))
        .draw(canvas);
    // Eight rays
    for i in 0..8 {
        let angle = i as f32 * PI / 4.0;
        let end_x = center + angle.cos() * s * 0.48;
        let end_y = center + angle.sin() * s * 0.48;
        let _ = Line::new(pt(center, center), pt(end_x, end_y))
            .into_styled(stroke(yellow))
            .draw(canvas);
    }
}

fn clouds(canvas: &mut Canvas, s: f32) {
    for (dx, dy, w, h, grey) in [
        (0.0, s / 3.0, s * 0.6, s * 0.47, 220u8),
        (s * 0.3, 0.0, s * 0.6, s * 0.7, 230),
        (s * 0.1, s * 0.2, s * 0.6, s * 0.7, 240),
    ] {
        let _ = Ellipse::new(pt(dx, dy), Size::new(w as u32, h as u32))
            .into_styled(fill(Color::new(grey, grey, grey)))
            .draw(canvas);
    }
}

fn cloud_pair(canvas: &mut Canvas, s: f32, lower: u8, upper: u8) {
    let _ = Ellipse::new(pt(0.0, s / 3.0), Size::new((s * 0.6) as u32, (s * 0.47) as u32))
        .into_styled(fill(Color::new(lower, lower, lower)))
        .draw(canvas);
    let _ = Ellipse::new(pt(s * 0.3, 0.0), Size::new((s * 0.6) as u32, (s * 0.7) as u32))
        .into_styled(fill(Color::new(upper, upper, upper)))
        .draw(canvas);
}

fn rain(canvas: &mut Canvas, s: f32, rng: &mut impl Rng) {
    cloud_pair(canvas, s, 150, 180);
    let drop = Color::new(100, 100, 255);
    for i in 0..5 {
        let x = s * 0.2 + i as f32 * s * 0.15;
        let y = rng.gen_range(s * 0.7..s * 1.1);
        let _ = Line::new(pt(x, y), pt(x, y + s * 0.3))
            .into_styled(stroke(drop))
            .draw(canvas);
    }
}

fn thunderstorm(canvas: &mut Canvas, s: f32) {
    cloud_pair(canvas, s, 80, 100);
    // Lightning bolt as two stacked triangles.
    let bolt = fill(Color::new(255, 255, 0));
    let _ = Triangle::new(pt(s * 0.5, s * 0.3), pt(s * 0.4, s * 0.55), pt(s * 0.58, s * 0.5))
        .into_styled(bolt)
        .draw(canvas);
    let _ = Triangle::new(pt(s * 0.55, s * 0.45), pt(s * 0.42, s * 0.8), pt(s * 0.62, s * 0.5))
        .into_styled(bolt)
        .draw(canvas);
}

fn snow(canvas: &mut Canvas, s: f32, rng: &mut impl Rng) {
    cloud_pair(canvas, s, 230, 240);
    let white = Color::new(255, 255, 255);
    for _ in 0..8 {
        let cx = rng.gen_range(0.0..s);
        let cy = rng.gen_range(s * 0.7..s * 1.2);
        // Six-armed flake
        for i in 0..6 {
            let angle = i as f32 * PI / 3.0;
            let _ = Line::new(pt(cx, cy), pt(cx + angle.cos() * 3.0, cy + angle.sin() * 3.0))
                .into_styled(stroke(white))
                .draw(canvas);
        }
    }
}

fn fog(canvas: &mut Canvas, s: f32) {
    // Layered horizontal banks.
    for (i, grey) in [200u8, 170, 190, 160].into_iter().enumerate() {
        let y = s * 0.25 + i as f32 * s * 0.2;
        let inset = if i % 2 == 0 { 0.0 } else { s * 0.15 };
        let _ = Line::new(pt(inset, y), pt(s - 1.0 - inset, y))
            .into_styled(stroke(Color::new(grey, grey, grey)))
            .draw(canvas);
    }
}

fn thermometer(canvas: &mut Canvas, s: f32) {
    let red = Color::new(255, 50, 50);
    let _ = Rectangle::new(pt(s * 0.3, 0.0), Size::new((s * 0.4) as u32, (s * 0.8) as u32))
        .into_styled(fill(red))
        .draw(canvas);
    let _ = Ellipse::new(pt(s * 0.2, s * 0.6), Size::new((s * 0.6) as u32, (s * 0.6) as u32))
        .into_styled(fill(red))
        .draw(canvas);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn lit_pixels(canvas: &Canvas) -> usize {
        (0..canvas.height())
            .flat_map(|y| (0..canvas.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y) != Some(Color::BLACK))
            .count()
    }

    #[rstest]
    #[case(Condition::Clear)]
    #[case(Condition::Clouds)]
    #[case(Condition::Rain)]
    #[case(Condition::Snow)]
    #[case(Condition::Thunderstorm)]
    #[case(Condition::Fog)]
    #[case(Condition::Mist)]
    #[case(Condition::Default)]
    fn every_condition_draws_something(#[case] condition: Condition) {
        let mut rng = StdRng::seed_from_u64(7);
        let icon = render(condition, 24, &mut rng);
        assert_eq!(icon.width(), 24);
        assert_eq!(icon.height(), 36);
        assert!(lit_pixels(&icon) > 10);
    }

    #[test]
    fn default_icon_is_the_red_thermometer() {
        let mut rng = StdRng::seed_from_u64(7);
        let icon = render(Condition::Default, 24, &mut rng);
        let red = Color::new(255, 50, 50);
        // Stem pixel and bulb pixel.
        assert_eq!(icon.get_pixel(12, 4), Some(red));
        assert_eq!(icon.get_pixel(12, 20), Some(red));
        // Nothing but red in this glyph.
        for y in 0..icon.height() {
            for x in 0..icon.width() {
                let c = icon.get_pixel(x, y).unwrap();
                assert!(c == Color::BLACK || c == red);
            }
        }
    }

    #[test]
    fn sun_is_yellow_at_center() {
        let mut rng = StdRng::seed_from_u64(7);
        let icon = render(Condition::Clear, 24, &mut rng);
        assert_eq!(icon.get_pixel(12, 12), Some(Color::new(255, 255, 0)));
    }
}
