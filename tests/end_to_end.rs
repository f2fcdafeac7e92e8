//! End-to-end scenarios: content rendering through scrolling to a sink.

use led_marquee_rs::Color;
use led_marquee_rs::banner;
use led_marquee_rs::canvas::Canvas;
use led_marquee_rs::config::MarqueeConfig;
use led_marquee_rs::fireworks::FireworkSystem;
use led_marquee_rs::mapping::{BoundsPolicy, PanelTopology, WiringMode};
use led_marquee_rs::scheduler::{Clock, PassOutcome, Scheduler};
use led_marquee_rs::sink::MemorySink;
use led_marquee_rs::text::{MonoText, TextRenderer};
use led_marquee_rs::weather::{OfflineWeather, WeatherProvider};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

struct InstantClock;

impl Clock for InstantClock {
    fn sleep(&mut self, _duration: Duration) {}
}

/// Failed weather fetch → the banner shows "N/A°F" and the thermometer.
#[test]
fn unavailable_weather_renders_na_and_thermometer() {
    let report = OfflineWeather.fetch("State College");
    let renderer = MonoText::from_name("6x13");
    let mut rng = StdRng::seed_from_u64(11);

    let text = banner::compose_weather_text("3:07 PM", &report);
    assert!(text.contains("N/A°F"), "got {text:?}");
    assert!(text.contains("Weather Unavailable"));

    let strip = banner::time_weather_strip(&renderer, 36, "3:07 PM", &report, Color::new(0, 200, 255), &mut rng);

    // The icon sits right of the text; the default glyph is the all-red
    // thermometer.
    let (text_w, _) = renderer.measure(&text);
    let thermometer_red = Color::new(255, 50, 50);
    let icon_pixels = (text_w..strip.width())
        .flat_map(|x| (0..strip.height()).map(move |y| (x, y)))
        .filter_map(|(x, y)| strip.get_pixel(x, y))
        .filter(|c| !c.is_black())
        .collect::<Vec<_>>();
    assert!(!icon_pixels.is_empty());
    assert!(icon_pixels.iter().all(|&c| c == thermometer_red));
}

/// Strips of 100/150/100 px with 60 px spacing make a 470 px banner, and
/// one full loop at step 2 is exactly 235 ticks.
#[test]
fn banner_of_470px_scrolls_in_235_ticks() {
    let items = [
        Canvas::new(100, 16),
        Canvas::new(150, 16),
        Canvas::new(100, 16),
    ];
    let strip = banner::continuous_banner(&items, 60, 16);
    assert_eq!(strip.width(), 470);

    let topology = PanelTopology::for_matrix(
        32,
        16,
        32,
        1,
        WiringMode::RowSerpentine,
        false,
        BoundsPolicy::Reject,
    )
    .unwrap();
    let scheduler = Scheduler::new(topology, Color::BLACK, 100, 2, Duration::from_millis(8));
    let mut fireworks = FireworkSystem::seeded(32, 16, 5);
    let mut sink = MemorySink::new(topology.led_count());
    let quit = AtomicBool::new(true);

    let outcome = scheduler
        .run_pass(&strip, 1, &mut fireworks, &mut sink, &mut InstantClock, &quit)
        .unwrap();

    assert_eq!(outcome, PassOutcome::Completed);
    assert_eq!(sink.frames().len(), 235);
}

/// A 384×32 panel-chain matrix addresses 12288 distinct LEDs.
#[test]
fn panel_chain_384x32_is_a_bijection_over_12288() {
    let mut cfg = MarqueeConfig::default();
    cfg.matrix.cols = 384;
    cfg.matrix.rows = 32;
    cfg.matrix.wiring = WiringMode::PanelSerpentine;

    let topology = cfg.topology().unwrap();
    assert_eq!(topology.led_count(), 12288);

    let mut seen = vec![false; topology.led_count()];
    for y in 0..topology.led_rows() {
        for x in 0..topology.led_cols() {
            let idx = topology.map(x, y).unwrap();
            assert!(!seen[idx], "index {idx} repeated");
            seen[idx] = true;
        }
    }
    assert!(seen.iter().all(|&hit| hit));
}

/// The full content path the binary takes: strips → looping banner →
/// scroll pass, with frames arriving in order and fully presented.
#[test]
fn full_cycle_produces_ordered_complete_frames() {
    let renderer = MonoText::from_name("9x18_bold");
    let report = OfflineWeather.fetch("anywhere");
    let mut rng = StdRng::seed_from_u64(23);

    let mut strips = vec![banner::time_weather_strip(
        &renderer,
        16,
        "12:00 PM",
        &report,
        Color::new(0, 200, 255),
        &mut rng,
    )];
    strips.push(banner::announcement_strip(
        &renderer,
        16,
        "HELLO",
        Color::new(252, 3, 3),
    ));
    let strip = banner::looping_banner(&strips, banner::DEFAULT_SPACING, 16);

    let topology = PanelTopology::for_matrix(
        64,
        16,
        64,
        1,
        WiringMode::RowSerpentine,
        false,
        BoundsPolicy::Reject,
    )
    .unwrap();
    let scheduler = Scheduler::new(topology, Color::BLACK, 75, 4, Duration::from_millis(8));
    let mut fireworks = FireworkSystem::seeded(64, 16, 9);
    let mut sink = MemorySink::new(topology.led_count());
    let quit = AtomicBool::new(true);

    let outcome = scheduler
        .run_pass(&strip, 1, &mut fireworks, &mut sink, &mut InstantClock, &quit)
        .unwrap();

    assert_eq!(outcome, PassOutcome::Completed);
    let expected_ticks = (strip.width() as usize).div_ceil(4);
    assert_eq!(sink.frames().len(), expected_ticks);
    assert_eq!(sink.staged_writes(), expected_ticks);
    for frame in sink.frames() {
        assert_eq!(frame.len(), topology.led_count());
    }
}
