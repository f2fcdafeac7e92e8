//! LED marquee display loop.
//!
//! Each cycle builds fresh content (clock string, weather report), holds a
//! static banner, then scrolls the continuous banner across the matrix
//! with the firework overlay underneath. Frames go to the simulator sink
//! (scaled PNG snapshots) on a development host; wiring a real chain means
//! constructing a `SmartLedSink` around the platform's driver instead.
//!
//! ```sh
//! led-marquee-rs --config marquee.json --snapshot-dir /tmp/frames
//! ```

use clap::Parser;
use led_marquee_rs::banner;
use led_marquee_rs::config::MarqueeConfig;
use led_marquee_rs::fireworks::FireworkSystem;
use led_marquee_rs::scheduler::{PassOutcome, Scheduler, SystemClock};
use led_marquee_rs::sink::SimulatorSink;
use led_marquee_rs::text::MonoText;
use led_marquee_rs::weather::{Condition, OfflineWeather, StaticWeather, WeatherProvider, WeatherReport};
use led_marquee_rs::{is_running, setup_signal_handler};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use time::macros::format_description;

/// Scrolling weather/announcement marquee for LED panel chains.
#[derive(Parser)]
#[command(name = "led-marquee-rs")]
#[command(about = "Scrolling weather/announcement marquee for LED panel chains")]
#[command(version)]
struct Args {
    /// Path to a JSON config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for simulator PNG snapshots (no snapshots when omitted)
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Simulator scale factor, screen pixels per LED
    #[arg(long, default_value = "4")]
    pixel_size: u32,

    /// Stop after this many content cycles (run forever when omitted)
    #[arg(long)]
    cycles: Option<u64>,

    /// Scroll each announcement as its own pass instead of one banner
    #[arg(long)]
    solo_announcements: bool,

    /// Fixed temperature in °F for offline demo runs
    #[arg(long)]
    temperature: Option<i32>,

    /// Fixed weather condition for offline demo runs (clear, rain, ...)
    #[arg(long)]
    condition: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .compact()
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = match &args.config {
        Some(path) => MarqueeConfig::load(path)?,
        None => MarqueeConfig::default(),
    };
    let topology = cfg.topology()?;

    tracing::info!("led-marquee-rs v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "matrix: {}x{} ({} LEDs), wiring {:?}",
        topology.led_cols(),
        topology.led_rows(),
        topology.led_count(),
        cfg.matrix.wiring
    );

    let quit = setup_signal_handler();

    let renderer = MonoText::from_name(&cfg.font);
    let mut rng = StdRng::from_entropy();
    let mut fireworks = FireworkSystem::new(topology.led_cols(), topology.led_rows());

    let main_delay = Duration::from_millis(cfg.main_delay_ms);
    let scheduler = Scheduler::new(
        topology,
        cfg.background(),
        cfg.brightness,
        cfg.scroll_step,
        main_delay,
    );
    let announcement_scheduler = Scheduler::new(
        topology,
        cfg.background(),
        cfg.brightness,
        cfg.scroll_step,
        Duration::from_millis(cfg.announcement_delay_ms),
    );

    let mut sink = SimulatorSink::new(topology, args.pixel_size).with_quit_flag(quit.clone());
    if let Some(dir) = &args.snapshot_dir {
        std::fs::create_dir_all(dir)?;
        sink = sink.with_snapshot_dir(dir.clone());
        tracing::info!("snapshots: {}", dir.display());
    }

    let mut provider: Box<dyn WeatherProvider> = match (&args.temperature, &args.condition) {
        (None, None) => Box::new(OfflineWeather),
        (temp, cond) => Box::new(StaticWeather(WeatherReport::new(
            *temp,
            cond.as_deref().map(Condition::from_label).unwrap_or_default(),
            cond.clone().unwrap_or_else(|| "Demo Weather".to_string()),
        ))),
    };

    let mut clock = SystemClock;
    let refresh = Duration::from_secs(cfg.weather.refresh_secs);
    let mut cached_report = provider.fetch(&cfg.weather.city);
    let mut fetched_at = Instant::now();
    let hold_ticks = cfg.static_secs * 1000 / cfg.main_delay_ms.max(1);

    let mut cycle = 0u64;
    while is_running(&quit) {
        if fetched_at.elapsed() >= refresh {
            cached_report = provider.fetch(&cfg.weather.city);
            fetched_at = Instant::now();
            tracing::info!("weather refreshed: {}", cached_report.description);
        }
        let time_str = current_time_string();
        tracing::info!(
            "cycle {cycle}: {} / {} {}°F",
            time_str,
            cached_report.description,
            cached_report.temperature_label()
        );

        // Static banner first, fireworks animating behind it.
        let static_frame = banner::static_banner(
            &renderer,
            topology.led_cols(),
            topology.led_rows(),
            &time_str,
            &cached_report,
            cfg.main_color(),
            &mut rng,
        );
        if scheduler.run_hold(&static_frame, hold_ticks, &mut fireworks, &mut sink, &mut clock, &quit)?
            == PassOutcome::Cancelled
        {
            break;
        }

        let outcome = if args.solo_announcements {
            solo_pass(
                &cfg,
                &renderer,
                (&scheduler, &announcement_scheduler),
                (topology.led_cols(), topology.led_rows()),
                &time_str,
                &cached_report,
                &mut rng,
                &mut fireworks,
                &mut sink,
                &mut clock,
                &quit,
            )?
        } else {
            // One seamless banner: time/weather, announcements, and a
            // duplicate of the time/weather strip closing the loop.
            let mut strips = vec![banner::time_weather_strip(
                &renderer,
                topology.led_rows(),
                &time_str,
                &cached_report,
                cfg.main_color(),
                &mut rng,
            )];
            for text in &cfg.announcements {
                strips.push(banner::announcement_strip(
                    &renderer,
                    topology.led_rows(),
                    text,
                    cfg.announcement_color(),
                ));
            }
            let strip = banner::looping_banner(&strips, banner::DEFAULT_SPACING, topology.led_rows());
            scheduler.run_pass(&strip, cfg.loops, &mut fireworks, &mut sink, &mut clock, &quit)?
        };
        if outcome == PassOutcome::Cancelled {
            break;
        }

        cycle += 1;
        if args.cycles.is_some_and(|n| cycle >= n) {
            break;
        }
    }

    tracing::info!("shutting down after {cycle} cycles, {} frames", sink.frames_presented());
    Ok(())
}

/// The older display style: the time/weather strip, then each announcement
/// scrolled as its own bounded pass at the announcement pace.
#[allow(clippy::too_many_arguments)]
fn solo_pass(
    cfg: &MarqueeConfig,
    renderer: &MonoText,
    (scheduler, announcement_scheduler): (&Scheduler, &Scheduler),
    (cols, rows): (u32, u32),
    time_str: &str,
    report: &WeatherReport,
    rng: &mut StdRng,
    fireworks: &mut FireworkSystem,
    sink: &mut SimulatorSink,
    clock: &mut SystemClock,
    quit: &std::sync::atomic::AtomicBool,
) -> Result<PassOutcome, led_marquee_rs::scheduler::TickError> {
    let strip = banner::time_weather_strip(renderer, rows, time_str, report, cfg.main_color(), rng);
    if scheduler.run_pass(&strip, cfg.loops, fireworks, sink, clock, quit)?
        == PassOutcome::Cancelled
    {
        return Ok(PassOutcome::Cancelled);
    }

    for text in &cfg.announcements {
        let strip = banner::scroll_strip(renderer, cols, rows, text, cfg.announcement_color());
        if announcement_scheduler.run_pass(&strip, 1, fireworks, sink, clock, quit)?
            == PassOutcome::Cancelled
        {
            return Ok(PassOutcome::Cancelled);
        }
    }
    Ok(PassOutcome::Completed)
}

/// 12-hour clock string, e.g. "3:07 PM". Falls back to UTC when the local
/// offset is unavailable (common inside containers).
fn current_time_string() -> String {
    let fmt = format_description!("[hour repr:12 padding:none]:[minute] [period]");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&fmt).unwrap_or_else(|_| "--:--".to_string())
}
