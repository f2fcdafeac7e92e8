//! Firework particle overlay.
//!
//! Process-wide animation state, restructured as explicit objects the
//! scheduler advances once per tick: [`FireworkSystem`] owns the live
//! [`Firework`]s, each firework owns its trail and explosion particles.
//! Nothing here touches the clock — the caller supplies the elapsed time,
//! so tests advance deterministically with a seeded RNG.

use crate::Color;
use crate::canvas::Canvas;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f32::consts::TAU;

const GRAVITY: f32 = 0.05;

/// Palette of explosion color themes; one is picked per launch.
const COLOR_THEMES: [[Color; 3]; 5] = [
    // Red-orange
    [Color::new(255, 50, 50), Color::new(255, 150, 50), Color::new(255, 255, 50)],
    // Blue
    [Color::new(50, 50, 255), Color::new(50, 150, 255), Color::new(50, 255, 255)],
    // Green-yellow
    [Color::new(50, 255, 50), Color::new(150, 255, 50), Color::new(255, 255, 50)],
    // Purple-pink
    [Color::new(255, 50, 255), Color::new(255, 150, 255), Color::new(255, 200, 255)],
    // White-blue
    [Color::new(255, 255, 255), Color::new(200, 200, 255), Color::new(150, 150, 255)],
];

const TRAIL_COLOR: Color = Color::new(150, 150, 50);
const ROCKET_COLOR: Color = Color::new(255, 255, 150);

// ── Particle ───────────────────────────────────────────────────────

/// One ballistic spark. Alive while `age < lifetime`.
#[derive(Clone, Debug)]
pub struct FireworkParticle {
    x: f32,
    y: f32,
    velocity_x: f32,
    velocity_y: f32,
    base_color: Color,
    age: u32,
    lifetime: u32,
}

impl FireworkParticle {
    pub fn new(x: f32, y: f32, angle: f32, speed: f32, color: Color, lifetime: u32) -> Self {
        Self {
            x,
            y,
            velocity_x: angle.cos() * speed,
            velocity_y: angle.sin() * speed,
            base_color: color,
            age: 0,
            lifetime: lifetime.max(1),
        }
    }

    /// Advance one tick: velocity, then gravity, then aging. Returns whether
    /// the particle is still alive.
    fn step(&mut self) -> bool {
        self.x += self.velocity_x;
        self.y += self.velocity_y;
        self.velocity_y += GRAVITY;
        self.age += 1;
        self.age < self.lifetime
    }

    /// Current draw color: base scaled by `1 - age/lifetime`, so channels
    /// fade monotonically and hit zero exactly at end of life.
    pub fn color(&self) -> Color {
        let fade = 1.0 - self.age as f32 / self.lifetime as f32;
        self.base_color.scaled(fade)
    }

    fn draw(&self, canvas: &mut Canvas) {
        draw_point(canvas, self.x, self.y, self.color());
    }

    #[cfg(test)]
    fn aged(mut self, age: u32) -> Self {
        self.age = age;
        self
    }
}

/// Single-pixel plot at a rounded position, culled outside the canvas.
fn draw_point(canvas: &mut Canvas, x: f32, y: f32, color: Color) {
    if x >= 0.0 && y >= 0.0 {
        canvas.set_pixel(x as u32, y as u32, color);
    }
}

// ── Firework ───────────────────────────────────────────────────────

/// Lifecycle phase: `Ascending → Exploding → Extinguished`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireworkPhase {
    Ascending,
    Exploding,
    Extinguished,
}

pub struct Firework {
    x: f32,
    y: f32,
    target_y: f32,
    speed: f32,
    colors: [Color; 3],
    trail: Vec<FireworkParticle>,
    particles: Vec<FireworkParticle>,
    exploded: bool,
}

impl Firework {
    /// Launch from the bottom edge at a random horizontal position, aiming
    /// at a random apogee.
    pub fn launch(width: u32, height: u32, rng: &mut impl Rng) -> Self {
        let (x_lo, x_hi) = if width > 40 { (20, width - 20) } else { (0, width.max(1)) };
        let apogee_hi = height.saturating_sub(10).max(6);
        Self {
            x: rng.gen_range(x_lo..x_hi) as f32,
            y: height as f32,
            target_y: rng.gen_range(5..apogee_hi) as f32,
            speed: rng.gen_range(0.5..1.5),
            colors: COLOR_THEMES[rng.gen_range(0..COLOR_THEMES.len())],
            trail: Vec::new(),
            particles: Vec::new(),
            exploded: false,
        }
    }

    pub fn phase(&self) -> FireworkPhase {
        if !self.exploded {
            FireworkPhase::Ascending
        } else if self.trail.is_empty() && self.particles.is_empty() {
            FireworkPhase::Extinguished
        } else {
            FireworkPhase::Exploding
        }
    }

    /// Advance one tick. Returns whether the firework is still active.
    pub fn step(&mut self, rng: &mut impl Rng) -> bool {
        if !self.exploded {
            // Sparks shed while climbing.
            if rng.r#gen::<f32>() < 0.3 {
                self.trail.push(FireworkParticle::new(
                    self.x,
                    self.y,
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(0.2..0.5),
                    TRAIL_COLOR,
                    10,
                ));
            }

            self.y -= self.speed;
            if self.y <= self.target_y {
                self.explode(rng);
            }
        }

        self.trail.retain_mut(FireworkParticle::step);
        self.particles.retain_mut(FireworkParticle::step);

        self.phase() != FireworkPhase::Extinguished
    }

    /// The single ascending → exploding transition: burst into 20–40
    /// particles with randomized angle, speed, and lifetime, colored from
    /// the launch theme.
    fn explode(&mut self, rng: &mut impl Rng) {
        self.exploded = true;
        let count = rng.gen_range(20..=40);
        for _ in 0..count {
            self.particles.push(FireworkParticle::new(
                self.x,
                self.y,
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.5..2.0),
                self.colors[rng.gen_range(0..3)],
                rng.gen_range(20..=40),
            ));
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        for p in &self.trail {
            p.draw(canvas);
        }
        if !self.exploded {
            draw_point(canvas, self.x, self.y, ROCKET_COLOR);
        }
        for p in &self.particles {
            p.draw(canvas);
        }
    }
}

// ── System ─────────────────────────────────────────────────────────

/// Owns the live fireworks and the launch pacing. Lifecycle is the display
/// loop's; nothing is persisted.
pub struct FireworkSystem {
    width: u32,
    height: u32,
    fireworks: Vec<Firework>,
    since_launch: f32,
    launch_interval: f32,
    rng: StdRng,
}

impl FireworkSystem {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// Deterministic system for tests.
    pub fn seeded(width: u32, height: u32, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u32, height: u32, mut rng: StdRng) -> Self {
        let launch_interval = rng.gen_range(1.0..3.0);
        Self {
            width,
            height,
            fireworks: Vec::new(),
            since_launch: 0.0,
            launch_interval,
            rng,
        }
    }

    /// Advance the whole system by `dt` seconds (one tick): maybe launch,
    /// then step every firework and drop the extinguished ones.
    pub fn advance(&mut self, dt: f32) {
        self.since_launch += dt;
        if self.since_launch > self.launch_interval {
            self.fireworks
                .push(Firework::launch(self.width, self.height, &mut self.rng));
            self.since_launch = 0.0;
            self.launch_interval = self.rng.gen_range(1.0..3.0);
        }

        let rng = &mut self.rng;
        self.fireworks.retain_mut(|fw| fw.step(rng));
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        for fw in &self.fireworks {
            fw.draw(canvas);
        }
    }

    pub fn active_count(&self) -> usize {
        self.fireworks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn particle_fade_is_monotone_and_reaches_black() {
        let p = FireworkParticle::new(0.0, 0.0, 0.0, 1.0, Color::new(255, 150, 50), 30);
        let mut last = Color::new(255, 255, 255);
        for age in 0..=30 {
            let c = p.clone().aged(age).color();
            assert!(c.r <= last.r && c.g <= last.g && c.b <= last.b);
            last = c;
        }
        assert_eq!(p.aged(30).color(), Color::BLACK);
    }

    #[test]
    fn particle_dies_at_lifetime() {
        let mut p = FireworkParticle::new(0.0, 0.0, 0.0, 0.0, Color::new(255, 0, 0), 3);
        assert!(p.step());
        assert!(p.step());
        assert!(!p.step());
    }

    #[test]
    fn gravity_pulls_particles_down() {
        // Fired horizontally: vertical velocity starts at 0 and grows.
        let mut p = FireworkParticle::new(10.0, 10.0, 0.0, 1.0, Color::new(255, 0, 0), 100);
        let y0 = p.y;
        for _ in 0..20 {
            p.step();
        }
        assert!(p.y > y0);
    }

    #[test]
    fn firework_explodes_exactly_once_at_apogee() {
        let mut rng = rng();
        let mut fw = Firework::launch(100, 50, &mut rng);
        assert_eq!(fw.phase(), FireworkPhase::Ascending);

        let mut transitions = 0;
        let mut prev = fw.phase();
        for _ in 0..2000 {
            fw.step(&mut rng);
            let now = fw.phase();
            if prev == FireworkPhase::Ascending && now == FireworkPhase::Exploding {
                transitions += 1;
                // Fired at the first tick the rocket reached its apogee.
                assert!(fw.y <= fw.target_y);
            }
            // No path back from a later phase.
            assert!(!(prev == FireworkPhase::Exploding && now == FireworkPhase::Ascending));
            assert!(!(prev == FireworkPhase::Extinguished && now != FireworkPhase::Extinguished));
            prev = now;
            if now == FireworkPhase::Extinguished {
                break;
            }
        }
        assert_eq!(transitions, 1);
        assert_eq!(fw.phase(), FireworkPhase::Extinguished);
    }

    #[test]
    fn extinguished_only_after_all_particles_gone() {
        let mut rng = rng();
        let mut fw = Firework::launch(100, 50, &mut rng);
        while fw.step(&mut rng) {
            if fw.phase() == FireworkPhase::Exploding {
                assert!(!fw.trail.is_empty() || !fw.particles.is_empty());
            }
        }
        assert!(fw.trail.is_empty() && fw.particles.is_empty());
    }

    #[test]
    fn explosion_spawns_20_to_40_themed_particles() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut fw = Firework::launch(100, 50, &mut rng);
            while fw.phase() == FireworkPhase::Ascending {
                fw.step(&mut rng);
            }
            assert!((20..=40).contains(&fw.particles.len()));
            for p in &fw.particles {
                assert!(fw.colors.contains(&p.base_color));
            }
        }
    }

    #[test]
    fn system_launches_after_interval_elapses() {
        let mut system = FireworkSystem::seeded(100, 36, 1);
        assert_eq!(system.active_count(), 0);
        // Launch intervals are capped at 3 s, so 4 simulated seconds must
        // see at least one launch.
        let mut saw_launch = false;
        for _ in 0..240 {
            system.advance(1.0 / 60.0);
            saw_launch |= system.active_count() > 0;
        }
        assert!(saw_launch);
    }

    #[test]
    fn system_retires_extinguished_fireworks() {
        let mut system = FireworkSystem::seeded(100, 36, 1);
        // Long run: launches keep happening, but retirement keeps the live
        // set bounded well under the launch total.
        for _ in 0..5000 {
            system.advance(1.0 / 60.0);
        }
        assert!(system.active_count() < 20);
    }

    #[test]
    fn draw_culls_out_of_bounds_particles() {
        let mut canvas = Canvas::new(10, 10);
        draw_point(&mut canvas, -1.0, 5.0, Color::new(255, 0, 0));
        draw_point(&mut canvas, 5.0, 50.0, Color::new(255, 0, 0));
        draw_point(&mut canvas, 5.0, 5.0, Color::new(255, 0, 0));
        assert_eq!(canvas.get_pixel(5, 5), Some(Color::new(255, 0, 0)));
        let lit = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y) != Some(Color::BLACK))
            .count();
        assert_eq!(lit, 1);
    }
}
