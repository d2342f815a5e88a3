//! Water disturbance and tail splash audio.

use glam::Vec2;

use super::Body;
use crate::compute::GenomeRng;

/// Tail speed per tick above which the tail disturbs the water.
pub const SPEED_WAVE_THRESHOLD: f32 = 0.055;
pub const WAVE_RADIUS: f32 = 0.15;
pub const WAVE_INTENSITY_MIN: f32 = 0.05;
pub const WAVE_INTENSITY_MULTIPLIER: f32 = 2.0;
/// Fraction of the flare intensity that is randomized.
pub const WAVE_TURBULENCE: f32 = 0.4;
/// Body speed above which a splash sounds fast.
pub const FAST_THRESHOLD: f32 = 0.045;
pub const TAIL_AUDIO_THRESHOLD: f32 = 0.08;
pub const TAIL_AUDIO_RAMP: f32 = 0.025;
pub const TAIL_AUDIO_VOLUME_MIN: f32 = 0.4;
/// Ticks between two tail splashes of the same body.
pub const TAIL_AUDIO_COOLDOWN: u32 = 30;

/// Receiver of water surface disturbances.
pub trait FluidSink {
    fn add_flare(&mut self, position: Vec2, radius: f32, intensity: f32);
}

/// Tail splash sound variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailSplash {
    Fast,
    Big,
    Small,
}

/// Receiver of tail splash sounds.
pub trait AudioSink {
    /// `pan` is in `[-1, 1]`, `volume` in `[TAIL_AUDIO_VOLUME_MIN, 1]`.
    fn play_tail_splash(&mut self, splash: TailSplash, pan: f32, volume: f32);
}

/// No-op water sink.
#[derive(Debug, Default)]
pub struct NullFluid;

impl FluidSink for NullFluid {
    fn add_flare(&mut self, _position: Vec2, _radius: f32, _intensity: f32) {}
}

/// Everything a body may disturb while it swims.
pub struct Surroundings<'a> {
    pub water: &'a mut dyn FluidSink,
    pub audio: Option<&'a mut dyn AudioSink>,
    /// Pond width, used for stereo panning. Splashes outside `(0, width)`
    /// are silent.
    pub width: f32,
    pub rng: &'a mut GenomeRng,
}

impl Body {
    /// Emit a water flare and possibly a splash when the tail moves fast.
    pub(super) fn disturb_water(&mut self, speed: f32, surroundings: &mut Surroundings<'_>) {
        let tail_index = self.spine.len() - 2;
        let tail = self.spine[tail_index];
        let tail_speed = (tail - self.spine_previous[tail_index]).length();

        if tail_speed <= SPEED_WAVE_THRESHOLD {
            return;
        }

        let intensity =
            WAVE_INTENSITY_MIN + (tail_speed - SPEED_WAVE_THRESHOLD) * WAVE_INTENSITY_MULTIPLIER;
        let turbulence = surroundings.rng.float() * WAVE_TURBULENCE + (1.0 - WAVE_TURBULENCE);
        surroundings
            .water
            .add_flare(tail, WAVE_RADIUS, intensity * turbulence);

        if self.tail_audio_countdown != 0 || tail_speed <= TAIL_AUDIO_THRESHOLD {
            return;
        }
        let Some(audio) = surroundings.audio.as_deref_mut() else {
            return;
        };
        if tail.x <= 0.0 || tail.x >= surroundings.width {
            return;
        }

        let pan = 2.0 * tail.x / surroundings.width - 1.0;
        let ramp = ((tail_speed - TAIL_AUDIO_THRESHOLD) / TAIL_AUDIO_RAMP).min(1.0);
        let volume = TAIL_AUDIO_VOLUME_MIN + ramp * (1.0 - TAIL_AUDIO_VOLUME_MIN);
        let splash = if speed > FAST_THRESHOLD {
            TailSplash::Fast
        } else if self.is_heavy() {
            TailSplash::Big
        } else {
            TailSplash::Small
        };

        self.tail_audio_countdown = TAIL_AUDIO_COOLDOWN;
        log::trace!("Tail splash {:?} at pan {:.2}, volume {:.2}", splash, pan, volume);
        audio.play_tail_splash(splash, pan, volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BodyTraits;

    #[derive(Default)]
    struct Pond {
        flares: Vec<(Vec2, f32)>,
        splashes: Vec<(TailSplash, f32, f32)>,
    }

    impl FluidSink for Pond {
        fn add_flare(&mut self, position: Vec2, _radius: f32, intensity: f32) {
            self.flares.push((position, intensity));
        }
    }

    #[derive(Default)]
    struct Speaker(Vec<(TailSplash, f32, f32)>);

    impl AudioSink for Speaker {
        fn play_tail_splash(&mut self, splash: TailSplash, pan: f32, volume: f32) {
            self.0.push((splash, pan, volume));
        }
    }

    fn adult() -> Body {
        let mut body = Body::new(&BodyTraits {
            length: 200,
            radius: 128,
            growth_speed: 128,
            mating_frequency: 0,
            offspring_count: 0,
            age: u16::MAX,
        });
        body.move_to(Vec2::new(5.0, 5.0));
        body
    }

    #[test]
    fn test_slow_tail_is_silent() {
        let mut body = adult();
        let mut pond = Pond::default();
        let mut rng = GenomeRng::new(1);
        let mut surroundings = Surroundings {
            water: &mut pond,
            audio: None,
            width: 10.0,
            rng: &mut rng,
        };

        body.update(Vec2::new(5.0, 5.0), Vec2::X, 0.0, false, Some(&mut surroundings));
        assert!(pond.flares.is_empty());
        assert!(pond.splashes.is_empty());
    }

    #[test]
    fn test_fast_tail_flares_and_splashes_once() {
        let mut body = adult();
        let mut pond = Pond::default();
        let mut speaker = Speaker::default();
        let mut rng = GenomeRng::new(2);
        let mut head = Vec2::new(5.0, 5.0);

        for _ in 0..10 {
            head += Vec2::new(0.0, 0.3);
            let mut surroundings = Surroundings {
                water: &mut pond,
                audio: Some(&mut speaker),
                width: 10.0,
                rng: &mut rng,
            };
            body.update(head, Vec2::Y, 0.3, false, Some(&mut surroundings));
        }

        assert!(!pond.flares.is_empty());
        assert!(pond.flares.iter().all(|(_, intensity)| *intensity > 0.0));
        assert_eq!(speaker.0.len(), 1);

        let (splash, pan, volume) = speaker.0[0];
        assert_eq!(splash, TailSplash::Fast);
        assert!((-1.0..=1.0).contains(&pan));
        assert!((TAIL_AUDIO_VOLUME_MIN..=1.0).contains(&volume));
    }

    #[test]
    fn test_offscreen_tail_is_silent() {
        let mut body = adult();
        let mut fluid = NullFluid;
        let mut speaker = Speaker::default();
        let mut rng = GenomeRng::new(3);
        let mut head = Vec2::new(5.0, 5.0);

        for _ in 0..5 {
            head += Vec2::new(0.0, 0.3);
            let mut surroundings = Surroundings {
                water: &mut fluid,
                audio: Some(&mut speaker),
                width: 1.0,
                rng: &mut rng,
            };
            body.update(head, Vec2::Y, 0.3, false, Some(&mut surroundings));
        }

        assert!(speaker.0.is_empty());
    }
}
