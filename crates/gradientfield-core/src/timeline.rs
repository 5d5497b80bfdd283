//! Scroll-driven animation as data.
//!
//! A [`Timeline`] is a list of [`Track`]s, each mapping a slice of scroll
//! progress onto one animated property. Evaluating a timeline is a pure
//! function of a single progress value.

use std::f32::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Easing curves, named after their GSAP counterparts.
///
/// `In(n)`/`Out(n)`/`InOut(n)` are `powerN` curves: power1 is quadratic,
/// power4 quintic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    In(u8),
    Out(u8),
    InOut(u8),
    ExpoOut,
    SineInOut,
    /// Exponential settle used for smooth scrolling.
    SmoothScroll,
}

impl Easing {
    pub fn ease(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::In(level) => t.powi(exponent(level)),
            Easing::Out(level) => 1.0 - (1.0 - t).powi(exponent(level)),
            Easing::InOut(level) => {
                let n = exponent(level);
                if t < 0.5 {
                    2f32.powi(n - 1) * t.powi(n)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
                }
            }
            Easing::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::SmoothScroll => (1.001 - 2f32.powf(-10.0 * t)).min(1.0),
        }
    }
}

fn exponent(level: u8) -> i32 {
    i32::from(level.clamp(1, 4)) + 1
}

impl FromStr for Easing {
    type Err = Error;

    /// Parses GSAP ease names such as `power3.out`, `sine.inOut` or `none`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let unknown = || Error::InvalidConfig {
            field: "ease",
            reason: format!("unknown ease `{s}`"),
        };
        let (family, mode) = s.split_once('.').unwrap_or((s, "out"));
        match (family, mode) {
            ("none" | "linear", _) => Ok(Easing::Linear),
            ("expo", "out") => Ok(Easing::ExpoOut),
            ("sine", "inOut") => Ok(Easing::SineInOut),
            (power, mode) if power.starts_with("power") => {
                let level: u8 = power["power".len()..].parse().map_err(|_| unknown())?;
                if !(1..=4).contains(&level) {
                    return Err(unknown());
                }
                match mode {
                    "in" => Ok(Easing::In(level)),
                    "out" => Ok(Easing::Out(level)),
                    "inOut" => Ok(Easing::InOut(level)),
                    _ => Err(unknown()),
                }
            }
            _ => Err(unknown()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    TranslateX,
    TranslateY,
    Scale,
    /// Degrees.
    Rotation,
    /// Blur radius in pixels.
    Blur,
}

/// Resolved visual state of one animated element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub rotation: f32,
    pub blur: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            blur: 0.0,
        }
    }
}

impl Pose {
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::Opacity => self.opacity,
            Property::TranslateX => self.translate_x,
            Property::TranslateY => self.translate_y,
            Property::Scale => self.scale,
            Property::Rotation => self.rotation,
            Property::Blur => self.blur,
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        let slot = match property {
            Property::Opacity => &mut self.opacity,
            Property::TranslateX => &mut self.translate_x,
            Property::TranslateY => &mut self.translate_y,
            Property::Scale => &mut self.scale,
            Property::Rotation => &mut self.rotation,
            Property::Blur => &mut self.blur,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub start: f32,
    pub end: f32,
    pub easing: Easing,
    pub property: Property,
    pub from: f32,
    pub to: f32,
}

impl Track {
    pub fn value_at(&self, progress: f32) -> f32 {
        let span = self.end - self.start;
        let local = if span <= 0.0 {
            if progress >= self.end {
                1.0
            } else {
                0.0
            }
        } else {
            (progress - self.start) / span
        };
        let eased = self.easing.ease(local);
        self.from + (self.to - self.from) * eased
    }
}

/// Entrance animations offered by the site's scroll hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reveal {
    FadeUp,
    FadeLeft,
    FadeRight,
    ScaleUp,
    BlurIn,
    RotateIn,
}

impl Reveal {
    /// `(property, from, to)` triples for this entrance.
    fn channels(self) -> &'static [(Property, f32, f32)] {
        match self {
            Reveal::FadeUp => &[(Property::Opacity, 0.0, 1.0), (Property::TranslateY, 60.0, 0.0)],
            Reveal::FadeLeft => &[(Property::Opacity, 0.0, 1.0), (Property::TranslateX, -60.0, 0.0)],
            Reveal::FadeRight => &[(Property::Opacity, 0.0, 1.0), (Property::TranslateX, 60.0, 0.0)],
            Reveal::ScaleUp => &[(Property::Opacity, 0.0, 1.0), (Property::Scale, 0.8, 1.0)],
            Reveal::BlurIn => &[(Property::Opacity, 0.0, 1.0), (Property::Blur, 10.0, 0.0)],
            Reveal::RotateIn => &[
                (Property::Opacity, 0.0, 1.0),
                (Property::Rotation, -10.0, 0.0),
                (Property::TranslateY, 30.0, 0.0),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    tracks: Vec<Track>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// Shorthand for pushing a track over `start..end`.
    pub fn tween(self, start: f32, end: f32, property: Property, from: f32, to: f32, easing: Easing) -> Self {
        self.track(Track {
            start,
            end,
            easing,
            property,
            from,
            to,
        })
    }

    pub fn reveal(reveal: Reveal, start: f32, end: f32, easing: Easing) -> Self {
        reveal
            .channels()
            .iter()
            .fold(Self::new(), |timeline, &(property, from, to)| {
                timeline.tween(start, end, property, from, to, easing)
            })
    }

    /// One timeline per child, each starting `stagger` progress after the previous one.
    pub fn staggered(reveal: Reveal, children: usize, start: f32, span: f32, stagger: f32, easing: Easing) -> Vec<Self> {
        (0..children)
            .map(|i| {
                let offset = start + stagger * i as f32;
                Self::reveal(reveal, offset, offset + span, easing)
            })
            .collect()
    }

    /// The hero logo sinking and fading as the page scrolls past it.
    pub fn hero_exit() -> Self {
        Self::new()
            .tween(0.0, 0.35, Property::Opacity, 1.0, 0.0, Easing::Linear)
            .tween(0.0, 0.35, Property::Scale, 1.0, 0.85, Easing::Out(3))
            .tween(0.0, 0.35, Property::TranslateY, 0.0, -60.0, Easing::Out(3))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Resolve every property at `progress`. Later tracks override earlier
    /// ones on the same property.
    pub fn evaluate(&self, progress: f32) -> Pose {
        let mut pose = Pose::default();
        for track in &self.tracks {
            pose.set(track.property, track.value_at(progress));
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easings_hit_endpoints() {
        let all = [
            Easing::Linear,
            Easing::In(2),
            Easing::Out(3),
            Easing::InOut(1),
            Easing::InOut(4),
            Easing::ExpoOut,
            Easing::SineInOut,
        ];
        for easing in all {
            assert!(easing.ease(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
            assert!((easing.ease(-3.0)).abs() < 1e-6);
        }
        assert!((Easing::SmoothScroll.ease(1.0) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn power_curves_match_gsap() {
        assert!((Easing::Out(3).ease(0.5) - (1.0 - 0.5f32.powi(4))).abs() < 1e-6);
        assert!((Easing::In(1).ease(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::InOut(2).ease(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn parses_gsap_names() {
        assert_eq!("power3.out".parse::<Easing>().unwrap(), Easing::Out(3));
        assert_eq!("power2.inOut".parse::<Easing>().unwrap(), Easing::InOut(2));
        assert_eq!("power1".parse::<Easing>().unwrap(), Easing::Out(1));
        assert_eq!("none".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!("expo.out".parse::<Easing>().unwrap(), Easing::ExpoOut);
        assert!("power9.out".parse::<Easing>().is_err());
        assert!("bounce.out".parse::<Easing>().is_err());
    }

    #[test]
    fn track_clamps_outside_its_range() {
        let track = Track {
            start: 0.2,
            end: 0.6,
            easing: Easing::Linear,
            property: Property::Opacity,
            from: 0.0,
            to: 1.0,
        };
        assert_eq!(track.value_at(0.0), 0.0);
        assert!((track.value_at(0.4) - 0.5).abs() < 1e-6);
        assert_eq!(track.value_at(1.0), 1.0);
    }

    #[test]
    fn zero_length_track_is_a_step() {
        let track = Track {
            start: 0.5,
            end: 0.5,
            easing: Easing::Out(2),
            property: Property::Scale,
            from: 1.0,
            to: 2.0,
        };
        assert_eq!(track.value_at(0.49), 1.0);
        assert_eq!(track.value_at(0.5), 2.0);
    }

    #[test]
    fn fade_up_moves_in_from_below() {
        let timeline = Timeline::reveal(Reveal::FadeUp, 0.1, 0.3, Easing::Out(3));
        let before = timeline.evaluate(0.0);
        assert_eq!(before.opacity, 0.0);
        assert_eq!(before.translate_y, 60.0);
        let after = timeline.evaluate(0.5);
        assert_eq!(after, Pose::default());
    }

    #[test]
    fn staggered_children_start_in_sequence() {
        let children = Timeline::staggered(Reveal::ScaleUp, 3, 0.0, 0.2, 0.1, Easing::Linear);
        assert_eq!(children.len(), 3);
        let poses: Vec<Pose> = children.iter().map(|t| t.evaluate(0.15)).collect();
        assert!(poses[0].opacity > poses[1].opacity);
        assert!(poses[1].opacity > poses[2].opacity);
        assert_eq!(poses[2].opacity, 0.0);
        assert_eq!(poses[2].scale, 0.8);
    }

    #[test]
    fn later_tracks_win() {
        let timeline = Timeline::new()
            .tween(0.0, 1.0, Property::Opacity, 0.0, 1.0, Easing::Linear)
            .tween(0.0, 1.0, Property::Opacity, 1.0, 1.0, Easing::Linear);
        assert_eq!(timeline.evaluate(0.0).opacity, 1.0);
        assert_eq!(timeline.tracks().len(), 2);
    }

    #[test]
    fn hero_exit_fades_out() {
        let timeline = Timeline::hero_exit();
        assert_eq!(timeline.evaluate(0.0), Pose::default());
        let gone = timeline.evaluate(0.5);
        assert_eq!(gone.opacity, 0.0);
        assert!((gone.scale - 0.85).abs() < 1e-6);
    }
}
