//! Device-class scaling and bounded random helpers
//!
//! Every other simulation component pulls its tuning from here: the device
//! class is fixed when a run is created and the resulting multipliers never
//! change for that run.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Coarse device class used to pick physics multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Classify a host from its pointer precision and viewport width
    pub fn detect(pointer_coarse: bool, viewport_width: u32) -> Self {
        if pointer_coarse && viewport_width <= 600 {
            DeviceClass::Mobile
        } else if pointer_coarse && viewport_width <= 1024 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mobile" | "phone" => Some(DeviceClass::Mobile),
            "tablet" => Some(DeviceClass::Tablet),
            "desktop" => Some(DeviceClass::Desktop),
            _ => None,
        }
    }

    /// Multiplier table for this class
    pub fn scales(&self) -> DeviceScales {
        match self {
            // Slower, floatier: longer airtime on small touch screens
            DeviceClass::Mobile => DeviceScales {
                acc: 0.75,
                max: 0.75,
                jump: 0.70,
                grav: 0.50,
                movement: 0.75,
                anim: 0.75,
                spring: 0.75,
            },
            DeviceClass::Tablet => DeviceScales {
                acc: 0.90,
                max: 0.90,
                jump: 0.85,
                grav: 0.70,
                movement: 0.90,
                anim: 0.90,
                spring: 0.90,
            },
            DeviceClass::Desktop => DeviceScales {
                acc: 1.15,
                max: 1.15,
                jump: 1.05,
                grav: 1.00,
                movement: 1.10,
                anim: 1.00,
                spring: 1.00,
            },
        }
    }
}

/// Per-device physics multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceScales {
    /// Horizontal acceleration
    pub acc: f32,
    /// Horizontal speed cap
    pub max: f32,
    /// Jump and jetpack velocity
    pub jump: f32,
    /// Gravity
    pub grav: f32,
    /// Moving platform and enemy patrol speed
    pub movement: f32,
    /// Break animation speed
    pub anim: f32,
    /// Spring boost
    pub spring: f32,
}

/// World tuning after device scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub jump_vel: f32,
    pub scroll_trigger_y: f32,
    pub gap_min: i32,
    pub gap_max: i32,
    pub platform_count: usize,
    pub wrap_margin: f32,
}

impl World {
    pub fn new(scales: &DeviceScales) -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            gravity: GRAVITY * scales.grav,
            jump_vel: JUMP_VELOCITY * scales.jump,
            scroll_trigger_y: SCROLL_TRIGGER_Y,
            gap_min: PLATFORM_GAP_MIN,
            gap_max: PLATFORM_GAP_MAX,
            platform_count: INITIAL_PLATFORM_COUNT,
            wrap_margin: WRAP_MARGIN,
        }
    }

    /// Mean platform gap, used to estimate rows crossed
    pub fn mean_gap(&self) -> f32 {
        (self.gap_min + self.gap_max) as f32 / 2.0
    }

    /// Player y beyond which the run is over
    pub fn fall_out_y(&self) -> f32 {
        self.height + FALL_OUT_MARGIN
    }
}

/// Uniform float in `[a, b)`
#[inline]
pub fn rand_f32(rng: &mut Pcg32, a: f32, b: f32) -> f32 {
    rng.random::<f32>() * (b - a) + a
}

/// Uniform integer in `[a, b)`
#[inline]
pub fn rand_i32(rng: &mut Pcg32, a: i32, b: i32) -> i32 {
    if b <= a {
        return a;
    }
    rng.random_range(a..b)
}

/// Returns true with probability `p`
#[inline]
pub fn chance(rng: &mut Pcg32, p: f32) -> bool {
    rng.random::<f32>() < p
}

/// -1.0 or 1.0 with equal probability
#[inline]
pub fn random_sign(rng: &mut Pcg32) -> f32 {
    if chance(rng, 0.5) { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_detect_device_class() {
        assert_eq!(DeviceClass::detect(true, 400), DeviceClass::Mobile);
        assert_eq!(DeviceClass::detect(true, 600), DeviceClass::Mobile);
        assert_eq!(DeviceClass::detect(true, 800), DeviceClass::Tablet);
        assert_eq!(DeviceClass::detect(true, 1024), DeviceClass::Tablet);
        assert_eq!(DeviceClass::detect(true, 1280), DeviceClass::Desktop);
        // Fine pointer is always desktop, even on a narrow window
        assert_eq!(DeviceClass::detect(false, 400), DeviceClass::Desktop);
    }

    #[test]
    fn test_device_names() {
        for class in [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop] {
            assert_eq!(DeviceClass::from_name(class.as_str()), Some(class));
        }
        assert_eq!(DeviceClass::from_name(" Desktop "), Some(DeviceClass::Desktop));
        assert_eq!(DeviceClass::from_name("console"), None);
    }

    #[test]
    fn test_world_scaling() {
        let desktop = World::new(&DeviceClass::Desktop.scales());
        assert!((desktop.gravity - 0.28).abs() < 1e-6);
        assert!((desktop.jump_vel - (-10.8 * 1.05)).abs() < 1e-5);

        let mobile = World::new(&DeviceClass::Mobile.scales());
        assert!((mobile.gravity - 0.14).abs() < 1e-6);
        assert_eq!(mobile.mean_gap(), 70.0);
    }

    proptest! {
        #[test]
        fn rand_helpers_stay_in_bounds(seed in any::<u64>(), a in -500i32..500, span in 1i32..200) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let b = a + span;
            let i = rand_i32(&mut rng, a, b);
            prop_assert!(i >= a && i < b);
            let f = rand_f32(&mut rng, a as f32, b as f32);
            prop_assert!(f >= a as f32 && f <= b as f32);
        }
    }
}
