//! Pointer parallax for the rendering surface.

use cgmath::{Vector2, Zero};

use crate::tween::{Ease, TweenSlot, TweenStatus};

/// Physical pixels to logical (CSS) pixels. A non-positive scale leaves the
/// value unchanged.
pub fn logical_pixels(physical: Vector2<f32>, scale_factor: f32) -> Vector2<f32> {
    if scale_factor > 0.0 {
        physical / scale_factor
    } else {
        physical
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxSettings {
    /// Divisor applied to the pointer's distance from the viewport centre.
    pub depth: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            depth: 20.0,
            duration: 1.0,
            ease: Ease::SLOW,
        }
    }
}

/// Screen-space translation of the surface that trails the pointer.
///
/// Offsets are in pixels, `+y` pointing down the screen.
#[derive(Clone, Debug)]
pub struct PointerParallax {
    settings: ParallaxSettings,
    offset: TweenSlot<Vector2<f32>>,
}

impl PointerParallax {
    pub fn new(settings: ParallaxSettings) -> Self {
        Self {
            settings,
            offset: TweenSlot::new(Vector2::zero()),
        }
    }

    /// Offset the surface settles on for a pointer at `pointer` in a viewport
    /// of `viewport` pixels.
    pub fn target_for(&self, pointer: Vector2<f32>, viewport: Vector2<f32>) -> Vector2<f32> {
        let depth = self.settings.depth.max(f32::EPSILON);
        (pointer - viewport / 2.0) / depth
    }

    /// Retargets the surface translation; a running tween is overwritten.
    pub fn pointer_moved(&mut self, pointer: Vector2<f32>, viewport: Vector2<f32>) {
        let target = self.target_for(pointer, viewport);
        self.offset
            .to(target, self.settings.duration, self.settings.ease);
    }

    pub fn advance(&mut self, dt: f32) -> TweenStatus {
        self.offset.advance(dt)
    }

    pub fn offset(&self) -> Vector2<f32> {
        self.offset.value()
    }

    pub fn is_moving(&self) -> bool {
        self.offset.is_running()
    }

    /// The pixel offset expressed in normalized device coordinates.
    pub fn ndc_offset(&self, viewport: Vector2<f32>) -> Vector2<f32> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return Vector2::zero();
        }
        let offset = self.offset();
        Vector2::new(2.0 * offset.x / viewport.x, -2.0 * offset.y / viewport.y)
    }
}
