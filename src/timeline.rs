//! Scroll-scrubbed transform timeline.
//!
//! A [`ScrollTimeline`] is a list of relative transform changes placed on a
//! time axis. Sampling it at a normalized progress evaluates every segment
//! from scratch against the base transform, so the result only depends on
//! the progress and never on the scrub history.

use std::collections::HashMap;

use cgmath::{Quaternion, Rad, Rotation3, Vector3, Zero};

use crate::{data_structures::instance::Instance, tween::Ease};

/// Duration a segment gets when none is given.
pub const DEFAULT_SEGMENT_DURATION: f32 = 0.5;

/// Position plus XYZ Euler rotation (radians) of the animated root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl Transform {
    pub fn new(position: Vector3<f32>, rotation: Vector3<f32>) -> Self {
        Self { position, rotation }
    }

    /// Rotation quaternion for the XYZ Euler order (`Rx * Ry * Rz`).
    pub fn quaternion(&self) -> Quaternion<f32> {
        Quaternion::from_angle_x(Rad(self.rotation.x))
            * Quaternion::from_angle_y(Rad(self.rotation.y))
            * Quaternion::from_angle_z(Rad(self.rotation.z))
    }

    pub fn to_instance(&self) -> Instance {
        Instance {
            position: self.position,
            rotation: self.quaternion(),
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vector3::zero(), Vector3::zero())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Property {
    Position,
    Rotation,
}

/// Where a new segment starts.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// At the current end of the timeline.
    Sequential,
    /// At a named label. An unknown label is created at the current end.
    Label(String),
    /// At an absolute time.
    At(f32),
}

impl From<&str> for Placement {
    fn from(label: &str) -> Self {
        Placement::Label(label.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineSegment {
    pub property: Property,
    pub delta: Vector3<f32>,
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl TimelineSegment {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Share of `delta` applied at timeline time `time`.
    fn weight(&self, time: f32) -> f32 {
        if self.duration <= f32::EPSILON {
            return if time >= self.start { 1.0 } else { 0.0 };
        }
        self.ease.apply((time - self.start) / self.duration)
    }
}

#[derive(Clone, Debug)]
pub struct ScrollTimeline {
    base: Transform,
    segments: Vec<TimelineSegment>,
    labels: HashMap<String, f32>,
}

impl ScrollTimeline {
    pub fn new(base: Transform) -> Self {
        Self {
            base,
            segments: Vec::new(),
            labels: HashMap::new(),
        }
    }

    /// Appends a segment with the default duration and ease.
    pub fn to(self, property: Property, delta: Vector3<f32>, placement: impl Into<Placement>) -> Self {
        self.to_with(
            property,
            delta,
            placement,
            DEFAULT_SEGMENT_DURATION,
            Ease::default(),
        )
    }

    pub fn to_with(
        mut self,
        property: Property,
        delta: Vector3<f32>,
        placement: impl Into<Placement>,
        duration: f32,
        ease: Ease,
    ) -> Self {
        let end = self.duration();
        let start = match placement.into() {
            Placement::Sequential => end,
            Placement::At(time) => time.max(0.0),
            Placement::Label(label) => *self.labels.entry(label).or_insert(end),
        };
        self.segments.push(TimelineSegment {
            property,
            delta,
            start,
            duration: duration.max(0.0),
            ease,
        });
        self
    }

    pub fn base(&self) -> &Transform {
        &self.base
    }

    pub fn segments(&self) -> &[TimelineSegment] {
        &self.segments
    }

    pub fn label(&self, name: &str) -> Option<f32> {
        self.labels.get(name).copied()
    }

    /// End time of the last segment.
    pub fn duration(&self) -> f32 {
        self.segments
            .iter()
            .map(TimelineSegment::end)
            .fold(0.0, f32::max)
    }

    /// Transform at timeline time `time` (seconds on the timeline axis).
    pub fn sample_time(&self, time: f32) -> Transform {
        self.segments
            .iter()
            .fold(self.base, |mut transform, segment| {
                let offset = segment.delta * segment.weight(time);
                match segment.property {
                    Property::Position => transform.position += offset,
                    Property::Rotation => transform.rotation += offset,
                }
                transform
            })
    }

    /// Transform at normalized scroll progress `progress ∈ [0, 1]`.
    pub fn sample(&self, progress: f32) -> Transform {
        self.sample_time(progress.clamp(0.0, 1.0) * self.duration())
    }
}

/// Scroll range between a start and an end anchor, in page pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollBounds {
    pub start: f32,
    pub end: f32,
}

impl ScrollBounds {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Bounds for a "top top" start and a "bottom bottom" end: scrolling
    /// starts when the start anchor's top reaches the viewport top and ends
    /// when the end anchor's bottom reaches the viewport bottom.
    pub fn from_anchors(start_top: f32, end_bottom: f32, viewport_height: f32) -> Self {
        Self::new(start_top, end_bottom - viewport_height)
    }

    pub fn progress(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span <= f32::EPSILON {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Scroll emulation for hosts without a scrolling page: a virtual page of
/// `sections` viewport-high sections moved by the mouse wheel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualScroll {
    offset: f32,
    sections: u32,
    viewport_height: f32,
}

impl VirtualScroll {
    pub fn new(sections: u32, viewport_height: f32) -> Self {
        Self {
            offset: 0.0,
            sections: sections.max(1),
            viewport_height: viewport_height.max(1.0),
        }
    }

    pub fn bounds(&self) -> ScrollBounds {
        let page = self.sections as f32 * self.viewport_height;
        ScrollBounds::from_anchors(0.0, page, self.viewport_height)
    }

    pub fn resize(&mut self, viewport_height: f32) {
        let progress = self.progress();
        self.viewport_height = viewport_height.max(1.0);
        let bounds = self.bounds();
        self.offset = bounds.start + progress * (bounds.end - bounds.start);
    }

    /// Scrolls by `delta` pixels (positive is down the page).
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        let bounds = self.bounds();
        self.offset = (self.offset + delta).clamp(bounds.start, bounds.end.max(bounds.start));
        self.progress()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn progress(&self) -> f32 {
        self.bounds().progress(self.offset)
    }
}
