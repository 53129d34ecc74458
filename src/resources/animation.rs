//! Node animation channels as read from glTF, and their sampling.

use cgmath::{InnerSpace, Quaternion, Vector3};

use crate::data_structures::instance::Instance;

#[derive(Clone, Debug)]
pub enum Keyframes {
    Translation(Vec<Vector3<f32>>),
    Rotation(Vec<Quaternion<f32>>),
    Scale(Vec<Vector3<f32>>),
    /// Morph target weights and sparse data are not animated.
    Other,
}

pub trait Interpolate: Copy {
    fn interpolate(self, to: Self, t: f32) -> Self;
}

impl Interpolate for Vector3<f32> {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Quaternion<f32> {
    fn interpolate(self, to: Self, t: f32) -> Self {
        // take the short way around
        let to = if self.dot(to) < 0.0 { -to } else { to };
        self.nlerp(to, t)
    }
}

/// Linearly interpolated keyframes of one property.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel<T> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
}

impl<T: Interpolate> Channel<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Self {
        let len = times.len().min(values.len());
        if times.len() != values.len() {
            log::warn!(
                "animation channel has {} timestamps but {} values, truncating to {}",
                times.len(),
                values.len(),
                len
            );
        }
        let mut times = times;
        let mut values = values;
        times.truncate(len);
        values.truncate(len);
        Self { times, values }
    }

    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value at `time`, holding the first/last keyframe outside the range.
    pub fn sample(&self, time: f32) -> Option<T> {
        let first = *self.values.first()?;
        let idx = self.times.partition_point(|&t| t <= time);
        if idx == 0 {
            return Some(first);
        }
        if idx >= self.times.len() {
            return self.values.last().copied();
        }
        let (t0, t1) = (self.times[idx - 1], self.times[idx]);
        let span = t1 - t0;
        let t = if span > f32::EPSILON {
            (time - t0) / span
        } else {
            1.0
        };
        Some(self.values[idx - 1].interpolate(self.values[idx], t))
    }
}

/// All channels of one clip that target a single node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeAnimation {
    pub name: String,
    pub translation: Option<Channel<Vector3<f32>>>,
    pub rotation: Option<Channel<Quaternion<f32>>>,
    pub scale: Option<Channel<Vector3<f32>>>,
}

impl NodeAnimation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds the keyframes of one glTF channel. Unsupported outputs are
    /// dropped with a warning.
    pub fn add_channel(&mut self, times: Vec<f32>, keyframes: Keyframes) {
        match keyframes {
            Keyframes::Translation(values) => self.translation = Some(Channel::new(times, values)),
            Keyframes::Rotation(values) => self.rotation = Some(Channel::new(times, values)),
            Keyframes::Scale(values) => self.scale = Some(Channel::new(times, values)),
            Keyframes::Other => {
                log::warn!("clip `{}` has a channel that cannot be played", self.name)
            }
        }
    }

    pub fn duration(&self) -> f32 {
        let translation = self.translation.as_ref().map_or(0.0, Channel::duration);
        let rotation = self.rotation.as_ref().map_or(0.0, Channel::duration);
        let scale = self.scale.as_ref().map_or(0.0, Channel::duration);
        translation.max(rotation).max(scale)
    }

    /// The node's local transform at `time`. Properties without a channel
    /// keep their value from `rest`.
    pub fn sample(&self, time: f32, rest: &Instance) -> Instance {
        Instance {
            position: self
                .translation
                .as_ref()
                .and_then(|c| c.sample(time))
                .unwrap_or(rest.position),
            rotation: self
                .rotation
                .as_ref()
                .and_then(|c| c.sample(time))
                .unwrap_or(rest.rotation),
            scale: self
                .scale
                .as_ref()
                .and_then(|c| c.sample(time))
                .unwrap_or(rest.scale),
        }
    }
}
