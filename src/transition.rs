//! Matcap cross-fade state machine.
//!
//! Both material variants sample two matcaps and blend them with a wipe that
//! sweeps across the object in view space. [`TransitionState`] holds the two
//! matcap slots and the blend progress; [`MatcapTransition`] drives that state
//! from hover triggers and the frame clock.
//!
//! ```text
//!  Idle(a) --enter(b)--> Transitioning(a -> b, 0..1) --done--> Idle(b)
//!                              |  enter(c)
//!                              v
//!                        Transitioning(a -> c, 0..1)
//! ```
//!
//! A trigger while transitioning replaces the target and restarts the fade
//! from the texture that was last at rest.

use crate::{
    material::MatcapId,
    tween::{Ease, TweenSlot, TweenStatus},
};

/// Width of the wipe band in view-factor units.
pub const BLEND_BAND: f32 = 0.2;

/// Hermite smoothstep. Clamps `x` into the `[edge0, edge1]` range first, which
/// is what keeps negative lower edges (`sweep < BLEND_BAND`) well defined.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Screen-space factor the wipe runs along: the average of the view-space
/// x and y coordinates, rescaled from `[-1, 1]` to `[0, 1]`.
pub fn view_factor(view_x: f32, view_y: f32) -> f32 {
    (view_x + view_y) * 0.5 + 0.5
}

/// Weight of the primary matcap for a fragment with the given view factor.
///
/// Mirrors the patched fragment shader: `smoothstep(sweep - band, sweep, f)`.
pub fn blend_weight(sweep: f32, factor: f32) -> f32 {
    smoothstep(sweep - BLEND_BAND, sweep, factor)
}

/// The two matcap slots and the blend progress shared by every patched
/// material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    /// The matcap being faded to (or at rest on).
    pub primary: MatcapId,
    /// The matcap being faded from.
    pub secondary: MatcapId,
    /// `0` at the start of a fade, `1` once `primary` fully covers the object.
    pub progress: f32,
}

impl TransitionState {
    pub fn idle(active: MatcapId) -> Self {
        Self {
            primary: active,
            secondary: active,
            progress: 1.0,
        }
    }

    /// The shader-side sweep position.
    ///
    /// The wipe favours the primary matcap where the view factor lies above
    /// the sweep, so the sweep runs from 1 down to 0 while progress rises.
    pub fn sweep(&self) -> f32 {
        1.0 - self.progress.clamp(0.0, 1.0)
    }

    pub fn to_uniform(&self) -> TransitionUniform {
        TransitionUniform {
            sweep: self.sweep(),
            band: BLEND_BAND,
            _padding: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransitionUniform {
    sweep: f32,
    band: f32,
    // Uniform buffers are padded to 16 bytes for WebGL
    _padding: [f32; 2],
}

/// Observable phase of the machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle(MatcapId),
    Transitioning {
        from: MatcapId,
        to: MatcapId,
        progress: f32,
    },
}

/// Timing of a single fade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSettings {
    /// Seconds from trigger to rest.
    pub duration: f32,
    pub ease: Ease,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration: 0.3,
            ease: Ease::Power1Out,
        }
    }
}

/// Emitted by [`MatcapTransition::advance`] when a fade reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settled {
    pub active: MatcapId,
    pub environment: MatcapId,
}

#[derive(Debug)]
pub struct MatcapTransition {
    state: TransitionState,
    progress: TweenSlot<f32>,
    /// Environment target applied once the running fade completes.
    pending_environment: Option<MatcapId>,
    /// Flat matcap of the environment material, read by unpatched shaders.
    environment: MatcapId,
    settings: TransitionSettings,
}

impl MatcapTransition {
    /// Starts at rest on `active`; `environment` is the flat matcap the
    /// environment material shows until the first fade completes.
    pub fn new(active: MatcapId, environment: MatcapId, settings: TransitionSettings) -> Self {
        Self::from_state(TransitionState::idle(active), environment, settings)
    }

    pub fn from_state(
        state: TransitionState,
        environment: MatcapId,
        settings: TransitionSettings,
    ) -> Self {
        let state = TransitionState {
            progress: state.progress.clamp(0.0, 1.0),
            ..state
        };
        Self {
            progress: TweenSlot::new(state.progress),
            state,
            pending_environment: None,
            environment,
            settings,
        }
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn environment(&self) -> MatcapId {
        self.environment
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        if self.progress.is_running() {
            Phase::Transitioning {
                from: self.state.secondary,
                to: self.state.primary,
                progress: self.state.progress,
            }
        } else {
            Phase::Idle(self.state.primary)
        }
    }

    /// Fades to `target`. The environment's flat matcap becomes `environment`
    /// once the fade has settled. A running fade is overwritten, not queued.
    pub fn enter(&mut self, target: MatcapId, environment: MatcapId) {
        if let Phase::Transitioning { to, .. } = self.phase() {
            log::debug!("transition to {} overwritten by {}", to, target);
        }
        self.state.primary = target;
        self.state.progress = 0.0;
        self.pending_environment = Some(environment);
        self.progress
            .from_to(0.0, 1.0, self.settings.duration, self.settings.ease);
    }

    /// Advances the running fade by `dt` seconds.
    ///
    /// Returns the settled state exactly once per completed fade, after the
    /// progress has reached 1.
    pub fn advance(&mut self, dt: f32) -> Option<Settled> {
        match self.progress.advance(dt) {
            TweenStatus::Idle => None,
            TweenStatus::Running => {
                self.state.progress = self.progress.value();
                None
            }
            TweenStatus::Completed => {
                self.state.progress = 1.0;
                self.state.secondary = self.state.primary;
                if let Some(environment) = self.pending_environment.take() {
                    self.environment = environment;
                }
                Some(Settled {
                    active: self.state.primary,
                    environment: self.environment,
                })
            }
        }
    }
}
