//! Error taxonomy for scene setup and host bindings.
//!
//! Setup errors are fatal for the scene: they are raised once while the flow
//! is constructed and the event loop gives up on them. Binding errors are
//! only ever logged, a missing anchor element simply means that one input is
//! not wired.

use thiserror::Error;

use crate::material::MatcapId;

#[derive(Debug, Error)]
pub enum SetupError {
    /// A model or texture could not be read or decoded.
    #[error("failed to load asset `{path}`: {source}")]
    AssetLoad {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A shader patch targets an insertion point the base template lacks.
    ///
    /// This usually means the base template changed underneath the patch.
    #[error("shader template `{template}` has no insertion point `{point}`")]
    MissingInsertionPoint { template: String, point: String },

    #[error("insertion point `{point}` is declared twice in shader template `{template}`")]
    DuplicateInsertionPoint { template: String, point: String },

    #[error("insertion point `{point}` of shader template `{template}` is patched more than once")]
    ConflictingPatch { template: String, point: String },

    /// The configuration references a matcap that was never loaded.
    #[error("{0} is referenced by the configuration but was not loaded")]
    UnknownMatcap(MatcapId),
}

impl SetupError {
    pub fn asset(path: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        let source: anyhow::Error = source.into();
        Self::AssetLoad {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("no element matches `{selector}`")]
    MissingAnchor { selector: String },

    #[error("host event `{event}` could not be registered on `{selector}`")]
    ListenerRejected { selector: String, event: String },
}
