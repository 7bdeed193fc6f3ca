//! Playback backends
//!
//! The controller never talks to a media technology directly. Each
//! delivery mechanism is a [`Backend`] strategy wrapping the platform
//! objects it needs:
//!
//! - [`EmbeddedBackend`]: provider frame ([`EmbedFrame`])
//! - [`ProgressiveBackend`]: native element ([`MediaElement`])
//! - [`AdaptiveBackend`]: native element driven by an [`AdaptiveEngine`]
//!
//! Platform objects live on a single-threaded event loop (the browser),
//! so the traits are `?Send` and take `&self`.

mod adaptive;
mod embedded;
mod progressive;

pub use adaptive::AdaptiveBackend;
pub use embedded::EmbeddedBackend;
pub use progressive::ProgressiveBackend;

use crate::{locator::ResolvedStream, session::OperationToken, Result, StreamKind};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a platform object (a rejected JS promise, an HTTP
/// error in the headless player, ...)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub type PlatformResult = std::result::Result<(), PlatformError>;

/// The native media element
#[async_trait(?Send)]
pub trait MediaElement {
    fn show(&self);

    fn hide(&self);

    fn set_source(&self, url: &str);

    /// Pause, drop the source and make the element discard buffered media
    fn detach(&self);

    /// Resolves once playback has started
    async fn play(&self) -> PlatformResult;
}

/// The embedded provider frame
pub trait EmbedFrame {
    fn show(&self);

    fn hide(&self);

    fn set_source(&self, url: &str);

    fn clear_source(&self);
}

/// Adaptive streaming engine bound to a media element
#[async_trait(?Send)]
pub trait AdaptiveEngine {
    /// Load a manifest into the bound element
    async fn load(&self, url: &str) -> PlatformResult;

    /// Drop whatever is loaded; succeeds when nothing is
    async fn unload(&self) -> PlatformResult;
}

/// Builds the adaptive engine for an element of type `E`
pub trait EngineFactory<E: ?Sized> {
    fn create(&self, element: &E) -> std::result::Result<Box<dyn AdaptiveEngine>, PlatformError>;
}

impl<E: ?Sized, F> EngineFactory<E> for F
where
    F: Fn(&E) -> std::result::Result<Box<dyn AdaptiveEngine>, PlatformError>,
{
    fn create(&self, element: &E) -> std::result::Result<Box<dyn AdaptiveEngine>, PlatformError> {
        self(element)
    }
}

/// The container hosting whichever backend is active
pub trait PresentationSurface {
    fn show(&self);

    fn hide(&self);

    fn request_fullscreen(&self);

    fn is_fullscreen(&self) -> bool;

    fn exit_fullscreen(&self);

    /// Dismiss anything drawn over the player, such as an episode list
    fn close_overlays(&self) {}

    /// Show an error to the user
    fn report_error(&self, message: &str);
}

/// Result of a successful activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    /// The operation token went stale while waiting on the platform
    Superseded,
}

/// One playback technology
#[async_trait(?Send)]
pub trait Backend {
    fn kind(&self) -> StreamKind;

    /// Return everything this backend owns to an inert, hidden state.
    /// Stops early once `token` goes stale.
    async fn reset(&self, token: &OperationToken);

    /// Stop playback without hiding elements (used by `close`)
    fn release(&self);

    /// Start playing `stream`; checks `token` after every suspension point
    async fn activate(&self, stream: &ResolvedStream, token: &OperationToken) -> Result<Activation>;
}

fn kind_mismatch(expected: StreamKind, stream: &ResolvedStream) -> crate::Error {
    crate::Error::backend(
        expected,
        format!("cannot play a {} stream", stream.kind()),
    )
}
