//! Playback Controller - single entry point for starting and stopping playback
//!
//! `play` always runs the same sequence:
//! 1. validate the descriptor (rejections leave every piece of state alone)
//! 2. reset every backend
//! 3. reveal the surface
//! 4. activate the one backend matching the descriptor
//!
//! Failures from the platform are logged, reported on the surface and
//! returned to the caller. Completions that arrive after a newer `play` or
//! `close` are dropped.

use crate::{
    backend::{
        Activation, AdaptiveBackend, Backend, EmbedFrame, EmbeddedBackend, EngineFactory,
        MediaElement, PresentationSurface, ProgressiveBackend,
    },
    locator::ResolvedStream,
    session::PlaybackSession,
    types::*,
    Error, PlayerConfig, Result,
};
use std::rc::Rc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Owns the playback session and the backends that can fill the surface
pub struct PlaybackController {
    config: PlayerConfig,
    surface: Rc<dyn PresentationSurface>,
    backends: Vec<Box<dyn Backend>>,
    session: PlaybackSession,
}

impl PlaybackController {
    /// Create a controller with the three standard backends sharing one
    /// native element
    pub fn new<E>(
        config: PlayerConfig,
        surface: Rc<dyn PresentationSurface>,
        element: Rc<E>,
        frame: Rc<dyn EmbedFrame>,
        engine_factory: impl EngineFactory<E> + 'static,
    ) -> Self
    where
        E: MediaElement + 'static,
    {
        let backends: Vec<Box<dyn Backend>> = vec![
            Box::new(AdaptiveBackend::new(Rc::clone(&element), engine_factory)),
            Box::new(ProgressiveBackend::new(element)),
            Box::new(EmbeddedBackend::new(frame, config.clone())),
        ];
        Self::with_backends(config, surface, backends)
    }

    /// Create a controller from an explicit backend set. Backends are reset
    /// in the order given.
    pub fn with_backends(
        config: PlayerConfig,
        surface: Rc<dyn PresentationSurface>,
        backends: Vec<Box<dyn Backend>>,
    ) -> Self {
        let session = PlaybackSession::new();
        info!(
            session_id = %session.id(),
            backends = backends.len(),
            "Playback controller created"
        );

        Self {
            config,
            surface,
            backends,
            session,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn session_id(&self) -> SessionId {
        self.session.id()
    }

    pub fn active_backend(&self) -> ActiveBackend {
        self.session.active_backend()
    }

    pub fn surface_visible(&self) -> bool {
        self.session.surface_visible()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.subscribe()
    }

    /// Play a descriptor, replacing whatever is currently playing
    #[instrument(
        skip(self, descriptor),
        fields(session_id = %self.session.id(), kind = %descriptor.kind())
    )]
    pub async fn play(&self, descriptor: &StreamDescriptor) -> Result<PlaybackOutcome> {
        let kind = descriptor.kind();

        let stream = match ResolvedStream::resolve(descriptor) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(locator = descriptor.locator(), error = %err, "Rejected descriptor");
                self.surface.report_error(err.user_message());
                return Err(err);
            }
        };

        let Some(backend) = self.backends.iter().find(|b| b.kind() == kind) else {
            let err = Error::backend(kind, "no backend registered");
            error!(error = %err, "Cannot dispatch descriptor");
            self.surface.report_error(err.user_message());
            return Err(err);
        };

        let token = self.session.begin_operation();
        info!(operation = token.id(), locator = descriptor.locator(), "Starting playback");

        for b in &self.backends {
            b.reset(&token).await;
            if !token.is_current() {
                debug!(operation = token.id(), "Superseded during reset");
                return Ok(PlaybackOutcome::Superseded { kind });
            }
        }

        // The surface must be displayed before a backend can go fullscreen.
        self.surface.close_overlays();
        self.surface.show();
        self.session.set_surface_visible(true);
        self.session.set_active_backend(kind.into());

        match backend.activate(&stream, &token).await {
            Ok(Activation::Started) if token.is_current() => {
                if self.config.fullscreen_on_start {
                    self.surface.request_fullscreen();
                }
                info!(operation = token.id(), "Playback started");
                Ok(PlaybackOutcome::Started { kind })
            }
            Ok(_) => {
                debug!(operation = token.id(), "Superseded during activation");
                Ok(PlaybackOutcome::Superseded { kind })
            }
            Err(err) => {
                error!(
                    operation = token.id(),
                    code = err.error_code(),
                    error = %err,
                    "Backend failed to start"
                );
                self.surface.report_error(err.user_message());
                Err(err)
            }
        }
    }

    /// Hide the surface and stop playback. Safe to call when idle.
    #[instrument(skip(self), fields(session_id = %self.session.id()))]
    pub fn close(&self) {
        let token = self.session.begin_operation();

        self.surface.hide();
        for backend in &self.backends {
            backend.release();
        }
        if self.surface.is_fullscreen() {
            self.surface.exit_fullscreen();
        }
        self.session.set_surface_visible(false);

        debug!(operation = token.id(), "Player closed");
    }
}
