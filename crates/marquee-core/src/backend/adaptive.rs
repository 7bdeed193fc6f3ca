//! Adaptive streaming backend

use super::{kind_mismatch, Activation, AdaptiveEngine, Backend, EngineFactory, MediaElement};
use crate::{locator::ResolvedStream, session::OperationToken, Error, Result, StreamKind};
use async_trait::async_trait;
use std::cell::{Cell, OnceCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Plays manifest-based streams through an adaptive engine attached to the
/// native element.
///
/// The engine is built on first use and then kept for the lifetime of the
/// backend: construction is expensive and binds listeners to the element.
pub struct AdaptiveBackend<E: MediaElement> {
    element: Rc<E>,
    factory: Box<dyn EngineFactory<E>>,
    engine: OnceCell<Box<dyn AdaptiveEngine>>,
    /// Operation whose `load` was issued last; cleared by a successful
    /// `unload` unless a newer load went out while it was pending
    loaded: Cell<Option<u64>>,
}

impl<E: MediaElement> AdaptiveBackend<E> {
    pub fn new(element: Rc<E>, factory: impl EngineFactory<E> + 'static) -> Self {
        Self {
            element,
            factory: Box::new(factory),
            engine: OnceCell::new(),
            loaded: Cell::new(None),
        }
    }

    /// Whether the engine has been constructed yet
    pub fn has_engine(&self) -> bool {
        self.engine.get().is_some()
    }

    fn engine(&self) -> Result<&dyn AdaptiveEngine> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine.as_ref());
        }

        let engine = self
            .factory
            .create(&*self.element)
            .map_err(|e| Error::EngineUnavailable(e.to_string()))?;
        info!("Adaptive engine constructed");

        Ok(self.engine.get_or_init(|| engine).as_ref())
    }

    async fn unload(&self, engine: &dyn AdaptiveEngine) -> Result<()> {
        let unloading = self.loaded.get();
        engine
            .unload()
            .await
            .map_err(|e| Error::backend(StreamKind::Adaptive, format!("unload: {}", e)))?;
        if self.loaded.get() == unloading {
            self.loaded.set(None);
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl<E: MediaElement> Backend for AdaptiveBackend<E> {
    fn kind(&self) -> StreamKind {
        StreamKind::Adaptive
    }

    async fn reset(&self, token: &OperationToken) {
        if let Some(engine) = self.engine.get() {
            if self.loaded.get().is_some() {
                if let Err(e) = self.unload(engine.as_ref()).await {
                    warn!(error = %e, "Adaptive engine failed to unload during reset");
                }
                // The element may already belong to a newer operation
                if !token.is_current() {
                    debug!(operation = token.id(), "Adaptive reset superseded");
                    return;
                }
            }
        }
        self.element.detach();
        self.element.hide();
    }

    fn release(&self) {
        self.element.detach();
    }

    async fn activate(&self, stream: &ResolvedStream, token: &OperationToken) -> Result<Activation> {
        let ResolvedStream::Adaptive { url } = stream else {
            return Err(kind_mismatch(self.kind(), stream));
        };

        self.element.show();
        let engine = self.engine()?;

        let unloaded = self.unload(engine).await;
        if !token.is_current() {
            debug!(operation = token.id(), "Adaptive unload superseded");
            return Ok(Activation::Superseded);
        }
        unloaded?;

        self.loaded.set(Some(token.id()));
        let loaded = engine.load(url).await;
        if !token.is_current() {
            debug!(operation = token.id(), "Adaptive load superseded");
            return Ok(Activation::Superseded);
        }
        loaded.map_err(|e| Error::backend(StreamKind::Adaptive, format!("load: {}", e)))?;

        let started = self.element.play().await;
        if !token.is_current() {
            debug!(operation = token.id(), "Adaptive start superseded");
            return Ok(Activation::Superseded);
        }
        started.map_err(|e| Error::backend(StreamKind::Adaptive, format!("play: {}", e)))?;

        Ok(Activation::Started)
    }
}
