//! Progressive download backend

use super::{kind_mismatch, Activation, Backend, MediaElement};
use crate::{locator::ResolvedStream, session::OperationToken, Error, Result, StreamKind};
use async_trait::async_trait;
use std::rc::Rc;
use tracing::debug;

/// Plays a direct media file through the native element
pub struct ProgressiveBackend<E: MediaElement> {
    element: Rc<E>,
}

impl<E: MediaElement> ProgressiveBackend<E> {
    pub fn new(element: Rc<E>) -> Self {
        Self { element }
    }
}

#[async_trait(?Send)]
impl<E: MediaElement> Backend for ProgressiveBackend<E> {
    fn kind(&self) -> StreamKind {
        StreamKind::Progressive
    }

    async fn reset(&self, _token: &OperationToken) {
        self.element.detach();
        self.element.hide();
    }

    fn release(&self) {
        self.element.detach();
    }

    async fn activate(&self, stream: &ResolvedStream, token: &OperationToken) -> Result<Activation> {
        let ResolvedStream::Progressive { url } = stream else {
            return Err(kind_mismatch(self.kind(), stream));
        };

        self.element.show();
        self.element.set_source(url);

        let started = self.element.play().await;
        if !token.is_current() {
            debug!(operation = token.id(), "Progressive start superseded");
            return Ok(Activation::Superseded);
        }
        started.map_err(|e| Error::backend(StreamKind::Progressive, e.to_string()))?;

        Ok(Activation::Started)
    }
}
