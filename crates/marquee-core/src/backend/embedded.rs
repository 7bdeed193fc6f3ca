//! Embedded provider backend

use super::{kind_mismatch, Activation, Backend, EmbedFrame};
use crate::{locator::ResolvedStream, session::OperationToken, PlayerConfig, Result, StreamKind};
use async_trait::async_trait;
use std::rc::Rc;
use tracing::debug;

/// Plays provider videos through the embed frame. Activation is
/// synchronous: nothing waits for the provider to be ready.
pub struct EmbeddedBackend {
    frame: Rc<dyn EmbedFrame>,
    config: PlayerConfig,
}

impl EmbeddedBackend {
    pub fn new(frame: Rc<dyn EmbedFrame>, config: PlayerConfig) -> Self {
        Self { frame, config }
    }
}

#[async_trait(?Send)]
impl Backend for EmbeddedBackend {
    fn kind(&self) -> StreamKind {
        StreamKind::Embedded
    }

    async fn reset(&self, _token: &OperationToken) {
        self.frame.clear_source();
        self.frame.hide();
    }

    fn release(&self) {
        self.frame.clear_source();
    }

    async fn activate(&self, stream: &ResolvedStream, _token: &OperationToken) -> Result<Activation> {
        let ResolvedStream::Embedded { video_id } = stream else {
            return Err(kind_mismatch(self.kind(), stream));
        };

        let source = self.config.embed_source(video_id);
        debug!(video_id = %video_id, source = %source, "Embedding provider video");

        self.frame.show();
        self.frame.set_source(&source);

        Ok(Activation::Started)
    }
}
