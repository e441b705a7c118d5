//! Recording fakes for the outbound ports.
//!
//! Every fake counts its calls so tests can assert exactly which boundaries
//! a request touched.

use crate::domain::entities::{AccessToken, Principal, Source, SourceId};
use crate::domain::error::{IdentityError, QueueError, RegistryError};
use crate::ports::outbound::{
    IdentityProvider, PublishAck, SourceRegistry, TokenResolution, UpdateQueue,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::UpdateCommand;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum IdentityMode {
    Tokens(HashSet<String>),
    Unresolved,
    Failing,
}

/// Identity provider that resolves a fixed token set.
#[derive(Debug)]
pub struct FakeIdentityProvider {
    mode: IdentityMode,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeIdentityProvider {
    /// Resolve exactly these tokens; answer `Unresolved` for the rest.
    pub fn accepting<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::with_mode(IdentityMode::Tokens(
            tokens.into_iter().map(Into::into).collect(),
        ))
    }

    /// Answer `Unresolved` for every token.
    pub fn rejecting() -> Self {
        Self::with_mode(IdentityMode::Unresolved)
    }

    /// Fail every call as if the provider were unreachable.
    pub fn failing() -> Self {
        Self::with_mode(IdentityMode::Failing)
    }

    fn with_mode(mode: IdentityMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tokens forwarded to the provider, in call order.
    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn resolve_user(&self, token: &AccessToken) -> Result<TokenResolution, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(token.expose().to_string());

        match &self.mode {
            IdentityMode::Tokens(tokens) if tokens.contains(token.expose()) => {
                Ok(TokenResolution::Resolved(Principal::new("test-user")))
            }
            IdentityMode::Tokens(_) | IdentityMode::Unresolved => Ok(TokenResolution::Unresolved),
            IdentityMode::Failing => Err(IdentityError::Transport("connection refused".into())),
        }
    }
}

/// Registry holding a fixed set of source ids.
#[derive(Debug)]
pub struct FakeSourceRegistry {
    sources: HashSet<String>,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeSourceRegistry {
    pub fn with_sources<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            sources: ids.into_iter().map(Into::into).collect(),
            failing: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every read as if the registry were unreachable.
    pub fn failing() -> Self {
        Self {
            sources: HashSet::new(),
            failing: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceRegistry for FakeSourceRegistry {
    async fn get_by_id(&self, id: &SourceId) -> Result<Option<Source>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(RegistryError::Unavailable("read timed out".into()));
        }

        Ok(self
            .sources
            .contains(id.as_str())
            .then(|| Source::new(id.clone())))
    }

    fn table_name(&self) -> &str {
        "test-sources"
    }
}

#[derive(Debug, Clone, Copy)]
enum QueueMode {
    Accepting,
    Rejecting,
    Failing,
}

/// Queue that records every command it is asked to publish.
#[derive(Debug)]
pub struct RecordingQueue {
    mode: QueueMode,
    published: Mutex<Vec<UpdateCommand>>,
}

impl RecordingQueue {
    /// Acknowledge every publish.
    pub fn accepting() -> Self {
        Self::with_mode(QueueMode::Accepting)
    }

    /// Answer every publish with a non-success acknowledgment.
    pub fn rejecting() -> Self {
        Self::with_mode(QueueMode::Rejecting)
    }

    /// Fail every publish at the transport.
    pub fn failing() -> Self {
        Self::with_mode(QueueMode::Failing)
    }

    fn with_mode(mode: QueueMode) -> Self {
        Self {
            mode,
            published: Mutex::new(Vec::new()),
        }
    }

    /// Commands handed to the queue, including unacknowledged ones.
    pub fn published(&self) -> Vec<UpdateCommand> {
        self.published.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.published.lock().len()
    }
}

#[async_trait]
impl UpdateQueue for RecordingQueue {
    async fn publish(&self, command: &UpdateCommand) -> Result<PublishAck, QueueError> {
        let seq = {
            let mut published = self.published.lock();
            published.push(command.clone());
            published.len()
        };

        match self.mode {
            QueueMode::Accepting => Ok(PublishAck::accepted(Some(format!("msg-{}", seq)))),
            QueueMode::Rejecting => Ok(PublishAck::rejected()),
            QueueMode::Failing => Err(QueueError::Transport("connection reset".into())),
        }
    }

    fn target(&self) -> &str {
        "test-queue"
    }
}
