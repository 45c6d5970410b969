//! Adapter table and outbound notifications.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use robo_core::{BoxedAdapter, OutboundMessage};

use crate::error::{FrameworkError, FrameworkResult, NotifyError, NotifyResult};

/// Name that targets every adapter at once; no adapter may use it.
pub const BROADCAST: &str = "all";

/// Where a notification goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Every registered adapter.
    All,
    /// One adapter by name.
    Adapter(&'a str),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(name: &'a str) -> Self {
        if name == BROADCAST {
            Target::All
        } else {
            Target::Adapter(name)
        }
    }
}

impl<'a> From<Option<&'a str>> for Target<'a> {
    fn from(name: Option<&'a str>) -> Self {
        name.map_or(Target::All, Target::from)
    }
}

/// Adapters by name.
///
/// Iteration (and thus broadcast order) is ascending by name.
#[derive(Default)]
pub struct AdapterTable {
    adapters: RwLock<BTreeMap<String, BoxedAdapter>>,
}

impl AdapterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `adapter` under `name`, replacing any previous one.
    ///
    /// Fails for [`BROADCAST`], which could never be addressed alone.
    pub fn load(&self, name: impl Into<String>, adapter: BoxedAdapter) -> FrameworkResult<()> {
        let name = name.into();
        if name == BROADCAST {
            return Err(FrameworkError::ReservedAdapterName(name));
        }
        if self.adapters.write().insert(name.clone(), adapter).is_some() {
            warn!(adapter = %name, "Replaced previously loaded adapter");
        } else {
            info!(adapter = %name, "Loaded adapter");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<BoxedAdapter> {
        self.adapters.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.adapters.read().keys().cloned().collect()
    }

    /// Snapshot of every `(name, adapter)` pair, in name order.
    pub fn entries(&self) -> Vec<(String, BoxedAdapter)> {
        self.adapters
            .read()
            .iter()
            .map(|(name, adapter)| (name.clone(), adapter.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.read().is_empty()
    }

    /// Delivers `message` to `target`.
    ///
    /// A broadcast tries every adapter even if one fails and reports the
    /// first failure. Returns the number of adapters that accepted the
    /// message.
    pub async fn notify(&self, target: Target<'_>, message: &OutboundMessage) -> NotifyResult<usize> {
        match target {
            Target::Adapter(name) => {
                let adapter = self
                    .get(name)
                    .ok_or_else(|| NotifyError::UnknownAdapter(name.to_string()))?;
                debug!(adapter = %name, text = %message.text, "Notifying adapter");
                adapter
                    .send(message)
                    .await
                    .map_err(|source| NotifyError::Delivery {
                        adapter: name.to_string(),
                        source,
                    })?;
                Ok(1)
            }
            Target::All => {
                let mut delivered = 0;
                let mut first_error = None;
                for (name, adapter) in self.entries() {
                    debug!(adapter = %name, text = %message.text, "Notifying adapter");
                    match adapter.send(message).await {
                        Ok(()) => delivered += 1,
                        Err(source) => {
                            warn!(adapter = %name, error = %source, "Broadcast delivery failed");
                            first_error.get_or_insert(NotifyError::Delivery {
                                adapter: name,
                                source,
                            });
                        }
                    }
                }
                match first_error {
                    Some(err) => Err(err),
                    None => Ok(delivered),
                }
            }
        }
    }
}

impl std::fmt::Debug for AdapterTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterTable")
            .field("adapters", &self.names())
            .finish()
    }
}
