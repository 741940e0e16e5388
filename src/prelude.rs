pub use crate::builder::CacheBuilder;
pub use crate::cache::{Cache, EvictionPolicy};
pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::{LfuStore, LruStore};
pub use crate::soft::SoftValue;
pub use crate::stats::StatsSnapshot;
pub use crate::traits::EvictionStore;
