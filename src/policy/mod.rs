pub mod lfu;
pub mod lru;

pub use lfu::LfuStore;
pub use lru::LruStore;
