pub mod disk;
pub mod memory;

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

/// Synchronous string key-value storage.
///
/// The converter keeps exactly two well-known keys in here (the rate cache
/// slot and the user preferences slot). Implementations must degrade to
/// `None`/`false` instead of panicking when the backing store is
/// unavailable; callers treat that the same as an empty store.
pub trait KvStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> bool;
    fn remove_item(&self, key: &str) -> bool;
}
