use std::path::Path;

use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use tracing::{debug, warn};

use crate::store::KvStorage;

const PARTITION_NAME: &str = "converter";

/// Disk-backed storage over a fjall keyspace.
///
/// Opening is infallible: when the keyspace or partition cannot be opened
/// (read-only filesystem, locked directory) the storage stays permanently
/// unavailable and every operation reports `None`/`false`.
pub struct DiskStorage {
    inner: Option<(Keyspace, PartitionHandle)>,
}

impl DiskStorage {
    pub fn open(path: &Path) -> Self {
        let inner = fjall::Config::new(path).open().ok().and_then(|keyspace| {
            keyspace
                .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
                .ok()
                .map(|partition| (keyspace, partition))
        });

        if inner.is_none() {
            warn!(path = %path.display(), "Storage unavailable, running without persistence");
        }

        Self { inner }
    }
}

impl KvStorage for DiskStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let (_, partition) = self.inner.as_ref()?;
        match partition.get(key) {
            Ok(Some(slice)) => String::from_utf8(slice.to_vec()).ok(),
            Ok(None) => None,
            Err(e) => {
                debug!("Storage read error for key {key}: {e}");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> bool {
        let Some((keyspace, partition)) = self.inner.as_ref() else {
            return false;
        };
        match partition
            .insert(key, value)
            .and_then(|()| keyspace.persist(PersistMode::Buffer))
        {
            Ok(()) => true,
            Err(e) => {
                debug!("Storage write error for key {key}: {e}");
                false
            }
        }
    }

    fn remove_item(&self, key: &str) -> bool {
        let Some((_, partition)) = self.inner.as_ref() else {
            return false;
        };
        match partition.remove(key) {
            Ok(()) => true,
            Err(e) => {
                debug!("Storage remove error for key {key}: {e}");
                false
            }
        }
    }
}
