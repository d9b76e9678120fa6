use shoplist_core::{KvStore, MemoryKvStore, StoreError, StoreResult};
use std::cell::{Cell, RefCell};

/// Memory store whose reads, writes and removals can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryKvStore,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
    pub fail_removes: Cell<bool>,
    pub removed: RefCell<Vec<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for FlakyStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(StoreError::Unavailable(format!("read {key}")));
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable(format!("write {key}")));
        }
        self.inner.set_item(key, value)
    }

    fn multi_remove(&self, keys: &[String]) -> StoreResult<()> {
        if self.fail_removes.get() {
            return Err(StoreError::Unavailable("remove".to_string()));
        }
        self.removed.borrow_mut().extend(keys.iter().cloned());
        self.inner.multi_remove(keys)
    }
}
