use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use crate::WadData;

/// Named byte store with reference counted caching. `load` hands out shared
/// bytes and bumps the count, `release` drops it and evicts at zero.
pub trait AssetStore {
    fn load(&mut self, name: &str) -> Option<Rc<[u8]>>;

    fn release(&mut self, name: &str);

    /// Number of outstanding `load` calls for `name`
    fn ref_count(&self, name: &str) -> usize;
}

struct CacheEntry {
    data: Rc<[u8]>,
    refs: usize,
}

#[derive(Default)]
pub struct LumpCache {
    entries: HashMap<String, CacheEntry>,
}

impl LumpCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetStore for WadData {
    fn load(&mut self, name: &str) -> Option<Rc<[u8]>> {
        if let Some(entry) = self.cache.entries.get_mut(name) {
            entry.refs += 1;
            return Some(entry.data.clone());
        }
        let data: Rc<[u8]> = Rc::from(self.get_lump(name)?.data.as_slice());
        debug!("Caching lump {}", name);
        self.cache.entries.insert(
            name.to_owned(),
            CacheEntry {
                data: data.clone(),
                refs: 1,
            },
        );
        Some(data)
    }

    fn release(&mut self, name: &str) {
        let Some(entry) = self.cache.entries.get_mut(name) else {
            warn!("Released lump {} that was not cached", name);
            return;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            debug!("Evicting lump {}", name);
            self.cache.entries.remove(name);
        }
    }

    fn ref_count(&self, name: &str) -> usize {
        self.cache.entries.get(name).map(|e| e.refs).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::WadBuilder;
    use crate::{AssetStore, WadData};

    #[test]
    fn load_release_counts() {
        let mut wad =
            WadData::from_bytes(WadBuilder::iwad().add_lump("DEMO1", vec![109, 2]).build())
                .unwrap();

        let a = wad.load("DEMO1").unwrap();
        let b = wad.load("DEMO1").unwrap();
        assert_eq!(&*a, &[109, 2]);
        assert_eq!(wad.ref_count("DEMO1"), 2);
        drop((a, b));

        wad.release("DEMO1");
        assert_eq!(wad.ref_count("DEMO1"), 1);
        wad.release("DEMO1");
        assert_eq!(wad.ref_count("DEMO1"), 0);
        assert!(wad.cache.is_empty());
        // unbalanced release is only logged
        wad.release("DEMO1");
    }

    #[test]
    fn missing_lump() {
        let mut wad = WadData::from_bytes(WadBuilder::iwad().build()).unwrap();
        assert!(wad.load("DEMO9").is_none());
        assert_eq!(wad.ref_count("DEMO9"), 0);
    }
}
