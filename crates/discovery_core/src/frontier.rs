use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Identifiers already known to a discovery run.
///
/// `is_new` is a check-and-mark: it returns `true` at most once per id.
pub trait Frontier: Send + fmt::Debug {
    fn is_new(&mut self, id: &str) -> bool;

    /// Everything known so far, seed identifiers included.
    fn snapshot(&self) -> KnownIds;
}

/// Read-only view of a frontier at one point in time.
///
/// Both halves are shared, so taking a view never copies the seeded ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownIds {
    seeded: Arc<BTreeSet<String>>,
    discovered: Arc<BTreeSet<String>>,
}

impl KnownIds {
    pub fn contains(&self, id: &str) -> bool {
        self.seeded.contains(id) || self.discovered.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seeded.len() + self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty() && self.discovered.is_empty()
    }

    /// Identifiers the frontier started with.
    pub fn seeded(&self) -> &BTreeSet<String> {
        &self.seeded
    }

    /// Identifiers marked since the frontier was seeded.
    pub fn discovered(&self) -> &BTreeSet<String> {
        &self.discovered
    }

    pub fn to_set(&self) -> BTreeSet<String> {
        self.seeded.union(&self.discovered).cloned().collect()
    }
}

/// Frontier private to a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalFrontier {
    seeded: Arc<BTreeSet<String>>,
    discovered: Arc<BTreeSet<String>>,
}

impl LocalFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the frontier with identifiers crawled by earlier runs.
    pub fn seeded<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seeded: Arc::new(
                known
                    .into_iter()
                    .map(Into::into)
                    .filter(|id: &String| !id.trim().is_empty())
                    .collect(),
            ),
            discovered: Arc::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.seeded.len() + self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty() && self.discovered.is_empty()
    }
}

impl Frontier for LocalFrontier {
    fn is_new(&mut self, id: &str) -> bool {
        if self.seeded.contains(id) || self.discovered.contains(id) {
            return false;
        }
        // Copies the discovered half only while an older view is still held.
        Arc::make_mut(&mut self.discovered).insert(id.to_string())
    }

    fn snapshot(&self) -> KnownIds {
        KnownIds {
            seeded: Arc::clone(&self.seeded),
            discovered: Arc::clone(&self.discovered),
        }
    }
}

/// Clonable handle for runs that share one frontier across threads.
#[derive(Debug, Clone, Default)]
pub struct SharedFrontier {
    inner: Arc<Mutex<LocalFrontier>>,
}

impl SharedFrontier {
    pub fn new(frontier: LocalFrontier) -> Self {
        Self {
            inner: Arc::new(Mutex::new(frontier)),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, LocalFrontier> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Frontier for SharedFrontier {
    fn is_new(&mut self, id: &str) -> bool {
        self.lock().is_new(id)
    }

    fn snapshot(&self) -> KnownIds {
        self.lock().snapshot()
    }
}
