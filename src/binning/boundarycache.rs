use std::cell::RefCell;

/// Lazily rebuilt edges of a uniform grid.
///
/// The cache remembers the `(lo, hi, num_bins)` it was built from. Callers
/// pass the values they just read; any difference from the remembered key
/// rebuilds the edges, so a driving function that changed without telling
/// anyone is still picked up on the next query.
pub struct BoundaryCache {
    inner: RefCell<CacheInner>,
}

#[derive(Clone, Copy, PartialEq)]
struct BoundaryKey {
    lo: f64,
    hi: f64,
    num_bins: usize,
}

struct CacheInner {
    key: Option<BoundaryKey>,
    boundaries: Vec<f64>,
    average_width: f64,
    rebuilds: usize,
}

impl CacheInner {
    fn refresh(&mut self, key: BoundaryKey) {
        if self.key == Some(key) {
            return;
        }
        let width = (key.hi - key.lo) / key.num_bins as f64;
        self.boundaries.clear();
        self.boundaries
            .extend((0..key.num_bins).map(|k| key.lo + k as f64 * width));
        self.boundaries.push(key.hi);
        self.average_width = width;
        self.key = Some(key);
        self.rebuilds += 1;
        log::debug!(
            "rebuilt {} bin boundaries on [{}, {}]",
            key.num_bins + 1,
            key.lo,
            key.hi
        );
    }
}

impl BoundaryCache {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(CacheInner {
                key: None,
                boundaries: Vec::new(),
                average_width: f64::NAN,
                rebuilds: 0,
            }),
        }
    }

    /// Forgets the cached edges; the next query rebuilds them.
    pub fn invalidate(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.key = None;
        inner.boundaries.clear();
    }

    pub fn is_cached(&self) -> bool {
        self.inner.borrow().key.is_some()
    }

    /// Number of times the edges were (re)computed.
    pub fn rebuilds(&self) -> usize {
        self.inner.borrow().rebuilds
    }

    /// Edges for `num_bins` equal bins on `[lo, hi]`; expects a validated range.
    pub fn boundaries(&self, lo: f64, hi: f64, num_bins: usize) -> Vec<f64> {
        let mut inner = self.inner.borrow_mut();
        inner.refresh(BoundaryKey { lo, hi, num_bins });
        inner.boundaries.clone()
    }

    pub fn average_width(&self, lo: f64, hi: f64, num_bins: usize) -> f64 {
        let mut inner = self.inner.borrow_mut();
        inner.refresh(BoundaryKey { lo, hi, num_bins });
        inner.average_width
    }
}

impl Default for BoundaryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuilds_only_on_key_change() {
        let cache = BoundaryCache::new();
        assert!(!cache.is_cached());

        assert_eq!(cache.boundaries(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(cache.average_width(0.0, 10.0, 5), 2.0);
        assert_eq!(cache.rebuilds(), 1);

        assert_eq!(cache.boundaries(0.0, 20.0, 5), vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
        assert_eq!(cache.rebuilds(), 2);

        assert_eq!(cache.boundaries(0.0, 20.0, 2), vec![0.0, 10.0, 20.0]);
        assert_eq!(cache.rebuilds(), 3);

        cache.invalidate();
        assert!(!cache.is_cached());
        cache.boundaries(0.0, 20.0, 2);
        assert_eq!(cache.rebuilds(), 4);
    }
}
