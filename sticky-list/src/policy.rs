use alloc::string::String;
use alloc::sync::Arc;
use core::cmp::Ordering;

/// A total order over values of type `V`.
pub type Comparator<V> = Arc<dyn Fn(&V, &V) -> Ordering + Send + Sync>;

/// Derives the group key of a record.
pub type KeyExtractor<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// Normalizes an extracted key before it is compared (e.g. truncating a timestamp to a day).
pub type KeyNormalizer<K> = Arc<dyn Fn(K) -> K + Send + Sync>;

/// Renders a key as a header label.
///
/// The second argument is the reference "now" instant in Unix milliseconds, so labels such as
/// "Today" stay a pure function of their inputs.
pub type LabelFormatter<K> = Arc<dyn Fn(&K, i64) -> String + Send + Sync>;

/// Natural ascending order.
pub fn ascending<V: Ord + 'static>() -> Comparator<V> {
    Arc::new(|a: &V, b: &V| a.cmp(b))
}

/// Natural descending order.
pub fn descending<V: Ord + 'static>() -> Comparator<V> {
    Arc::new(|a: &V, b: &V| b.cmp(a))
}

/// Ascending order of a derived sort key.
pub fn ascending_by<V: 'static, S: Ord + 'static>(
    sort_key: impl Fn(&V) -> S + Send + Sync + 'static,
) -> Comparator<V> {
    Arc::new(move |a: &V, b: &V| sort_key(a).cmp(&sort_key(b)))
}

/// Descending order of a derived sort key.
pub fn descending_by<V: 'static, S: Ord + 'static>(
    sort_key: impl Fn(&V) -> S + Send + Sync + 'static,
) -> Comparator<V> {
    Arc::new(move |a: &V, b: &V| sort_key(b).cmp(&sort_key(a)))
}

/// Flips a comparator.
pub fn reversed<V: 'static>(cmp: Comparator<V>) -> Comparator<V> {
    Arc::new(move |a: &V, b: &V| cmp(b, a))
}

/// How records are ordered inside one group.
pub enum ItemOrder<T> {
    /// Keep the relative order in which records were supplied.
    Original,
    /// Stable sort with the given comparator.
    Sorted(Comparator<T>),
}

impl<T: 'static> ItemOrder<T> {
    pub fn ascending() -> Self
    where
        T: Ord,
    {
        Self::Sorted(ascending())
    }

    pub fn descending() -> Self
    where
        T: Ord,
    {
        Self::Sorted(descending())
    }

    pub fn ascending_by<S: Ord + 'static>(
        sort_key: impl Fn(&T) -> S + Send + Sync + 'static,
    ) -> Self {
        Self::Sorted(ascending_by(sort_key))
    }

    pub fn descending_by<S: Ord + 'static>(
        sort_key: impl Fn(&T) -> S + Send + Sync + 'static,
    ) -> Self {
        Self::Sorted(descending_by(sort_key))
    }

    pub fn custom(cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self::Sorted(Arc::new(cmp))
    }
}

impl<T> Clone for ItemOrder<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Original => Self::Original,
            Self::Sorted(cmp) => Self::Sorted(Arc::clone(cmp)),
        }
    }
}

impl<T> Default for ItemOrder<T> {
    fn default() -> Self {
        Self::Original
    }
}

impl<T> core::fmt::Debug for ItemOrder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Original => f.write_str("Original"),
            Self::Sorted(_) => f.write_str("Sorted(..)"),
        }
    }
}

/// Grouping configuration: key derivation, key order, in-group order and labels.
///
/// Like the rest of the crate's configuration this is cheap to clone; closures are stored in
/// `Arc`s so a policy can be shared between the initial load and every later page.
pub struct GroupKeyPolicy<T, K> {
    pub extract_key: KeyExtractor<T, K>,
    /// Applied to every extracted key before partitioning.
    pub normalize: Option<KeyNormalizer<K>>,
    pub compare_keys: Comparator<K>,
    pub compare_items: ItemOrder<T>,
    /// Used by [`crate::group_labeled`]; without one the key's `Display` form is the label.
    pub label_formatter: Option<LabelFormatter<K>>,
}

impl<T, K> Clone for GroupKeyPolicy<T, K> {
    fn clone(&self) -> Self {
        Self {
            extract_key: Arc::clone(&self.extract_key),
            normalize: self.normalize.clone(),
            compare_keys: Arc::clone(&self.compare_keys),
            compare_items: self.compare_items.clone(),
            label_formatter: self.label_formatter.clone(),
        }
    }
}

impl<T, K: Ord + 'static> GroupKeyPolicy<T, K> {
    /// Creates a policy for naturally ordered keys: keys ascending, records in original order.
    pub fn new(extract_key: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self::new_with_comparator(extract_key, ascending())
    }

    pub fn with_keys_ascending(mut self) -> Self {
        self.compare_keys = ascending();
        self
    }

    pub fn with_keys_descending(mut self) -> Self {
        self.compare_keys = descending();
        self
    }
}

impl<T, K> GroupKeyPolicy<T, K> {
    /// Creates a policy for keys ordered by an explicit comparator.
    ///
    /// Use this when `K` has no natural order, or when the natural order is not the one you
    /// want headers to appear in.
    pub fn new_with_comparator(
        extract_key: impl Fn(&T) -> K + Send + Sync + 'static,
        compare_keys: Comparator<K>,
    ) -> Self {
        Self {
            extract_key: Arc::new(extract_key),
            normalize: None,
            compare_keys,
            compare_items: ItemOrder::Original,
            label_formatter: None,
        }
    }

    pub fn with_normalize(mut self, normalize: impl Fn(K) -> K + Send + Sync + 'static) -> Self {
        self.normalize = Some(Arc::new(normalize));
        self
    }

    pub fn with_compare_keys(
        mut self,
        compare_keys: impl Fn(&K, &K) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.compare_keys = Arc::new(compare_keys);
        self
    }

    pub fn with_key_comparator(mut self, compare_keys: Comparator<K>) -> Self {
        self.compare_keys = compare_keys;
        self
    }

    pub fn with_item_order(mut self, compare_items: ItemOrder<T>) -> Self {
        self.compare_items = compare_items;
        self
    }

    pub fn with_label_formatter(
        mut self,
        label_formatter: impl Fn(&K, i64) -> String + Send + Sync + 'static,
    ) -> Self {
        self.label_formatter = Some(Arc::new(label_formatter));
        self
    }

    /// Extracts and normalizes the key of `record`.
    pub fn key_of(&self, record: &T) -> K {
        let key = (self.extract_key)(record);
        match &self.normalize {
            Some(normalize) => normalize(key),
            None => key,
        }
    }

    /// Formats `key` with the configured formatter, if any.
    pub fn label(&self, key: &K, now_ms: i64) -> Option<String> {
        self.label_formatter.as_ref().map(|f| f(key, now_ms))
    }
}

impl<T, K> core::fmt::Debug for GroupKeyPolicy<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GroupKeyPolicy")
            .field("normalize", &self.normalize.is_some())
            .field("compare_items", &self.compare_items)
            .field("label_formatter", &self.label_formatter.is_some())
            .finish_non_exhaustive()
    }
}
