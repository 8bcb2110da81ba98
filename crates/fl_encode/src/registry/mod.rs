//! Named serializers and masks.
//!
//! A field annotation refers to them by name: `ser=currency_usd`,
//! `mask=email`. [`Registry::global`] holds the built-ins and everything
//! registered through the free functions of this module; an [`Encoder`]
//! can be given a private registry instead.
//!
//! [`Encoder`]: crate::Encoder

mod builtin;

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use dashmap::DashMap;
use fl_reflect::{BoxError, Loggable};
use fl_utils::hash::HashMap;
use parking_lot::Mutex;

pub use builtin::default_mask;

/// Mask applied to string fields when [`Options::mask_sensitive`] is set
/// and the field names no mask of its own.
///
/// [`Options::mask_sensitive`]: crate::Options::mask_sensitive
pub const DEFAULT_MASK: &str = "default";

// -----------------------------------------------------------------------------
// Function types

/// Encodes a field's raw value. The bytes must be one JSON value.
pub type SerializerFn = Arc<dyn Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync>;

/// Redacts a string.
pub type MaskFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Builds a serializer on its first lookup.
pub type SerializerFactory = Arc<dyn Fn() -> SerializerFn + Send + Sync>;

// -----------------------------------------------------------------------------
// Registry

/// Name to function stores for serializers and masks.
///
/// All methods take `&self` and may be called from any thread at any time.
///
/// # Examples
///
/// ```
/// use fl_encode::Registry;
///
/// let registry = Registry::new();
/// registry.register_mask("upper", |s: &str| s.to_uppercase());
///
/// let mask = registry.mask("upper").unwrap();
/// assert_eq!(mask("abc"), "ABC");
/// assert!(registry.serializer("currency_usd").is_none());
/// ```
pub struct Registry {
    serializers: DashMap<String, SerializerFn>,
    masks: DashMap<String, MaskFn>,
    lazy: Mutex<HashMap<String, SerializerFactory>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            serializers: DashMap::new(),
            masks: DashMap::new(),
            lazy: Mutex::new(HashMap::default()),
        }
    }

    /// Creates a registry holding the built-in masks and serializers.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtin::install(&registry);
        registry
    }

    /// The process-wide registry. Built-ins are installed on first access.
    pub fn global() -> &'static Self {
        static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::with_builtins);
        &GLOBAL
    }

    /// Registers a serializer, replacing any previous one of that name.
    ///
    /// An empty name is ignored.
    pub fn register_serializer<F>(&self, name: impl Into<String>, serializer: F)
    where
        F: Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        self.insert_serializer(name.into(), Arc::new(serializer));
    }

    /// Registers a serializer built by `factory` on its first lookup.
    ///
    /// The factory runs once, unless it panics, in which case the next
    /// lookup tries again. An eager serializer of the same name takes
    /// precedence over it.
    pub fn register_lazy_serializer<F, S>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            log::warn!("serializer name is empty, ignored");
            return;
        }
        let factory: SerializerFactory = Arc::new(move || -> SerializerFn { Arc::new(factory()) });
        if self.lazy.lock().insert(name.clone(), factory).is_some() {
            log::warn!("lazy serializer {name:?} already registered, overwritten");
        }
    }

    /// Registers a mask, replacing any previous one of that name.
    ///
    /// An empty name is ignored.
    pub fn register_mask<F>(&self, name: impl Into<String>, mask: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            log::warn!("mask name is empty, ignored");
            return;
        }
        if self.masks.insert(name.clone(), Arc::new(mask)).is_some() {
            log::warn!("mask {name:?} already registered, overwritten");
        }
    }

    /// Registers a serializer that writes a `Duration` as a float count of
    /// `unit`, rounded to `precision` decimal places.
    pub fn register_duration_serializer_with_precision(
        &self,
        name: impl Into<String>,
        unit: Duration,
        precision: u32,
    ) {
        let name = name.into();
        let label = name.clone();
        self.register_lazy_serializer(name, move || {
            builtin::duration::with_precision(label.clone(), unit, precision)
        });
    }

    /// Registers a serializer that formats date-times with a `chrono`
    /// strftime `layout`.
    pub fn register_time_serializer_with_layout(
        &self,
        name: impl Into<String>,
        layout: impl Into<String>,
    ) {
        let name = name.into();
        let label = name.clone();
        let layout: String = layout.into();
        let layout = builtin::time::TimeLayout::Strftime(layout.into());
        self.register_lazy_serializer(name, move || {
            builtin::time::serializer(label.clone(), layout.clone())
        });
    }

    /// Looks up a serializer: eager ones first, then lazy ones.
    ///
    /// A lazy serializer is built under a lock, promoted to the eager store
    /// and only then forgotten by the lazy store, so concurrent first
    /// lookups build it once and a panicking factory stays registered. Its
    /// factory must not look up serializers in this registry.
    pub fn serializer(&self, name: &str) -> Option<SerializerFn> {
        if let Some(serializer) = self.serializers.get(name) {
            return Some(Arc::clone(serializer.value()));
        }

        let mut lazy = self.lazy.lock();
        if let Some(serializer) = self.serializers.get(name) {
            return Some(Arc::clone(serializer.value()));
        }
        let factory = Arc::clone(lazy.get(name)?);
        let serializer = factory();
        self.serializers.insert(name.to_owned(), Arc::clone(&serializer));
        lazy.remove(name);
        log::debug!("serializer {name:?} built on first use");
        Some(serializer)
    }

    /// Looks up a mask.
    pub fn mask(&self, name: &str) -> Option<MaskFn> {
        self.masks.get(name).map(|mask| Arc::clone(mask.value()))
    }

    /// Applies the mask `name`, or [`default_mask`] when it is unknown.
    pub fn apply_mask(&self, name: &str, value: &str) -> String {
        match self.mask(name) {
            Some(mask) => mask(value),
            None => default_mask(value),
        }
    }

    fn insert_serializer(&self, name: String, serializer: SerializerFn) {
        if name.is_empty() {
            log::warn!("serializer name is empty, ignored");
            return;
        }
        let shadowed_lazy = self.lazy.lock().remove(&name).is_some();
        if self.serializers.insert(name.clone(), serializer).is_some() || shadowed_lazy {
            log::warn!("serializer {name:?} already registered, overwritten");
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("serializers", &self.serializers.len())
            .field("masks", &self.masks.len())
            .field("lazy", &self.lazy.lock().len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Global registration

/// Registers a serializer in the global registry.
pub fn register_serializer<F>(name: impl Into<String>, serializer: F)
where
    F: Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
{
    Registry::global().register_serializer(name, serializer);
}

/// Registers a lazily built serializer in the global registry.
pub fn register_lazy_serializer<F, S>(name: impl Into<String>, factory: F)
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
{
    Registry::global().register_lazy_serializer(name, factory);
}

/// Registers a mask in the global registry.
pub fn register_mask<F>(name: impl Into<String>, mask: F)
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    Registry::global().register_mask(name, mask);
}

/// See [`Registry::register_duration_serializer_with_precision`].
pub fn register_duration_serializer_with_precision(
    name: impl Into<String>,
    unit: Duration,
    precision: u32,
) {
    Registry::global().register_duration_serializer_with_precision(name, unit, precision);
}

/// See [`Registry::register_time_serializer_with_layout`].
pub fn register_time_serializer_with_layout(name: impl Into<String>, layout: impl Into<String>) {
    Registry::global().register_time_serializer_with_layout(name, layout);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use fl_reflect::{BoxError, Loggable};

    use super::Registry;

    fn call(registry: &Registry, name: &str, value: &dyn Loggable) -> String {
        let serializer = registry.serializer(name).unwrap();
        String::from_utf8(serializer(value).unwrap()).unwrap()
    }

    #[test]
    fn eager_overwrite() {
        let registry = Registry::new();
        registry.register_serializer("x", |_: &dyn Loggable| Ok(b"1".to_vec()));
        registry.register_serializer("x", |_: &dyn Loggable| Ok(b"2".to_vec()));
        assert_eq!(call(&registry, "x", &0_i32), "2");
    }

    #[test]
    fn empty_names_ignored() {
        let registry = Registry::new();
        registry.register_serializer("", |_: &dyn Loggable| Ok(b"1".to_vec()));
        registry.register_mask("", |s: &str| s.to_owned());
        assert!(registry.serializer("").is_none());
        assert!(registry.mask("").is_none());
    }

    #[test]
    fn lazy_factory_runs_once_under_contention() {
        let registry = Arc::new(Registry::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.register_lazy_serializer("lazy", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            |_: &dyn Loggable| -> Result<Vec<u8>, BoxError> { Ok(b"\"lazy\"".to_vec()) }
        });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.serializer("lazy").is_some())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(call(&registry, "lazy", &()), "\"lazy\"");
    }

    #[test]
    fn panicking_factory_stays_registered() {
        let registry = Registry::new();
        let attempts = AtomicUsize::new(0);
        registry.register_lazy_serializer("flaky", move || {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("not ready");
            }
            |_: &dyn Loggable| -> Result<Vec<u8>, BoxError> { Ok(b"\"ready\"".to_vec()) }
        });

        let first = panic::catch_unwind(AssertUnwindSafe(|| registry.serializer("flaky")));
        assert!(first.is_err());
        assert_eq!(call(&registry, "flaky", &()), "\"ready\"");
    }

    #[test]
    fn eager_wins_over_lazy() {
        let registry = Registry::new();
        registry.register_lazy_serializer("dup", || {
            |_: &dyn Loggable| -> Result<Vec<u8>, BoxError> { Ok(b"\"lazy\"".to_vec()) }
        });
        registry.register_serializer("dup", |_: &dyn Loggable| Ok(b"\"eager\"".to_vec()));
        assert_eq!(call(&registry, "dup", &()), "\"eager\"");
    }

    #[test]
    fn unknown_mask_uses_default() {
        let registry = Registry::new();
        assert_eq!(registry.apply_mask("nope", "abcdef"), "a****f");
        registry.register_mask("default", |_: &str| "[redacted]".to_owned());
        assert_eq!(registry.apply_mask("default", "abcdef"), "[redacted]");
    }

    #[test]
    fn builtins_present() {
        let registry = Registry::with_builtins();
        assert!(registry.mask("phone").is_some());
        assert!(registry.mask("email").is_some());
        for name in ["currency", "duration_human", "time_rfc3339", "time_log", "duration_sec_2"] {
            assert!(registry.serializer(name).is_some(), "{name}");
        }
    }

    #[test]
    fn custom_precision_and_layout() {
        let registry = Registry::new();
        registry.register_duration_serializer_with_precision(
            "dur_ms_2",
            Duration::from_millis(1),
            2,
        );
        assert_eq!(call(&registry, "dur_ms_2", &Duration::from_micros(1_234_567)), "1234.57");

        registry.register_time_serializer_with_layout("year", "%Y");
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(call(&registry, "year", &date), "\"2024\"");
    }
}
