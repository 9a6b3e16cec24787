//! Start-up deferral of converter selection.
//!
//! A call site resolved with `runtime_resolvable` gets a
//! [`RuntimeResolvedConverter`]: the statically emitted converter (if any)
//! plus an [`OverrideSlot`] that start-up configuration may fill once.
//!
//! The choice is made at first use. An override wins over the static
//! converter; with neither, the conversion fails with
//! [`ConversionError::NoConverter`](delos_core::ConversionError::NoConverter).
//! Once the [`StartupGate`] is open the choice is cached for the process
//! lifetime and conversion takes no locks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use delos_core::{ConversionError, ConversionResult, ParameterConverter, SharedConverter, TypedValue};

/// Marks the transition from start-up configuration to serving.
#[derive(Debug, Default)]
pub struct StartupGate {
    open: AtomicBool,
}

impl StartupGate {
    /// Creates a closed gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the gate. Returns `false` if it was already open.
    pub fn open(&self) -> bool {
        !self.open.swap(true, Ordering::AcqRel)
    }

    /// Returns `true` once serving has started.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

/// Single-assignment holder for a start-up override.
#[derive(Debug, Default)]
pub struct OverrideSlot {
    converter: OnceLock<SharedConverter>,
}

impl OverrideSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `converter`.
    ///
    /// # Errors
    ///
    /// Returns the rejected converter if the slot was already filled.
    pub fn publish(&self, converter: SharedConverter) -> Result<(), SharedConverter> {
        self.converter.set(converter)
    }

    /// The published override, if any.
    #[must_use]
    pub fn get(&self) -> Option<&SharedConverter> {
        self.converter.get()
    }

    /// Returns `true` once an override was published.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.converter.get().is_some()
    }
}

/// Converter whose delegate is chosen at first use after start-up.
#[derive(Debug)]
pub struct RuntimeResolvedConverter {
    type_name: String,
    fallback: Option<SharedConverter>,
    slot: Arc<OverrideSlot>,
    gate: Arc<StartupGate>,
    effective: OnceLock<Option<SharedConverter>>,
}

impl RuntimeResolvedConverter {
    /// Creates a converter for `type_name`.
    ///
    /// `fallback` is the statically emitted converter, `None` when the type
    /// had no viable conversion at build time.
    pub fn new(
        type_name: impl Into<String>,
        fallback: Option<SharedConverter>,
        slot: Arc<OverrideSlot>,
        gate: Arc<StartupGate>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            fallback,
            slot,
            gate,
            effective: OnceLock::new(),
        }
    }

    /// Returns `true` if a static converter backs this site.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn select(&self) -> Option<&SharedConverter> {
        self.slot.get().or(self.fallback.as_ref())
    }

    fn effective(&self) -> Option<&SharedConverter> {
        if let Some(chosen) = self.effective.get() {
            return chosen.as_ref();
        }
        if !self.gate.is_open() {
            // overrides may still arrive
            return self.select();
        }
        self.effective
            .get_or_init(|| self.select().cloned())
            .as_ref()
    }
}

impl ParameterConverter for RuntimeResolvedConverter {
    fn convert(&self, raw: &str) -> ConversionResult<TypedValue> {
        match self.effective() {
            Some(converter) => converter.convert(raw),
            None => Err(ConversionError::no_converter(self.type_name.as_str())),
        }
    }

    fn target_type(&self) -> &str {
        &self.type_name
    }
}
