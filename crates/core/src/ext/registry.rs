//! Extension Registry.
//!
//! Descriptors are registered during configuration, keyed by lowercase name.
//! Registration rejects duplicate names and CSR addresses claimed twice;
//! encoding overlaps are caught later, when a dispatch table is built from
//! the enabled subset.

use std::collections::{BTreeMap, BTreeSet};

use crate::common::error::RegistryError;
use crate::ext::{CsrDesc, EnableContext, ExtensionDesc, InsnDesc, builtin};

/// Names of the extensions enabled in one context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnabledSet(BTreeSet<String>);

impl EnabledSet {
    /// Returns `true` when `name` (any case) is enabled.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_ascii_lowercase())
    }

    /// Enabled names, lowercase.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of enabled extensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing is enabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// All known extension descriptors.
#[derive(Clone, Debug, Default)]
pub struct ExtensionRegistry {
    extensions: Vec<ExtensionDesc>,
    index: BTreeMap<String, usize>,
    csr_owners: BTreeMap<u16, String>,
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the builtin extensions.
    ///
    /// # Errors
    ///
    /// Fails only if the builtin list itself is inconsistent.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for desc in builtin::all() {
            registry.register(desc)?;
        }
        Ok(registry)
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] when the name is taken and
    /// [`RegistryError::CsrConflict`] when a contributed CSR address already
    /// belongs to another extension.
    pub fn register(&mut self, desc: ExtensionDesc) -> Result<(), RegistryError> {
        let key = desc.key();
        if self.index.contains_key(&key) {
            return Err(RegistryError::Duplicate(desc.name));
        }
        for csr in &desc.csrs {
            if let Some(first) = self.csr_owners.get(&csr.addr) {
                return Err(RegistryError::CsrConflict {
                    addr: csr.addr,
                    first: first.clone(),
                    second: key,
                });
            }
        }
        for csr in &desc.csrs {
            let _ = self.csr_owners.insert(csr.addr, key.clone());
        }
        tracing::debug!(
            extension = %desc.name,
            instructions = desc.instructions.len(),
            csrs = desc.csrs.len(),
            "registered extension"
        );
        let _ = self.index.insert(key, self.extensions.len());
        self.extensions.push(desc);
        Ok(())
    }

    /// Looks up a descriptor by name (any case).
    pub fn get(&self, name: &str) -> Option<&ExtensionDesc> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.extensions[i])
    }

    /// Every descriptor, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionDesc> {
        self.extensions.iter()
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Evaluates one extension's predicate.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Unknown`] when `name` was never registered.
    pub fn is_enabled(&self, name: &str, ctx: &EnableContext<'_>) -> Result<bool, RegistryError> {
        self.get(name)
            .map(|d| d.is_enabled(ctx))
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))
    }

    /// The extensions enabled in `ctx`, in registration order.
    pub fn active<'a>(
        &'a self,
        ctx: &'a EnableContext<'a>,
    ) -> impl Iterator<Item = &'a ExtensionDesc> + 'a {
        self.extensions.iter().filter(move |d| d.is_enabled(ctx))
    }

    /// Names of the extensions enabled in `ctx`.
    pub fn enabled_set(&self, ctx: &EnableContext<'_>) -> EnabledSet {
        EnabledSet(self.active(ctx).map(ExtensionDesc::key).collect())
    }

    /// Instructions contributed by enabled extensions, tagged with the
    /// contributing extension's key.
    pub fn instructions_for(&self, ctx: &EnableContext<'_>) -> Vec<(String, InsnDesc)> {
        self.active(ctx)
            .flat_map(|d| {
                let key = d.key();
                d.instructions.iter().map(move |i| (key.clone(), *i))
            })
            .collect()
    }

    /// CSRs contributed by enabled extensions, tagged with their owner.
    pub fn csrs_for(&self, ctx: &EnableContext<'_>) -> Vec<(String, CsrDesc)> {
        self.active(ctx)
            .flat_map(|d| {
                let key = d.key();
                d.csrs.iter().map(move |c| (key.clone(), c.clone()))
            })
            .collect()
    }

    /// Instructions of the extensions named in `set`.
    pub fn instructions_in(&self, set: &EnabledSet) -> Vec<(String, InsnDesc)> {
        self.extensions
            .iter()
            .filter(|d| set.contains(&d.name))
            .flat_map(|d| {
                let key = d.key();
                d.instructions.iter().map(move |i| (key.clone(), *i))
            })
            .collect()
    }
}
