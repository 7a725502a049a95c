//! Process-wide registry of dialect families.
//!
//! Built once on first use and never mutated afterwards; adapters hold no
//! per-call state, so the registry can be shared across threads.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{
    intel, FamilyId, GccCompiler, GccLinker, IccCompiler, MsvcCompiler, MsvcLinker,
    ToolchainAdapter,
};

static GLOBAL: LazyLock<ToolchainRegistry> = LazyLock::new(ToolchainRegistry::new);

/// Map from family id to adapter.
pub struct ToolchainRegistry {
    adapters: HashMap<FamilyId, Box<dyn ToolchainAdapter>>,
}

impl ToolchainRegistry {
    /// Create a registry with every built-in family.
    pub fn new() -> Self {
        let mut registry = ToolchainRegistry {
            adapters: HashMap::new(),
        };

        registry.register(Box::new(MsvcLinker::microsoft()));
        registry.register(Box::new(intel::windows_linker()));
        registry.register(Box::new(MsvcCompiler::microsoft()));
        registry.register(Box::new(GccLinker::gnu()));
        registry.register(Box::new(GccCompiler::gnu()));
        registry.register(Box::new(intel::linux64_compiler()));
        registry.register(Box::new(IccCompiler::ibm()));

        registry
    }

    /// The shared registry.
    pub fn global() -> &'static ToolchainRegistry {
        &GLOBAL
    }

    fn register(&mut self, adapter: Box<dyn ToolchainAdapter>) {
        self.adapters.insert(adapter.family(), adapter);
    }

    /// Get an adapter by family id.
    pub fn get(&self, id: FamilyId) -> Option<&dyn ToolchainAdapter> {
        self.adapters.get(&id).map(|a| a.as_ref())
    }

    /// All adapters, in `FamilyId::ALL` order.
    pub fn all(&self) -> impl Iterator<Item = &dyn ToolchainAdapter> + '_ {
        FamilyId::ALL.into_iter().filter_map(move |id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for ToolchainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
