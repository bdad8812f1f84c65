//! # Controller Type Registry
//!
//! Process-wide record of every controller type the framework has seen. It
//! answers two questions:
//!
//! - **Which actions can be dispatched on a type?** The callable set is the
//!   union of the `ACTIONS` declared along the type's ancestor chain, minus the
//!   hidden names registered on the type and its ancestors.
//! - **Which controller types exist?** The subclass set, kept for tooling.
//!
//! ## Freezing
//!
//! The callable set of a type is computed once and cached. Computing it
//! freezes the type: hiding an action on a frozen type, or on an ancestor of a
//! frozen type, fails with [`RegistryError::Frozen`]. Register hidden actions
//! while wiring the application, before the first dispatch. A frozen type can
//! be reopened with [`ControllerRegistry::invalidate`].
//!
//! ## Locking
//!
//! State lives behind a single `RwLock`. Writes happen while types are defined
//! and frozen; steady-state dispatch only takes the read lock.

use crate::controller::Controller;
use crate::error::RegistryError;
use indexmap::IndexSet;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Set of action names a controller type accepts.
pub type ActionSet = BTreeSet<String>;

static GLOBAL: LazyLock<Arc<ControllerRegistry>> =
    LazyLock::new(|| Arc::new(ControllerRegistry::new()));

/// Static description of a controller type: its name, the actions it declares
/// and the type it extends.
#[derive(Clone, Copy)]
pub struct ControllerType {
    name: &'static str,
    actions: &'static [&'static str],
    parent: fn() -> Option<ControllerType>,
}

impl ControllerType {
    pub fn of<C: Controller>() -> Self {
        Self {
            name: C::NAME,
            actions: C::ACTIONS,
            parent: C::parent,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn actions(&self) -> &'static [&'static str] {
        self.actions
    }

    pub fn parent(&self) -> Option<ControllerType> {
        (self.parent)()
    }

    /// The type and its ancestors, root first.
    ///
    /// A parent chain that loops back onto itself is cut at the first repeat.
    pub fn lineage(&self) -> Vec<ControllerType> {
        let mut chain = vec![*self];
        let mut current = self.parent();
        while let Some(ty) = current {
            if chain.iter().any(|seen| seen.name == ty.name) {
                warn!(controller = self.name, ancestor = ty.name, "Cyclic controller parent chain");
                break;
            }
            current = ty.parent();
            chain.push(ty);
        }
        chain.reverse();
        chain
    }

    /// Every action declared on the type or inherited from an ancestor.
    pub fn public_actions(&self) -> ActionSet {
        self.lineage()
            .iter()
            .flat_map(|ty| ty.actions.iter().map(|a| a.to_string()))
            .collect()
    }
}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerType")
            .field("name", &self.name)
            .field("actions", &self.actions)
            .field("parent", &self.parent().map(|p| p.name))
            .finish()
    }
}

impl PartialEq for ControllerType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ControllerType {}

#[derive(Debug, Default)]
struct TypeRecord {
    parent: Option<&'static str>,
    hidden: IndexSet<String>,
    callable: Option<Arc<ActionSet>>,
}

#[derive(Debug, Default)]
struct RegistryState {
    types: HashMap<&'static str, TypeRecord>,
    subclasses: BTreeSet<String>,
}

impl RegistryState {
    /// Inserts records for the type and its ancestors. Returns true when the
    /// type itself was not known yet.
    fn define(&mut self, ty: ControllerType) -> bool {
        let mut added = false;
        for link in ty.lineage() {
            let parent = link.parent().map(|p| p.name);
            let record = self.types.entry(link.name).or_default();
            record.parent = parent;
            if self.subclasses.insert(link.name.to_string()) && link.name == ty.name {
                added = true;
            }
        }
        added
    }

    fn descends_from(&self, name: &'static str, ancestor: &str) -> bool {
        let mut current = Some(name);
        let mut hops = 0;
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.types.len() {
                return false;
            }
            current = self.types.get(n).and_then(|r| r.parent);
        }
        false
    }

    fn first_frozen_descendant(&self, ancestor: &str) -> Option<&'static str> {
        self.types
            .iter()
            .filter(|(_, record)| record.callable.is_some())
            .map(|(name, _)| *name)
            .find(|name| self.descends_from(*name, ancestor))
    }

    fn effective_hidden(&self, ty: ControllerType) -> IndexSet<String> {
        ty.lineage()
            .iter()
            .filter_map(|link| self.types.get(link.name))
            .flat_map(|record| record.hidden.iter().cloned())
            .collect()
    }
}

/// Registry of controller types, their hidden actions and cached callable sets.
///
/// Most code uses [`ControllerRegistry::global`]. Tests that need isolation
/// create their own and hand it to a [`Builder`](crate::Builder).
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    state: RwLock<RegistryState>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> Arc<ControllerRegistry> {
        Arc::clone(&GLOBAL)
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a controller type and all of its ancestors.
    ///
    /// Defining a type again is a no-op. Returns true the first time.
    pub fn define(&self, ty: ControllerType) -> bool {
        if self.read().types.contains_key(ty.name) {
            return false;
        }
        let added = self.write().define(ty);
        if added {
            debug!(controller = ty.name, "Controller type defined");
        }
        added
    }

    /// Hides `names` from dispatch on `ty` and every type extending it.
    ///
    /// Registering a name twice has no further effect.
    pub fn register_hidden<I, S>(&self, ty: ControllerType, names: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.to_string()).collect();
        let mut state = self.write();
        state.define(ty);

        if let Some(frozen) = state.first_frozen_descendant(ty.name) {
            warn!(controller = ty.name, frozen, ?names, "Hidden actions registered after freeze");
            return Err(RegistryError::Frozen {
                controller: ty.name.to_string(),
                frozen: frozen.to_string(),
                names,
            });
        }

        let record = state.types.entry(ty.name).or_default();
        record.hidden.extend(names);
        debug!(controller = ty.name, hidden = ?record.hidden, "Hidden actions registered");
        Ok(())
    }

    /// The hidden names of `ty` merged with those of its ancestors, in
    /// registration order from the root down.
    ///
    /// A type with no hidden actions gets an empty record persisted.
    pub fn effective_hidden(&self, ty: ControllerType) -> IndexSet<String> {
        self.define(ty);
        self.read().effective_hidden(ty)
    }

    /// The actions `ty` accepts. Computed on first use and cached.
    pub fn callable_actions(&self, ty: ControllerType) -> Arc<ActionSet> {
        let cached = self
            .read()
            .types
            .get(ty.name)
            .and_then(|record| record.callable.clone());
        match cached {
            Some(actions) => actions,
            None => self.freeze(ty),
        }
    }

    /// Computes and caches the callable set of `ty`. Further hidden-action
    /// registrations on `ty` or its ancestors are rejected.
    pub fn freeze(&self, ty: ControllerType) -> Arc<ActionSet> {
        let mut state = self.write();
        state.define(ty);
        if let Some(actions) = state.types.get(ty.name).and_then(|r| r.callable.clone()) {
            return actions;
        }

        let hidden = state.effective_hidden(ty);
        let callable: ActionSet = ty
            .public_actions()
            .into_iter()
            .filter(|action| !hidden.contains(action))
            .collect();
        let callable = Arc::new(callable);

        state.types.entry(ty.name).or_default().callable = Some(Arc::clone(&callable));
        info!(controller = ty.name, actions = ?callable, "Callable actions frozen");
        callable
    }

    pub fn is_frozen(&self, ty: ControllerType) -> bool {
        self.read()
            .types
            .get(ty.name)
            .is_some_and(|record| record.callable.is_some())
    }

    /// Drops the cached callable sets of `ty` and every type extending it.
    pub fn invalidate(&self, ty: ControllerType) {
        let mut state = self.write();
        let stale: Vec<&'static str> = state
            .types
            .keys()
            .copied()
            .filter(|name| state.descends_from(*name, ty.name))
            .collect();
        for name in &stale {
            if let Some(record) = state.types.get_mut(name) {
                record.callable = None;
            }
        }
        debug!(controller = ty.name, invalidated = ?stale, "Callable actions invalidated");
    }

    /// Names of every controller type defined so far.
    pub fn list_subclasses(&self) -> BTreeSet<String> {
        self.read().subclasses.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DispatchContext;
    use crate::error::ActionNotFound;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    #[derive(Debug, thiserror::Error)]
    #[error(transparent)]
    struct TestError(#[from] ActionNotFound);

    macro_rules! test_controller {
        ($ty:ident, $name:literal, [$($action:literal),*] $(, parent = $parent:ty)?) => {
            #[derive(Default)]
            struct $ty {
                ctx: DispatchContext,
            }

            #[async_trait]
            impl Controller for $ty {
                const NAME: &'static str = $name;
                const ACTIONS: &'static [&'static str] = &[$($action),*];
                type Error = TestError;

                $(fn parent() -> Option<ControllerType> {
                    Some(ControllerType::of::<$parent>())
                })?

                fn context(&self) -> &DispatchContext {
                    &self.ctx
                }

                fn context_mut(&mut self) -> &mut DispatchContext {
                    &mut self.ctx
                }

                async fn invoke_action(&mut self, _action: &str) -> Result<(), TestError> {
                    Ok(())
                }
            }
        };
    }

    test_controller!(Base, "Base", ["index", "helper"]);
    test_controller!(Child, "Child", ["show", "internal"], parent = Base);
    test_controller!(GrandChild, "GrandChild", ["edit"], parent = Child);

    fn set(names: &[&str]) -> ActionSet {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn callable_is_public_minus_hidden() {
        let registry = ControllerRegistry::new();
        let child = ControllerType::of::<Child>();
        registry.register_hidden(child, ["internal"]).unwrap();

        assert_eq!(*registry.callable_actions(child), set(&["helper", "index", "show"]));
    }

    #[test]
    fn hidden_names_are_inherited() {
        let registry = ControllerRegistry::new();
        registry
            .register_hidden(ControllerType::of::<Base>(), ["helper"])
            .unwrap();
        registry
            .register_hidden(ControllerType::of::<Child>(), ["internal"])
            .unwrap();

        let grand = ControllerType::of::<GrandChild>();
        let hidden: Vec<_> = registry.effective_hidden(grand).into_iter().collect();
        assert_eq!(hidden, vec!["helper".to_string(), "internal".to_string()]);
        assert_eq!(*registry.callable_actions(grand), set(&["edit", "index", "show"]));
        // the parent is unaffected by the child's hidden names
        assert_eq!(
            *registry.callable_actions(ControllerType::of::<Base>()),
            set(&["index"])
        );
    }

    #[test]
    fn hiding_twice_is_idempotent() {
        let once = ControllerRegistry::new();
        let twice = ControllerRegistry::new();
        let child = ControllerType::of::<Child>();

        once.register_hidden(child, ["internal"]).unwrap();
        twice.register_hidden(child, ["internal"]).unwrap();
        twice.register_hidden(child, ["internal", "internal"]).unwrap();

        assert_eq!(once.effective_hidden(child), twice.effective_hidden(child));
        assert_eq!(once.callable_actions(child), twice.callable_actions(child));
    }

    #[test]
    fn effective_hidden_persists_empty_record() {
        let registry = ControllerRegistry::new();
        let base = ControllerType::of::<Base>();

        assert!(registry.effective_hidden(base).is_empty());
        assert!(registry.list_subclasses().contains("Base"));
        assert!(registry.effective_hidden(base).is_empty());
    }

    #[test]
    fn hiding_after_freeze_is_rejected() {
        let registry = ControllerRegistry::new();
        let base = ControllerType::of::<Base>();
        let child = ControllerType::of::<Child>();

        registry.freeze(child);
        assert!(registry.is_frozen(child));

        let err = registry.register_hidden(child, ["show"]).unwrap_err();
        assert!(matches!(err, RegistryError::Frozen { ref frozen, .. } if frozen == "Child"));

        // an ancestor of a frozen type is locked too
        let err = registry.register_hidden(base, ["helper"]).unwrap_err();
        assert!(matches!(err, RegistryError::Frozen { ref controller, .. } if controller == "Base"));

        assert!(registry.callable_actions(child).contains("show"));
    }

    #[test]
    fn invalidate_reopens_type_and_descendants() {
        let registry = ControllerRegistry::new();
        let base = ControllerType::of::<Base>();
        let child = ControllerType::of::<Child>();

        registry.freeze(child);
        registry.invalidate(base);
        assert!(!registry.is_frozen(child));

        registry.register_hidden(base, ["helper"]).unwrap();
        assert!(!registry.callable_actions(child).contains("helper"));
    }

    #[test]
    fn defining_registers_ancestors_once() {
        let registry = ControllerRegistry::new();
        let grand = ControllerType::of::<GrandChild>();

        assert!(registry.define(grand));
        assert!(!registry.define(grand));
        assert!(!registry.define(ControllerType::of::<Child>()));

        assert_eq!(registry.list_subclasses(), set(&["Base", "Child", "GrandChild"]));
    }

    #[test]
    fn lineage_runs_root_first() {
        let names: Vec<_> = ControllerType::of::<GrandChild>()
            .lineage()
            .iter()
            .map(|ty| ty.name())
            .collect();
        assert_eq!(names, vec!["Base", "Child", "GrandChild"]);
    }
}
