//! Hook ownership and lifecycle.
//!
//! The manager owns every hook instance, enables them at startup, routes
//! subscribed host events to enabled hooks, and releases all subscriptions
//! at shutdown. A hook whose backing system is absent is disabled for the
//! rest of the process; callers asking for it get an empty stub instead.

use std::collections::BTreeSet;
use std::ops::Deref;

use tracing::{debug, info, warn};

use condperm_contracts::{
    error::{CondpermError, CondpermResult},
    event::HostEvent,
    hook::{HookEvent, HookKind},
};

use crate::traits::{Hook, HookContext, Subscriptions};

struct HookSlot {
    hook: Box<dyn Hook>,
    enabled: bool,
    /// The backing system was reported absent. Never retried.
    unavailable: bool,
    subscriptions: Subscriptions,
}

/// Stand-in for a hook that is disabled or was never registered.
///
/// Uses the default (empty) implementation of every query.
#[derive(Debug, Clone, Copy)]
pub struct DisabledHook(HookKind);

impl Hook for DisabledHook {
    fn kind(&self) -> HookKind {
        self.0
    }

    fn enable(&mut self, _subscriptions: &mut Subscriptions) -> CondpermResult<()> {
        Err(CondpermError::HookUnavailable { kind: self.0 })
    }

    fn disable(&mut self) {}
}

/// What `HookManager::get` hands out: the live hook, or a disabled stand-in.
pub enum HookRef<'a> {
    Enabled(&'a dyn Hook),
    Disabled(DisabledHook),
}

impl HookRef<'_> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, HookRef::Enabled(_))
    }
}

impl<'a> Deref for HookRef<'a> {
    type Target = dyn Hook + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            HookRef::Enabled(hook) => *hook,
            HookRef::Disabled(stub) => stub,
        }
    }
}

#[derive(Default)]
pub struct HookManager {
    slots: Vec<HookSlot>,
}

impl HookManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a hook. It stays disabled until `init`.
    pub fn register(&mut self, hook: Box<dyn Hook>) -> CondpermResult<()> {
        let kind = hook.kind();
        if self.slot(kind).is_some() {
            return Err(CondpermError::DuplicateHook { kind });
        }
        self.slots.push(HookSlot {
            hook,
            enabled: false,
            unavailable: false,
            subscriptions: Subscriptions::default(),
        });
        Ok(())
    }

    /// Try to enable every registered hook.
    ///
    /// Kinds in `force_disabled` are skipped. A hook reporting
    /// `HookUnavailable` is left disabled for the rest of the process, and
    /// later calls do not try it again. Returns the enabled kinds.
    pub fn init(&mut self, force_disabled: &[HookKind]) -> BTreeSet<HookKind> {
        for slot in &mut self.slots {
            let kind = slot.hook.kind();
            if slot.enabled || slot.unavailable {
                continue;
            }
            if force_disabled.contains(&kind) {
                info!(hook = %kind, "hook disabled by configuration");
                continue;
            }

            match slot.hook.enable(&mut slot.subscriptions) {
                Ok(()) => {
                    slot.enabled = true;
                    info!(
                        hook = %kind,
                        subscriptions = slot.subscriptions.len(),
                        "hook enabled"
                    );
                }
                Err(CondpermError::HookUnavailable { .. }) => {
                    slot.subscriptions.release_all();
                    slot.unavailable = true;
                    info!(hook = %kind, "backing system not present, hook stays disabled");
                }
                Err(e) => {
                    slot.subscriptions.release_all();
                    warn!(hook = %kind, error = %e, "hook failed to enable, leaving it disabled");
                }
            }
        }
        self.enabled_kinds()
    }

    /// Disable every enabled hook and release all of its subscriptions.
    pub fn shutdown(&mut self) {
        for slot in &mut self.slots {
            let released = slot.subscriptions.release_all();
            if slot.enabled {
                slot.hook.disable();
                slot.enabled = false;
                debug!(hook = %slot.hook.kind(), released, "hook shut down");
            }
        }
    }

    pub fn is_enabled(&self, kind: HookKind) -> bool {
        self.slot(kind).is_some_and(|slot| slot.enabled)
    }

    /// The hook for `kind`, or an empty stub when it is not enabled.
    pub fn get(&self, kind: HookKind) -> HookRef<'_> {
        match self.slot(kind) {
            Some(slot) if slot.enabled => HookRef::Enabled(slot.hook.as_ref()),
            _ => HookRef::Disabled(DisabledHook(kind)),
        }
    }

    pub fn enabled_kinds(&self) -> BTreeSet<HookKind> {
        self.slots
            .iter()
            .filter(|slot| slot.enabled)
            .map(|slot| slot.hook.kind())
            .collect()
    }

    /// Number of live subscriptions across all hooks.
    pub fn subscription_count(&self) -> usize {
        self.slots.iter().map(|slot| slot.subscriptions.len()).sum()
    }

    /// Deliver `event` to every enabled hook subscribed to its kind.
    pub fn dispatch(&mut self, event: &HostEvent, ctx: &HookContext<'_>) -> Vec<HookEvent> {
        let kind = event.kind();
        let mut emitted = Vec::new();
        for slot in &mut self.slots {
            if slot.enabled && slot.subscriptions.contains(kind) {
                emitted.extend(slot.hook.handle(event, ctx));
            }
        }
        emitted
    }

    fn slot(&self, kind: HookKind) -> Option<&HookSlot> {
        self.slots.iter().find(|slot| slot.hook.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    use condperm_contracts::{
        entity::EntityId,
        error::{CondpermError, CondpermResult},
        event::{HostEvent, HostEventKind},
        hook::{HookEvent, HookKind},
    };

    use crate::memory::InMemoryHost;
    use crate::traits::{Hook, HookContext, InterestView, Subscriptions};

    use super::HookManager;

    struct NoInterest;

    impl InterestView for NoInterest {
        fn is_interested(&self, _entity: EntityId, _kind: HookKind) -> bool {
            false
        }
    }

    /// A region-kind hook that reports one fixed region and counts lifecycle calls.
    struct FakeRegionHook {
        available: bool,
        enables: Rc<Cell<u32>>,
        disabled: Rc<Cell<u32>>,
        handled: Rc<Cell<u32>>,
    }

    impl FakeRegionHook {
        fn new(available: bool) -> Self {
            Self {
                available,
                enables: Rc::new(Cell::new(0)),
                disabled: Rc::new(Cell::new(0)),
                handled: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Hook for FakeRegionHook {
        fn kind(&self) -> HookKind {
            HookKind::Region
        }

        fn enable(&mut self, subscriptions: &mut Subscriptions) -> CondpermResult<()> {
            self.enables.set(self.enables.get() + 1);
            subscriptions.subscribe(HostEventKind::Connect);
            if !self.available {
                return Err(CondpermError::HookUnavailable { kind: HookKind::Region });
            }
            subscriptions.subscribe(HostEventKind::Moved);
            Ok(())
        }

        fn disable(&mut self) {
            self.disabled.set(self.disabled.get() + 1);
        }

        fn handle(&mut self, event: &HostEvent, _ctx: &HookContext<'_>) -> Vec<HookEvent> {
            self.handled.set(self.handled.get() + 1);
            vec![HookEvent::EnteredRegion { entity: event.entity(), region: "spawn".to_string() }]
        }

        fn regions_of(&self, _entity: EntityId) -> BTreeSet<String> {
            BTreeSet::from(["spawn".to_string()])
        }
    }

    #[test]
    fn unavailable_hook_stays_disabled_and_serves_empty_stub() {
        let mut manager = HookManager::new();
        manager.register(Box::new(FakeRegionHook::new(false))).unwrap();

        let enabled = manager.init(&[]);

        assert!(enabled.is_empty());
        assert!(!manager.is_enabled(HookKind::Region));
        assert!(manager.get(HookKind::Region).regions_of(EntityId::new()).is_empty());
        // Partial subscriptions made before the failure are released.
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn unavailable_hook_is_never_retried() {
        let hook = FakeRegionHook::new(false);
        let enables = hook.enables.clone();
        let mut manager = HookManager::new();
        manager.register(Box::new(hook)).unwrap();

        manager.init(&[]);
        manager.init(&[]);
        manager.shutdown();
        manager.init(&[]);

        assert_eq!(enables.get(), 1);
        assert!(!manager.is_enabled(HookKind::Region));
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn available_hook_comes_back_after_shutdown() {
        let hook = FakeRegionHook::new(true);
        let enables = hook.enables.clone();
        let mut manager = HookManager::new();
        manager.register(Box::new(hook)).unwrap();

        manager.init(&[]);
        manager.shutdown();
        manager.init(&[]);

        assert_eq!(enables.get(), 2);
        assert!(manager.is_enabled(HookKind::Region));
    }

    #[test]
    fn unregistered_kind_is_a_disabled_stub() {
        let manager = HookManager::new();
        assert!(!manager.is_enabled(HookKind::Quest));
        let stub = manager.get(HookKind::Quest);
        assert!(!stub.is_enabled());
        assert_eq!(stub.kind(), HookKind::Quest);
        assert!(!stub.quest_condition(EntityId::new(), "default", "has_key"));
    }

    #[test]
    fn available_hook_is_enabled_and_queried() {
        let mut manager = HookManager::new();
        manager.register(Box::new(FakeRegionHook::new(true))).unwrap();

        let enabled = manager.init(&[]);

        assert!(enabled.contains(&HookKind::Region));
        assert_eq!(manager.subscription_count(), 2);
        assert!(manager.get(HookKind::Region).is_enabled());
        assert!(manager.get(HookKind::Region).regions_of(EntityId::new()).contains("spawn"));
    }

    #[test]
    fn force_disabled_hook_is_not_enabled() {
        let mut manager = HookManager::new();
        manager.register(Box::new(FakeRegionHook::new(true))).unwrap();

        manager.init(&[HookKind::Region]);

        assert!(!manager.is_enabled(HookKind::Region));
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn duplicate_kind_is_rejected() {
        let mut manager = HookManager::new();
        manager.register(Box::new(FakeRegionHook::new(true))).unwrap();
        let result = manager.register(Box::new(FakeRegionHook::new(true)));
        assert!(matches!(result, Err(CondpermError::DuplicateHook { kind: HookKind::Region })));
    }

    #[test]
    fn dispatch_respects_subscriptions() {
        let hook = FakeRegionHook::new(true);
        let handled = hook.handled.clone();
        let mut manager = HookManager::new();
        manager.register(Box::new(hook)).unwrap();
        manager.init(&[]);

        let host = InMemoryHost::new();
        let ctx = HookContext { host: &host, interest: &NoInterest };
        let entity = EntityId::new();

        let emitted = manager.dispatch(&HostEvent::Connect { entity }, &ctx);
        assert_eq!(emitted.len(), 1);

        // Not subscribed to Disconnect.
        let emitted = manager.dispatch(&HostEvent::Disconnect { entity }, &ctx);
        assert!(emitted.is_empty());
        assert_eq!(handled.get(), 1);
    }

    #[test]
    fn shutdown_releases_every_subscription() {
        let hook = FakeRegionHook::new(true);
        let disabled = hook.disabled.clone();
        let mut manager = HookManager::new();
        manager.register(Box::new(hook)).unwrap();
        manager.init(&[]);

        manager.shutdown();

        assert_eq!(manager.subscription_count(), 0);
        assert_eq!(disabled.get(), 1);
        assert!(!manager.is_enabled(HookKind::Region));

        // A second shutdown does not disable twice.
        manager.shutdown();
        assert_eq!(disabled.get(), 1);
    }
}
