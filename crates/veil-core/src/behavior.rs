//! Behavior hooks attached to views
//!
//! A [`Behaviors`] set supplies the optional semantics of a view: ordering,
//! equality, invocation, display and size. Reads, writes and access to the
//! hidden structure are fixed by [`View`] itself; hooks aimed at those
//! reserved slots are discarded when installed.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::{Key, Value, VeilResult, View};

pub type OrderFn = Arc<dyn Fn(&View, &View) -> Option<Ordering> + Send + Sync>;
pub type EqualFn = Arc<dyn Fn(&View, &View) -> bool + Send + Sync>;
pub type InvokeFn = Arc<dyn Fn(&View, &[Value]) -> VeilResult<Value> + Send + Sync>;
pub type DisplayFn = Arc<dyn Fn(&View) -> String + Send + Sync>;
pub type SizeFn = Arc<dyn Fn(&View) -> usize + Send + Sync>;
pub type ReadFn = Arc<dyn Fn(&View, &Key) -> Value + Send + Sync>;
pub type WriteFn = Arc<dyn Fn(&View, &Key, Value) -> VeilResult<()> + Send + Sync>;

/// Named slot a hook occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookSlot {
    /// Reserved: writes are always rejected
    Write,
    /// Reserved: reads always go to the private store
    Read,
    /// Reserved: the behavior table stays concealed
    Structure,
    Order,
    Equal,
    Invoke,
    Display,
    Size,
}

impl HookSlot {
    #[inline]
    pub fn is_reserved(self) -> bool {
        matches!(self, HookSlot::Write | HookSlot::Read | HookSlot::Structure)
    }

    pub fn name(self) -> &'static str {
        match self {
            HookSlot::Write => "write",
            HookSlot::Read => "read",
            HookSlot::Structure => "structure",
            HookSlot::Order => "order",
            HookSlot::Equal => "equal",
            HookSlot::Invoke => "invoke",
            HookSlot::Display => "display",
            HookSlot::Size => "size",
        }
    }
}

/// A single behavior hook
#[derive(Clone)]
pub enum Hook {
    Write(WriteFn),
    Read(ReadFn),
    Structure(Value),
    Order(OrderFn),
    Equal(EqualFn),
    Invoke(InvokeFn),
    Display(DisplayFn),
    Size(SizeFn),
}

impl Hook {
    pub fn order<F>(f: F) -> Self
    where
        F: Fn(&View, &View) -> Option<Ordering> + Send + Sync + 'static,
    {
        Hook::Order(Arc::new(f))
    }

    pub fn equal<F>(f: F) -> Self
    where
        F: Fn(&View, &View) -> bool + Send + Sync + 'static,
    {
        Hook::Equal(Arc::new(f))
    }

    pub fn invoke<F>(f: F) -> Self
    where
        F: Fn(&View, &[Value]) -> VeilResult<Value> + Send + Sync + 'static,
    {
        Hook::Invoke(Arc::new(f))
    }

    pub fn display<F>(f: F) -> Self
    where
        F: Fn(&View) -> String + Send + Sync + 'static,
    {
        Hook::Display(Arc::new(f))
    }

    pub fn size<F>(f: F) -> Self
    where
        F: Fn(&View) -> usize + Send + Sync + 'static,
    {
        Hook::Size(Arc::new(f))
    }

    pub fn read<F>(f: F) -> Self
    where
        F: Fn(&View, &Key) -> Value + Send + Sync + 'static,
    {
        Hook::Read(Arc::new(f))
    }

    pub fn write<F>(f: F) -> Self
    where
        F: Fn(&View, &Key, Value) -> VeilResult<()> + Send + Sync + 'static,
    {
        Hook::Write(Arc::new(f))
    }

    pub fn slot(&self) -> HookSlot {
        match self {
            Hook::Write(_) => HookSlot::Write,
            Hook::Read(_) => HookSlot::Read,
            Hook::Structure(_) => HookSlot::Structure,
            Hook::Order(_) => HookSlot::Order,
            Hook::Equal(_) => HookSlot::Equal,
            Hook::Invoke(_) => HookSlot::Invoke,
            Hook::Display(_) => HookSlot::Display,
            Hook::Size(_) => HookSlot::Size,
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({})", self.slot().name())
    }
}

/// Overridable behavior set of a view
#[derive(Clone, Default)]
pub struct Behaviors {
    order: Option<OrderFn>,
    equal: Option<EqualFn>,
    invoke: Option<InvokeFn>,
    display: Option<DisplayFn>,
    size: Option<SizeFn>,
}

impl Behaviors {
    pub fn new() -> Self {
        Behaviors::default()
    }

    /// Builder form of [`install`](Behaviors::install)
    pub fn with(mut self, hook: Hook) -> Self {
        self.install(hook);
        self
    }

    /// Install a hook, replacing any hook in the same slot.
    ///
    /// Returns `false` when the hook targets a reserved slot and was dropped.
    pub fn install(&mut self, hook: Hook) -> bool {
        match hook {
            Hook::Order(f) => self.order = Some(f),
            Hook::Equal(f) => self.equal = Some(f),
            Hook::Invoke(f) => self.invoke = Some(f),
            Hook::Display(f) => self.display = Some(f),
            Hook::Size(f) => self.size = Some(f),
            reserved @ (Hook::Write(_) | Hook::Read(_) | Hook::Structure(_)) => {
                tracing::debug!(
                    target: "veil::view",
                    slot = reserved.slot().name(),
                    "ignoring hook for reserved slot"
                );
                return false;
            }
        }
        true
    }

    /// Copy of `self` with every hook present in `overrides` replacing ours
    pub fn merged(&self, overrides: &Behaviors) -> Behaviors {
        Behaviors {
            order: overrides.order.clone().or_else(|| self.order.clone()),
            equal: overrides.equal.clone().or_else(|| self.equal.clone()),
            invoke: overrides.invoke.clone().or_else(|| self.invoke.clone()),
            display: overrides.display.clone().or_else(|| self.display.clone()),
            size: overrides.size.clone().or_else(|| self.size.clone()),
        }
    }

    pub fn has(&self, slot: HookSlot) -> bool {
        match slot {
            HookSlot::Order => self.order.is_some(),
            HookSlot::Equal => self.equal.is_some(),
            HookSlot::Invoke => self.invoke.is_some(),
            HookSlot::Display => self.display.is_some(),
            HookSlot::Size => self.size.is_some(),
            HookSlot::Write | HookSlot::Read | HookSlot::Structure => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_none()
            && self.equal.is_none()
            && self.invoke.is_none()
            && self.display.is_none()
            && self.size.is_none()
    }

    pub(crate) fn order(&self) -> Option<&OrderFn> {
        self.order.as_ref()
    }

    pub(crate) fn equal(&self) -> Option<&EqualFn> {
        self.equal.as_ref()
    }

    pub(crate) fn invoke(&self) -> Option<&InvokeFn> {
        self.invoke.as_ref()
    }

    pub(crate) fn display(&self) -> Option<&DisplayFn> {
        self.display.as_ref()
    }

    pub(crate) fn size(&self) -> Option<&SizeFn> {
        self.size.as_ref()
    }
}

impl FromIterator<Hook> for Behaviors {
    fn from_iter<I: IntoIterator<Item = Hook>>(hooks: I) -> Self {
        let mut behaviors = Behaviors::new();
        for hook in hooks {
            behaviors.install(hook);
        }
        behaviors
    }
}

impl fmt::Debug for Behaviors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<&str> = [
            HookSlot::Order,
            HookSlot::Equal,
            HookSlot::Invoke,
            HookSlot::Display,
            HookSlot::Size,
        ]
        .into_iter()
        .filter(|slot| self.has(*slot))
        .map(HookSlot::name)
        .collect();
        f.debug_struct("Behaviors").field("slots", &slots).finish()
    }
}
