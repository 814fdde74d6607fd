//! Ordered enum sets
//!
//! [`create_enum`] turns a list of names into an [`EnumSet`] of singleton
//! [`EnumValue`]s. Every member is a read-only [`View`] seeded with its
//! uppercase `name` and 1-based `ordinal`; all members of one set share a
//! single behavior set, which is what makes them comparable with each other
//! and with nothing else.
//!
//! The returned [`FieldAccessor`] is the constructor's private path into the
//! members' stores. Modules that build an enum keep it to attach extra fields
//! (a predicate, a label, ...) after construction and hand out only the set.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::{create_view, Behaviors, Hook, Key, Store, Value, VeilError, VeilResult, View};

/// Field holding a member's uppercase name
pub const NAME_FIELD: &str = "name";
/// Field holding a member's 1-based ordinal
pub const ORDINAL_FIELD: &str = "ordinal";

fn ordinal_of(view: &View) -> Option<f64> {
    view.get(ORDINAL_FIELD).as_number()
}

fn default_behaviors() -> Behaviors {
    Behaviors::new()
        .with(Hook::order(|a, b| ordinal_of(a)?.partial_cmp(&ordinal_of(b)?)))
        .with(Hook::invoke(|view, _| Ok(view.get(ORDINAL_FIELD))))
        .with(Hook::display(|view| view.get(NAME_FIELD).to_string()))
}

/// Build an enum set from `names`.
///
/// Names are uppercased and numbered `1..N` in input order. A name that
/// repeats after uppercasing fails construction. Hooks in `overrides` replace
/// the defaults (ordering by ordinal, invocation yielding the ordinal, display
/// yielding the name).
pub fn create_enum<I, S>(names: I, overrides: Option<Behaviors>) -> VeilResult<(EnumSet, FieldAccessor)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut upper = Vec::new();
    for name in names {
        let name = name.as_ref().to_uppercase();
        if !seen.insert(name.clone()) {
            return Err(VeilError::DuplicateName(name));
        }
        upper.push(name);
    }

    let defaults = default_behaviors();
    let shared = Arc::new(match overrides {
        Some(overrides) => defaults.merged(&overrides),
        None => defaults,
    });

    let set_store = Store::new();
    let mut stores = Vec::with_capacity(upper.len());
    let mut index = HashMap::with_capacity(upper.len());

    for (position, name) in upper.iter().enumerate() {
        let ordinal = (position + 1) as u32;
        let store = Store::from_fields([
            (NAME_FIELD, Value::text(name)),
            (ORDINAL_FIELD, Value::from(ordinal)),
        ]);
        let member = View::shared(store.clone(), Arc::clone(&shared));

        set_store.set(name.as_str(), member.clone());
        set_store.set(ordinal, member);
        index.insert(name.clone(), position);
        stores.push(store);
    }

    let size = upper.len();
    let set_behaviors = Behaviors::new()
        .with(Hook::size(move |_| size))
        .with(Hook::display(move |_| format!("EnumSet({size})")));
    // The set's own store handle is dropped here: membership is final.
    let (view, _) = create_view(Some(set_store), Some(set_behaviors));

    tracing::debug!(target: "veil::enum", size, "enum set created");
    Ok((EnumSet { view }, FieldAccessor { stores, index }))
}

/// Immutable singleton member of an [`EnumSet`]
#[derive(Clone)]
pub struct EnumValue {
    view: View,
    name: String,
    ordinal: u32,
}

impl EnumValue {
    /// Recover a member from its view
    pub fn from_view(view: &View) -> Option<EnumValue> {
        let name = view.get(NAME_FIELD).as_text()?.to_string();
        let ordinal = view.get(ORDINAL_FIELD).as_number()? as u32;
        Some(EnumValue {
            view: view.clone(),
            name,
            ordinal,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Read a field, including fields attached after construction
    pub fn get(&self, field: impl Into<Key>) -> Value {
        self.view.get(field)
    }

    /// Invoke through the set's invocation hook
    pub fn invoke(&self, args: &[Value]) -> VeilResult<Value> {
        self.view.invoke(args)
    }

    /// Members are read-only; this always fails
    pub fn try_set(&self, field: impl Into<Key>, value: impl Into<Value>) -> VeilResult<()> {
        self.view.try_set(field, value)
    }

    #[inline]
    pub fn view(&self) -> &View {
        &self.view
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.view == other.view
    }
}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.view.partial_cmp(&other.view)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.view)
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.ordinal)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Value::Record(value.view)
    }
}

/// Ordered, read-only collection of enum members
#[derive(Clone)]
pub struct EnumSet {
    view: View,
}

impl EnumSet {
    /// Member by name (matched after uppercasing)
    pub fn get(&self, name: &str) -> Option<EnumValue> {
        self.view
            .get(name.to_uppercase())
            .as_record()
            .and_then(EnumValue::from_view)
    }

    /// Member by 1-based ordinal
    pub fn by_ordinal(&self, ordinal: u32) -> Option<EnumValue> {
        self.view
            .get(ordinal)
            .as_record()
            .and_then(EnumValue::from_view)
    }

    /// Cardinality, through the set view's size hook
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members in ordinal order
    pub fn iter(&self) -> impl Iterator<Item = EnumValue> + '_ {
        (1..=self.len() as u32).filter_map(move |ordinal| self.by_ordinal(ordinal))
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|member| member.name).collect()
    }

    /// True when `value` is a member of this very set
    pub fn contains(&self, value: &EnumValue) -> bool {
        self.by_ordinal(value.ordinal())
            .map_or(false, |member| &member == value)
    }

    /// The set is read-only; this always fails
    pub fn try_set(&self, key: impl Into<Key>, value: impl Into<Value>) -> VeilResult<()> {
        self.view.try_set(key, value)
    }

    #[inline]
    pub fn view(&self) -> &View {
        &self.view
    }
}

impl fmt::Debug for EnumSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for EnumSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.view)
    }
}

/// Constructor-only access to the members' private stores
pub struct FieldAccessor {
    stores: Vec<Store>,
    index: HashMap<String, usize>,
}

impl FieldAccessor {
    fn resolve(&self, member: &Key) -> Option<&Store> {
        match member {
            Key::Name(name) => self
                .index
                .get(&name.to_uppercase())
                .and_then(|&position| self.stores.get(position)),
            Key::Index(ordinal) => usize::try_from(*ordinal)
                .ok()?
                .checked_sub(1)
                .and_then(|position| self.stores.get(position)),
        }
    }

    /// Read a field of the member named or numbered by `member`
    pub fn get(&self, member: impl Into<Key>, field: impl Into<Key>) -> Value {
        self.resolve(&member.into())
            .map(|store| store.get(field))
            .unwrap_or_default()
    }

    /// Attach (or replace) a field on a member.
    ///
    /// `name` and `ordinal` are fixed at construction and cannot be replaced.
    pub fn attach(
        &self,
        member: impl Into<Key>,
        field: impl Into<Key>,
        value: impl Into<Value>,
    ) -> VeilResult<()> {
        let member = member.into();
        let field = field.into();
        if matches!(field.as_name(), Some(NAME_FIELD) | Some(ORDINAL_FIELD)) {
            return Err(VeilError::UnsupportedOperation(format!(
                "field {field} of an enum value is fixed"
            )));
        }
        let store = self.resolve(&member).ok_or_else(|| {
            VeilError::UnsupportedOperation(format!("no enum member {member} to extend"))
        })?;
        store.set(field, value);
        Ok(())
    }

    /// Attach a field to `value`, which must belong to this accessor's set
    pub fn attach_to(
        &self,
        value: &EnumValue,
        field: impl Into<Key>,
        value_field: impl Into<Value>,
    ) -> VeilResult<()> {
        let owned = self
            .resolve(&Key::from(value.ordinal()))
            .map_or(false, |store| store.ptr_eq(value.view.store()));
        if !owned {
            return Err(VeilError::UnsupportedOperation(format!(
                "{} does not belong to this enum set",
                value.name()
            )));
        }
        self.attach(value.ordinal(), field, value_field)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("members", &self.stores.len())
            .finish()
    }
}
