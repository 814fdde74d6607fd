//! Dynamic values
//!
//! Stores hold [`Value`]s keyed by [`Key`]. A value belongs to exactly one
//! runtime [`Kind`], which is what guards inspect.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Kind, VeilResult, View};

/// Signature of a native callable
pub type NativeFn = dyn Fn(&[Value]) -> VeilResult<Value> + Send + Sync;

/// Shared callable value
#[derive(Clone)]
pub struct Callable(Arc<NativeFn>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> VeilResult<Value> + Send + Sync + 'static,
    {
        Callable(Arc::new(f))
    }

    #[inline]
    pub fn call(&self, args: &[Value]) -> VeilResult<Value> {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Opaque handle to host data
#[derive(Clone)]
pub struct Handle(Arc<dyn Any + Send + Sync>);

impl Handle {
    pub fn new<T: Any + Send + Sync>(inner: T) -> Self {
        Handle(Arc::new(inner))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Handle) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

type Step = Box<dyn FnMut() -> Option<Value> + Send>;

struct TaskState {
    /// Taken out while the step runs
    step: Option<Step>,
    finished: bool,
}

/// Resumable task, the concurrency primitive of the value model.
///
/// Each [`resume`](Task::resume) runs the task up to its next yielded value.
/// Once the task yields nothing it stays finished. A task resumed from
/// inside its own step yields nothing without finishing.
#[derive(Clone)]
pub struct Task(Arc<Mutex<TaskState>>);

impl Task {
    pub fn new<F>(step: F) -> Self
    where
        F: FnMut() -> Option<Value> + Send + 'static,
    {
        Task(Arc::new(Mutex::new(TaskState {
            step: Some(Box::new(step)),
            finished: false,
        })))
    }

    pub fn resume(&self) -> Option<Value> {
        let mut step = {
            let mut state = self.0.lock();
            if state.finished {
                return None;
            }
            state.step.take()?
        };

        let next = step();
        let mut state = self.0.lock();
        if next.is_none() {
            state.finished = true;
        } else {
            state.step = Some(step);
        }
        next
    }

    pub fn is_finished(&self) -> bool {
        self.0.lock().finished
    }

    pub fn ptr_eq(&self, other: &Task) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({:p})", Arc::as_ptr(&self.0))
    }
}

/// Store key: an integer index or a field name
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Key {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<u32> for Key {
    fn from(index: u32) -> Self {
        Key::Index(index as i64)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// Dynamic value held by stores and checked by guards
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Text(String),
    Boolean(bool),
    Number(f64),
    Callable(Callable),
    Handle(Handle),
    Task(Task),
    Record(View),
}

impl Value {
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> VeilResult<Value> + Send + Sync + 'static,
    {
        Value::Callable(Callable::new(f))
    }

    /// Runtime kind of this value
    #[inline]
    pub fn kind(&self) -> Kind {
        Kind::of(self)
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Value::Handle(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Value::Task(task) => Some(task),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&View> {
        match self {
            Value::Record(view) => Some(view),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Handle(a), Value::Handle(b)) => a.ptr_eq(b),
            (Value::Task(a), Value::Task(b)) => a.ptr_eq(b),
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Text(text) => f.write_str(text),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Callable(callable) => write!(f, "{callable:?}"),
            Value::Handle(handle) => write!(f, "{handle:?}"),
            Value::Task(task) => write!(f, "{task:?}"),
            Value::Record(view) => write!(f, "{view}"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<Handle> for Value {
    fn from(handle: Handle) -> Self {
        Value::Handle(handle)
    }
}

impl From<Task> for Value {
    fn from(task: Task) -> Self {
        Value::Task(task)
    }
}

impl From<View> for Value {
    fn from(view: View) -> Self {
        Value::Record(view)
    }
}
