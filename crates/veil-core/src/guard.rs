//! Runtime kind guards
//!
//! A guard returns its argument unchanged when the argument has the expected
//! [`Kind`], and fails otherwise. Guards are the precondition check at the
//! entry of every operation that accepts dynamic [`Value`]s.

use std::fmt;

use crate::{Value, VeilError, VeilResult};

/// Fundamental value categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    /// Absence of a value
    Nil = 1,
    Text = 2,
    Boolean = 3,
    Number = 4,
    Callable = 5,
    /// Opaque host data
    Handle = 6,
    /// Resumable task
    Task = 7,
    /// Structured record (a view)
    Record = 8,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Nil,
        Kind::Text,
        Kind::Boolean,
        Kind::Number,
        Kind::Callable,
        Kind::Handle,
        Kind::Task,
        Kind::Record,
    ];

    /// Kind of a value
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Nil => Kind::Nil,
            Value::Text(_) => Kind::Text,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::Callable(_) => Kind::Callable,
            Value::Handle(_) => Kind::Handle,
            Value::Task(_) => Kind::Task,
            Value::Record(_) => Kind::Record,
        }
    }

    /// Member name inside the Kind enum
    pub fn name(self) -> &'static str {
        match self {
            Kind::Nil => "NIL",
            Kind::Text => "TEXT",
            Kind::Boolean => "BOOLEAN",
            Kind::Number => "NUMBER",
            Kind::Callable => "CALLABLE",
            Kind::Handle => "HANDLE",
            Kind::Task => "TASK",
            Kind::Record => "RECORD",
        }
    }

    /// Lowercase type name, as reported in mismatch messages
    pub fn type_name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Text => "text",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::Callable => "callable",
            Kind::Handle => "handle",
            Kind::Task => "task",
            Kind::Record => "record",
        }
    }

    #[inline]
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<Kind> {
        Kind::ALL.get(ordinal.checked_sub(1)? as usize).copied()
    }

    /// Non-failing form of [`check`](Kind::check)
    #[inline]
    pub fn matches(self, value: &Value) -> bool {
        Kind::of(value) == self
    }

    /// Return `value` if it has this kind.
    ///
    /// Guarding a non-callable as [`Kind::Callable`] is an unsupported
    /// operation; every other mismatch is a type mismatch.
    pub fn check(self, value: Value) -> VeilResult<Value> {
        let received = Kind::of(&value);
        if received == self {
            return Ok(value);
        }
        if self == Kind::Callable {
            return Err(VeilError::UnsupportedOperation(format!(
                "{received} value is not callable"
            )));
        }
        Err(VeilError::TypeMismatch {
            received,
            expected: self,
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Guard `value` against `kind`
#[inline]
pub fn check(kind: Kind, value: Value) -> VeilResult<Value> {
    kind.check(value)
}

/// Predicate form of [`check`]
#[inline]
pub fn matches(kind: Kind, value: &Value) -> bool {
    kind.matches(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_check_returns_value_unchanged() {
        let value = check(Kind::Number, Value::Number(5.0)).unwrap();
        assert_eq!(value, Value::Number(5.0));

        let value = check(Kind::Text, Value::text("mount")).unwrap();
        assert_eq!(value.as_text(), Some("mount"));
    }

    #[test]
    fn test_check_mismatch_names_both_kinds() {
        let err = check(Kind::Number, Value::text("x")).unwrap_err();
        assert_eq!(
            err,
            VeilError::TypeMismatch {
                received: Kind::Text,
                expected: Kind::Number,
            }
        );
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_non_callable_guard_is_unsupported() {
        let err = check(Kind::Callable, Value::Number(1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

        let f = Value::callable(|_| Ok(Value::Nil));
        assert!(check(Kind::Callable, f).is_ok());
    }

    #[test]
    fn test_matches_never_fails() {
        assert!(matches(Kind::Nil, &Value::Nil));
        assert!(!matches(Kind::Nil, &Value::Boolean(false)));
        assert!(matches(Kind::Boolean, &Value::Boolean(false)));
    }

    #[test]
    fn test_kind_ordinals_are_contiguous() {
        for (index, kind) in Kind::ALL.iter().enumerate() {
            assert_eq!(kind.ordinal() as usize, index + 1);
            assert_eq!(Kind::from_ordinal(kind.ordinal()), Some(*kind));
        }
        assert_eq!(Kind::from_ordinal(0), None);
        assert_eq!(Kind::from_ordinal(9), None);
    }
}
