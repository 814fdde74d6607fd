//! Built-in enums
//!
//! Two vocabularies are built from [`create_enum`] and shared process-wide:
//! - Kind: one guard per [`Kind`]. Invoking a member checks its argument;
//!   each member also carries a non-failing `match` predicate and a `type` name.
//! - Diagnostic: one member per [`ErrorKind`]. Invoking a member with
//!   `(source, message)` logs a labeled diagnostic and returns a fatal error.
//!
//! The sets are created by an explicit [`Builtins::init`] call at startup and
//! are read-only afterwards.

use std::sync::OnceLock;

use crate::{
    create_enum, Behaviors, Callable, Diagnostic, EnumSet, EnumValue, ErrorKind, Hook, Kind,
    Value, VeilError, VeilResult, View, ORDINAL_FIELD,
};

/// Lowercase kind name attached to every Kind member
pub const TYPE_FIELD: &str = "type";
/// Non-failing predicate attached to every Kind member
pub const MATCH_FIELD: &str = "match";
/// Rendered label attached to every Diagnostic member
pub const LABEL_FIELD: &str = "label";

static BUILTINS: OnceLock<Builtins> = OnceLock::new();

/// The Kind and Diagnostic enum sets
#[derive(Debug)]
pub struct Builtins {
    kinds: EnumSet,
    diagnostics: EnumSet,
}

impl Builtins {
    /// Build the process-wide sets. Later calls return the same instance.
    pub fn init() -> VeilResult<&'static Builtins> {
        if let Some(builtins) = BUILTINS.get() {
            return Ok(builtins);
        }
        let built = Builtins::build()?;
        let builtins = BUILTINS.get_or_init(|| built);
        tracing::debug!(
            target: "veil::enum",
            kinds = builtins.kinds.len(),
            diagnostics = builtins.diagnostics.len(),
            "built-in enums initialized"
        );
        Ok(builtins)
    }

    /// The process-wide sets, if [`init`](Builtins::init) has run
    pub fn get() -> Option<&'static Builtins> {
        BUILTINS.get()
    }

    /// Build a private copy of the sets
    pub fn build() -> VeilResult<Builtins> {
        Ok(Builtins {
            kinds: build_kinds()?,
            diagnostics: build_diagnostics()?,
        })
    }

    pub fn kinds(&self) -> &EnumSet {
        &self.kinds
    }

    pub fn diagnostics(&self) -> &EnumSet {
        &self.diagnostics
    }

    /// Kind member guarding `kind`
    pub fn kind(&self, kind: Kind) -> Option<EnumValue> {
        self.kinds.by_ordinal(kind.ordinal())
    }

    /// Diagnostic member raising `kind`
    pub fn diagnostic(&self, kind: ErrorKind) -> Option<EnumValue> {
        self.diagnostics.by_ordinal(kind.ordinal())
    }

    /// Raise `message` through the Diagnostic member for `kind`.
    ///
    /// The diagnostic is logged before the fatal error is returned.
    pub fn raise(&self, kind: ErrorKind, source: &str, message: &str) -> VeilError {
        let raised = self
            .diagnostic(kind)
            .map(|member| member.invoke(&[Value::text(source), Value::text(message)]));
        if let Some(Err(err)) = raised {
            return err;
        }
        let diagnostic = Diagnostic::new(kind, source, message);
        diagnostic.emit();
        VeilError::Fatal(diagnostic)
    }

    /// Turn any error into a logged fatal diagnostic attributed to `source`.
    ///
    /// Errors that are already fatal were logged when raised and pass through.
    pub fn report(&self, source: &str, err: &VeilError) -> VeilError {
        if err.is_fatal() {
            return err.clone();
        }
        self.raise(err.kind(), source, &err.detail())
    }
}

fn member_ordinal(view: &View) -> Option<u32> {
    view.get(ORDINAL_FIELD).as_number().map(|ordinal| ordinal as u32)
}

fn build_kinds() -> VeilResult<EnumSet> {
    let guard = Behaviors::new().with(Hook::invoke(|view, args| {
        let kind = member_ordinal(view)
            .and_then(Kind::from_ordinal)
            .ok_or_else(|| VeilError::UnsupportedOperation("view is not a kind guard".into()))?;
        kind.check(args.first().cloned().unwrap_or_default())
    }));
    let (kinds, accessor) = create_enum(Kind::ALL.iter().map(|kind| kind.name()), Some(guard))?;

    for kind in Kind::ALL {
        accessor.attach(kind.ordinal(), TYPE_FIELD, kind.type_name())?;
        accessor.attach(
            kind.ordinal(),
            MATCH_FIELD,
            Callable::new(move |args| {
                let matched = args
                    .first()
                    .map_or(kind == Kind::Nil, |value| kind.matches(value));
                Ok(Value::Boolean(matched))
            }),
        )?;
    }

    Ok(kinds)
}

fn build_diagnostics() -> VeilResult<EnumSet> {
    let raise = Behaviors::new().with(Hook::invoke(|view, args| {
        let kind = member_ordinal(view)
            .and_then(ErrorKind::from_ordinal)
            .ok_or_else(|| {
                VeilError::UnsupportedOperation("view is not a diagnostic".into())
            })?;
        let source = args.first().map(Value::to_string).unwrap_or_default();
        let message = args.get(1).map(Value::to_string).unwrap_or_default();

        let diagnostic = Diagnostic::new(kind, source, message);
        diagnostic.emit();
        Err(VeilError::Fatal(diagnostic))
    }));
    let (diagnostics, accessor) =
        create_enum(ErrorKind::ALL.iter().map(|kind| kind.enum_name()), Some(raise))?;

    for kind in ErrorKind::ALL {
        accessor.attach(kind.ordinal(), LABEL_FIELD, kind.label())?;
    }

    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_view, Handle, Task};

    fn call_match(member: &EnumValue, value: Value) -> bool {
        member
            .get(MATCH_FIELD)
            .as_callable()
            .unwrap()
            .call(&[value])
            .unwrap()
            .as_bool()
            .unwrap()
    }

    #[test]
    fn test_kind_enum_shape() {
        let builtins = Builtins::build().unwrap();
        assert_eq!(builtins.kinds().len(), 8);
        assert_eq!(
            builtins.kinds().names(),
            vec!["NIL", "TEXT", "BOOLEAN", "NUMBER", "CALLABLE", "HANDLE", "TASK", "RECORD"]
        );
        for kind in Kind::ALL {
            let member = builtins.kind(kind).unwrap();
            assert_eq!(member.name(), kind.name());
            assert_eq!(member.get(TYPE_FIELD).as_text(), Some(kind.type_name()));
        }
    }

    #[test]
    fn test_number_guard_scenario() {
        let builtins = Builtins::build().unwrap();
        let number = builtins.kinds().get("NUMBER").unwrap();

        assert_eq!(number.invoke(&[Value::Number(5.0)]).unwrap(), Value::Number(5.0));

        let err = number.invoke(&[Value::text("x")]).unwrap_err();
        assert_eq!(
            err,
            VeilError::TypeMismatch {
                received: Kind::Text,
                expected: Kind::Number,
            }
        );
    }

    #[test]
    fn test_kind_guards_accept_their_kind() {
        let builtins = Builtins::build().unwrap();
        let (record, _) = create_view(None, None);
        let samples = [
            Value::Nil,
            Value::text("t"),
            Value::Boolean(true),
            Value::Number(0.5),
            Value::callable(|_| Ok(Value::Nil)),
            Value::Handle(Handle::new(1u8)),
            Value::Task(Task::new(|| None)),
            Value::Record(record),
        ];

        for (kind, sample) in Kind::ALL.into_iter().zip(samples) {
            let member = builtins.kind(kind).unwrap();
            assert!(call_match(&member, sample.clone()));
            assert_eq!(member.invoke(&[sample.clone()]).unwrap(), sample);
        }
    }

    #[test]
    fn test_match_predicate_never_fails() {
        let builtins = Builtins::build().unwrap();
        let text = builtins.kind(Kind::Text).unwrap();
        assert!(!call_match(&text, Value::Number(1.0)));

        let nil = builtins.kind(Kind::Nil).unwrap();
        let matched = nil.get(MATCH_FIELD).as_callable().unwrap().call(&[]).unwrap();
        assert_eq!(matched, Value::Boolean(true));
    }

    #[test]
    fn test_callable_guard_is_unsupported_operation() {
        let builtins = Builtins::build().unwrap();
        let callable = builtins.kind(Kind::Callable).unwrap();
        let err = callable.invoke(&[Value::Number(1.0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_diagnostic_members_raise_fatal() {
        let builtins = Builtins::build().unwrap();
        assert_eq!(builtins.diagnostics().len(), 3);

        let mismatch = builtins.diagnostics().get("TYPE_MISMATCH").unwrap();
        assert_eq!(mismatch.get(LABEL_FIELD).as_text(), Some("TypeMismatch"));

        let err = mismatch
            .invoke(&[Value::text("Mounts"), Value::text("expected a number")])
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.to_string(), "[ Mounts ] TypeMismatch: expected a number");
    }

    #[test]
    fn test_report_wraps_plain_errors_once() {
        let builtins = Builtins::build().unwrap();
        let plain = VeilError::UnsupportedOperation("cannot assign field x".into());

        let fatal = builtins.report("Settings", &plain);
        assert_eq!(
            fatal.to_string(),
            "[ Settings ] UnsupportedOperation: cannot assign field x"
        );
        assert_eq!(builtins.report("Other", &fatal), fatal);
    }

    #[test]
    fn test_raise_absent_reference() {
        let builtins = Builtins::build().unwrap();
        let err = builtins.raise(ErrorKind::AbsentReference, "Lib", "no instance");
        assert_eq!(err.kind(), ErrorKind::AbsentReference);
    }

    #[test]
    fn test_init_is_idempotent() {
        let first = Builtins::init().unwrap();
        let second = Builtins::init().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(Builtins::get().is_some());
    }

    #[test]
    fn test_kind_members_are_ordered() {
        let builtins = Builtins::build().unwrap();
        let nil = builtins.kind(Kind::Nil).unwrap();
        let record = builtins.kind(Kind::Record).unwrap();
        assert!(nil < record);
    }
}
