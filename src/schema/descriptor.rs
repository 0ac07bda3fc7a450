//! Statically declared parameter tables.
//!
//! Every class whose constructor is turned into a schema is described once, at
//! compile time, by a [`ClassSpec`]: an ordered list of [`ParameterDescriptor`]s
//! with the declared type, default and documentation of each argument.

use std::fmt;

use serde_json::{Number, Value};

/// The kind of a single declared parameter type.
#[derive(Clone, Copy)]
pub enum TypeKind {
    /// Floating point (`'float'`)
    Float,
    /// Text (`str`)
    Str,
    /// Timestamp (`datetime`)
    DateTime,
    /// Another structured object with its own parameter table
    Class(&'static ClassSpec),
    /// A type with no schema representation (`int`, `bool`, `'array_data'`, ...).
    /// Parameters of this kind are omitted from generated schemas.
    Unsupported(&'static str),
}

// Class tables may reference themselves, so only the class name is printed.
impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Float => f.write_str("Float"),
            TypeKind::Str => f.write_str("Str"),
            TypeKind::DateTime => f.write_str("DateTime"),
            TypeKind::Class(spec) => write!(f, "Class({})", spec.qualified_name()),
            TypeKind::Unsupported(name) => write!(f, "Unsupported({name})"),
        }
    }
}

impl TypeKind {
    /// The class behind this type, if it is a structured object.
    pub fn class(&self) -> Option<&'static ClassSpec> {
        match self {
            TypeKind::Class(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Declared type of a parameter: one type or a tuple of accepted types.
#[derive(Debug, Clone, Copy)]
pub enum DeclaredType {
    /// Exactly one accepted type
    Single(TypeKind),
    /// Any of the listed types, in declaration order
    Tuple(&'static [TypeKind]),
}

impl DeclaredType {
    /// The accepted types in declaration order.
    pub fn members(&self) -> &[TypeKind] {
        match self {
            DeclaredType::Single(kind) => std::slice::from_ref(kind),
            DeclaredType::Tuple(kinds) => kinds,
        }
    }

    /// True if any member satisfies `predicate`.
    pub fn any(&self, predicate: impl Fn(&TypeKind) -> bool) -> bool {
        self.members().iter().any(predicate)
    }
}

/// A constant default value.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    /// Boolean default
    Bool(bool),
    /// Integer default
    Int(i64),
    /// Floating point default
    Float(f64),
    /// String default
    Str(&'static str),
    /// List-of-strings default
    StrList(&'static [&'static str]),
}

impl DefaultValue {
    /// JSON rendering of the default. Non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match *self {
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Int(i) => Value::from(i),
            DefaultValue::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            DefaultValue::Str(s) => Value::from(s),
            DefaultValue::StrList(items) => {
                Value::Array(items.iter().map(|s| Value::from(*s)).collect())
            }
        }
    }
}

/// Default marker of a parameter.
#[derive(Debug, Clone, Copy)]
pub enum ParameterDefault {
    /// No default: the caller must supply the value
    Required,
    /// Default of `None`: optional, nothing to advertise
    Null,
    /// A concrete default value
    Value(DefaultValue),
}

/// One constructor argument.
#[derive(Debug, Clone, Copy)]
pub struct ParameterDescriptor {
    /// Argument name
    pub name: &'static str,
    /// Declared type
    pub declared: DeclaredType,
    /// Default marker
    pub default: ParameterDefault,
    /// Documentation string
    pub doc: &'static str,
}

impl ParameterDescriptor {
    /// A parameter without a default.
    pub const fn required(name: &'static str, declared: DeclaredType, doc: &'static str) -> Self {
        Self {
            name,
            declared,
            default: ParameterDefault::Required,
            doc,
        }
    }

    /// A parameter defaulting to `None`.
    pub const fn optional(name: &'static str, declared: DeclaredType, doc: &'static str) -> Self {
        Self {
            name,
            declared,
            default: ParameterDefault::Null,
            doc,
        }
    }

    /// A parameter with a concrete default.
    pub const fn with_default(
        name: &'static str,
        declared: DeclaredType,
        default: DefaultValue,
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            declared,
            default: ParameterDefault::Value(default),
            doc,
        }
    }
}

/// Parameter table of a docval-style class.
#[derive(Debug)]
pub struct ClassSpec {
    /// Defining module, e.g. `pynwb.device`
    pub module: &'static str,
    /// Class name, e.g. `Device`
    pub name: &'static str,
    /// Constructor arguments in declaration order
    pub params: &'static [ParameterDescriptor],
    /// Explicit `allow_extra` marker; absent means unknown keys are rejected
    pub allow_extra: Option<bool>,
}

impl ClassSpec {
    /// Fully qualified `module.Name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    /// Top-level package of the defining module.
    pub fn ecosystem(&self) -> &'static str {
        self.module.split('.').next().unwrap_or(self.module)
    }

    /// Whether this class belongs to the NWB object ecosystem (`pynwb`).
    pub fn is_nwb_object(&self) -> bool {
        self.ecosystem() == "pynwb"
    }
}

impl PartialEq for ClassSpec {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.name == other.name
    }
}

impl Eq for ClassSpec {}

/// How a plain method parameter binds its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// The implicit receiver (`self`)
    Receiver,
    /// Positional-or-keyword
    PositionalOrKeyword,
    /// Keyword-only
    KeywordOnly,
    /// `*args`
    VarPositional,
    /// `**kwargs`
    VarKeyword,
}

/// Type annotation of a plain method parameter.
#[derive(Debug, Clone, Copy)]
pub enum Annotation {
    /// `bool`
    Bool,
    /// `str`
    Str,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `dict`
    Dict,
    /// `list` or `tuple`
    List,
    /// Path to an existing file
    FilePath,
    /// Path to an existing directory
    FolderPath,
    /// `Optional[T]`
    Optional(&'static Annotation),
    /// No annotation at all
    Unannotated,
    /// Any other annotation; omitted from schemas
    Other(&'static str),
}

/// One argument of a plain (non-docval) method.
#[derive(Debug, Clone, Copy)]
pub struct SignatureParameter {
    /// Argument name
    pub name: &'static str,
    /// Binding kind
    pub kind: ParameterKind,
    /// Type annotation
    pub annotation: Annotation,
    /// Default marker
    pub default: ParameterDefault,
}

impl SignatureParameter {
    /// The `self` receiver.
    pub const fn receiver() -> Self {
        Self {
            name: "self",
            kind: ParameterKind::Receiver,
            annotation: Annotation::Unannotated,
            default: ParameterDefault::Required,
        }
    }

    /// A positional-or-keyword argument.
    pub const fn new(
        name: &'static str,
        annotation: Annotation,
        default: ParameterDefault,
    ) -> Self {
        Self {
            name,
            kind: ParameterKind::PositionalOrKeyword,
            annotation,
            default,
        }
    }

    /// A `**name` catch-all argument.
    pub const fn var_keyword(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::VarKeyword,
            annotation: Annotation::Unannotated,
            default: ParameterDefault::Required,
        }
    }

    /// A `*name` catch-all argument.
    pub const fn var_positional(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::VarPositional,
            annotation: Annotation::Unannotated,
            default: ParameterDefault::Required,
        }
    }
}

/// Signature of a plain method, e.g. an interface constructor.
#[derive(Debug, Clone, Copy)]
pub struct MethodSignature {
    /// `Class.method` used in error messages
    pub owner: &'static str,
    /// Arguments in declaration order
    pub params: &'static [SignatureParameter],
}

impl MethodSignature {
    /// Whether the signature declares a `**kwargs` catch-all.
    pub fn accepts_var_keyword(&self) -> bool {
        self.params.iter().any(|p| p.kind == ParameterKind::VarKeyword)
    }
}
