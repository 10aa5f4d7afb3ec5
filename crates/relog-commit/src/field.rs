//! Typed field access and comparison by configured path.
//!
//! Configuration refers to record fields by dotted names such as `Type` or
//! `Author.Date`. A [`FieldPath`] resolves such a name once, against the
//! accessor table of a [`Fields`] record, and is then applied to any number
//! of records without further string handling.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

/// A value read from a record through a [`FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A string field.
    Str(&'a str),
    /// An integer field.
    Int(i64),
    /// A timestamp field.
    Time(DateTime<Utc>),
}

impl<'a> FieldValue<'a> {
    /// Returns the string slice if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Time(_) => "time",
        }
    }
}

/// Relational operators accepted by [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl Operator {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
        }
    }
}

impl FromStr for Operator {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            other => Err(CompareError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        f.write_str(op)
    }
}

/// Comparison errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// The two values are of different kinds.
    #[error("cannot compare {left} with {right}")]
    TypeMismatch {
        /// Kind of the left operand.
        left: &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },

    /// The operator is not supported.
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}

/// Compares two field values under the given operator.
///
/// Strings compare lexicographically, integers numerically and timestamps
/// chronologically.
///
/// # Errors
///
/// Returns [`CompareError::TypeMismatch`] if the values are of different kinds.
pub fn compare(a: FieldValue<'_>, op: Operator, b: FieldValue<'_>) -> Result<bool, CompareError> {
    let ordering = match (a, b) {
        (FieldValue::Str(x), FieldValue::Str(y)) => x.cmp(y),
        (FieldValue::Int(x), FieldValue::Int(y)) => x.cmp(&y),
        (FieldValue::Time(x), FieldValue::Time(y)) => x.cmp(&y),
        _ => {
            return Err(CompareError::TypeMismatch {
                left: a.kind(),
                right: b.kind(),
            });
        }
    };
    Ok(op.holds(ordering))
}

/// Extracts one field from a record.
pub type Getter<T> = Box<dyn for<'a> Fn(&'a T) -> Option<FieldValue<'a>> + Send + Sync>;

/// Boxes a closure as a [`Getter`].
///
/// Going through this bound lets the closure's return borrow from its
/// argument.
pub fn accessor<T, F>(get: F) -> Getter<T>
where
    F: for<'a> Fn(&'a T) -> Option<FieldValue<'a>> + Send + Sync + 'static,
{
    Box::new(get)
}

/// Records whose fields can be addressed by configured names.
pub trait Fields: Sized {
    /// Returns the getter for a dotted path, or `None` if the record has no
    /// such field.
    fn getter(path: &str) -> Option<Getter<Self>>;
}

/// A configured field path, resolved once against the accessor table of `T`.
pub struct FieldPath<T> {
    path: String,
    getter: Option<Getter<T>>,
}

impl<T: Fields> FieldPath<T> {
    /// Resolves `path` against the fields of `T`.
    ///
    /// An unknown path is kept and never resolves.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let getter = T::getter(&path);
        if getter.is_none() {
            warn!(%path, "unknown field path, it will never resolve");
        }
        Self { path, getter }
    }

    /// Returns the configured path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the field from `record`.
    pub fn resolve<'a>(&self, record: &'a T) -> Option<FieldValue<'a>> {
        self.getter.as_ref().and_then(|get| get(record))
    }

    /// Returns true if `a` sorts strictly before `b` on this field.
    ///
    /// Unresolved fields and mismatched kinds are never less.
    pub fn less(&self, a: &T, b: &T) -> bool {
        match (self.resolve(a), self.resolve(b)) {
            (Some(x), Some(y)) => compare(x, Operator::Lt, y).unwrap_or(false),
            _ => false,
        }
    }
}

impl<T> fmt::Debug for FieldPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPath")
            .field("path", &self.path)
            .field("resolved", &self.getter.is_some())
            .finish()
    }
}
