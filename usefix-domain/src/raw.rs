use crate::error::{DepCategory, MetadataError};
use serde_json::Value;

/// The literal an extension passes to claim every generated repository.
pub const ALL: &str = "all";

/// A `root_module_direct_*` argument as it arrives from the extension, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDeps {
    /// Argument omitted (or `None`).
    Unset,
    /// A bare string; only `"all"` is meaningful.
    Str(String),
    List(Vec<String>),
    /// A non-empty list with a non-string element. Only the first offending element
    /// is kept; it is reported once the pairing rules have passed.
    BadList { index: usize, type_name: String },
    /// Any other value; carries the value's type name for the error message.
    Other { type_name: String },
}

impl RawDeps {
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawDeps::List(items.into_iter().map(Into::into).collect())
    }

    pub fn all() -> Self {
        RawDeps::Str(ALL.to_string())
    }

    /// Classify a JSON argument. Never fails: type problems surface from
    /// [`ExtensionMetadata::from_raw`](crate::ExtensionMetadata::from_raw) in rule order.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => RawDeps::Unset,
            Value::String(s) => RawDeps::Str(s.clone()),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => list.push(s.clone()),
                        other => {
                            return RawDeps::BadList {
                                index,
                                type_name: json_type_name(other).to_string(),
                            };
                        }
                    }
                }
                RawDeps::List(list)
            }
            other => RawDeps::Other {
                type_name: json_type_name(other).to_string(),
            },
        }
    }

    pub(crate) fn is_unset(&self) -> bool {
        matches!(self, RawDeps::Unset)
    }

    pub(crate) fn is_all(&self) -> bool {
        matches!(self, RawDeps::Str(s) if s == ALL)
    }

    pub(crate) fn is_empty_list(&self) -> bool {
        matches!(self, RawDeps::List(items) if items.is_empty())
    }

    pub(crate) fn is_str(&self) -> bool {
        matches!(self, RawDeps::Str(_))
    }

    /// The list entries, or the type error reported for anything that is not a list
    /// of strings.
    pub(crate) fn into_list(self, category: DepCategory) -> Result<Vec<String>, MetadataError> {
        match self {
            RawDeps::List(items) => Ok(items),
            RawDeps::BadList { index, type_name } => Err(MetadataError::WrongElementType {
                category,
                index,
                type_name,
            }),
            RawDeps::Unset => Err(MetadataError::WrongType {
                category,
                type_name: "NoneType".to_string(),
            }),
            RawDeps::Str(_) => Err(MetadataError::WrongType {
                category,
                type_name: "string".to_string(),
            }),
            RawDeps::Other { type_name } => Err(MetadataError::WrongType {
                category,
                type_name,
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
