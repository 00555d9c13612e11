use indexmap::IndexMap;

/// Ordered `name -> value` arguments of a field or directive.
pub type Arguments = IndexMap<String, Value>;

/// A literal GraphQL input value used as a field argument, a directive
/// argument, or a variable's default value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Rendered bare, e.g. `ADMIN` or `DESC`.
    Enum(String),
    Float(f64),
    Int(i64),
    List(Vec<Value>),
    Null,
    Object(IndexMap<String, Value>),
    String(String),
}

/// Selects how string values are rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ValueContext {
    /// A string starting with `$` is a variable reference and is emitted
    /// verbatim.
    Argument,

    /// Every string is a literal and is always quoted.
    DefaultValue,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(str) = self {
            Some(str.as_str())
        } else {
            None
        }
    }

    /// Render this value as it appears in a field or directive argument
    /// list.
    pub fn to_argument_string(&self) -> String {
        let mut out = String::new();
        self.write_graphql(&mut out, ValueContext::Argument);
        out
    }

    /// Render this value as it appears after `=` in a variable definition.
    pub fn to_default_value_string(&self) -> String {
        let mut out = String::new();
        self.write_graphql(&mut out, ValueContext::DefaultValue);
        out
    }

    fn write_graphql(&self, out: &mut String, context: ValueContext) {
        match self {
            Self::Bool(true) => out.push_str("true"),
            Self::Bool(false) => out.push_str("false"),
            Self::Enum(name) => out.push_str(name),
            Self::Float(value) if value.is_finite() => {
                out.push_str(&format!("{value:?}"));
            },
            Self::Float(_) | Self::Null => out.push_str("null"),
            Self::Int(value) => out.push_str(&value.to_string()),

            Self::List(values) => {
                out.push('[');
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    value.write_graphql(out, context);
                }
                out.push(']');
            },

            Self::Object(entries) => {
                out.push('{');
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(key);
                    out.push_str(": ");
                    value.write_graphql(out, context);
                }
                out.push('}');
            },

            Self::String(str) => {
                if context == ValueContext::Argument && str.starts_with('$') {
                    out.push_str(str);
                } else {
                    write_quoted_string(out, str);
                }
            },
        }
    }
}

/// Render `arguments` as `(name: value, ...)`, or an empty string when there
/// are none.
pub fn format_arguments(arguments: &Arguments) -> String {
    if arguments.is_empty() {
        return String::new();
    }

    let rendered = arguments.iter()
        .map(|(name, value)| format!("{name}: {}", value.to_argument_string()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("({rendered})")
}

/// Collect any `(name, value)` pairs into [`Arguments`].
pub fn collect_arguments<K, V>(
    arguments: impl IntoIterator<Item = (K, V)>,
) -> Arguments
where
    K: Into<String>,
    V: Into<Value>,
{
    arguments.into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

fn write_quoted_string(out: &mut String, str: &str) {
    out.push('"');
    for ch in str.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            ch if ch.is_control() => {
                out.push_str(&format!("\\u{:04X}", ch as u32));
            },
            ch => out.push(ch),
        }
    }
    out.push('"');
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => number.as_f64().map_or(Self::Null, Self::Float),
            },
            serde_json::Value::String(str) => Self::String(str),
            serde_json::Value::Array(values) =>
                Self::List(values.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(entries) =>
                Self::Object(entries.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect()),
        }
    }
}
