use crate::error::ErrorKind;

/// A runtime value.  Skeptical only knows numbers and strings; booleans are
/// represented as the numbers `1` and `0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
}

impl Value {
    pub fn from_bool(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    /// Numeric view of the value.  Strings coerce only when their text is a
    /// number.
    pub fn as_number(&self) -> Result<f64, ErrorKind> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                ErrorKind::TypeMismatch(format!("\"{}\" is not a number", s))
            }),
        }
    }

    /// Numeric view that must also be a whole number fitting in an `i64`.
    pub fn as_integer(&self) -> Result<i64, ErrorKind> {
        let n = self.as_number()?;

        if n.fract() != 0.0 || !n.is_finite() || n.abs() > i64::MAX as f64 {
            return Err(ErrorKind::TypeMismatch(format!(
                "{} is not an integer",
                self
            )));
        }

        Ok(n as i64)
    }

    /// Non‑zero numbers are truthy.
    pub fn is_truthy(&self) -> Result<bool, ErrorKind> {
        Ok(self.as_number()? != 0.0)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    let mut buf = itoa::Buffer::new();
                    f.write_str(buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
