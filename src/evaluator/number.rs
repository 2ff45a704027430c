use std::fmt::Display;

/// The value of an expression: integers stay integers until a float meets them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn from_bool(value: bool) -> Self {
        Number::Int(value as i64)
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(value) => *value as f64,
            Number::Float(value) => *value,
        }
    }

    /// Non-zero is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Number::Int(value) => *value != 0,
            Number::Float(value) => *value != 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        !self.is_truthy()
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(value) => write!(f, "{}", value),
            Number::Float(value) => write!(f, "{:?}", value),
        }
    }
}
