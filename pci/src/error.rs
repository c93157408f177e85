use thiserror::Error;

pub(crate) fn unexpected(value: impl Into<u32>) -> UnexpectedValue {
    UnexpectedValue {
        value: value.into(),
        name: "register field",
    }
}

/// A register field held a bit pattern with no defined meaning.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unexpected `{name}` value: {value:#x}")]
pub struct UnexpectedValue {
    value: u32,
    name: &'static str,
}

/// Errors returned when constructing a [`Snapshot`](crate::config::Snapshot).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    /// The image is larger than an extended configuration space.
    #[error("config space image is {len} bytes, but may be at most {max} bytes")]
    TooLarge { len: usize, max: usize },
}

/// A string did not name any known [`Property`](crate::Property).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown property `{0}`")]
pub struct UnknownProperty(pub(crate) alloc::string::String);

impl UnexpectedValue {
    #[must_use]
    pub(crate) fn named(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    /// Returns the raw value that could not be interpreted.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Returns the name of the field the value was read from.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn unexpected_display() {
        let err = unexpected(0xf5u8).named("slot power limit");
        assert_eq!(
            err.to_string(),
            "unexpected `slot power limit` value: 0xf5"
        );
        assert_eq!(err.value(), 0xf5);
    }
}
