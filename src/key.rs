use std::fmt;

use crate::Error;

/// A key stored in the table.
///
/// Keys are either text or whole numbers. Text and numbers never compare equal,
/// even when they normalize to the same probe sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Text(String),
    Int(i64),
}

/// A borrowed view of a [`Key`], used for lookups without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyRef<'a> {
    Text(&'a str),
    Int(i64),
}

impl Key {
    /// Borrows this key as a [`KeyRef`].
    pub fn view(&self) -> KeyRef<'_> {
        match self {
            Key::Text(text) => KeyRef::Text(text),
            Key::Int(n) => KeyRef::Int(*n),
        }
    }
}

impl KeyRef<'_> {
    /// Converts the view into an owned [`Key`].
    pub fn into_owned(self) -> Key {
        match self {
            KeyRef::Text(text) => Key::Text(text.to_owned()),
            KeyRef::Int(n) => Key::Int(n),
        }
    }
}

impl PartialEq<KeyRef<'_>> for Key {
    fn eq(&self, other: &KeyRef<'_>) -> bool {
        self.view() == *other
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}

impl fmt::Display for KeyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRef::Text(text) => f.write_str(text),
            KeyRef::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Key {
    fn from(text: String) -> Key {
        Key::Text(text)
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Key {
        Key::Text(text.to_owned())
    }
}

impl From<&String> for Key {
    fn from(text: &String) -> Key {
        Key::Text(text.clone())
    }
}

impl From<KeyRef<'_>> for Key {
    fn from(key: KeyRef<'_>) -> Key {
        key.into_owned()
    }
}

impl<'a> From<&'a str> for KeyRef<'a> {
    fn from(text: &'a str) -> KeyRef<'a> {
        KeyRef::Text(text)
    }
}

impl<'a> From<&'a String> for KeyRef<'a> {
    fn from(text: &'a String) -> KeyRef<'a> {
        KeyRef::Text(text)
    }
}

impl<'a> From<&'a Key> for KeyRef<'a> {
    fn from(key: &'a Key) -> KeyRef<'a> {
        key.view()
    }
}

macro_rules! int_keys {
    ($($int:ty),*) => {$(
        impl From<$int> for Key {
            fn from(n: $int) -> Key {
                Key::Int(i64::from(n))
            }
        }

        impl From<$int> for KeyRef<'_> {
            fn from(n: $int) -> Self {
                KeyRef::Int(i64::from(n))
            }
        }
    )*};
}

int_keys!(i8, i16, i32, i64, u8, u16, u32);

// Floats are accepted only when they hold a whole number within `i64` range.
fn whole(n: f64) -> Result<i64, Error> {
    if !n.is_finite() || n.fract() != 0.0 {
        return Err(Error::TypeMismatch {
            found: "fractional or non-finite number",
        });
    }

    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    if n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return Err(Error::TypeMismatch {
            found: "number outside the 64-bit integer range",
        });
    }

    Ok(n as i64)
}

impl TryFrom<f64> for Key {
    type Error = Error;

    fn try_from(n: f64) -> Result<Key, Error> {
        whole(n).map(Key::Int)
    }
}

impl TryFrom<f32> for Key {
    type Error = Error;

    fn try_from(n: f32) -> Result<Key, Error> {
        whole(f64::from(n)).map(Key::Int)
    }
}

impl TryFrom<f64> for KeyRef<'_> {
    type Error = Error;

    fn try_from(n: f64) -> Result<Self, Error> {
        whole(n).map(KeyRef::Int)
    }
}

impl TryFrom<f32> for KeyRef<'_> {
    type Error = Error;

    fn try_from(n: f32) -> Result<Self, Error> {
        whole(f64::from(n)).map(KeyRef::Int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_int_are_distinct() {
        assert_ne!(Key::from("97"), Key::from(97));
        assert_eq!(Key::from("a"), KeyRef::Text("a"));
    }

    #[test]
    fn whole_floats() {
        assert_eq!(Key::try_from(22.0f64), Ok(Key::Int(22)));
        assert_eq!(Key::try_from(-3.0f32), Ok(Key::Int(-3)));
        assert!(matches!(
            Key::try_from(2.5f64),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            KeyRef::try_from(f64::NAN),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            Key::try_from(1e300f64),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
