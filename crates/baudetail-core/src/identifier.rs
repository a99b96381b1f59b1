//! Identifier management using string interning
//!
//! Part, category and failure-scenario identifiers are compared on every
//! reconciliation pass and copied into view state on every pointer event, so
//! they are interned once and passed around as a `Copy` symbol.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// Interned identifier.
///
/// # Examples
///
/// ```
/// use baudetail_core::identifier::Id;
///
/// let stud = Id::new("wallStud");
/// assert_eq!(stud, "wallStud");
/// assert_eq!(stud, Id::new("wallStud"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns an owned copy of the identifier text.
    pub fn as_string(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .map(str::to_owned)
                .unwrap_or_default()
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
