//! Identifier management using string interning for efficient storage and comparison
//!
//! This module provides the [`Id`] type used for file and entity names, and the
//! composite [`EntityId`] key that identifies an entity across regenerations.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    let lock = INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()));
    // Interning never leaves partial state behind, so poisoning is ignored.
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Efficient identifier type using string interning
///
/// Two `Id`s are equal exactly when the strings they were created from are equal.
///
/// # Examples
///
/// ```
/// use strata_core::identifier::Id;
///
/// let file = Id::new("src/models/person.ts");
/// let same = Id::new("src/models/person.ts");
/// assert_eq!(file, same);
/// assert_eq!(file, "src/models/person.ts");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the interned string as an owned `String`.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

/// Identifier of a source file as supplied by the parser collaborators.
pub type FileId = Id;

/// Identity of an entity across regenerations: the file declaring it plus its name.
///
/// Entities are rebuilt from scratch on every parse, so nodes are matched
/// between diagram states by this key, never by object identity.
///
/// # Examples
///
/// ```
/// use strata_core::identifier::EntityId;
///
/// let id = EntityId::new("a.ts", "Person");
/// assert_eq!(id.to_string(), "a.ts::Person");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    file: FileId,
    name: Id,
}

impl EntityId {
    pub fn new(file: impl Into<FileId>, name: impl Into<Id>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }

    /// Returns the file declaring the entity.
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Returns the entity name.
    pub fn name(&self) -> Id {
        self.name
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.file, self.name)
    }
}
