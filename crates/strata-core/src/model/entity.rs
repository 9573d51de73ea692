//! Class and interface descriptors with their members.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::{EntityId, FileId, Id};

/// Discriminant of an [`EntityDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Interface,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Class => f.write_str("class"),
            EntityKind::Interface => f.write_str("interface"),
        }
    }
}

/// Member visibility, rendered with the usual UML symbols.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
    Package,
}

impl Visibility {
    /// Returns the UML symbol for this visibility.
    pub fn symbol(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Protected => '#',
            Visibility::Private => '-',
            Visibility::Package => '~',
        }
    }
}

/// Declaration modifiers carried by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Static,
    Abstract,
    Readonly,
    Optional,
}

/// Whether a member is a field or a method.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    #[default]
    Field,
    Method,
}

/// A method parameter as declared in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    #[serde(rename = "type", default)]
    type_text: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_text(&self) -> &str {
        &self.type_text
    }
}

/// A field or method of a class or interface.
///
/// The declared-type text is kept verbatim. It is shown in the diagram and is
/// also the only input to association and aggregation inference. For methods
/// it holds the return type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    name: String,
    #[serde(rename = "type", default)]
    type_text: String,
    #[serde(default)]
    visibility: Visibility,
    #[serde(default)]
    modifiers: Vec<Modifier>,
    #[serde(default)]
    kind: MemberKind,
    #[serde(default)]
    parameters: Vec<Parameter>,
}

impl MemberDescriptor {
    /// Creates a public field.
    pub fn field(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            visibility: Visibility::default(),
            modifiers: Vec::new(),
            kind: MemberKind::Field,
            parameters: Vec::new(),
        }
    }

    /// Creates a public method with the given return type.
    pub fn method(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Method,
            ..Self::field(name, return_type)
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type, or the return type for methods.
    pub fn type_text(&self) -> &str {
        &self.type_text
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// A parsed class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    file: FileId,
    name: String,
    #[serde(default)]
    generics: Vec<String>,
    #[serde(default)]
    members: Vec<MemberDescriptor>,
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    implements: Vec<String>,
    #[serde(default)]
    is_abstract: bool,
}

impl ClassDescriptor {
    pub fn new(file: impl Into<FileId>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            generics: Vec::new(),
            members: Vec::new(),
            extends: None,
            implements: Vec::new(),
            is_abstract: false,
        }
    }

    pub fn with_generic(mut self, param: impl Into<String>) -> Self {
        self.generics.push(param.into());
        self
    }

    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_extends(mut self, supertype: impl Into<String>) -> Self {
        self.extends = Some(supertype.into());
        self
    }

    pub fn with_implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// Returns the name of the superclass reference, if any.
    pub fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    /// Returns the names of implemented interfaces.
    pub fn implements(&self) -> &[String] {
        &self.implements
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

/// A parsed interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    file: FileId,
    name: String,
    #[serde(default)]
    generics: Vec<String>,
    #[serde(default)]
    members: Vec<MemberDescriptor>,
    #[serde(default)]
    extends: Vec<String>,
}

impl InterfaceDescriptor {
    pub fn new(file: impl Into<FileId>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            generics: Vec::new(),
            members: Vec::new(),
            extends: Vec::new(),
        }
    }

    pub fn with_generic(mut self, param: impl Into<String>) -> Self {
        self.generics.push(param.into());
        self
    }

    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_extends(mut self, supertype: impl Into<String>) -> Self {
        self.extends.push(supertype.into());
        self
    }

    /// Returns the names of extended interfaces.
    pub fn extends(&self) -> &[String] {
        &self.extends
    }
}

/// A class or interface as reported by a parser collaborator.
///
/// Shared fields are reachable through accessors on this enum. Kind-specific
/// fields (superclass vs. extended interfaces) require matching on the variant.
///
/// # Examples
///
/// ```
/// use strata_core::model::{ClassDescriptor, EntityDescriptor, EntityKind};
///
/// let entity: EntityDescriptor = ClassDescriptor::new("hr.ts", "Employee")
///     .with_extends("Person")
///     .into();
///
/// assert_eq!(entity.kind(), EntityKind::Class);
/// assert_eq!(entity.id().to_string(), "hr.ts::Employee");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityDescriptor {
    Class(ClassDescriptor),
    Interface(InterfaceDescriptor),
}

impl EntityDescriptor {
    /// Returns the identity key `(file, name)` of this entity.
    pub fn id(&self) -> EntityId {
        EntityId::new(self.file(), Id::new(self.name()))
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDescriptor::Class(_) => EntityKind::Class,
            EntityDescriptor::Interface(_) => EntityKind::Interface,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityDescriptor::Class(class) => &class.name,
            EntityDescriptor::Interface(interface) => &interface.name,
        }
    }

    /// Returns the file declaring this entity.
    pub fn file(&self) -> FileId {
        match self {
            EntityDescriptor::Class(class) => class.file,
            EntityDescriptor::Interface(interface) => interface.file,
        }
    }

    pub fn members(&self) -> &[MemberDescriptor] {
        match self {
            EntityDescriptor::Class(class) => &class.members,
            EntityDescriptor::Interface(interface) => &interface.members,
        }
    }

    /// Returns the generic parameter names, e.g. `["K", "V"]`.
    pub fn generics(&self) -> &[String] {
        match self {
            EntityDescriptor::Class(class) => &class.generics,
            EntityDescriptor::Interface(interface) => &interface.generics,
        }
    }
}

impl From<ClassDescriptor> for EntityDescriptor {
    fn from(class: ClassDescriptor) -> Self {
        EntityDescriptor::Class(class)
    }
}

impl From<InterfaceDescriptor> for EntityDescriptor {
    fn from(interface: InterfaceDescriptor) -> Self {
        EntityDescriptor::Interface(interface)
    }
}

impl fmt::Display for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}
