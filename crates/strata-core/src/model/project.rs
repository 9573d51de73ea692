//! Per-file collaborator output for a whole project snapshot.

use serde::{Deserialize, Serialize};

use crate::{identifier::FileId, model::entity::EntityDescriptor};

/// One parsed source file: the entities it declares and its raw import targets.
///
/// Import targets are already normalized by the collaborator to the same
/// form as file ids. Targets that name no file of the project (libraries,
/// unresolved paths) are kept here and ignored later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    id: FileId,
    #[serde(default)]
    entities: Vec<EntityDescriptor>,
    #[serde(default)]
    imports: Vec<String>,
}

impl SourceFile {
    pub fn new(id: impl Into<FileId>) -> Self {
        Self {
            id: id.into(),
            entities: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: impl Into<EntityDescriptor>) -> Self {
        self.entities.push(entity.into());
        self
    }

    pub fn with_import(mut self, target: impl Into<String>) -> Self {
        self.imports.push(target.into());
        self
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }
}

/// A snapshot of every parsed file of a project, in collaborator order.
///
/// The order of files and of entities within them is preserved and drives
/// every ordering decision downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    files: Vec<SourceFile>,
}

impl Project {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Returns the file with the given id, if the snapshot contains it.
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.id == id)
    }

    /// Iterates over every entity of every file.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.files.iter().flat_map(|file| file.entities.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::{ClassDescriptor, InterfaceDescriptor};

    #[test]
    fn test_entities_follow_file_order() {
        let project = Project::new(vec![
            SourceFile::new("b.ts").with_entity(ClassDescriptor::new("b.ts", "B")),
            SourceFile::new("a.ts")
                .with_entity(ClassDescriptor::new("a.ts", "A1"))
                .with_entity(InterfaceDescriptor::new("a.ts", "A2")),
        ]);

        let names: Vec<&str> = project.entities().map(|e| e.name()).collect();
        assert_eq!(names, ["B", "A1", "A2"]);
        assert!(project.file(FileId::new("a.ts")).is_some());
        assert!(project.file(FileId::new("c.ts")).is_none());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"files": [{"id": "a.ts"}, {"id": "b.ts", "imports": ["a.ts", "react"]}]}"#;
        let project: Project = serde_json::from_str(json).unwrap();

        assert_eq!(project.files().len(), 2);
        assert!(project.files()[0].entities().is_empty());
        assert_eq!(project.files()[1].imports(), ["a.ts", "react"]);
    }
}
