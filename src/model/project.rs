use serde::{Deserialize, Serialize};

use super::{require, Document, NewDocument, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
}

impl Document for Project {
    type New = NewProject;

    const COLLECTION: &'static str = "projects";
    const KIND: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn from_new(id: String, new: NewProject) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            author: new.author,
        }
    }
}

impl NewDocument for NewProject {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        require("author", &self.author)
    }
}
