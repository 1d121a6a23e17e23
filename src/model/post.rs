use serde::{Deserialize, Serialize};

use super::{require, Document, NewDocument, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

impl Document for Post {
    type New = NewPost;

    const COLLECTION: &'static str = "posts";
    const KIND: &'static str = "post";

    fn id(&self) -> &str {
        &self.id
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn from_new(id: String, new: NewPost) -> Self {
        Self {
            id,
            title: new.title,
            content: new.content,
            author: new.author,
        }
    }
}

impl NewDocument for NewPost {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)?;
        require("author", &self.author)
    }
}
