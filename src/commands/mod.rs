use std::io::Write;

use anyhow::{Context, Result};

use crate::cli::{CollectionArg, Command};
use crate::model::{Document, NewPost, NewProject, Post, Project};
use crate::storage::{DocumentStore, Repository};

impl Command {
    pub fn run<S: DocumentStore + Clone>(&self, storage: &S, out: &mut impl Write) -> Result<()> {
        match self {
            Command::Seed {
                posts,
                projects,
                author,
            } => seed(storage, *posts, *projects, author, out),
            Command::Dump { collection } => match collection {
                CollectionArg::Posts => dump::<S, Post>(storage, out),
                CollectionArg::Projects => dump::<S, Project>(storage, out),
            },
        }
    }
}

fn seed<S: DocumentStore + Clone>(
    storage: &S,
    posts: usize,
    projects: usize,
    author: &str,
    out: &mut impl Write,
) -> Result<()> {
    let post_repo = Repository::<S, Post>::new(storage.clone());
    for n in 1..=posts {
        let post = post_repo
            .save(NewPost {
                title: format!("Post #{n}"),
                content: format!("Body of post #{n}, written by {author}."),
                author: author.to_string(),
            })
            .context("seeding post")?;
        writeln!(out, "{} {}", Post::KIND, post.id)?;
    }

    let project_repo = Repository::<S, Project>::new(storage.clone());
    for n in 1..=projects {
        let project = project_repo
            .save(NewProject {
                name: format!("project-{n}"),
                description: format!("Demo project #{n}"),
                author: author.to_string(),
            })
            .context("seeding project")?;
        writeln!(out, "{} {}", Project::KIND, project.id)?;
    }

    log::info!("🌱 Seeded {posts} posts and {projects} projects for {author}");
    Ok(())
}

fn dump<S: DocumentStore + Clone, D: Document>(storage: &S, out: &mut impl Write) -> Result<()> {
    let docs = Repository::<S, D>::new(storage.clone())
        .find_all()
        .with_context(|| format!("loading {}", D::COLLECTION))?;
    for doc in &docs {
        writeln!(out, "{}", serde_json::to_string(doc)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> SqliteStorage {
        let storage = SqliteStorage::new(dir.path().join("postflux.sqlite"));
        storage.init().unwrap();
        storage
    }

    #[test]
    fn seed_prints_created_ids() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        let mut out = Vec::new();

        Command::Seed {
            posts: 2,
            projects: 1,
            author: "ada".into(),
        }
        .run(&storage, &mut out)
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("post "));
        assert!(lines[2].starts_with("project "));
        assert_eq!(storage.count("posts").unwrap(), 2);
        assert_eq!(storage.count("projects").unwrap(), 1);
    }

    #[test]
    fn dump_writes_one_json_document_per_line() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        Command::Seed {
            posts: 2,
            projects: 0,
            author: "ada".into(),
        }
        .run(&storage, &mut std::io::sink())
        .unwrap();

        let mut out = Vec::new();
        Command::Dump {
            collection: CollectionArg::Posts,
        }
        .run(&storage, &mut out)
        .unwrap();

        let posts: Vec<Post> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Post #1");
        assert_eq!(posts[1].author, "ada");
    }

    #[test]
    fn seed_rejects_blank_author() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let err = Command::Seed {
            posts: 1,
            projects: 0,
            author: " ".into(),
        }
        .run(&storage, &mut std::io::sink())
        .unwrap_err();
        assert!(format!("{err:#}").contains("missing required field: author"));
    }
}
