use clap::{Subcommand, ValueEnum};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Insert demo posts and projects",
        long_about = "Populate the document store with generated posts and projects and print the id of every created document."
    )]
    Seed {
        #[arg(long, default_value_t = 3, value_name = "N", help = "Number of posts to create")]
        posts: usize,
        #[arg(
            long,
            default_value_t = 2,
            value_name = "N",
            help = "Number of projects to create"
        )]
        projects: usize,
        #[arg(
            long,
            default_value = "demo",
            value_name = "NAME",
            help = "Author referenced by the created documents"
        )]
        author: String,
    },
    #[command(
        about = "Print every document of a collection",
        long_about = "Write every document of the given collection to stdout as one JSON object per line, in insertion order."
    )]
    Dump {
        #[arg(value_enum)]
        collection: CollectionArg,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionArg {
    Posts,
    Projects,
}
