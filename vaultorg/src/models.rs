// src/models.rs
pub mod file_record;
pub mod frontmatter;
pub mod operation;
pub mod vault_descriptor;

pub use file_record::{FileRecord, FrontmatterStatus, Heading, Link};
pub use frontmatter::{Frontmatter, Value};
pub use operation::{Action, ApplyReport, Failure, FrontmatterEdit, Operation, PropertySteps};
pub use vault_descriptor::VaultDescriptor;

use clap::ValueEnum;
use serde::Deserialize;

/// Which filesystem timestamp date-based strategies read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    #[default]
    Created,
    Modified,
}
