// src/core.rs
pub mod batch;
pub mod extract;
pub mod frontmatter;
pub mod fs;
pub mod ignore;
pub mod mutation;
pub mod organize;
pub mod properties;
pub mod report;
pub mod scanner;
