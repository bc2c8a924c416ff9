//! Components B and C: the glob compiler and the pattern matcher /
//! traversal engine.

mod compiler;
mod matcher;
mod posix;

pub use compiler::{escape, is_dynamic, Builder, Matcher};
pub use matcher::{enumerate, matches_path, WalkOptions};
pub(crate) use matcher::glob_via_components;
