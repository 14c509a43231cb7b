pub mod author;
pub mod corpus;
pub mod locus;
pub mod structure;

pub use author::{AuthorId, WorkId};
pub use corpus::Corpus;
pub use locus::{Locus, LocusError, LEVEL_COUNT, NO_LOCUS};
pub use structure::{WorkStructure, MAX_LEVELS, UNKNOWN_BOUND};
