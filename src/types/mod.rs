pub mod folder;
pub mod id;
pub mod note;
pub mod patch;
pub mod seed;
pub mod tag;
