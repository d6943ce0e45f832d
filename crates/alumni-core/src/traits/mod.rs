//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AccountRepository, ChatRepository, ProfileChanges, ProfileRepository, RepoResult,
    ThreadRepository,
};
