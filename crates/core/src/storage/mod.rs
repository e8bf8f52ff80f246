mod error;
mod traits;

pub use error::{RepositoryError, Result};
pub use traits::{
    ApplyRepository, ContactRepository, GroupRepository, SessionRepository, SocialStore,
    UserRepository,
};
