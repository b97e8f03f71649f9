pub mod drama;
pub mod wire;

pub use drama::{
    CommentPage, DramaListing, DramaSummary, EpisodeDescriptor, EpisodeDetail, EpisodeRecord,
    UserIdSet,
};
