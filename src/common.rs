mod error;
mod node;
mod state;

pub use error::{InputError, SearchError};
pub(crate) use node::OpenNode;
pub use state::{Move, Path, Solution, State};

pub type SearchResult = Result<Solution, SearchError>;
