pub mod extractor;
pub mod poller;

pub use extractor::LinkExtractor;
pub use poller::{ActivationPoller, PollSettings};
