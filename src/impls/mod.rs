mod fetcher;
pub(crate) use fetcher::*;

mod publisher;
