pub mod corpus_client;

pub use corpus_client::{CorpusClient, HintValue, SelectionRequest, SelectionSummary};
