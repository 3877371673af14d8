pub mod ingestion;
pub mod retrieval;
pub mod vector_store;

pub use retrieval::RetrievalClient;
pub use vector_store::{LocalVectorStore, VectorStore};
