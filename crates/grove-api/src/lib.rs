// grove-api: Async HTTP clients for the document database and sensor views

pub mod couch;
pub mod error;
pub mod remote;
pub mod transport;

pub use couch::{CouchClient, PutResponse};
pub use error::Error;
pub use remote::{RemoteClient, ViewResponse, ViewRow};
pub use transport::{TlsMode, TransportConfig};
