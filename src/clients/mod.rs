pub mod missevan_client;

pub use missevan_client::MissevanClient;
