pub mod dataseer_client;

pub use dataseer_client::DataseerClient;
