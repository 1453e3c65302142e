mod codec;
#[allow(clippy::module_inception)]
mod connection;

pub use codec::{
    deserialize_connection, deserialize_site, serialize_connection, serialize_site,
    ConnectionRecord,
};
pub use connection::{Connection, Endpoint};
