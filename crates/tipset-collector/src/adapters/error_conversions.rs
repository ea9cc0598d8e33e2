//! Error conversions between the node client and the collector domain.

use node_client::ClientError;

use crate::domain::CollectorError;

impl From<ClientError> for CollectorError {
    fn from(err: ClientError) -> Self {
        match err {
            e @ (ClientError::Transport(_) | ClientError::Status { .. }) => {
                CollectorError::Transport(e.to_string())
            }
            ClientError::Decode(msg) => CollectorError::Decode(msg),
            ClientError::Config(msg) => CollectorError::Config(msg),
            ClientError::Processor(e) => CollectorError::Transport(e.to_string()),
        }
    }
}
