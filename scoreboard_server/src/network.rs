use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tungstenite::Message;


#[derive(Debug)]
pub enum CommunicationError {
    ConnectionClosed,
    Socket(tungstenite::Error),
}

pub async fn write_payload_async<S>(sink: &mut S, payload: String) -> Result<(), CommunicationError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    sink.send(Message::text(payload)).await.map_err(|err| match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            CommunicationError::ConnectionClosed
        }
        err => CommunicationError::Socket(err),
    })
}

// The push channel is one-directional: whatever the client sends is read and dropped.
// Returns when the connection is gone.
pub async fn drain_until_closed<S>(stream: &mut S) -> CommunicationError
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            None | Some(Ok(Message::Close(_))) => return CommunicationError::ConnectionClosed,
            Some(Ok(_)) => {}
            Some(Err(tungstenite::Error::ConnectionClosed)) => {
                return CommunicationError::ConnectionClosed;
            }
            Some(Err(err)) => return CommunicationError::Socket(err),
        }
    }
}
