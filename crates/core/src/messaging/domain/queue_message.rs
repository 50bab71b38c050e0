use std::fmt;

/// A message delivered to the listener pool, keyed by destination.
#[derive(Clone, PartialEq, Eq)]
pub enum QueueMessage {
    /// Plain text greeting; only logged.
    Hello(String),
    /// Encoded image to run through the mask pipeline.
    FaceConverter(Vec<u8>),
}

impl QueueMessage {
    pub fn destination(&self) -> &'static str {
        match self {
            QueueMessage::Hello(_) => "hello",
            QueueMessage::FaceConverter(_) => "faceConverter",
        }
    }
}

// Image payloads are summarised so log lines stay short.
impl fmt::Debug for QueueMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueMessage::Hello(text) => f.debug_tuple("Hello").field(text).finish(),
            QueueMessage::FaceConverter(bytes) => {
                write!(f, "FaceConverter({} bytes)", bytes.len())
            }
        }
    }
}
