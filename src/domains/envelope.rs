/// Kinds of envelope the relay hands out. Discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeType {
    Unknown = 0,
    Ciphertext = 1,
    KeyExchange = 2,
    PrekeyBundle = 3,
    Receipt = 5,
}

impl EnvelopeType {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Ciphertext),
            2 => Some(Self::KeyExchange),
            3 => Some(Self::PrekeyBundle),
            5 => Some(Self::Receipt),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// One encrypted message unit as delivered by the relay.
///
/// `legacy_message` and `content` are independent; either, both or neither
/// may be present and the receiver decides which one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub envelope_type: EnvelopeType,
    pub relay: Option<String>,
    pub timestamp: u64,
    pub source: String,
    pub source_device: u32,
    pub legacy_message: Option<Vec<u8>>,
    pub content: Option<Vec<u8>>,
}

impl Envelope {
    pub fn acknowledgement(&self) -> Acknowledgement {
        Acknowledgement {
            source: self.source.clone(),
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub source: String,
    pub timestamp: u64,
}

/// A single page returned by the relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchBatch {
    pub envelopes: Vec<Envelope>,
    pub more: bool,
}
