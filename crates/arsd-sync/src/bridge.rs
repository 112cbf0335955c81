//! Message bridge from the automaton to the host.
//!
//! Every emission is one serialized JSON envelope, `{"type": ..., "payload":
//! ...}`, carried over an ordered channel. The host side decodes each
//! envelope as it arrives; a malformed one surfaces as
//! [`SyncError::ProtocolParse`] instead of tearing anything down.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::{
    AttendanceReport, ExtractedRecord, FacultyList, MentorRecord, Profile, SyncError, SyncResult,
};

/// Everything the automaton can tell the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Message {
    /// Human-readable progress.
    Log { message: String },
    /// Terminal failure.
    Error { message: String },
    DataBasic(Profile),
    DataAttendance(AttendanceReport),
    DataFaculty(FacultyList),
    DataMentor(MentorRecord),
    /// Terminal success.
    Complete {},
}

impl Message {
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
        }
    }

    pub fn error(err: &SyncError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }

    /// The envelope's `type` tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Log { .. } => "log",
            Self::Error { .. } => "error",
            Self::DataBasic(_) => "data_basic",
            Self::DataAttendance(_) => "data_attendance",
            Self::DataFaculty(_) => "data_faculty",
            Self::DataMentor(_) => "data_mentor",
            Self::Complete {} => "complete",
        }
    }

    /// `complete` and `error` end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete {} | Self::Error { .. })
    }

    /// The record a `data_*` message carries.
    pub fn into_record(self) -> Option<ExtractedRecord> {
        match self {
            Self::DataBasic(p) => Some(ExtractedRecord::Profile(p)),
            Self::DataMentor(m) => Some(ExtractedRecord::Mentor(m)),
            Self::DataAttendance(a) => Some(ExtractedRecord::Attendance(a)),
            Self::DataFaculty(f) => Some(ExtractedRecord::Faculty(f)),
            _ => None,
        }
    }
}

impl From<ExtractedRecord> for Message {
    fn from(record: ExtractedRecord) -> Self {
        match record {
            ExtractedRecord::Profile(p) => Self::DataBasic(p),
            ExtractedRecord::Mentor(m) => Self::DataMentor(m),
            ExtractedRecord::Attendance(a) => Self::DataAttendance(a),
            ExtractedRecord::Faculty(f) => Self::DataFaculty(f),
        }
    }
}

/// Serialize a message into its wire envelope.
pub fn encode(message: &Message) -> SyncResult<String> {
    Ok(serde_json::to_string(message)?)
}

/// Parse a wire envelope.
pub fn decode(envelope: &str) -> SyncResult<Message> {
    Ok(serde_json::from_str(envelope)?)
}

/// Automaton-side end of the bridge.
#[derive(Debug, Clone)]
pub struct Bridge {
    tx: mpsc::UnboundedSender<String>,
}

/// Host-side end of the bridge.
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<String>,
}

/// Create a connected bridge/inbox pair.
pub fn channel() -> (Bridge, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Bridge { tx }, Inbox { rx })
}

impl Bridge {
    /// Send a raw envelope. Silently dropped once the host has stopped
    /// listening.
    pub fn send_envelope(&self, envelope: String) {
        let _ = self.tx.send(envelope);
    }

    pub fn emit(&self, message: &Message) {
        match encode(message) {
            Ok(envelope) => {
                tracing::debug!(kind = message.tag(), "emit");
                self.send_envelope(envelope);
            }
            Err(e) => tracing::warn!("failed to encode {} message: {e}", message.tag()),
        }
    }

    pub fn log(&self, text: impl Into<String>) {
        self.emit(&Message::log(text));
    }

    pub fn error(&self, err: &SyncError) {
        self.emit(&Message::error(err));
    }

    pub fn record(&self, record: ExtractedRecord) {
        self.emit(&Message::from(record));
    }

    pub fn complete(&self) {
        self.emit(&Message::Complete {});
    }

    /// Whether the host has dropped its inbox.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Inbox {
    /// Next envelope, decoded. `None` once every bridge handle is gone and
    /// the buffer is drained.
    pub async fn recv(&mut self) -> Option<SyncResult<Message>> {
        let envelope = self.rx.recv().await?;
        Some(decode(&envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowMap;

    #[test]
    fn test_envelope_shapes() {
        let log = encode(&Message::log("Extracting Profile...")).unwrap();
        assert_eq!(log, r#"{"type":"log","payload":{"message":"Extracting Profile..."}}"#);

        let done = encode(&Message::Complete {}).unwrap();
        assert_eq!(done, r#"{"type":"complete","payload":{}}"#);

        let mentor = encode(&Message::DataMentor(MentorRecord {
            mentor: "Dr. R. Sharma".into(),
        }))
        .unwrap();
        assert_eq!(mentor, r#"{"type":"data_mentor","payload":{"mentor":"Dr. R. Sharma"}}"#);
    }

    #[test]
    fn test_faculty_payload_is_array() {
        let row: RowMap = [("Name", "R. Gupta"), ("Paper Name", "Physics")]
            .into_iter()
            .collect();
        let envelope = encode(&Message::DataFaculty(vec![row])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&envelope).unwrap();
        assert_eq!(value["type"], "data_faculty");
        assert_eq!(value["payload"][0]["Paper Name"], "Physics");
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode("not json"), Err(SyncError::ProtocolParse(_))));
        assert!(matches!(
            decode(r#"{"type":"teleport","payload":{}}"#),
            Err(SyncError::ProtocolParse(_))
        ));
        assert!(matches!(
            decode(r#"{"type":"log","payload":{"msg":1}}"#),
            Err(SyncError::ProtocolParse(_))
        ));
    }

    #[test]
    fn test_terminal_tags() {
        assert!(Message::Complete {}.is_terminal());
        assert!(Message::error(&SyncError::CredentialsRejected).is_terminal());
        assert!(!Message::log("x").is_terminal());
        assert_eq!(Message::DataBasic(Profile::default()).tag(), "data_basic");
    }

    #[tokio::test]
    async fn test_channel_preserves_order() {
        let (bridge, mut inbox) = channel();
        bridge.log("one");
        bridge.send_envelope("{broken".into());
        bridge.complete();
        drop(bridge);

        assert_eq!(inbox.recv().await, Some(Ok(Message::log("one"))));
        assert!(matches!(inbox.recv().await, Some(Err(SyncError::ProtocolParse(_)))));
        assert_eq!(inbox.recv().await, Some(Ok(Message::Complete {})));
        assert_eq!(inbox.recv().await, None);
    }

    #[test]
    fn test_emit_after_host_hangs_up() {
        let (bridge, inbox) = channel();
        drop(inbox);
        assert!(bridge.is_closed());
        bridge.log("nobody listening");
    }
}
