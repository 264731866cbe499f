//! Cross-realm bridge protocol.
//!
//! No shared type system spans the isolation boundary, so both sides agree
//! on these discriminators and field names independently: the JS side lives
//! in `glimpse-compose`'s bridge payloads, the Rust side here. Messages are
//! duck-typed JSON decoded into a tagged union; unknown `type` values are
//! rejected by serde rather than guessed at, and the caller drops them.

use serde::{Deserialize, Serialize};

/// Console entry kinds mirrored from the sandbox's logging entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Log,
    Error,
    Warn,
    Info,
}

/// Inbound wire messages. The envelope is `{type: ..., ...fields}` with
/// camelCase field names on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    /// Forwarded console output or a captured runtime error.
    #[serde(rename = "console")]
    Console {
        #[serde(rename = "logKind")]
        log_kind: LogKind,
        message: String,
    },

    /// Pointer moved over a traced element, or left one — a message with no
    /// target fields clears the hover.
    #[serde(rename = "element-hover")]
    ElementHover {
        #[serde(rename = "sourceFile", default, skip_serializing_if = "Option::is_none")]
        source_file: Option<String>,
        #[serde(rename = "sourceLine", default, skip_serializing_if = "Option::is_none")]
        source_line: Option<u32>,
        #[serde(rename = "tagName", default, skip_serializing_if = "Option::is_none")]
        tag_name: Option<String>,
    },

    /// Click on a traced element in select mode.
    #[serde(rename = "element-select")]
    ElementSelect {
        #[serde(rename = "sourceFile")]
        source_file: String,
        #[serde(rename = "sourceLine")]
        source_line: u32,
        #[serde(rename = "tagName")]
        tag_name: String,
        #[serde(rename = "elementPath", default)]
        element_path: String,
        #[serde(rename = "snippetPreview", default)]
        snippet_preview: String,
    },
}

/// Decodes one inbound payload. Unrecognized shapes come back as `Err` and
/// must be dropped, never raised — the channel tolerates foreign messages.
pub fn decode(payload: serde_json::Value) -> Result<BridgeMessage, serde_json::Error> {
    serde_json::from_value(payload)
}

/// Transient hover state; at most one live value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverInfo {
    pub source_file: String,
    pub source_line: u32,
    pub tag_name: String,
}

/// Persistent selection state; replaced on each pick, cleared when select
/// mode turns off or the referenced file changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInfo {
    pub source_file: String,
    pub source_line: u32,
    pub tag_name: String,
    pub element_path: String,
    pub snippet_preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_console_error() {
        let msg = decode(json!({
            "type": "console",
            "logKind": "error",
            "message": "x is not defined"
        }))
        .unwrap();
        assert_eq!(
            msg,
            BridgeMessage::Console {
                log_kind: LogKind::Error,
                message: "x is not defined".to_string()
            }
        );
    }

    #[test]
    fn decodes_hover_with_target() {
        let msg = decode(json!({
            "type": "element-hover",
            "sourceFile": "index.html",
            "sourceLine": 4,
            "tagName": "div",
            "elementPath": "body > div"
        }))
        .unwrap();
        match msg {
            BridgeMessage::ElementHover {
                source_file,
                source_line,
                tag_name,
            } => {
                assert_eq!(source_file.as_deref(), Some("index.html"));
                assert_eq!(source_line, Some(4));
                assert_eq!(tag_name.as_deref(), Some("div"));
            }
            other => panic!("expected hover, got {:?}", other),
        }
    }

    #[test]
    fn bare_hover_means_clear() {
        let msg = decode(json!({ "type": "element-hover" })).unwrap();
        assert_eq!(
            msg,
            BridgeMessage::ElementHover {
                source_file: None,
                source_line: None,
                tag_name: None
            }
        );
    }

    #[test]
    fn decodes_selection() {
        let msg = decode(json!({
            "type": "element-select",
            "sourceFile": "index.html",
            "sourceLine": 7,
            "tagName": "h1",
            "elementPath": "main.wrap > h1",
            "snippetPreview": "Title"
        }))
        .unwrap();
        match msg {
            BridgeMessage::ElementSelect { element_path, .. } => {
                assert!(element_path.ends_with("h1"));
            }
            other => panic!("expected selection, got {:?}", other),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(decode(json!({ "type": "telemetry", "x": 1 })).is_err());
        assert!(decode(json!({ "kind": "console" })).is_err());
        assert!(decode(json!(42)).is_err());
    }
}
