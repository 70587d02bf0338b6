//! Remote control commands sent to charge points
//!
//! The dashboard posts one JSON object per command, discriminated by
//! `commandType`. Integer fields may arrive as text from form inputs and are
//! coerced before their range is checked.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ValidationResult;
use crate::messages::{Locale, Message};
use crate::schema::{DiscriminatedUnion, EnumRule, NumberRule, ObjectRule, Schema, SchemaExt, StringRule};

/// Name of the discriminating field
pub const COMMAND_TAG: &str = "commandType";

fn positive_id() -> NumberRule {
    NumberRule::new().coerce().int().positive()
}

lazy_static! {
    pub static ref COMMAND_SCHEMA: Schema = DiscriminatedUnion::new(COMMAND_TAG)
        .variant(
            "start",
            ObjectRule::new()
                .field("idTag", StringRule::new().non_empty())
                .field("connectorId", positive_id().optional()),
        )
        .variant(
            "stop",
            ObjectRule::new().field("transactionId", positive_id()),
        )
        .variant(
            "reset",
            ObjectRule::new().field("type", EnumRule::new(["Hard", "Soft"])),
        )
        .variant(
            "availability",
            ObjectRule::new()
                .field("connectorId", positive_id())
                .field("type", EnumRule::new(["Operative", "Inoperative"])),
        )
        .variant(
            "unlock",
            ObjectRule::new().field("connectorId", positive_id()),
        )
        .variant(
            "triggerMessage",
            ObjectRule::new()
                .field(
                    "requestedMessage",
                    EnumRule::new(["StatusNotification", "Heartbeat", "MeterValues"]),
                )
                .field("connectorId", positive_id().optional()),
        )
        .unrecognized(Message::UnrecognizedCommand)
        .into();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetType {
    Hard,
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityType {
    Operative,
    Inoperative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerableMessage {
    StatusNotification,
    Heartbeat,
    MeterValues,
}

/// A validated remote command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "commandType", rename_all = "camelCase")]
pub enum RemoteCommand {
    #[serde(rename_all = "camelCase")]
    Start {
        id_tag: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        connector_id: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    Stop { transaction_id: u64 },
    Reset {
        #[serde(rename = "type")]
        kind: ResetType,
    },
    #[serde(rename_all = "camelCase")]
    Availability {
        connector_id: u64,
        #[serde(rename = "type")]
        kind: AvailabilityType,
    },
    #[serde(rename_all = "camelCase")]
    Unlock { connector_id: u64 },
    #[serde(rename_all = "camelCase")]
    TriggerMessage {
        requested_message: TriggerableMessage,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        connector_id: Option<u64>,
    },
}

impl RemoteCommand {
    pub fn parse(value: &Value) -> ValidationResult<Self> {
        Self::parse_with(value, Locale::default())
    }

    pub fn parse_with(value: &Value, locale: Locale) -> ValidationResult<Self> {
        COMMAND_SCHEMA.parse_with(value, locale)
    }

    /// OCPP 1.6 action this command is carried by
    pub fn ocpp_action(&self) -> &'static str {
        match self {
            RemoteCommand::Start { .. } => "RemoteStartTransaction",
            RemoteCommand::Stop { .. } => "RemoteStopTransaction",
            RemoteCommand::Reset { .. } => "Reset",
            RemoteCommand::Availability { .. } => "ChangeAvailability",
            RemoteCommand::Unlock { .. } => "UnlockConnector",
            RemoteCommand::TriggerMessage { .. } => "TriggerMessage",
        }
    }

    /// OCPP 1.6 request payload for [`ocpp_action`](Self::ocpp_action)
    pub fn payload(&self) -> Value {
        match self {
            RemoteCommand::Start { id_tag, connector_id } => {
                let mut payload = json!({ "idTag": id_tag });
                if let Some(id) = connector_id {
                    payload["connectorId"] = json!(id);
                }
                payload
            }
            RemoteCommand::Stop { transaction_id } => json!({ "transactionId": transaction_id }),
            RemoteCommand::Reset { kind } => json!({ "type": kind }),
            RemoteCommand::Availability { connector_id, kind } => {
                json!({ "connectorId": connector_id, "type": kind })
            }
            RemoteCommand::Unlock { connector_id } => json!({ "connectorId": connector_id }),
            RemoteCommand::TriggerMessage {
                requested_message,
                connector_id,
            } => {
                let mut payload = json!({ "requestedMessage": requested_message });
                if let Some(id) = connector_id {
                    payload["connectorId"] = json!(id);
                }
                payload
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ErrorCode;

    #[test]
    fn test_stop() {
        let command = RemoteCommand::parse(&json!({"commandType": "stop", "transactionId": 123})).unwrap();
        assert_eq!(command, RemoteCommand::Stop { transaction_id: 123 });
        assert_eq!(command.ocpp_action(), "RemoteStopTransaction");

        let errors = COMMAND_SCHEMA
            .validate(&json!({"commandType": "stop", "transactionId": -1}))
            .unwrap_err();
        assert!(errors.has_code("transactionId", ErrorCode::OutOfRange));
    }

    #[test]
    fn test_unrecognized_command() {
        for input in [json!({"commandType": "bogus"}), json!({"transactionId": 1})] {
            let errors = COMMAND_SCHEMA.validate_with(&input, Locale::En).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.errors()[0].path, COMMAND_TAG);
            assert_eq!(errors.errors()[0].code, ErrorCode::UnrecognizedVariant);
            assert_eq!(errors.errors()[0].message, "unrecognized command");
        }
    }

    #[test]
    fn test_text_ids_are_coerced() {
        let command = RemoteCommand::parse(&json!({
            "commandType": "availability",
            "connectorId": "2",
            "type": "Inoperative"
        }))
        .unwrap();
        assert_eq!(
            command,
            RemoteCommand::Availability {
                connector_id: 2,
                kind: AvailabilityType::Inoperative
            }
        );

        let errors = COMMAND_SCHEMA
            .validate(&json!({"commandType": "unlock", "connectorId": "abc"}))
            .unwrap_err();
        assert!(errors.has_code("connectorId", ErrorCode::InvalidType));
    }

    #[test]
    fn test_start_requires_id_tag() {
        let errors = COMMAND_SCHEMA
            .validate(&json!({"commandType": "start", "idTag": ""}))
            .unwrap_err();
        assert!(errors.has_code("idTag", ErrorCode::Required));

        let command = RemoteCommand::parse(&json!({"commandType": "start", "idTag": "ABC123"})).unwrap();
        assert_eq!(command.payload(), json!({"idTag": "ABC123"}));
    }

    #[test]
    fn test_reset_and_trigger() {
        let reset = RemoteCommand::parse(&json!({"commandType": "reset", "type": "Soft"})).unwrap();
        assert_eq!(reset.payload(), json!({"type": "Soft"}));

        let errors = COMMAND_SCHEMA
            .validate(&json!({"commandType": "reset", "type": "Warm"}))
            .unwrap_err();
        assert!(errors.has_code("type", ErrorCode::InvalidOption));

        let trigger = RemoteCommand::parse(&json!({
            "commandType": "triggerMessage",
            "requestedMessage": "MeterValues",
            "connectorId": 1
        }))
        .unwrap();
        assert_eq!(trigger.ocpp_action(), "TriggerMessage");
        assert_eq!(
            trigger.payload(),
            json!({"requestedMessage": "MeterValues", "connectorId": 1})
        );
    }

    #[test]
    fn test_serialize_round_trip_shape() {
        let command = RemoteCommand::Unlock { connector_id: 3 };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({"commandType": "unlock", "connectorId": 3})
        );
    }
}
