use serde::{Deserialize, Serialize};

pub const SHORT_TYPE_CHAT: &str = "chat";
pub const SHORT_TYPE_CONVERSATION_MEMBER: &str = "aadUserConversationMember";
pub const TYPE_CHAT: &str = "#microsoft.graph.chat";
pub const TYPE_CONVERSATION_MEMBER: &str = "#microsoft.graph.aadUserConversationMember";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatType {
    OneOnOne,
    Group,
    Meeting,
    UnknownFutureValue,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(rename = "@odata.type", skip_serializing_if = "Option::is_none")]
    pub odata_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_type: Option<ChatType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<ConversationMember>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMember {
    #[serde(rename = "@odata.type", skip_serializing_if = "Option::is_none")]
    pub odata_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(rename = "user@odata.bind", skip_serializing_if = "Option::is_none")]
    pub user_bind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl ConversationMember {
    /// Member bound to a directory user, as required when creating a chat.
    pub fn aad_user(endpoint: &str, user_id: &str, roles: &[&str]) -> Self {
        Self {
            odata_type: Some(TYPE_CONVERSATION_MEMBER.to_owned()),
            roles: roles.iter().map(|role| (*role).to_owned()).collect(),
            user_bind: Some(format!(
                "{}/v1.0/users('{user_id}')",
                endpoint.trim_end_matches('/')
            )),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attributes_per_set: Option<i32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{Chat, ChatType, ConversationMember};

    #[test]
    fn chat_serializes_graph_field_names() {
        let chat = Chat {
            topic: Some("ops".to_owned()),
            chat_type: Some(ChatType::OneOnOne),
            members: Some(vec![ConversationMember::aad_user(
                "https://graph.microsoft.com/",
                "u1",
                &["owner"],
            )]),
            ..Chat::default()
        };

        let value = serde_json::to_value(&chat).expect("must serialize");
        assert_eq!(
            value,
            json!({
                "topic": "ops",
                "chatType": "oneOnOne",
                "members": [{
                    "@odata.type": "#microsoft.graph.aadUserConversationMember",
                    "roles": ["owner"],
                    "user@odata.bind": "https://graph.microsoft.com/v1.0/users('u1')"
                }]
            })
        );
    }

    #[test]
    fn chat_ignores_unknown_fields() {
        let chat: Chat = serde_json::from_value(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#chats/$entity",
            "id": "19:abc@thread.v2",
            "chatType": "group",
            "viewpoint": { "isHidden": false }
        }))
        .expect("must deserialize");

        assert_eq!(chat.id.as_deref(), Some("19:abc@thread.v2"));
        assert_eq!(chat.chat_type, Some(ChatType::Group));
    }
}
