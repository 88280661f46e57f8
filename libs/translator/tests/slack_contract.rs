use serde_json::json;
use sprout_relay_core::{FieldAliases, PostRecord};
use sprout_relay_translator::to_slack_payload;

#[test]
fn webhook_payload_contract() {
    let inbound = json!({
        "network": "Twitter",
        "post_url": "http://x",
        "post_text": "hi",
        "profile_name": "Acme"
    });
    let record = PostRecord::from_value(&inbound, &FieldAliases::webhook());

    insta::assert_json_snapshot!(to_slack_payload(&record), @r#"
    {
      "blocks": [
        {
          "text": {
            "emoji": true,
            "text": "🐦 New Twitter Post",
            "type": "plain_text"
          },
          "type": "header"
        },
        {
          "text": {
            "text": "*Profile:* Acme",
            "type": "mrkdwn"
          },
          "type": "section"
        },
        {
          "text": {
            "text": "hi",
            "type": "mrkdwn"
          },
          "type": "section"
        },
        {
          "elements": [
            {
              "style": "primary",
              "text": {
                "text": "View Post",
                "type": "plain_text"
              },
              "type": "button",
              "url": "http://x"
            }
          ],
          "type": "actions"
        },
        {
          "type": "divider"
        }
      ],
      "text": "🐦 New Twitter Post"
    }
    "#);
}

#[test]
fn polled_record_contract() {
    let inbound = json!({
        "network_type": "instagram",
        "permalink": "https://instagram.com/p/abc",
        "content": "New drop is live",
        "profile": { "name": "Acme Shop" },
        "published_at": "2024-02-10T15:00:00Z",
        "media": [{"url": "https://cdn/1.jpg"}, {"url": "https://cdn/2.jpg"}]
    });
    let record = PostRecord::from_value(&inbound, &FieldAliases::polled());

    insta::assert_json_snapshot!(to_slack_payload(&record), @r#"
    {
      "blocks": [
        {
          "text": {
            "emoji": true,
            "text": "📸 New instagram Post",
            "type": "plain_text"
          },
          "type": "header"
        },
        {
          "text": {
            "text": "*Profile:* Acme Shop\n*Published:* 2024-02-10T15:00:00Z",
            "type": "mrkdwn"
          },
          "type": "section"
        },
        {
          "text": {
            "text": "New drop is live",
            "type": "mrkdwn"
          },
          "type": "section"
        },
        {
          "elements": [
            {
              "text": "📎 2 media attachments",
              "type": "mrkdwn"
            }
          ],
          "type": "context"
        },
        {
          "elements": [
            {
              "style": "primary",
              "text": {
                "text": "View Post",
                "type": "plain_text"
              },
              "type": "button",
              "url": "https://instagram.com/p/abc"
            }
          ],
          "type": "actions"
        },
        {
          "type": "divider"
        }
      ],
      "text": "📸 New instagram Post"
    }
    "#);
}

#[test]
fn empty_webhook_body_renders_placeholder_message() {
    let record = PostRecord::from_value(&json!({}), &FieldAliases::webhook());
    let payload = to_slack_payload(&record);
    let blocks = payload["blocks"].as_array().unwrap();

    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0]["text"]["text"], "📣 New Unknown Post");
    assert_eq!(blocks[2]["text"]["text"], "_No text content_");
    assert_eq!(blocks[3]["type"], "divider");
}

#[test]
fn padded_network_name_agrees_between_icon_and_title() {
    let record = PostRecord::from_value(&json!({ "network": "  x " }), &FieldAliases::webhook());
    let payload = to_slack_payload(&record);

    assert_eq!(payload["text"], "𝕏 New x Post");
    assert_eq!(payload["blocks"][0]["text"]["text"], "𝕏 New x Post");
}
