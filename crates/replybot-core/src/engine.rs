//! Match-and-route engine: one inbound event plus one document snapshot in,
//! at most one outbound action out.

use tracing::debug;

use crate::{
    document::{ConfigDocument, DeliveryMode, TemplateChoice},
    message::{IncomingMessage, ReplyAction, ReplyMode},
    resolver, template,
};

/// Check if any configured keyword is contained in the lowercased message.
///
/// Substring containment, not word-boundary matching: short keywords can
/// match inside longer words. Intentional.
pub fn keyword_match(body_lower: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|kw| body_lower.contains(&kw.to_lowercase()))
}

/// Decide the outbound action for one inbound message.
///
/// Pure: reads only the given snapshot, holds nothing between calls.
/// `None` when no keyword matches or the source conversation is not a
/// configured target; neither is an error.
pub fn route(msg: &IncomingMessage, doc: &ConfigDocument) -> Option<ReplyAction> {
    let body = msg.text.to_lowercase();
    if !keyword_match(&body, &doc.keywords) {
        debug!("[{}] no keyword match in {}", msg.channel, msg.chat_id);
        return None;
    }

    let Some(target) = resolver::resolve(&doc.targets, &msg.chat_id) else {
        debug!(
            "[{}] {} is not a configured target",
            msg.channel, msg.chat_id
        );
        return None;
    };

    let text = match target.template_choice {
        TemplateChoice::Alternate => &doc.alternate_template,
        // An empty custom reply silently falls back to the primary template.
        TemplateChoice::Custom if !target.custom_reply.is_empty() => &target.custom_reply,
        TemplateChoice::Custom | TemplateChoice::Primary => &doc.primary_template,
    };
    let text = template::render(text, msg.display_name());

    let action = match target.delivery_mode {
        DeliveryMode::Private => ReplyAction {
            destination: msg.sender_id.clone(),
            mode: ReplyMode::Direct,
            text,
        },
        DeliveryMode::Group => ReplyAction {
            destination: msg.chat_id.clone(),
            mode: ReplyMode::ReplyInPlace,
            text,
        },
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Target;
    use chrono::Utc;
    use uuid::Uuid;

    fn msg(chat_id: &str, text: &str) -> IncomingMessage {
        IncomingMessage {
            id: Uuid::new_v4(),
            channel: "bridge".to_string(),
            chat_id: chat_id.to_string(),
            sender_id: "sender@contact".to_string(),
            sender_name: Some("Sam".to_string()),
            sender_number: None,
            text: text.to_string(),
            timestamp: Utc::now(),
            is_group: true,
        }
    }

    fn doc_with_target(target: Target) -> ConfigDocument {
        ConfigDocument {
            keywords: vec!["Help".to_string()],
            targets: vec![target],
            primary_template: "Primary for {user}".to_string(),
            alternate_template: "Alternate for {user}".to_string(),
            revision: 0,
        }
    }

    fn group_target(id: &str) -> Target {
        Target {
            id: id.to_string(),
            ..Target::default()
        }
    }

    #[test]
    fn test_no_keyword_no_action() {
        let doc = doc_with_target(group_target("a@chat"));
        assert!(route(&msg("a@chat", "good morning"), &doc).is_none());
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        let doc = doc_with_target(group_target("a@chat"));
        assert!(route(&msg("a@chat", "HELP ME please"), &doc).is_some());
        // Containment inside a longer word still matches.
        assert!(route(&msg("a@chat", "that was helpful"), &doc).is_some());
    }

    #[test]
    fn test_unknown_source_no_action() {
        let doc = doc_with_target(group_target("a@chat"));
        assert!(route(&msg("b@chat", "help"), &doc).is_none());
    }

    #[test]
    fn test_duplicate_target_ids_first_wins() {
        let mut doc = doc_with_target(group_target("a@chat"));
        doc.targets.push(Target {
            id: "a@chat".to_string(),
            template_choice: TemplateChoice::Alternate,
            ..Target::default()
        });

        for _ in 0..3 {
            let action = route(&msg("a@chat", "help"), &doc).unwrap();
            assert_eq!(action.text, "Primary for Sam");
        }
    }

    #[test]
    fn test_alternate_template_choice() {
        let mut target = group_target("a@chat");
        target.template_choice = TemplateChoice::Alternate;
        let doc = doc_with_target(target);

        let action = route(&msg("a@chat", "help"), &doc).unwrap();
        assert_eq!(action.text, "Alternate for Sam");
    }

    #[test]
    fn test_custom_template_choice() {
        let mut target = group_target("a@chat");
        target.template_choice = TemplateChoice::Custom;
        target.custom_reply = "Custom for {user}".to_string();
        let doc = doc_with_target(target);

        let action = route(&msg("a@chat", "help"), &doc).unwrap();
        assert_eq!(action.text, "Custom for Sam");
    }

    #[test]
    fn test_empty_custom_reply_falls_back_to_primary() {
        let mut target = group_target("a@chat");
        target.template_choice = TemplateChoice::Custom;
        let doc = doc_with_target(target);

        let action = route(&msg("a@chat", "help"), &doc).unwrap();
        assert_eq!(action.text, "Primary for Sam");
    }

    #[test]
    fn test_group_mode_replies_in_place() {
        let doc = doc_with_target(group_target("a@chat"));
        let action = route(&msg("a@chat", "help"), &doc).unwrap();
        assert_eq!(action.destination, "a@chat");
        assert_eq!(action.mode, ReplyMode::ReplyInPlace);
    }

    #[test]
    fn test_private_mode_goes_to_sender() {
        let mut target = group_target("a@chat");
        target.delivery_mode = DeliveryMode::Private;
        let doc = doc_with_target(target);

        let action = route(&msg("a@chat", "help"), &doc).unwrap();
        assert_eq!(action.destination, "sender@contact");
        assert_eq!(action.mode, ReplyMode::Direct);
    }

    #[test]
    fn test_no_keywords_configured_never_matches() {
        let mut doc = doc_with_target(group_target("a@chat"));
        doc.keywords.clear();
        assert!(route(&msg("a@chat", "help"), &doc).is_none());
    }
}
