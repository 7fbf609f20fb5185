//! Report rendering.
//!
//! Turns the extracted reaction sequence into a static document: one
//! container element per (message, emoji) pair, one child element per
//! reacting user. Identical input always yields byte-identical output.

use crate::core::models::ExtractedReaction;

/// Render the flat HTML report.
#[must_use]
pub fn render_html(reactions: &[ExtractedReaction]) -> String {
    let mut html = String::from("<!DOCTYPE html>\n\n<body>\n");

    for reaction in reactions {
        html.push_str(&format!(
            "<div class=\"reaction\" data-msgId=\"{}\" data-emoji=\"{}\">\n",
            reaction.message_id, reaction.emoji
        ));
        for user in &reaction.reacting_users {
            html.push_str(&format!(
                "\t<div class=\"user\" data-id=\"{}\" data-tag=\"{}\"></div>\n",
                user.id, user.tag
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</body>");

    html
}

/// Render the counts-only output mode: one line per (message, emoji) pair.
#[must_use]
pub fn render_counts(reactions: &[ExtractedReaction]) -> String {
    reactions
        .iter()
        .map(|r| {
            format!(
                "message {} {}: {} user(s)",
                r.message_id,
                r.emoji,
                r.reacting_users.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Derive the report file stem: `<guild name>.<channel name>`, with spaces
/// replaced by underscores and slashes by hyphens.
#[must_use]
pub fn report_file_stem(guild_name: &str, channel_name: &str) -> String {
    format!("{}.{}", guild_name, channel_name)
        .replace(' ', "_")
        .replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ReactingUser;
    use serenity::model::id::{MessageId, UserId};

    fn sample() -> Vec<ExtractedReaction> {
        vec![ExtractedReaction {
            message_id: MessageId::new(1),
            emoji: "👍".to_string(),
            reacting_users: vec![ReactingUser {
                id: UserId::new(10),
                tag: "alice#0001".to_string(),
            }],
        }]
    }

    #[test]
    fn renders_container_and_user_elements() {
        let html = render_html(&sample());

        assert_eq!(
            html,
            "<!DOCTYPE html>\n\n<body>\n\
             <div class=\"reaction\" data-msgId=\"1\" data-emoji=\"👍\">\n\
             \t<div class=\"user\" data-id=\"10\" data-tag=\"alice#0001\"></div>\n\
             </div>\n\
             </body>"
        );
    }

    #[test]
    fn empty_input_renders_an_empty_body() {
        assert_eq!(render_html(&[]), "<!DOCTYPE html>\n\n<body>\n</body>");
    }

    #[test]
    fn rendering_is_deterministic() {
        let reactions = sample();
        assert_eq!(render_html(&reactions), render_html(&reactions));
    }

    #[test]
    fn counts_mode_lists_one_line_per_reaction() {
        let mut reactions = sample();
        reactions.push(ExtractedReaction {
            message_id: MessageId::new(2),
            emoji: "🎉".to_string(),
            reacting_users: vec![],
        });

        let counts = render_counts(&reactions);
        assert_eq!(
            counts,
            "message 1 👍: 1 user(s)\nmessage 2 🎉: 0 user(s)"
        );
    }

    #[test]
    fn file_stem_replaces_spaces_and_slashes() {
        assert_eq!(
            report_file_stem("My Cool Server", "memes/archive"),
            "My_Cool_Server.memes-archive"
        );
    }
}
