//! Embed builders shared by commands.

use poise::serenity_prelude as serenity;

/// Title of the green confirmation embed.
pub const SUCCESS_TITLE: &str = "Success! ✅";
/// Title of the red failure embed.
pub const ERROR_TITLE: &str = "Error! 💢";

const SUCCESS_COLOUR: serenity::Colour = serenity::Colour::new(0x2E_CC71);
const ERROR_COLOUR: serenity::Colour = serenity::Colour::new(0xE7_4C3C);

/// Green confirmation embed.
pub fn success_embed(description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(SUCCESS_TITLE)
        .description(description)
        .colour(SUCCESS_COLOUR)
}

/// Red failure embed.
pub fn error_embed(description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(ERROR_TITLE)
        .description(description)
        .colour(ERROR_COLOUR)
}

/// Greeting posted to a guild's system channel after joining.
pub fn welcome_embed(bot_name: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Hello!")
        .description(welcome_text(bot_name))
}

/// Body of the welcome embed.
pub fn welcome_text(bot_name: &str) -> String {
    format!(
        "I'm {bot_name} :wave:\n\nUse `/bind_log_channel` to set up a channel for my logs!"
    )
}
