use serenity::all::{Colour, CreateEmbed, Timestamp};

// ============================================================================
// Color Palette
// ============================================================================

/// Primary brand color - Discord blurple
pub const PRIMARY_COLOR: Colour = Colour::from_rgb(88, 101, 242);

/// Success color - Green
pub const SUCCESS_COLOR: Colour = Colour::from_rgb(87, 242, 135);

/// Warning color - Yellow
pub const WARNING_COLOR: Colour = Colour::from_rgb(254, 231, 92);

/// Moderation action color - Orange (kick, mute)
pub const ACTION_COLOR: Colour = Colour::from_rgb(230, 126, 34);

/// Severe moderation action color - Dark red (ban)
pub const SEVERE_COLOR: Colour = Colour::from_rgb(231, 76, 60);

/// Bullet point character
pub const BULLET: &str = "•";

// ============================================================================
// Embed Builders
// ============================================================================

/// Create a standard/primary embed
pub fn standard_embed() -> CreateEmbed {
    CreateEmbed::new().color(PRIMARY_COLOR)
}

/// Create a success embed
pub fn success_embed() -> CreateEmbed {
    CreateEmbed::new().color(SUCCESS_COLOR)
}

/// Create a warning embed
pub fn warning_embed() -> CreateEmbed {
    CreateEmbed::new().color(WARNING_COLOR)
}

/// Embed for a moderation action, stamped with the current time
pub fn action_embed() -> CreateEmbed {
    CreateEmbed::new()
        .color(ACTION_COLOR)
        .timestamp(Timestamp::now())
}

/// Embed for a ban, stamped with the current time
pub fn severe_embed() -> CreateEmbed {
    CreateEmbed::new()
        .color(SEVERE_COLOR)
        .timestamp(Timestamp::now())
}

// ============================================================================
// Text Helpers
// ============================================================================

/// Format a list of items with bullet points
pub fn bullet_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("{} {}", BULLET, item))
        .collect::<Vec<_>>()
        .join("\n")
}
