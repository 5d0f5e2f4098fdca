// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates and user-facing reply strings, centralized so they
//! can be maintained and tested in one place.

use volly_core::types::AttendanceStatus;

/// System prompt governing the decision component's behavior.
pub const SYSTEM_PROMPT: &str = "You are Volly, a friendly and energetic volleyball game organizer. \
Your goal is to help players join games, answer their questions about upcoming games, and maintain a natural conversation.

You have access to tools to log player responses, get game details, and check the roster.

## Important Context:
- You will receive a [CONTEXT] message with the player's name and phone number. Pay attention to this!
- Attendance is always recorded against the next upcoming game.

## When to use tools:
- When a player confirms attendance (e.g., \"I'm in\", \"Yes\", \"Count me in\"), use `log_response` with status='confirmed'
- When a player declines (e.g., \"Can't make it\", \"No\", \"Not this time\"), use `log_response` with status='declined'
- When a player is unsure (e.g., \"Maybe\", \"Not sure yet\"), use `log_response` with status='maybe'
- When a player asks who's coming, use `check_roster`
- When a player asks about game details (time, location), use `get_event_details`

## Conversation style:
- Be concise - you're chatting on WhatsApp, not writing essays
- Use casual language
- When mentioning dates, use words like \"next Tuesday\" instead of \"2026-09-01\"
- Mention time as \"morning/afternoon/evening\" initially, provide exact time only when asked or after confirmation
- DON'T use emojis
- Respond to casual conversation naturally
- Keep responses short and natural

## Important:
- Be helpful with game-related questions
- If someone asks about their status, check and let them know";

/// Greeting sent to senders that don't match any registered player.
pub const NEW_PLAYER_GREETING: &str = "Hey! I don't think we've met. What's your name?";

// User-facing replies for failure cases. Internal detail stays in the
// logs; players get something friendly.
pub const NO_UPCOMING_GAME: &str =
    "No games scheduled yet, I'll let you know when something's up!";
pub const STORAGE_ERROR: &str = "Hmm, had a little technical issue. Can you try again?";
pub const GENERIC_ERROR: &str = "Oops, something went wrong. Mind trying again?";

/// Prompt asking the decision component to compose a game invite.
pub fn invite_prompt(player_name: &str, game_date: &str, language: &str) -> String {
    format!(
        "Generate a short, friendly WhatsApp invite for a volleyball game.

Player name: {player_name}
Game date: {game_date}
Language: {language}

Guidelines:
- Use casual language (say \"bro\" or \"dude\", not the player's name)
- Refer to the date in words (e.g., \"next Tuesday\") not the exact date
- Mention time as morning/afternoon/evening only
- NO emojis
- Keep it very short (one or two sentences max)
- End with a question mark to invite a response
- Don't explicitly ask them to reply with yes/no - just make it conversational

Example (English): \"Hey bro, volleyball game next Tuesday evening, you in?\"
Example (Hebrew): \"אחי, יש משחק כדורעף ביום שלישי הבא בערב, בא?\"

Generate ONLY the message, no extra text:"
    )
}

/// Plain invite used when invite generation fails. The broadcast must
/// still reach every recipient.
pub fn fallback_invite(game_date: &str, language: &str) -> String {
    if language.eq_ignore_ascii_case("hebrew") {
        format!("היי, יש משחק כדורעף ב-{game_date}, בא?")
    } else {
        format!("Hey, volleyball game on {game_date}, you in?")
    }
}

/// Context annotation turn carrying the resolved identity and the
/// player's standing for the next game.
pub fn context_annotation(
    player_name: &str,
    phone: &str,
    language: &str,
    status_summary: &str,
) -> String {
    format!(
        "[CONTEXT] You are talking to {player_name} (phone: {phone}, preferred language: {language}). \
         Their status for the next game: {status_summary}."
    )
}

/// Confirmation text returned after an attendance record is written.
pub fn log_confirmation(status: AttendanceStatus, player_name: &str, game_date: &str) -> String {
    match status {
        AttendanceStatus::Confirmed => format!("Got it! {player_name} is in for {game_date}."),
        AttendanceStatus::Declined => {
            format!("No worries, marked {player_name} as can't make it.")
        }
        AttendanceStatus::Maybe => format!("Cool, {player_name} is a maybe for now."),
        AttendanceStatus::Pending => format!("Updated {player_name}'s status to pending."),
    }
}
