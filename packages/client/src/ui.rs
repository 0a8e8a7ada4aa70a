//! Terminal prompt helpers.

use std::io::Write;

/// Prompt shown by the readline loop.
pub const PROMPT: &str = "irori> ";

/// Redisplay the prompt after asynchronous output interrupted it.
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    let _ = std::io::stdout().flush();
}
