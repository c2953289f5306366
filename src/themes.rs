//! Built-in theme prompts for users who draw a blank at the setup screen.

use rand::RngExt;

pub const PREDEFINED_THEMES: &[&str] = &[
    "What does ideal leadership look like?",
    "A piece of news that has been on your mind lately",
    "What makes feedback easy or hard to hear?",
    "Why do some meetings feel like a waste of time?",
    "What does 'good code' actually mean to you?",
    "A habit you want to build, and what is stopping you",
    "What makes a team feel safe to speak up in?",
    "Something you changed your mind about this year",
    "What do you want from your work besides money?",
    "A decision you keep postponing",
    "What does it mean to explain something well?",
    "Why is it hard to say no?",
];

/// Draw a random prompt from the built-in list.
pub fn random_theme() -> &'static str {
    let index = rand::rng().random_range(0..PREDEFINED_THEMES.len());
    PREDEFINED_THEMES[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_theme_comes_from_the_list() {
        for _ in 0..32 {
            assert!(PREDEFINED_THEMES.contains(&random_theme()));
        }
    }
}
