/// Playback actions reachable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Toggle,
    Play,
    Pause,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "k" | "K" | "MediaPlayPause" => Some(KeyAction::Toggle),
        "MediaPlay" => Some(KeyAction::Play),
        "MediaPause" | "MediaStop" => Some(KeyAction::Pause),
        _ => None,
    }
}
