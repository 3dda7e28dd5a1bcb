use super::state::AppState;

/// Header subtitle: mode name plus the attempts-remaining display. Refreshed
/// on every completed pair and on reset.
pub(super) fn update_subtitle(st: &AppState) {
    if let Some(subtitle) = &st.subtitle_label {
        let text = match st.session.attempts_remaining() {
            Some(remaining) => format!(
                "{} | Attempts left: {}",
                st.mode.name(),
                remaining
            ),
            None => st.mode.name().to_string(),
        };
        subtitle.set_text(&text);
    }
}
