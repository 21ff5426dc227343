//! Share text composition

/// Text used when nothing is selected
pub const EMPTY_TEAM_TEXT: &str = "好きなポケモンチームを作成しました！";

pub const SHARE_HEADER: &str = "私の好きなポケモンチーム✨";

pub const SHARE_FOOTER: &str = "みんなの好きなポケモンも教えて！";

/// Human-readable team summary: header, a numbered line per name, footer
pub fn compose_share_text<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        return EMPTY_TEAM_TEXT.to_string();
    }

    let list = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{SHARE_HEADER}\n\n{list}\n\n{SHARE_FOOTER}")
}
