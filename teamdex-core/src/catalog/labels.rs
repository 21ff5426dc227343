//! Japanese display labels for types and generations

const TYPE_LABELS: [(&str, &str); 18] = [
    ("normal", "ノーマル"),
    ("fire", "ほのお"),
    ("water", "みず"),
    ("electric", "でんき"),
    ("grass", "くさ"),
    ("ice", "こおり"),
    ("fighting", "かくとう"),
    ("poison", "どく"),
    ("ground", "じめん"),
    ("flying", "ひこう"),
    ("psychic", "エスパー"),
    ("bug", "むし"),
    ("rock", "いわ"),
    ("ghost", "ゴースト"),
    ("dragon", "ドラゴン"),
    ("dark", "あく"),
    ("steel", "はがね"),
    ("fairy", "フェアリー"),
];

const REGIONS: [&str; 9] = [
    "カントー",
    "ジョウト",
    "ホウエン",
    "シンオウ",
    "イッシュ",
    "カロス",
    "アローラ",
    "ガラル",
    "パルデア",
];

/// Japanese name of a type; unknown types come back unchanged
pub fn type_label(kind: &str) -> &str {
    TYPE_LABELS
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, label)| *label)
        .unwrap_or(kind)
}

/// Region a generation is set in, or `第N世代` outside 1..=9
pub fn region_name(generation: u8) -> String {
    generation
        .checked_sub(1)
        .and_then(|i| REGIONS.get(i as usize))
        .map(|r| r.to_string())
        .unwrap_or_else(|| format!("第{generation}世代"))
}
