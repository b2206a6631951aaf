/// Default separator cascade, tried in this order.
///
/// Brackets and multi-character runs come before the single marks they are
/// built from, and contraction suffixes come before the bare apostrophe.
/// `$` is listed twice and so gets two stages.
#[rustfmt::skip]
pub const DEFAULT_SEPARATORS: &[&str] = &[
    "(", ")", "[", "]", "{", "}", "...", "_", "--", "|",
    ";", ":",
    "±", "·", "≥", "≤", "≈", "=", "<", ">", "£", "$", "€",
    "!!!", "???", "?!?", "!?!", "?!", "!?", "??", "!!",
    "!", "?",
    "/", "\"", "%", "$", "*", "#", "+",
    ",", ".",
    "'s", "'ve", "'ll", "'re", "'d",
    "-", "'",
    "∂", "∆", "∇",
];

/// Sentence-final marks that the whitespace stage may strip from a token.
pub const DEFAULT_STOPWORD_SUFFIXES: [char; 4] = ['.', ',', ':', ';'];
