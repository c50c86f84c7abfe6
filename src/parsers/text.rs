/// Trim leading and trailing whitespace, keeping inner line breaks and spacing
pub fn trim_text(text: &str) -> String {
    text.trim().to_string()
}

/// Join the text fragments of one element and trim the result
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined: String = fragments.into_iter().collect();
    trim_text(&joined)
}
