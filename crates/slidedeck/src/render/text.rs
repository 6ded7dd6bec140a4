use std::borrow::Cow;

use crate::deck::Deck;

/// Deck state that label text can refer to with `{name}` placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextVars {
    pub page: usize,
    pub count: usize,
    pub index: usize,
    pub title: String,
    pub section: String,
    pub time: f64,
}

impl TextVars {
    /// Values as seen from the current slide.
    pub fn from_deck(deck: &Deck) -> Self {
        Self::for_slide(deck, deck.index())
    }

    /// Values as seen from slide `index`, which may be the outgoing slide of
    /// a transition rather than the current one.
    pub fn for_slide(deck: &Deck, index: usize) -> Self {
        Self {
            page: index + 1,
            count: deck.max_index(),
            index,
            title: deck
                .slide(index)
                .map(|s| s.title.clone())
                .unwrap_or_default(),
            section: deck.section_title_at(index).unwrap_or_default().to_string(),
            time: deck.elapsed_time(),
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "page" => Some(self.page.to_string()),
            "count" => Some(self.count.to_string()),
            "index" => Some(self.index.to_string()),
            "title" => Some(self.title.clone()),
            "section" => Some(self.section.clone()),
            "time" => Some(format!("{}", self.time.floor() as u64)),
            _ => None,
        }
    }
}

/// Substitute `{name}` placeholders. `{{` and `}}` are literal braces;
/// unknown names are left as written.
pub fn expand<'a>(template: &'a str, vars: &TextVars) -> Cow<'a, str> {
    if !template.contains(['{', '}']) {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            match tail.find('}') {
                Some(end) => {
                    let name = &tail[1..end];
                    match vars.lookup(name) {
                        Some(value) => out.push_str(&value),
                        None => out.push_str(&tail[..=end]),
                    }
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
