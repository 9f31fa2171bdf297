use std::borrow::Cow;

use ahash::HashMap;

use crate::error::ParseError;

/// Declared general entities, with their replacement text.
///
/// Every use of a declared entity is charged against two budgets shared by
/// the whole document: the number of references it stands for, nested ones
/// included, and the number of bytes of replacement text produced.
#[derive(Debug)]
pub(crate) struct Entities {
    values: HashMap<String, Entity>,
    expansion_limit: usize,
    size_limit: usize,
    expansions: usize,
    size: usize,
}

#[derive(Debug)]
struct Entity {
    value: String,
    // references the value was expanded from
    expansions: usize,
}

impl Entities {
    pub(crate) fn new(expansion_limit: usize, size_limit: usize) -> Self {
        Entities {
            values: HashMap::default(),
            expansion_limit,
            size_limit,
            expansions: 0,
            size: 0,
        }
    }

    /// Declare an entity from its literal value. The first declaration of
    /// a name is binding; later ones are ignored.
    pub(crate) fn declare(&mut self, name: &str, literal: &str) -> Result<(), ParseError> {
        if self.values.contains_key(name) {
            return Ok(());
        }
        let before = self.expansions;
        let value = decode_text(literal, self)?.into_owned();
        let expansions = self.expansions - before;
        self.values
            .insert(name.to_string(), Entity { value, expansions });
        Ok(())
    }

    fn expand(&mut self, name: &str, result: &mut String) -> Result<(), ParseError> {
        let entity = self
            .values
            .get(name)
            .ok_or_else(|| ParseError::InvalidEntity(name.to_string()))?;
        self.expansions = self.expansions.saturating_add(entity.expansions + 1);
        self.size = self.size.saturating_add(entity.value.len());
        if self.expansions > self.expansion_limit || self.size > self.size_limit {
            return Err(ParseError::EntityExpansionLimit(name.to_string()));
        }
        result.push_str(&entity.value);
        Ok(())
    }
}

#[cfg(test)]
impl Default for Entities {
    fn default() -> Self {
        Entities::new(usize::MAX, usize::MAX)
    }
}

/// Decode character data: entity references, character references and
/// line endings.
pub(crate) fn decode_text<'a>(
    content: &'a str,
    entities: &mut Entities,
) -> Result<Cow<'a, str>, ParseError> {
    if !content.contains(['&', '\r']) {
        return Ok(Cow::Borrowed(content));
    }
    decode(content, entities, false).map(Cow::Owned)
}

/// Decode an attribute value. Besides references and line endings, literal
/// tabs and newlines become spaces.
pub(crate) fn decode_attribute<'a>(
    content: &'a str,
    entities: &mut Entities,
) -> Result<Cow<'a, str>, ParseError> {
    if !content.contains(['&', '\r', '\n', '\t']) {
        return Ok(Cow::Borrowed(content));
    }
    decode(content, entities, true).map(Cow::Owned)
}

/// Normalize line endings of text that has no references, like CDATA.
pub(crate) fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

fn decode(content: &str, entities: &mut Entities, attribute: bool) -> Result<String, ParseError> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => {
                let mut reference = String::new();
                let mut is_complete = false;
                for c in chars.by_ref() {
                    if c == ';' {
                        is_complete = true;
                        break;
                    }
                    reference.push(c);
                }
                if !is_complete {
                    return Err(ParseError::UnclosedEntity(reference));
                }
                resolve_reference(&reference, entities, &mut result)?;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push(if attribute { ' ' } else { '\n' });
            }
            '\n' | '\t' if attribute => result.push(' '),
            _ => result.push(c),
        }
    }
    Ok(result)
}

fn resolve_reference(
    reference: &str,
    entities: &mut Entities,
    result: &mut String,
) -> Result<(), ParseError> {
    if let Some(number) = reference.strip_prefix('#') {
        let code = if let Some(hex) = number.strip_prefix('x') {
            u32::from_str_radix(hex, 16).ok()
        } else {
            number.parse::<u32>().ok()
        };
        let c = code
            .and_then(char::from_u32)
            .filter(|c| is_xml_char(*c))
            .ok_or_else(|| ParseError::InvalidCharacterReference(reference.to_string()))?;
        result.push(c);
        return Ok(());
    }
    match reference {
        "amp" => result.push('&'),
        "apos" => result.push('\''),
        "gt" => result.push('>'),
        "lt" => result.push('<'),
        "quot" => result.push('"'),
        _ => entities.expand(reference, result)?,
    }
    Ok(())
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escape text content. Characters the output encoding can't represent
/// become character references.
pub(crate) fn serialize_text(content: &str, representable: impl Fn(char) -> bool) -> Cow<'_, str> {
    serialize(content, representable, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

/// Escape an attribute value for use between double quotes. Whitespace
/// other than spaces is escaped so it survives attribute normalization.
pub(crate) fn serialize_attribute(
    content: &str,
    representable: impl Fn(char) -> bool,
) -> Cow<'_, str> {
    serialize(content, representable, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#9;"),
        '\n' => Some("&#10;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

fn serialize(
    content: &str,
    representable: impl Fn(char) -> bool,
    escape: impl Fn(char) -> Option<&'static str>,
) -> Cow<'_, str> {
    if content
        .chars()
        .all(|c| escape(c).is_none() && representable(c))
    {
        return Cow::Borrowed(content);
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        if let Some(escaped) = escape(c) {
            result.push_str(escaped);
        } else if representable(c) {
            result.push(c);
        } else {
            result.push_str(&format!("&#{};", c as u32));
        }
    }
    Cow::Owned(result)
}
