//! Template variables substituted while a stream is read.

use uls_lexer::TokenId;

use crate::StreamError;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Template {
    name: String,
    value: String,
}

/// Append-only table of template names and their values.
///
/// An `ID` token whose lexeme equals a template name is read back as a
/// `TMPL` token carrying the template's value. Names match exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateList {
    entries: Vec<Template>,
    limit: Option<usize>,
}

impl TemplateList {
    pub fn new() -> Self {
        Self::default()
    }

    /// List that holds at most `limit` templates.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::with_capacity(limit),
            limit: Some(limit),
        }
    }

    pub fn add(&mut self, name: &str, value: &str) -> Result<(), StreamError> {
        if self.find(name).is_some() {
            return Err(StreamError::DuplicateTemplate(name.to_owned()));
        }
        if self.limit.is_some_and(|limit| self.entries.len() >= limit) {
            return Err(StreamError::TemplatesFull);
        }
        self.entries.push(Template {
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    /// Replace the value of an existing template.
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), StreamError> {
        let index = self
            .find(name)
            .ok_or_else(|| StreamError::UnknownTemplate(name.to_owned()))?;
        self.entries[index].value = value.to_owned();
        Ok(())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.find(name).map(|i| self.entries[i].value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|t| (t.name.as_str(), t.value.as_str()))
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|t| t.name == name)
    }

    /// The token an `(id, lexeme)` pair reads back as.
    pub fn substitute(&self, tok_id: TokenId, lexeme: Vec<u8>) -> (TokenId, Vec<u8>) {
        if tok_id != TokenId::ID {
            return (tok_id, lexeme);
        }
        let value = std::str::from_utf8(&lexeme)
            .ok()
            .and_then(|name| self.value(name));
        match value {
            Some(value) => (TokenId::TMPL, value.as_bytes().to_vec()),
            None => (tok_id, lexeme),
        }
    }
}
