use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            HttpMethod::Get => 0,
            HttpMethod::Post => 1,
            HttpMethod::Put => 2,
            HttpMethod::Delete => 3,
            HttpMethod::Patch => 4,
            HttpMethod::Head => 5,
            HttpMethod::Options => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Persisted as the 0-based position in `ALL`.
impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index() as u8)
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        HttpMethod::from_index(index as usize).ok_or_else(|| {
            de::Error::custom(format!(
                "method index {} out of range (0..{})",
                index,
                HttpMethod::ALL.len()
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Splits `input` on the first `=`. Input without `=` yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        input
            .split_once('=')
            .map(|(key, value)| Self::new(key, value))
    }
}

/// The request under construction.
///
/// Header and param lists only grow at the end and shrink from the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<KeyValue>,
    pub params: Vec<KeyValue>,
    pub body: String,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            url: String::new(),
            headers: vec![KeyValue::new("Content-Type", "application/json")],
            params: Vec::new(),
            body: String::new(),
        }
    }
}

impl RequestDraft {
    pub fn push_header(&mut self, header: KeyValue) {
        self.headers.push(header);
    }

    pub fn pop_header(&mut self) -> Option<KeyValue> {
        self.headers.pop()
    }

    pub fn push_param(&mut self, param: KeyValue) {
        self.params.push(param);
    }

    pub fn pop_param(&mut self) -> Option<KeyValue> {
        self.params.pop()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRequest {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub headers: Vec<KeyValue>,
    #[serde(default)]
    pub params: Vec<KeyValue>,
}

impl SavedRequest {
    pub fn from_draft(name: String, draft: &RequestDraft) -> Self {
        Self {
            name,
            method: draft.method,
            url: draft.url.clone(),
            body: draft.body.clone(),
            headers: draft.headers.clone(),
            params: draft.params.clone(),
        }
    }

    pub fn to_draft(&self) -> RequestDraft {
        RequestDraft {
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            params: self.params.clone(),
            body: self.body.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigation,
    TextEdit,
    SaveNamePrompt,
    DeleteConfirm,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Navigation => write!(f, "NAV"),
            Mode::TextEdit => write!(f, "EDIT"),
            Mode::SaveNamePrompt => write!(f, "SAVE"),
            Mode::DeleteConfirm => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Request,
    Response,
    Saved,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Request, Tab::Response, Tab::Saved];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Request => "Request",
            Tab::Response => "Response",
            Tab::Saved => "Saved",
        }
    }

    fn index(&self) -> usize {
        match self {
            Tab::Request => 0,
            Tab::Response => 1,
            Tab::Saved => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Method,
    Url,
    Headers,
    Body,
    Params,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Method,
        Section::Url,
        Section::Headers,
        Section::Body,
        Section::Params,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Method => "Method",
            Section::Url => "URL",
            Section::Headers => "Headers",
            Section::Body => "Body",
            Section::Params => "Params",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Section::Method => 0,
            Section::Url => 1,
            Section::Headers => 2,
            Section::Body => 3,
            Section::Params => 4,
        }
    }

    /// Maps the digit shortcut `1..=5` to a section.
    pub fn from_digit(digit: char) -> Option<Self> {
        let n = digit.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
