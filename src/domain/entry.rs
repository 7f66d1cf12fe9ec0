//! Config entry model
//!
//! An entry is one named value: identifier, canonical value text, type tag
//! and an optional one-line comment.

use serde::Serialize;

use super::value::{ConfigValue, DecodeError, TypeTag};

/// Returns true if `id` can be written as `<digit>_<id>=<value>` and read back
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['=', '\n', '\r'])
}

/// One typed, named, commented value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    id: String,
    #[serde(rename = "type")]
    tag: TypeTag,
    value: String,
    comment: String,
}

impl Entry {
    /// Creates an entry holding a typed value
    pub fn new<T: ConfigValue>(id: impl Into<String>, comment: impl Into<String>, value: &T) -> Self {
        Self {
            id: id.into(),
            tag: T::TAG,
            value: value.encode(),
            comment: comment.into(),
        }
    }

    /// Creates an entry from already-encoded text, as read from a file
    ///
    /// The text is not checked against the tag; see [`Entry::is_well_formed`].
    pub fn raw(
        id: impl Into<String>,
        comment: impl Into<String>,
        value: impl Into<String>,
        tag: TypeTag,
    ) -> Self {
        Self {
            id: id.into(),
            tag,
            value: value.into(),
            comment: comment.into(),
        }
    }

    /// Creates an entry from user-supplied text, normalizing it for `tag`
    pub fn parse(
        id: impl Into<String>,
        comment: impl Into<String>,
        tag: TypeTag,
        text: &str,
    ) -> Result<Self, Vec<DecodeError>> {
        let value = tag.canonicalize(text)?;
        Ok(Self::raw(id, comment, value, tag))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns true if the value text decodes under the entry's tag
    pub fn is_well_formed(&self) -> bool {
        self.tag.canonicalize(&self.value).is_ok()
    }

    /// Decodes the value as `T`, or `None` if the entry holds another type
    pub fn decode<T: ConfigValue>(&self) -> Option<Result<T, Vec<DecodeError>>> {
        (self.tag == T::TAG).then(|| T::decode(&self.value))
    }

    /// Stores a new value; tag and text always change together
    pub fn set<T: ConfigValue>(&mut self, value: &T) {
        self.value = value.encode();
        self.tag = T::TAG;
    }

    pub(crate) fn set_encoded(&mut self, tag: TypeTag, value: String) {
        self.value = value;
        self.tag = tag;
    }

    /// Takes value, tag and comment from `other`, keeping this entry's id
    pub(crate) fn replace_with(&mut self, other: Entry) {
        self.value = other.value;
        self.tag = other.tag;
        self.comment = other.comment;
    }
}
