//! Route identifier value object and codec
//!
//! Fixed-region providers hand out opaque ids that are used verbatim. The
//! national provider serves many municipalities through one service, so its
//! ids are composites `TAGO|<municipality code>|<native id>` that carry
//! enough context to route a later detail request without re-searching.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Identifier of a route, sufficient to route a later detail request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    /// Wrap a raw identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the identifier text
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RouteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A decoded route identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedRouteId<'a> {
    /// Opaque id of a fixed-region provider, returned unchanged
    FixedRegion(&'a str),
    /// Composite id of the national provider
    National {
        /// Municipality (city) code the route belongs to
        municipality_code: &'a str,
        /// Provider-native route id
        native_id: &'a str,
    },
}

/// Encodes and decodes composite national route ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteIdCodec {
    tag: &'static str,
    delimiter: char,
}

impl RouteIdCodec {
    /// Provider tag of the nationwide service
    pub const NATIONAL_TAG: &'static str = "TAGO";
    /// Reserved delimiter between id parts
    pub const DELIMITER: char = '|';

    /// Create a codec, validating the tag/delimiter pair once
    ///
    /// # Errors
    ///
    /// Returns `InvalidCodec` if the tag is empty or contains the delimiter,
    /// or if the delimiter is alphanumeric or whitespace (and could therefore
    /// appear inside provider-native ids).
    pub fn new(tag: &'static str, delimiter: char) -> Result<Self, DomainError> {
        if tag.is_empty() {
            return Err(DomainError::InvalidCodec("tag must not be empty".to_string()));
        }
        if tag.contains(delimiter) {
            return Err(DomainError::InvalidCodec(format!(
                "tag '{tag}' contains delimiter '{delimiter}'"
            )));
        }
        if delimiter.is_alphanumeric() || delimiter.is_whitespace() {
            return Err(DomainError::InvalidCodec(format!(
                "delimiter '{delimiter}' may occur inside native ids"
            )));
        }
        Ok(Self { tag, delimiter })
    }

    /// Codec for the nationwide provider (`TAGO|city|route`)
    ///
    /// Built from [`Self::NATIONAL_TAG`] and [`Self::DELIMITER`], a pair that
    /// satisfies every check in [`Self::new`].
    #[must_use]
    pub const fn national() -> Self {
        Self {
            tag: Self::NATIONAL_TAG,
            delimiter: Self::DELIMITER,
        }
    }

    /// Provider tag this codec writes
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Build a composite id
    ///
    /// # Errors
    ///
    /// Returns `MalformedIdentifier` if a part is empty or contains the delimiter.
    pub fn encode(&self, municipality_code: &str, native_id: &str) -> Result<RouteId, DomainError> {
        for part in [municipality_code, native_id] {
            if part.is_empty() || part.contains(self.delimiter) {
                return Err(DomainError::malformed(format!(
                    "{}{d}{municipality_code}{d}{native_id}",
                    self.tag,
                    d = self.delimiter
                )));
            }
        }
        Ok(RouteId(format!(
            "{}{d}{municipality_code}{d}{native_id}",
            self.tag,
            d = self.delimiter
        )))
    }

    /// Decode any route id
    ///
    /// Ids without this codec's tag prefix are fixed-region ids and come back
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `MalformedIdentifier` for an empty id, or for a tagged id that
    /// does not split into exactly a municipality code and a native id.
    pub fn decode<'a>(&self, id: &'a RouteId) -> Result<DecodedRouteId<'a>, DomainError> {
        let raw = id.as_str();
        if raw.is_empty() {
            return Err(DomainError::malformed(raw));
        }

        let Some(rest) = raw
            .strip_prefix(self.tag)
            .and_then(|rest| rest.strip_prefix(self.delimiter))
        else {
            return Ok(DecodedRouteId::FixedRegion(raw));
        };

        let mut parts = rest.split(self.delimiter);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(municipality_code), Some(native_id), None)
                if !municipality_code.is_empty() && !native_id.is_empty() =>
            {
                Ok(DecodedRouteId::National {
                    municipality_code,
                    native_id,
                })
            },
            _ => Err(DomainError::malformed(raw)),
        }
    }

    /// Decode an id that must belong to this codec's provider
    ///
    /// # Errors
    ///
    /// Returns `MalformedIdentifier` if the tag prefix is absent or the
    /// composite is structurally invalid.
    pub fn decode_national<'a>(&self, id: &'a RouteId) -> Result<(&'a str, &'a str), DomainError> {
        match self.decode(id)? {
            DecodedRouteId::National {
                municipality_code,
                native_id,
            } => Ok((municipality_code, native_id)),
            DecodedRouteId::FixedRegion(raw) => Err(DomainError::malformed(raw)),
        }
    }

    /// Municipality code embedded in a national id, if any
    #[must_use]
    pub fn municipality_code<'a>(&self, id: &'a RouteId) -> Option<&'a str> {
        match self.decode(id) {
            Ok(DecodedRouteId::National {
                municipality_code, ..
            }) => Some(municipality_code),
            _ => None,
        }
    }
}

impl Default for RouteIdCodec {
    fn default() -> Self {
        Self::national()
    }
}
