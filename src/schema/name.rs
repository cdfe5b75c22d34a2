// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{AvroResult, Error, error::Details};
use regex_lite::Regex;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

/// Represents the namespace of a named schema.
///
/// An empty namespace is normalised to `None`.
pub type Namespace = Option<String>;

/// Represents the aliases of a named schema.
pub type Aliases = Option<Vec<Alias>>;

const NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";
const NAMESPACE_PATTERN: &str = r"^([A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*)?$";

fn name_regex() -> &'static Regex {
    static NAME_ONCE: OnceLock<Regex> = OnceLock::new();
    NAME_ONCE.get_or_init(|| Regex::new(NAME_PATTERN).expect("Regex is valid"))
}

fn namespace_regex() -> &'static Regex {
    static NAMESPACE_ONCE: OnceLock<Regex> = OnceLock::new();
    NAMESPACE_ONCE.get_or_init(|| Regex::new(NAMESPACE_PATTERN).expect("Regex is valid"))
}

/// Validates the local part of a schema name.
pub(crate) fn validate_name_part(name: &str) -> AvroResult<()> {
    if name_regex().is_match(name) {
        Ok(())
    } else {
        Err(Details::InvalidSchemaName(name.to_string(), NAME_PATTERN).into())
    }
}

pub(crate) fn validate_namespace(namespace: &str) -> AvroResult<()> {
    if namespace_regex().is_match(namespace) {
        Ok(())
    } else {
        Err(Details::InvalidNamespace(namespace.to_string(), NAMESPACE_PATTERN).into())
    }
}

pub(crate) fn validate_enum_symbol(symbol: &str) -> AvroResult<()> {
    if name_regex().is_match(symbol) {
        Ok(())
    } else {
        Err(Details::EnumSymbolName(symbol.to_string()).into())
    }
}

/// Represents names for `record`, `enum` and `fixed` Avro schemas.
///
/// Each of these schemas has a `fullname` composed of a local name and an
/// optional namespace. Equality and hashing are over the fully qualified
/// form.
///
/// More information about schema names can be found in the
/// [Avro specification](https://avro.apache.org/docs/++version++/specification/#names)
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct Name {
    name: String,
    namespace: Namespace,
}

impl Name {
    /// Create a new `Name`, splitting a dotted string at its *last* dot into
    /// namespace and local name. A leading dot means "no namespace".
    pub fn new(name: &str) -> AvroResult<Self> {
        match name.rfind('.') {
            Some(dot) => {
                let (namespace, local) = (&name[..dot], &name[dot + 1..]);
                validate_name_part(local)?;
                if namespace.is_empty() {
                    Ok(Self {
                        name: local.to_string(),
                        namespace: None,
                    })
                } else {
                    validate_namespace(namespace)?;
                    Ok(Self {
                        name: local.to_string(),
                        namespace: Some(namespace.to_string()),
                    })
                }
            }
            None => {
                validate_name_part(name)?;
                Ok(Self {
                    name: name.to_string(),
                    namespace: None,
                })
            }
        }
    }

    /// Create a new `Name` using `enclosing_namespace` when the string does
    /// not carry its own.
    pub fn with_enclosing_namespace(
        name: &str,
        enclosing_namespace: Option<&str>,
    ) -> AvroResult<Self> {
        let parsed = Self::new(name)?;
        match (&parsed.namespace, enclosing_namespace) {
            (None, Some(namespace)) if !namespace.is_empty() => {
                validate_namespace(namespace)?;
                Ok(Self {
                    name: parsed.name,
                    namespace: Some(namespace.to_string()),
                })
            }
            _ => Ok(parsed),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The `fullname` of this `Name`, resolving a missing namespace against
    /// `default_namespace`.
    pub fn fullname(&self, default_namespace: Option<&str>) -> String {
        match self.namespace.as_deref().or_else(|| {
            default_namespace.filter(|namespace| !namespace.is_empty())
        }) {
            Some(namespace) => format!("{namespace}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// A copy of this name with a missing namespace filled in from
    /// `enclosing_namespace`.
    pub fn fully_qualified(&self, enclosing_namespace: Option<&str>) -> Name {
        match (&self.namespace, enclosing_namespace) {
            (None, Some(namespace)) if !namespace.is_empty() => Name {
                name: self.name.clone(),
                namespace: Some(namespace.to_string()),
            },
            _ => self.clone(),
        }
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Name");
        debug.field("name", &self.name);
        if let Some(namespace) = &self.namespace {
            debug.field("namespace", namespace);
        }
        debug.finish()
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullname(None))
    }
}

/// Newtype over [`Name`] for schema aliases; an alias without a dot resolves
/// against the namespace of the schema it belongs to.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Alias(Name);

impl Alias {
    pub fn new(name: &str) -> AvroResult<Self> {
        Name::new(name).map(Self)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace()
    }

    pub fn fullname(&self, default_namespace: Option<&str>) -> String {
        self.0.fullname(default_namespace)
    }

    pub fn fully_qualified(&self, enclosing_namespace: Option<&str>) -> Name {
        self.0.fully_qualified(enclosing_namespace)
    }
}

impl TryFrom<&str> for Alias {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Alias {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
