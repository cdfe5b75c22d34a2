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

use crate::AvroResult;
use crate::error::Details;
use crate::schema::Schema;
use log::error;
use std::collections::HashMap;

/// A description of a Union schema.
///
/// Branches are identified by position and by wire name (the primitive type
/// name, `"array"`/`"map"`, or the fullname of a named schema). Two branches
/// with the same identity cannot coexist and unions cannot nest.
#[derive(Debug, Clone)]
pub struct UnionSchema {
    schemas: Vec<Schema>,
    // Maps the wire name of each branch to its position, for the
    // union-tagged JSON encoding.
    name_index: HashMap<String, usize>,
}

impl UnionSchema {
    /// Creates a new `UnionSchema` from a vector of branch schemas.
    ///
    /// # Errors
    /// Fails if `schemas` contains a union or two branches with the same
    /// wire name.
    pub fn new(schemas: Vec<Schema>) -> AvroResult<Self> {
        let mut name_index = HashMap::with_capacity(schemas.len());
        for (i, schema) in schemas.iter().enumerate() {
            if let Schema::Union(_) = schema {
                error!("Unions cannot contain directly nested unions");
                return Err(Details::GetNestedUnion.into());
            }
            let wire_name = schema.wire_name();
            if name_index.insert(wire_name.clone(), i).is_some() {
                error!("Union contains a duplicate branch: {wire_name}");
                return Err(Details::GetUnionDuplicate(wire_name).into());
            }
        }
        Ok(UnionSchema {
            schemas,
            name_index,
        })
    }

    /// All branches of this union, in declaration order.
    pub fn variants(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn variant(&self, index: usize) -> Option<&Schema> {
        self.schemas.get(index)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Whether any branch is `null`.
    pub fn is_nullable(&self) -> bool {
        self.name_index.contains_key("null")
    }

    /// The position of the `null` branch, if there is one.
    pub fn null_index(&self) -> Option<usize> {
        self.name_index.get("null").copied()
    }

    /// The position of the branch with the given wire name.
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }
}

// No need to compare name_index, it is derivative of schemas.
impl PartialEq for UnionSchema {
    fn eq(&self, other: &UnionSchema) -> bool {
        self.schemas.eq(&other.schemas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Details, Error};
    use crate::schema::Name;
    use pretty_assertions::assert_eq;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn rejects_duplicate_primitive_branches() {
        let result = UnionSchema::new(vec![Schema::String, Schema::String]);
        match result.map_err(Error::into_details) {
            Err(Details::GetUnionDuplicate(name)) => assert_eq!(name, "string"),
            other => panic!("Expected Details::GetUnionDuplicate, got {other:?}"),
        }
    }

    #[test]
    fn rejects_nested_unions() {
        let inner = UnionSchema::new(vec![Schema::Int, Schema::Null]).unwrap();
        let result = UnionSchema::new(vec![Schema::Union(inner), Schema::String]);
        match result.map_err(Error::into_details) {
            Err(Details::GetNestedUnion) => {}
            other => panic!("Expected Details::GetNestedUnion, got {other:?}"),
        }
    }

    #[test]
    fn distinct_named_branches_are_fine() -> TestResult {
        let union = UnionSchema::new(vec![
            Schema::Null,
            Schema::Ref {
                name: Name::new("a.Thing")?,
            },
            Schema::Ref {
                name: Name::new("b.Thing")?,
            },
        ])?;
        assert_eq!(union.len(), 3);
        assert_eq!(union.null_index(), Some(0));
        assert_eq!(union.index_of_name("a.Thing"), Some(1));
        assert_eq!(union.index_of_name("b.Thing"), Some(2));

        Ok(())
    }

    #[test]
    fn same_fullname_in_two_branches_is_rejected() -> TestResult {
        let result = UnionSchema::new(vec![
            Schema::Ref {
                name: Name::new("a.Thing")?,
            },
            Schema::Ref {
                name: Name::new("a.Thing")?,
            },
        ]);
        assert!(matches!(
            result.map_err(Error::into_details),
            Err(Details::GetUnionDuplicate(_))
        ));

        Ok(())
    }

    #[test]
    fn nullable_lookup() -> TestResult {
        let union = UnionSchema::new(vec![Schema::Int, Schema::Null])?;
        assert!(union.is_nullable());
        assert_eq!(union.null_index(), Some(1));
        assert_eq!(union.index_of_name("int"), Some(0));
        assert_eq!(union.index_of_name("string"), None);

        Ok(())
    }
}
